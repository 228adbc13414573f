//! Staged consent workflow
//!
//! A CONSENT decision moves through timed stages inside a fixed window:
//!
//! ```text
//! DISTINCT:  | CLARIFICATIONS | AVIS | AMENDEMENTS | OBJECTIONS | -> TERMINEE
//! MERGED:    |  CLARIFAVIS  |  AMENDEMENTS  |  OBJECTIONS  |      -> TERMINEE
//!            start                                       end
//! ```
//!
//! The stage is derived from `(window, mode, now)` by [`schedule::current_stage`].
//! [`process::ConsentState`] adds what cannot be derived from time alone:
//! the creator may skip ahead from AMENDEMENTS (keep or withdraw), and
//! reconciliation never moves a decision backwards.

pub mod objection;
pub mod process;
pub mod schedule;
pub mod stage;

pub use objection::{Objection, ObjectionValue};
pub use process::{ConsentState, StageTransition, TransitionCause};
pub use schedule::{ConsentWindow, StageSchedule, StageWindow, current_stage, stage_windows};
pub use stage::{ConsentStage, StepMode};
