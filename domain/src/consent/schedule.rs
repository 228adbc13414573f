//! Time-derived stage computation
//!
//! The window `[start, end)` is cut into N equal half-open buckets, one per
//! timed stage of the step mode. All arithmetic is done on whole
//! nanoseconds so bucket boundaries are exact: the instant at `k/N` of the
//! window belongs to bucket `k`, never to `k - 1`.

use super::stage::{ConsentStage, StepMode};
use crate::core::error::ConfigurationError;
use chrono::{DateTime, Duration, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NANOS_PER_SEC: i128 = 1_000_000_000;

fn to_nanos(delta: TimeDelta) -> i128 {
    delta.num_seconds() as i128 * NANOS_PER_SEC + delta.subsec_nanos() as i128
}

fn from_nanos(nanos: i128) -> TimeDelta {
    Duration::seconds((nanos / NANOS_PER_SEC) as i64)
        + Duration::nanoseconds((nanos % NANOS_PER_SEC) as i64)
}

/// The overall consent window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Sub-window during which one stage is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWindow {
    pub stage: ConsentStage,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl StageWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Current stage together with every stage's sub-window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSchedule {
    pub stage: ConsentStage,
    pub stage_windows: BTreeMap<ConsentStage, StageWindow>,
}

impl StageSchedule {
    /// When the current stage ends (None once finished)
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.stage_windows.get(&self.stage).map(|w| w.end)
    }
}

impl ConsentWindow {
    /// Create a window, rejecting `end <= start`
    ///
    /// ```
    /// use agora_domain::ConsentWindow;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
    /// assert!(ConsentWindow::new(start, end).is_ok());
    /// assert!(ConsentWindow::new(end, start).is_err());
    /// ```
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ConfigurationError> {
        let window = Self { start, end };
        window.duration_nanos()?;
        Ok(window)
    }

    /// Window length in nanoseconds, validated to be positive.
    ///
    /// Windows may arrive through deserialization, so every computation
    /// goes through this check rather than trusting construction.
    fn duration_nanos(&self) -> Result<i128, ConfigurationError> {
        let nanos = to_nanos(self.end - self.start);
        if nanos <= 0 {
            return Err(ConfigurationError::MalformedWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(nanos)
    }

    /// Stage active at `now`
    pub fn stage_at(
        &self,
        mode: StepMode,
        now: DateTime<Utc>,
    ) -> Result<ConsentStage, ConfigurationError> {
        let duration = self.duration_nanos()?;
        if now < self.start {
            return Ok(mode.first_stage());
        }
        if now >= self.end {
            return Ok(ConsentStage::Terminee);
        }

        let stages = mode.stages();
        let n = stages.len() as i128;
        let elapsed = to_nanos(now - self.start);
        // elapsed < duration, so the bucket is always < n
        let bucket = (elapsed * n / duration) as usize;
        Ok(stages[bucket.min(stages.len() - 1)])
    }

    /// Sub-window of every timed stage, in stage order
    pub fn windows(
        &self,
        mode: StepMode,
    ) -> Result<BTreeMap<ConsentStage, StageWindow>, ConfigurationError> {
        let duration = self.duration_nanos()?;
        let stages = mode.stages();
        let n = stages.len() as i128;

        // Bucket k starts at ceil(k * D / N): the first whole nanosecond
        // whose bucket index is k.
        let boundary = |k: i128| -> DateTime<Utc> {
            let offset = (k * duration + n - 1) / n;
            self.start + from_nanos(offset)
        };

        Ok(stages
            .iter()
            .enumerate()
            .map(|(k, &stage)| {
                let k = k as i128;
                let end = if k + 1 == n { self.end } else { boundary(k + 1) };
                (
                    stage,
                    StageWindow {
                        stage,
                        start: boundary(k),
                        end,
                    },
                )
            })
            .collect())
    }

    /// Current stage plus all stage windows
    pub fn schedule(
        &self,
        mode: StepMode,
        now: DateTime<Utc>,
    ) -> Result<StageSchedule, ConfigurationError> {
        Ok(StageSchedule {
            stage: self.stage_at(mode, now)?,
            stage_windows: self.windows(mode)?,
        })
    }

    /// Progress through the window, clamped to `[0, 1]`
    pub fn progress(&self, now: DateTime<Utc>) -> Result<f64, ConfigurationError> {
        let duration = self.duration_nanos()?;
        let elapsed = to_nanos(now - self.start);
        Ok((elapsed as f64 / duration as f64).clamp(0.0, 1.0))
    }
}

/// Stage of a consent decision at `now`.
///
/// # Example
///
/// ```
/// use agora_domain::{ConsentStage, StepMode, current_stage};
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
/// let now = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
///
/// // 25% of the window: the boundary belongs to the next stage
/// let stage = current_stage(start, end, StepMode::Distinct, now).unwrap();
/// assert_eq!(stage, ConsentStage::Avis);
/// ```
pub fn current_stage(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    mode: StepMode,
    now: DateTime<Utc>,
) -> Result<ConsentStage, ConfigurationError> {
    ConsentWindow::new(start, end)?.stage_at(mode, now)
}

/// Per-stage sub-windows of a consent window
pub fn stage_windows(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    mode: StepMode,
) -> Result<BTreeMap<ConsentStage, StageWindow>, ConfigurationError> {
    ConsentWindow::new(start, end)?.windows(mode)
}
