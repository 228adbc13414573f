//! Test doubles for the application ports.

use crate::ports::audit_log::{AuditEvent, AuditEventType, AuditLogger};
use crate::ports::decision_repository::{
    DecisionRepository, DecisionSnapshot, RepositoryError, WriteGuard,
};
use crate::ports::stage_notifier::{NotifyError, StageNotification, StageNotifier};
use agora_domain::{
    ConsentState, ConsentWindow, Decision, DecisionId, DecisionMethod, DecisionStatus,
    DecisionUpdate, StepMode,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

pub(crate) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
}

/// An OPEN consent decision over Jan 1 – Jan 5, created by "ana"
pub(crate) fn consent_decision(id: &str, mode: StepMode) -> Decision {
    let window = ConsentWindow::new(at(1, 0), at(5, 0)).unwrap();
    Decision::new(id, format!("Decision {}", id), DecisionMethod::Consent, "ana")
        .with_status(DecisionStatus::Open)
        .with_consent(ConsentState::new(window, mode))
}

/// Repository mock backed by a HashMap, recording every refused write
#[derive(Default)]
pub(crate) struct MockRepository {
    pub snapshots: Mutex<HashMap<DecisionId, DecisionSnapshot>>,
    pub refused_writes: Mutex<usize>,
    /// Update applied behind the use case's back on the next load
    pub interfere_on_load: Mutex<Option<DecisionUpdate>>,
}

impl MockRepository {
    pub fn with(snapshots: Vec<DecisionSnapshot>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.snapshots.lock().unwrap();
            for snapshot in snapshots {
                map.insert(snapshot.decision.id.clone(), snapshot);
            }
        }
        repo
    }

    pub fn decision(&self, id: &str) -> Decision {
        self.snapshots.lock().unwrap()[&DecisionId::new(id)]
            .decision
            .clone()
    }
}

#[async_trait]
impl DecisionRepository for MockRepository {
    async fn load(&self, id: &DecisionId) -> Result<DecisionSnapshot, RepositoryError> {
        let mut map = self.snapshots.lock().unwrap();
        let snapshot = map
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let loaded = snapshot.clone();
        if let Some(update) = self.interfere_on_load.lock().unwrap().take() {
            snapshot.decision.apply(&update);
        }
        Ok(loaded)
    }

    async fn list_active_staged(&self) -> Result<Vec<Decision>, RepositoryError> {
        let map = self.snapshots.lock().unwrap();
        let mut decisions: Vec<Decision> = map
            .values()
            .map(|s| s.decision.clone())
            .filter(|d| {
                matches!(d.status, DecisionStatus::Open | DecisionStatus::Tallying)
                    && d.method.is_staged()
            })
            .collect();
        decisions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(decisions)
    }

    async fn update(
        &self,
        id: &DecisionId,
        update: &DecisionUpdate,
        guard: &WriteGuard,
    ) -> Result<bool, RepositoryError> {
        let mut map = self.snapshots.lock().unwrap();
        let snapshot = map
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        if !guard.holds(&snapshot.decision) {
            *self.refused_writes.lock().unwrap() += 1;
            return Ok(false);
        }
        snapshot.decision.apply(update);
        Ok(true)
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub sent: Mutex<Vec<StageNotification>>,
    pub fail: bool,
}

#[async_trait]
impl StageNotifier for RecordingNotifier {
    async fn notify_stage_change(
        &self,
        notification: &StageNotification,
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError("mail server down".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingAudit {
    pub events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAudit {
    pub fn types(&self) -> Vec<AuditEventType> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type)
            .collect()
    }
}

impl AuditLogger for RecordingAudit {
    fn log(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}
