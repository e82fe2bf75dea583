//! Shared doubles for behaviour tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use table_manager::domain::ports::{RecordsApi, RecordsApiError, UserPrompt};
use table_manager::domain::{
    CorrectionReply, CorrectionRequest, EntityKind, MovementLogRecord, MutationAck, RecordSet,
    SimpleRecord,
};
use tokio::sync::Notify;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One request observed by the in-memory backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(EntityKind),
    Create(EntityKind, String),
    Rename(EntityKind, i64, String),
    Delete(EntityKind, i64),
    Correct(CorrectionRequest),
}

/// Backend double that stores records per kind and journals every request.
#[derive(Default)]
pub struct InMemoryRecordsApi {
    simple: Mutex<HashMap<EntityKind, Vec<SimpleRecord>>>,
    logs: Mutex<HashMap<EntityKind, Vec<MovementLogRecord>>>,
    calls: Mutex<Vec<Call>>,
    create_failure: Mutex<Option<RecordsApiError>>,
    gated_kind: Mutex<Option<EntityKind>>,
    pub entered: Notify,
    pub release: Notify,
}

impl InMemoryRecordsApi {
    pub fn seed_simple(&self, kind: EntityKind, names: &[&str]) {
        let records = names
            .iter()
            .zip(1_i64..)
            .map(|(name, id)| SimpleRecord::new(id, *name))
            .collect();
        lock(&self.simple).insert(kind, records);
    }

    pub fn seed_log(&self, kind: EntityKind, record: MovementLogRecord) {
        lock(&self.logs).entry(kind).or_default().push(record);
    }

    pub fn fail_creates_with(&self, error: RecordsApiError) {
        *lock(&self.create_failure) = Some(error);
    }

    /// Hold the next `list` for `kind` until [`Self::release`] is notified.
    pub fn gate_next_list(&self, kind: EntityKind) {
        *lock(&self.gated_kind) = Some(kind);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn calls_after_first_list(&self) -> Vec<Call> {
        self.calls().into_iter().skip(1).collect()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn snapshot(&self, kind: EntityKind) -> RecordSet {
        if kind.is_log_kind() {
            RecordSet::MovementLog(lock(&self.logs).get(&kind).cloned().unwrap_or_default())
        } else {
            RecordSet::Simple(lock(&self.simple).get(&kind).cloned().unwrap_or_default())
        }
    }

    fn take_gate(&self, kind: EntityKind) -> bool {
        let mut gated = lock(&self.gated_kind);
        if *gated == Some(kind) {
            *gated = None;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl RecordsApi for InMemoryRecordsApi {
    async fn list(&self, kind: EntityKind) -> Result<RecordSet, RecordsApiError> {
        self.record(Call::List(kind));
        let records = self.snapshot(kind);
        if self.take_gate(kind) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(records)
    }

    async fn create(&self, kind: EntityKind, name: &str) -> Result<MutationAck, RecordsApiError> {
        self.record(Call::Create(kind, name.to_owned()));
        if let Some(error) = lock(&self.create_failure).clone() {
            return Err(error);
        }
        let mut simple = lock(&self.simple);
        let rows = simple.entry(kind).or_default();
        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        rows.push(SimpleRecord::new(id, name));
        Ok(MutationAck {
            message: Some(format!("Record added successfully to {kind}")),
        })
    }

    async fn rename(
        &self,
        kind: EntityKind,
        id: i64,
        name: &str,
    ) -> Result<MutationAck, RecordsApiError> {
        self.record(Call::Rename(kind, id, name.to_owned()));
        let mut simple = lock(&self.simple);
        if let Some(row) = simple
            .entry(kind)
            .or_default()
            .iter_mut()
            .find(|row| row.id == id)
        {
            name.clone_into(&mut row.name);
        }
        Ok(MutationAck::default())
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<MutationAck, RecordsApiError> {
        self.record(Call::Delete(kind, id));
        lock(&self.simple)
            .entry(kind)
            .or_default()
            .retain(|row| row.id != id);
        Ok(MutationAck::default())
    }

    async fn correct(
        &self,
        request: &CorrectionRequest,
    ) -> Result<CorrectionReply, RecordsApiError> {
        self.record(Call::Correct(request.clone()));
        let mut logs = lock(&self.logs);
        if let Some(row) = logs
            .entry(request.table_name)
            .or_default()
            .iter_mut()
            .find(|row| row.log_id == request.log_id && row.id == request.id_value)
        {
            row.closing_balance = request.new_end_value;
            row.movement = request.new_end_value - row.opening_balance;
        }
        Ok(CorrectionReply {
            status: Some("success".to_owned()),
            message: None,
        })
    }
}

/// Prompt double that records alerts and answers confirmations with a
/// fixed reply.
pub struct RecordingPrompt {
    alerts: Mutex<Vec<String>>,
    confirmations: Mutex<Vec<String>>,
    answer: Mutex<bool>,
}

impl Default for RecordingPrompt {
    fn default() -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            answer: Mutex::new(true),
        }
    }
}

impl RecordingPrompt {
    pub fn answer_confirmations_with(&self, answer: bool) {
        *lock(&self.answer) = answer;
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        lock(&self.confirmations).clone()
    }
}

impl UserPrompt for RecordingPrompt {
    fn alert(&self, message: &str) {
        lock(&self.alerts).push(message.to_owned());
    }

    fn confirm(&self, message: &str) -> bool {
        lock(&self.confirmations).push(message.to_owned());
        *lock(&self.answer)
    }
}

/// Product movement-log row with 100 → 80 balances.
pub fn flour_log_entry() -> MovementLogRecord {
    MovementLogRecord {
        log_id: 7,
        date: "2024-01-01".to_owned(),
        mill_name: "North".to_owned(),
        mill_id: 1,
        shift: "Morning".to_owned(),
        miller: "Ada".to_owned(),
        name: "Flour".to_owned(),
        id_field: "product_id".to_owned(),
        id: 3,
        opening_balance: 100.0,
        closing_balance: 80.0,
        movement: -20.0,
    }
}
