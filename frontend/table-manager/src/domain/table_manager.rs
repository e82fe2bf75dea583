//! The table manager component.
//!
//! Owns the selected entity kind, the rendered table and the open correction
//! dialog, and dispatches every mutation to the [`RecordsApi`] port. Every
//! successful mutation is followed by a full refresh; nothing is merged or
//! guessed on the client.
//!
//! Operations take `&self` and may interleave on a single-threaded executor.
//! State sits behind a mutex that is never held across an `.await`; refresh
//! responses are tagged with the kind and generation they were requested for
//! so a late response for a superseded fetch is dropped instead of rendered.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use super::ports::{RecordsApi, RecordsApiError, UserPrompt};
use super::{
    CorrectionDialog, EntityKind, MovementLogKey, MutationAck, RowState, TableManagerError,
    TableView, parse_end_value,
};

const EMPTY_NAME_PROMPT: &str = "Please enter a name";
const EMPTY_END_VALUE_PROMPT: &str = "Please enter a new end value";
const INVALID_END_VALUE_PROMPT: &str = "The new end value must be a number";
const CORRECTION_APPLIED_PROMPT: &str = "Correction submitted successfully";
const CORRECTION_FAILED_PROMPT: &str = "An error occurred while submitting the correction";
const CORRECTION_REJECTED_FALLBACK: &str = "The correction was not applied";

/// Result of one refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched rows replaced the table.
    Rendered {
        /// Number of rows now rendered.
        rows: usize,
    },
    /// A newer fetch or a kind switch superseded this one; nothing changed.
    Discarded,
    /// The fetch failed; the previous render is left in place.
    Failed(TableManagerError),
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was deleted and the table refreshed.
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FetchTicket {
    kind: EntityKind,
    generation: u64,
}

struct TableState {
    current_kind: EntityKind,
    generation: u64,
    view: TableView,
    correction: Option<CorrectionDialog>,
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Create,
    Rename,
    Delete,
}

impl Mutation {
    const fn failure_prompt(self) -> &'static str {
        match self {
            Self::Create => "Could not add the record. Please try again.",
            Self::Rename => "Could not update the record. Please try again.",
            Self::Delete => "Could not delete the record. Please try again.",
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Create => "adding",
            Self::Rename => "updating",
            Self::Delete => "deleting",
        }
    }
}

/// Generic table editor bound to one records API and one prompt surface.
pub struct TableManager<A, P> {
    api: Arc<A>,
    prompt: Arc<P>,
    state: Mutex<TableState>,
}

impl<A, P> TableManager<A, P> {
    /// Create a manager starting on `initial_kind`.
    ///
    /// Nothing is fetched until [`refresh`](Self::refresh) or
    /// [`select_entity_kind`](Self::select_entity_kind) runs.
    #[must_use]
    pub fn new(api: Arc<A>, prompt: Arc<P>, initial_kind: EntityKind) -> Self {
        Self {
            api,
            prompt,
            state: Mutex::new(TableState {
                current_kind: initial_kind,
                generation: 0,
                view: TableView::empty(initial_kind),
                correction: None,
            }),
        }
    }

    /// Currently selected kind.
    #[must_use]
    pub fn current_kind(&self) -> EntityKind {
        self.lock().current_kind
    }

    /// Snapshot of the rendered table.
    #[must_use]
    pub fn view(&self) -> TableView {
        self.lock().view.clone()
    }

    /// Whether the "add record" affordance is visible for the current kind.
    #[must_use]
    pub fn can_add(&self) -> bool {
        !self.lock().current_kind.is_log_kind()
    }

    /// Snapshot of the open correction dialog, if any.
    #[must_use]
    pub fn correction_dialog(&self) -> Option<CorrectionDialog> {
        self.lock().correction.clone()
    }

    /// Record text typed into the unsaved row.
    pub fn set_draft_input(&self, text: &str) -> Result<(), TableManagerError> {
        let mut state = self.lock();
        let draft = state
            .view
            .draft_mut()
            .ok_or(TableManagerError::NoDraftRow)?;
        text.clone_into(&mut draft.input);
        Ok(())
    }

    /// Record text typed into the edit input of row `id`.
    pub fn set_edit_input(&self, id: i64, text: &str) -> Result<(), TableManagerError> {
        let mut state = self.lock();
        let kind = state.current_kind;
        match state.view.simple_row_mut(id).map(|row| &mut row.state) {
            Some(RowState::Edit { input, .. }) => {
                text.clone_into(input);
                Ok(())
            }
            _ => Err(TableManagerError::UnknownRecord { kind, id }),
        }
    }

    /// Insert an unsaved row at the top of the table.
    ///
    /// No request is sent until [`save_new`](Self::save_new). Opening a second
    /// draft keeps the first one.
    pub fn begin_add(&self) -> Result<(), TableManagerError> {
        let mut state = self.lock();
        let kind = state.current_kind;
        if kind.is_log_kind() {
            return Err(TableManagerError::AddNotSupported { kind });
        }
        state.view.open_draft();
        Ok(())
    }

    /// Remove the unsaved row without contacting the backend.
    pub fn cancel_add(&self) -> Result<(), TableManagerError> {
        self.lock()
            .view
            .discard_draft()
            .map(|_| ())
            .ok_or(TableManagerError::NoDraftRow)
    }

    /// Put row `id` into edit state, seeding the input with its name.
    pub fn begin_edit(&self, id: i64) -> Result<(), TableManagerError> {
        let mut state = self.lock();
        let kind = state.current_kind;
        if state.view.kind() != kind {
            return Err(TableManagerError::UnknownRecord { kind, id });
        }
        let row = state
            .view
            .simple_row_mut(id)
            .ok_or(TableManagerError::UnknownRecord { kind, id })?;
        if let RowState::Display { name } = &row.state {
            row.state = RowState::Edit {
                original_name: name.clone(),
                input: name.clone(),
            };
        }
        Ok(())
    }

    /// Return row `id` to display state with the name it had when edit began.
    pub fn cancel_edit(&self, id: i64) -> Result<(), TableManagerError> {
        let mut state = self.lock();
        let kind = state.current_kind;
        let row = state
            .view
            .simple_row_mut(id)
            .ok_or(TableManagerError::UnknownRecord { kind, id })?;
        if let RowState::Edit { original_name, .. } = &row.state {
            row.state = RowState::Display {
                name: original_name.clone(),
            };
        }
        Ok(())
    }

    /// Open the correction dialog for one movement-log row.
    ///
    /// An already open dialog is replaced without warning.
    pub fn open_correction(
        &self,
        log_id: i64,
        entity_id: i64,
    ) -> Result<CorrectionDialog, TableManagerError> {
        let mut state = self.lock();
        let kind = state.current_kind;
        if !kind.is_log_kind() {
            return Err(TableManagerError::NotALogKind { kind });
        }
        let key = MovementLogKey { log_id, entity_id };
        let record = (state.view.kind() == kind)
            .then(|| state.view.log_row(key))
            .flatten()
            .ok_or(TableManagerError::UnknownRecord { kind, id: log_id })?;
        let dialog = CorrectionDialog::open(kind, record);
        if let Some(previous) = state.correction.replace(dialog.clone()) {
            debug!(
                log_id = previous.draft.log_id,
                "replacing open correction draft"
            );
        }
        Ok(dialog)
    }

    /// Hide the correction dialog and discard its draft.
    pub fn close_correction(&self) {
        self.lock().correction = None;
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue_fetch(&self) -> FetchTicket {
        let mut state = self.lock();
        state.generation += 1;
        FetchTicket {
            kind: state.current_kind,
            generation: state.generation,
        }
    }
}

impl<A, P> TableManager<A, P>
where
    A: RecordsApi,
    P: UserPrompt,
{
    /// Switch the current kind and fetch its records.
    ///
    /// Any unsaved row belongs to the previous kind and is dropped at once;
    /// the previous rows stay until the new fetch resolves.
    pub async fn select_entity_kind(&self, kind: EntityKind) -> RefreshOutcome {
        {
            let mut state = self.lock();
            state.current_kind = kind;
            state.view.discard_draft();
        }
        debug!(%kind, "entity kind selected");
        self.refresh().await
    }

    /// Fetch and render every record of the current kind.
    ///
    /// Failures are logged only; the previous render stays in place.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.issue_fetch();
        debug!(
            kind = %ticket.kind,
            generation = ticket.generation,
            "fetching records"
        );
        let result = self.api.list(ticket.kind).await;
        self.apply_fetch(ticket, result)
    }

    /// Save the unsaved row as a new record named `name`.
    pub async fn save_new(&self, name: &str) -> Result<(), TableManagerError> {
        let kind = {
            let mut state = self.lock();
            let kind = state.current_kind;
            if kind.is_log_kind() {
                return Err(TableManagerError::AddNotSupported { kind });
            }
            let draft = state
                .view
                .draft_mut()
                .ok_or(TableManagerError::NoDraftRow)?;
            name.clone_into(&mut draft.input);
            kind
        };
        let name = self.require_name(name)?;

        let ack = self
            .run_mutation(Mutation::Create, kind, self.api.create(kind, name))
            .await?;
        log_ack(kind, &ack);
        self.lock().view.discard_draft();
        self.refresh().await;
        Ok(())
    }

    /// Rename row `id` to `new_name`.
    ///
    /// On failure the row stays in edit state with the submitted text.
    pub async fn save_edit(&self, id: i64, new_name: &str) -> Result<(), TableManagerError> {
        let kind = {
            let mut state = self.lock();
            let kind = state.current_kind;
            let in_view = state.view.kind() == kind;
            match state.view.simple_row_mut(id).map(|row| &mut row.state) {
                Some(RowState::Edit { input, .. }) if in_view => {
                    new_name.clone_into(input);
                }
                _ => return Err(TableManagerError::UnknownRecord { kind, id }),
            }
            kind
        };
        let new_name = self.require_name(new_name)?;

        let ack = self
            .run_mutation(Mutation::Rename, kind, self.api.rename(kind, id, new_name))
            .await?;
        log_ack(kind, &ack);
        self.refresh().await;
        Ok(())
    }

    /// Delete row `id` after the user confirms.
    pub async fn delete_record(&self, id: i64) -> Result<DeleteOutcome, TableManagerError> {
        let kind = {
            let state = self.lock();
            let kind = state.current_kind;
            if state.view.kind() != kind || state.view.simple_row(id).is_none() {
                return Err(TableManagerError::UnknownRecord { kind, id });
            }
            kind
        };

        let question = format!("Are you sure you want to delete this {kind}?");
        if !self.prompt.confirm(&question) {
            debug!(%kind, id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let ack = self
            .run_mutation(Mutation::Delete, kind, self.api.delete(kind, id))
            .await?;
        log_ack(kind, &ack);
        self.refresh().await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Submit the open correction with `new_end_value`.
    ///
    /// A blank or non-numeric value keeps the dialog open. Once a request has
    /// been sent the dialog closes whatever the outcome.
    pub async fn submit_correction(&self, new_end_value: &str) -> Result<(), TableManagerError> {
        let draft = self
            .lock()
            .correction
            .as_ref()
            .map(|dialog| dialog.draft.clone())
            .ok_or(TableManagerError::NoCorrectionOpen)?;

        if new_end_value.trim().is_empty() {
            return Err(self.reject_input(EMPTY_END_VALUE_PROMPT));
        }
        let Some(value) = parse_end_value(new_end_value) else {
            return Err(self.reject_input(INVALID_END_VALUE_PROMPT));
        };

        let request = draft.clone().into_request(value);
        debug!(
            log_id = request.log_id,
            table = %request.table_name,
            "submitting correction"
        );
        let result = self.api.correct(&request).await;

        {
            let mut state = self.lock();
            if state
                .correction
                .as_ref()
                .is_some_and(|dialog| dialog.draft == draft)
            {
                state.correction = None;
            }
        }

        match result {
            Ok(reply) if reply.is_success() => {
                info!(log_id = request.log_id, "correction applied");
                self.prompt.alert(CORRECTION_APPLIED_PROMPT);
                self.refresh().await;
                Ok(())
            }
            Ok(reply) => {
                let message = reply
                    .message
                    .unwrap_or_else(|| CORRECTION_REJECTED_FALLBACK.to_owned());
                warn!(log_id = request.log_id, %message, "correction rejected");
                self.prompt.alert(&message);
                Err(TableManagerError::application(message))
            }
            Err(RecordsApiError::Rejected { status, message }) => {
                warn!(log_id = request.log_id, status, %message, "correction rejected");
                self.prompt.alert(&message);
                Err(TableManagerError::application(message))
            }
            Err(err) => {
                error!(log_id = request.log_id, error = %err, "error submitting correction");
                self.prompt.alert(CORRECTION_FAILED_PROMPT);
                Err(TableManagerError::from(err))
            }
        }
    }

    fn apply_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<super::RecordSet, RecordsApiError>,
    ) -> RefreshOutcome {
        let mut state = self.lock();
        if ticket.kind != state.current_kind || ticket.generation != state.generation {
            debug!(
                kind = %ticket.kind,
                generation = ticket.generation,
                current = %state.current_kind,
                "discarding stale records response"
            );
            return RefreshOutcome::Discarded;
        }

        let records = match result {
            Ok(records) if records.is_movement_log() == ticket.kind.is_log_kind() => records,
            Ok(_) => {
                let err = TableManagerError::transport(format!(
                    "record shape does not match kind {}",
                    ticket.kind
                ));
                error!(kind = %ticket.kind, error = %err, "error fetching records");
                return RefreshOutcome::Failed(err);
            }
            Err(err) => {
                error!(kind = %ticket.kind, error = %err, "error fetching records");
                return RefreshOutcome::Failed(err.into());
            }
        };

        let rows = records.len();
        state.view = TableView::from_records(ticket.kind, records);
        debug!(kind = %ticket.kind, rows, "records rendered");
        RefreshOutcome::Rendered { rows }
    }

    fn require_name<'a>(&self, name: &'a str) -> Result<&'a str, TableManagerError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(self.reject_input(EMPTY_NAME_PROMPT));
        }
        Ok(trimmed)
    }

    fn reject_input(&self, message: &str) -> TableManagerError {
        warn!(%message, "rejected user input");
        self.prompt.alert(message);
        TableManagerError::precondition(message)
    }

    async fn run_mutation<F>(
        &self,
        mutation: Mutation,
        kind: EntityKind,
        call: F,
    ) -> Result<MutationAck, TableManagerError>
    where
        F: Future<Output = Result<MutationAck, RecordsApiError>>,
    {
        match call.await {
            Ok(ack) => Ok(ack),
            Err(RecordsApiError::Rejected { status, message }) => {
                warn!(%kind, status, %message, "backend rejected {} record", mutation.verb());
                self.prompt.alert(&message);
                Err(TableManagerError::application(message))
            }
            Err(err) => {
                error!(%kind, error = %err, "error {} record", mutation.verb());
                self.prompt.alert(mutation.failure_prompt());
                Err(TableManagerError::from(err))
            }
        }
    }
}

fn log_ack(kind: EntityKind, ack: &MutationAck) {
    match ack.message.as_deref() {
        Some(message) => info!(%kind, %message, "backend acknowledged mutation"),
        None => info!(%kind, "backend acknowledged mutation"),
    }
}

#[cfg(test)]
#[path = "table_manager_tests.rs"]
mod tests;
