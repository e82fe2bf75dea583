//! HTML presentation of the table view and correction dialog.
//!
//! Templates are compiled into the binary and rendered with auto-escaping,
//! so record names and server text never become markup. Rows carry their
//! identity in `data-id` / `data-log-id` attributes and actions are named by
//! `data-action`; no handler code is interpolated into the output.

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{CorrectionDialog, EntityKind, MovementLogRecord, RowState, TableView};

const TABLE_TEMPLATE: &str = "table.html";
const CORRECTION_TEMPLATE: &str = "correction_dialog.html";
const KIND_SELECTOR_TEMPLATE: &str = "kind_selector.html";

/// Errors raised while loading or rendering templates.
#[derive(Debug, Error)]
#[error("failed to render {template}: {source}")]
pub struct RenderError {
    template: &'static str,
    #[source]
    source: minijinja::Error,
}

impl RenderError {
    fn wrap(template: &'static str) -> impl FnOnce(minijinja::Error) -> Self {
        move |source| Self { template, source }
    }
}

/// Renders table manager state into HTML fragments.
pub struct TableRenderer {
    env: Environment<'static>,
}

impl TableRenderer {
    /// Load the bundled templates.
    ///
    /// # Errors
    ///
    /// Returns an error when a bundled template fails to compile.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        for (name, source) in [
            (TABLE_TEMPLATE, include_str!("templates/table.html")),
            (
                CORRECTION_TEMPLATE,
                include_str!("templates/correction_dialog.html"),
            ),
            (
                KIND_SELECTOR_TEMPLATE,
                include_str!("templates/kind_selector.html"),
            ),
        ] {
            env.add_template(name, source)
                .map_err(RenderError::wrap(name))?;
        }
        Ok(Self { env })
    }

    /// Render the records table, including the add affordance when allowed.
    ///
    /// # Errors
    ///
    /// Returns an error when template evaluation fails.
    pub fn render_table(&self, view: &TableView) -> Result<String, RenderError> {
        self.render(TABLE_TEMPLATE, &TableContext::from(view))
    }

    /// Render the correction dialog for an open draft.
    ///
    /// # Errors
    ///
    /// Returns an error when template evaluation fails.
    pub fn render_correction_dialog(
        &self,
        dialog: &CorrectionDialog,
    ) -> Result<String, RenderError> {
        self.render(CORRECTION_TEMPLATE, &CorrectionContext::from(dialog))
    }

    /// Render the entity kind selector with `current` selected.
    ///
    /// # Errors
    ///
    /// Returns an error when template evaluation fails.
    pub fn render_kind_selector(&self, current: EntityKind) -> Result<String, RenderError> {
        let options = EntityKind::ALL
            .into_iter()
            .map(|kind| KindOption {
                value: kind.wire_name(),
                label: kind.label(),
                selected: kind == current,
            })
            .collect();
        self.render(KIND_SELECTOR_TEMPLATE, &KindSelectorContext { options })
    }

    fn render<T: Serialize>(&self, name: &'static str, context: &T) -> Result<String, RenderError> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(context))
            .map_err(RenderError::wrap(name))
    }
}

#[derive(Serialize)]
struct TableContext<'a> {
    kind: &'static str,
    columns: &'static [&'static str],
    can_add: bool,
    draft: Option<DraftContext<'a>>,
    simple_rows: Vec<SimpleRowContext<'a>>,
    log_rows: Vec<LogRowContext<'a>>,
}

impl<'a> From<&'a TableView> for TableContext<'a> {
    fn from(view: &'a TableView) -> Self {
        Self {
            kind: view.kind().wire_name(),
            columns: view.header(),
            can_add: view.can_add(),
            draft: view.draft().map(|draft| DraftContext {
                input: &draft.input,
            }),
            simple_rows: view
                .simple_rows()
                .iter()
                .map(|row| match &row.state {
                    RowState::Display { name } => SimpleRowContext {
                        id: row.id,
                        editing: false,
                        name,
                        input: "",
                    },
                    RowState::Edit {
                        original_name,
                        input,
                    } => SimpleRowContext {
                        id: row.id,
                        editing: true,
                        name: original_name,
                        input,
                    },
                })
                .collect(),
            log_rows: view.log_rows().iter().map(LogRowContext::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct DraftContext<'a> {
    input: &'a str,
}

#[derive(Serialize)]
struct SimpleRowContext<'a> {
    id: i64,
    editing: bool,
    name: &'a str,
    input: &'a str,
}

#[derive(Serialize)]
struct LogRowContext<'a> {
    log_id: i64,
    entity_id: i64,
    date: &'a str,
    mill_name: &'a str,
    shift: &'a str,
    miller: &'a str,
    name: &'a str,
    opening_balance: String,
    closing_balance: String,
    movement: String,
}

impl<'a> From<&'a MovementLogRecord> for LogRowContext<'a> {
    fn from(record: &'a MovementLogRecord) -> Self {
        Self {
            log_id: record.log_id,
            entity_id: record.id,
            date: &record.date,
            mill_name: &record.mill_name,
            shift: &record.shift,
            miller: &record.miller,
            name: &record.name,
            opening_balance: record.opening_balance.to_string(),
            closing_balance: record.closing_balance.to_string(),
            movement: record.movement.to_string(),
        }
    }
}

#[derive(Serialize)]
struct CorrectionContext<'a> {
    log_id: i64,
    entity_id: i64,
    kind_label: &'static str,
    date: &'a str,
    mill_name: &'a str,
    name: &'a str,
    opening_balance: String,
    closing_balance: String,
    movement: String,
}

impl<'a> From<&'a CorrectionDialog> for CorrectionContext<'a> {
    fn from(dialog: &'a CorrectionDialog) -> Self {
        let summary = &dialog.summary;
        Self {
            log_id: dialog.draft.log_id,
            entity_id: dialog.draft.id_value,
            kind_label: dialog.draft.table_name.label(),
            date: &summary.date,
            mill_name: &summary.mill_name,
            name: &summary.name,
            opening_balance: summary.opening_balance.to_string(),
            closing_balance: summary.closing_balance.to_string(),
            movement: summary.movement.to_string(),
        }
    }
}

#[derive(Serialize)]
struct KindSelectorContext {
    options: Vec<KindOption>,
}

#[derive(Serialize)]
struct KindOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}
