//! Structured render model for the records table.
//!
//! The view carries data only; presentation adapters turn it into markup.
//! Every row keeps its identity as data so actions are bound to ids rather
//! than to interpolated strings.

use super::{EntityKind, MovementLogKey, MovementLogRecord, RecordSet, SimpleRecord};

/// Header for simple kinds.
pub const SIMPLE_COLUMNS: [&str; 2] = ["Name", "Actions"];

/// Header for movement-log kinds.
pub const LOG_COLUMNS: [&str; 9] = [
    "Date",
    "Mill",
    "Shift",
    "Miller",
    "Name",
    "Opening Balance",
    "Closing Balance",
    "Movement",
    "Actions",
];

/// Render state of one simple row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    /// Name with Edit/Delete actions.
    Display {
        /// Current name.
        name: String,
    },
    /// Text input with Save/Cancel actions.
    Edit {
        /// Name captured when edit mode began, restored on cancel.
        original_name: String,
        /// Text currently in the input.
        input: String,
    },
}

/// One rendered simple row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRow {
    /// Backend identifier of the record.
    pub id: i64,
    /// Display or edit state.
    pub state: RowState,
}

impl From<SimpleRecord> for SimpleRow {
    fn from(record: SimpleRecord) -> Self {
        Self {
            id: record.id,
            state: RowState::Display { name: record.name },
        }
    }
}

impl SimpleRow {
    /// Whether the row is in edit state.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.state, RowState::Edit { .. })
    }
}

/// Unsaved row inserted above the records by "add record".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftRow {
    /// Text currently in the input.
    pub input: String,
}

/// Rendered rows, shaped by the kind they were fetched for.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRows {
    /// Name rows with Edit/Delete actions.
    Simple(Vec<SimpleRow>),
    /// Movement-log rows with a single Correct action.
    MovementLog(Vec<MovementLogRecord>),
}

/// The whole rendered table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    kind: EntityKind,
    draft: Option<DraftRow>,
    rows: TableRows,
}

impl TableView {
    /// An empty table for `kind`, shown before the first fetch resolves.
    #[must_use]
    pub fn empty(kind: EntityKind) -> Self {
        let rows = if kind.is_log_kind() {
            TableRows::MovementLog(Vec::new())
        } else {
            TableRows::Simple(Vec::new())
        };
        Self {
            kind,
            draft: None,
            rows,
        }
    }

    /// Replace the table with a freshly fetched record set.
    #[must_use]
    pub fn from_records(kind: EntityKind, records: RecordSet) -> Self {
        let rows = match records {
            RecordSet::Simple(records) => {
                TableRows::Simple(records.into_iter().map(SimpleRow::from).collect())
            }
            RecordSet::MovementLog(records) => TableRows::MovementLog(records),
        };
        Self {
            kind,
            draft: None,
            rows,
        }
    }

    /// Kind the rendered rows were fetched for.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Column labels.
    #[must_use]
    pub const fn header(&self) -> &'static [&'static str] {
        match self.rows {
            TableRows::Simple(_) => &SIMPLE_COLUMNS,
            TableRows::MovementLog(_) => &LOG_COLUMNS,
        }
    }

    /// Whether the "add record" affordance is shown.
    #[must_use]
    pub fn can_add(&self) -> bool {
        !self.kind.is_log_kind()
    }

    /// Rendered rows.
    #[must_use]
    pub const fn rows(&self) -> &TableRows {
        &self.rows
    }

    /// Unsaved row, when one is open.
    #[must_use]
    pub const fn draft(&self) -> Option<&DraftRow> {
        self.draft.as_ref()
    }

    /// Simple rows, or an empty slice for log tables.
    #[must_use]
    pub fn simple_rows(&self) -> &[SimpleRow] {
        match &self.rows {
            TableRows::Simple(rows) => rows,
            TableRows::MovementLog(_) => &[],
        }
    }

    /// Movement-log rows, or an empty slice for simple tables.
    #[must_use]
    pub fn log_rows(&self) -> &[MovementLogRecord] {
        match &self.rows {
            TableRows::Simple(_) => &[],
            TableRows::MovementLog(rows) => rows,
        }
    }

    /// Number of rendered records, excluding the draft row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.simple_rows().len() + self.log_rows().len()
    }

    /// Whether no records are rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a simple row by id.
    #[must_use]
    pub fn simple_row(&self, id: i64) -> Option<&SimpleRow> {
        self.simple_rows().iter().find(|row| row.id == id)
    }

    /// Find a movement-log row by key.
    #[must_use]
    pub fn log_row(&self, key: MovementLogKey) -> Option<&MovementLogRecord> {
        self.log_rows().iter().find(|record| record.key() == key)
    }

    pub(crate) fn simple_row_mut(&mut self, id: i64) -> Option<&mut SimpleRow> {
        match &mut self.rows {
            TableRows::Simple(rows) => rows.iter_mut().find(|row| row.id == id),
            TableRows::MovementLog(_) => None,
        }
    }

    pub(crate) fn open_draft(&mut self) -> &mut DraftRow {
        self.draft.get_or_insert_with(DraftRow::default)
    }

    pub(crate) fn draft_mut(&mut self) -> Option<&mut DraftRow> {
        self.draft.as_mut()
    }

    pub(crate) fn discard_draft(&mut self) -> Option<DraftRow> {
        self.draft.take()
    }
}

#[cfg(test)]
mod tests {
    //! Header selection and row lookup.

    use super::*;

    fn entry(log_id: i64, id: i64) -> MovementLogRecord {
        MovementLogRecord {
            log_id,
            date: "2024-10-01".to_owned(),
            mill_name: "North Mill".to_owned(),
            mill_id: 1,
            shift: "Night".to_owned(),
            miller: "Ada".to_owned(),
            name: "Bran".to_owned(),
            id_field: "Product_ID".to_owned(),
            id,
            opening_balance: 10.0,
            closing_balance: 12.0,
            movement: 2.0,
        }
    }

    #[test]
    fn simple_records_render_two_columns_in_display_state() {
        let view = TableView::from_records(
            EntityKind::Mill,
            RecordSet::Simple(vec![SimpleRecord::new(1, "North Mill")]),
        );
        assert_eq!(view.header(), &SIMPLE_COLUMNS);
        assert!(view.can_add());
        assert_eq!(
            view.simple_row(1).map(|row| &row.state),
            Some(&RowState::Display {
                name: "North Mill".to_owned()
            })
        );
    }

    #[test]
    fn log_records_render_nine_columns_without_add() {
        let view = TableView::from_records(
            EntityKind::ProductMovementLog,
            RecordSet::MovementLog(vec![entry(3, 7), entry(3, 8)]),
        );
        assert_eq!(view.header().len(), 9);
        assert!(!view.can_add());
        assert_eq!(view.len(), 2);
        let key = MovementLogKey {
            log_id: 3,
            entity_id: 8,
        };
        assert_eq!(view.log_row(key).map(|record| record.id), Some(8));
    }

    #[test]
    fn empty_view_follows_kind_shape() {
        assert_eq!(TableView::empty(EntityKind::Miller).header(), &SIMPLE_COLUMNS);
        assert_eq!(
            TableView::empty(EntityKind::StageMovementLog).header(),
            &LOG_COLUMNS
        );
        assert!(TableView::empty(EntityKind::Miller).is_empty());
    }

    #[test]
    fn draft_row_opens_once_and_can_be_discarded() {
        let mut view = TableView::empty(EntityKind::Mill);
        view.open_draft().input.push_str("South");
        view.open_draft();
        assert_eq!(view.draft().map(|draft| draft.input.as_str()), Some("South"));
        assert!(view.discard_draft().is_some());
        assert!(view.draft().is_none());
    }
}
