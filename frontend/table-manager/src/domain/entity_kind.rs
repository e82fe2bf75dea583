//! Entity kinds selectable in the table manager.
//!
//! The wire name of each kind doubles as the backend resource segment
//! (`/api/{kind}`) and as the `table_name` carried by corrections.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One selectable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum EntityKind {
    /// Mills.
    #[default]
    Mill,
    /// Millers operating a shift.
    Miller,
    /// Shift types.
    ShiftType,
    /// Products weighed at the mill.
    ProductTable,
    /// Transfer stages.
    TransferType,
    /// Water stages.
    WaterStage,
    /// Water conditioning types.
    WaterConditioning,
    /// Daily product movement log.
    ProductMovementLog,
    /// Daily transfer movement log.
    TransferMovementLog,
    /// Daily water stage movement log.
    StageMovementLog,
}

impl EntityKind {
    /// Every kind, in selector order.
    pub const ALL: [Self; 10] = [
        Self::Mill,
        Self::Miller,
        Self::ShiftType,
        Self::ProductTable,
        Self::TransferType,
        Self::WaterStage,
        Self::WaterConditioning,
        Self::ProductMovementLog,
        Self::TransferMovementLog,
        Self::StageMovementLog,
    ];

    /// Kinds whose rows are produced by the logging workflow and can only be
    /// corrected, never created or renamed.
    pub const LOG_KINDS: [Self; 3] = [
        Self::ProductMovementLog,
        Self::TransferMovementLog,
        Self::StageMovementLog,
    ];

    /// Backend resource name.
    ///
    /// # Examples
    /// ```
    /// use table_manager::domain::EntityKind;
    ///
    /// assert_eq!(EntityKind::ProductMovementLog.wire_name(), "Product_Movement_Log");
    /// ```
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Mill => "Mill",
            Self::Miller => "Miller",
            Self::ShiftType => "Shift_Type",
            Self::ProductTable => "Product_Table",
            Self::TransferType => "Transfer_Type",
            Self::WaterStage => "Water_Stage",
            Self::WaterConditioning => "Water_Conditioning",
            Self::ProductMovementLog => "Product_Movement_Log",
            Self::TransferMovementLog => "Transfer_Movement_Log",
            Self::StageMovementLog => "Stage_Movement_Log",
        }
    }

    /// Label shown in the selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mill => "Mill",
            Self::Miller => "Miller",
            Self::ShiftType => "Shift Type",
            Self::ProductTable => "Product",
            Self::TransferType => "Transfer Type",
            Self::WaterStage => "Water Stage",
            Self::WaterConditioning => "Water Conditioning",
            Self::ProductMovementLog => "Product Movement Log",
            Self::TransferMovementLog => "Transfer Movement Log",
            Self::StageMovementLog => "Stage Movement Log",
        }
    }

    /// Whether this kind belongs to the fixed set of movement-log kinds.
    #[must_use]
    pub fn is_log_kind(self) -> bool {
        Self::LOG_KINDS.contains(&self)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Returned when a string names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity kind: {name}")]
pub struct EntityKindParseError {
    /// The rejected input.
    pub name: String,
}

impl FromStr for EntityKind {
    type Err = EntityKindParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.wire_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EntityKindParseError {
                name: trimmed.to_owned(),
            })
    }
}
