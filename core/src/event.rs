//! The dashboard event log.
//!
//! Every handled command appends one event. The log is in-memory and is
//! never persisted; it lets tooling and tests observe what the engine did.

use crate::{
    filter::FilterSelection,
    snapshot::RowCounts,
    types::Generation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    DatasetRegenerated {
        generation: Generation,
        counts: RowCounts,
    },
    FiltersApplied {
        generation: Generation,
        selection: FilterSelection,
        tracking_rows: usize,
        payout_rows: usize,
    },
    ArchiveExported {
        generation: Generation,
        path: String,
        bytes: u64,
    },
    CommandRejected {
        command: String,
        reason: String,
    },
}

impl DashboardEvent {
    /// Stable name used for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DatasetRegenerated { .. } => "dataset_regenerated",
            Self::FiltersApplied { .. }     => "filters_applied",
            Self::ArchiveExported { .. }    => "archive_exported",
            Self::CommandRejected { .. }    => "command_rejected",
        }
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: u64,
    pub generation: Generation,
    pub event_type: String,
    pub payload: String, // JSON-serialized DashboardEvent
}
