use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::directive::extract_delivery_date;

// ---------------------------------------------------------------------------
// OrderSnapshot
// ---------------------------------------------------------------------------

/// The three fields of a sale that reconciliation looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    pub ship_by: Option<DateTime<Utc>>,
    /// Derived from `note`; never read from the API.
    pub delivery_date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl OrderSnapshot {
    /// Build a snapshot from a freshly fetched note and ship-by date.
    ///
    /// An empty note counts as no note at all.
    pub fn new(note: Option<String>, ship_by: Option<DateTime<Utc>>) -> Self {
        let note = note.filter(|n| !n.is_empty());
        let delivery_date = extract_delivery_date(note.as_deref());
        Self {
            ship_by,
            delivery_date,
            note,
        }
    }
}

// ---------------------------------------------------------------------------
// StagingReason
// ---------------------------------------------------------------------------

/// Why the one-day staging buffer was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingReason {
    /// The customer asked for delivery before the invoice ship-by date.
    DeliveryBeforeShipBy,
    /// The sale has no note.
    MissingNote,
    /// The note has no readable `Delivery-Date` directive.
    MissingDirective,
}

impl StagingReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StagingReason::DeliveryBeforeShipBy => "delivery_before_ship_by",
            StagingReason::MissingNote => "missing_note",
            StagingReason::MissingDirective => "missing_directive",
        }
    }
}

impl fmt::Display for StagingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// The ship-by date on file is already correct.
    NoOp,
    /// Write `ship_by` and `note` back to the sale.
    Update {
        ship_by: DateTime<Utc>,
        note: String,
        staged: Option<StagingReason>,
    },
}
