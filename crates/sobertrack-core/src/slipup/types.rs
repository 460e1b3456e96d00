use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::error::ValidationError;

/// One logged relapse. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipUpRecord {
    pub id: i64,
    pub user_id: String,
    pub slip_up_date: CalendarDate,
    pub recovery_restart_date: CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Audit only; never used in streak math.
    pub created_at: DateTime<Utc>,
}

/// A slip-up as submitted by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlipUp {
    pub slip_up_date: CalendarDate,
    pub recovery_restart_date: CalendarDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSlipUp {
    pub fn new(slip_up_date: CalendarDate, recovery_restart_date: CalendarDate) -> Self {
        Self {
            slip_up_date,
            recovery_restart_date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }

    /// Parse both dates from their `YYYY-MM-DD` forms.
    pub fn parse(slip_up_date: &str, recovery_restart_date: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(
            slip_up_date.parse()?,
            recovery_restart_date.parse()?,
        ))
    }
}
