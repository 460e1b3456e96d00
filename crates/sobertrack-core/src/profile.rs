//! User sobriety profile.
//!
//! The sobriety date is the journey start. It is fixed at onboarding and only
//! changes through [`Profile::correct_sobriety_date`]; logging a slip-up never
//! touches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{parse_timezone, CalendarDate};
use crate::error::{Result, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub sobriety_date: CalendarDate,
    /// IANA timezone; `None` means "use the device zone".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a profile at onboarding.
    ///
    /// # Errors
    /// [`ValidationError::FutureSobrietyDate`] if `sobriety_date` is after
    /// `today`; [`ValidationError::InvalidTimezone`] for an unknown zone.
    pub fn new(
        user_id: impl Into<String>,
        sobriety_date: CalendarDate,
        timezone: Option<&str>,
        today: CalendarDate,
    ) -> Result<Self, ValidationError> {
        ensure_not_future(sobriety_date, today)?;
        let timezone = timezone.map(normalise_timezone).transpose()?;
        Ok(Self {
            user_id: user_id.into(),
            sobriety_date,
            timezone,
            updated_at: Utc::now(),
        })
    }

    /// Build a profile from already-validated storage data.
    pub fn unchecked(
        user_id: impl Into<String>,
        sobriety_date: CalendarDate,
        timezone: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            sobriety_date,
            timezone,
            updated_at: Utc::now(),
        }
    }

    /// Explicit corrective edit of the journey start.
    pub fn correct_sobriety_date(
        &mut self,
        sobriety_date: CalendarDate,
        today: CalendarDate,
    ) -> Result<(), ValidationError> {
        ensure_not_future(sobriety_date, today)?;
        self.sobriety_date = sobriety_date;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Set or clear the profile timezone.
    pub fn set_timezone(&mut self, timezone: Option<&str>) -> Result<(), ValidationError> {
        self.timezone = timezone.map(normalise_timezone).transpose()?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn ensure_not_future(date: CalendarDate, today: CalendarDate) -> Result<(), ValidationError> {
    if date > today {
        return Err(ValidationError::FutureSobrietyDate { date, today });
    }
    Ok(())
}

fn normalise_timezone(name: &str) -> Result<String, ValidationError> {
    parse_timezone(name).map(|tz| tz.name().to_string())
}

/// Persistence boundary for profiles.
pub trait ProfileStore {
    fn load_profile(&self, user_id: &str) -> Result<Option<Profile>>;
    fn save_profile(&self, profile: &Profile) -> Result<()>;
}
