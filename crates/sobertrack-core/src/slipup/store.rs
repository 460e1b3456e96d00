use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::calendar::CalendarDate;
use crate::error::{CoreError, Result};
use crate::profile::{Profile, ProfileStore};

use super::{validate_slip_up, NewSlipUp, SlipUpRecord};

/// Append-only slip-up ledger.
///
/// Implementors supply the raw insert and the listing; validation is shared
/// through [`SlipUpStore::record_slip_up`]. There is deliberately no update or
/// delete.
pub trait SlipUpStore {
    /// Append an already-validated slip-up.
    fn append_slip_up(&self, user_id: &str, slip_up: &NewSlipUp) -> Result<SlipUpRecord>;

    /// Every slip-up for `user_id`, in insertion order.
    fn list_slip_ups(&self, user_id: &str) -> Result<Vec<SlipUpRecord>>;

    /// Validate and append a slip-up.
    ///
    /// `today` must be the current date in the user's resolved timezone.
    ///
    /// # Errors
    /// `RestartBeforeSlip` or `FutureSlipDate` validation failures, or a
    /// storage error from the underlying ledger.
    fn record_slip_up(
        &self,
        user_id: &str,
        slip_up: NewSlipUp,
        today: CalendarDate,
    ) -> Result<SlipUpRecord> {
        validate_slip_up(&slip_up, today)?;
        let record = self.append_slip_up(user_id, &slip_up)?;
        tracing::info!(
            user_id,
            id = record.id,
            slip_up_date = %record.slip_up_date,
            recovery_restart_date = %record.recovery_restart_date,
            "slip-up recorded"
        );
        Ok(record)
    }
}

/// In-process store holding profiles and slip-ups behind mutexes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slip_ups: Mutex<Vec<SlipUpRecord>>,
    profiles: Mutex<HashMap<String, Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Custom("memory store lock poisoned".into())
}

impl SlipUpStore for MemoryStore {
    fn append_slip_up(&self, user_id: &str, slip_up: &NewSlipUp) -> Result<SlipUpRecord> {
        let mut slip_ups = self.slip_ups.lock().map_err(poisoned)?;
        let record = SlipUpRecord {
            id: slip_ups.len() as i64 + 1,
            user_id: user_id.to_string(),
            slip_up_date: slip_up.slip_up_date,
            recovery_restart_date: slip_up.recovery_restart_date,
            notes: slip_up.notes.clone(),
            created_at: Utc::now(),
        };
        slip_ups.push(record.clone());
        Ok(record)
    }

    fn list_slip_ups(&self, user_id: &str) -> Result<Vec<SlipUpRecord>> {
        let slip_ups = self.slip_ups.lock().map_err(poisoned)?;
        Ok(slip_ups
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl ProfileStore for MemoryStore {
    fn load_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profiles = self.profiles.lock().map_err(poisoned)?;
        Ok(profiles.get(user_id).cloned())
    }

    fn save_profile(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.lock().map_err(poisoned)?;
        profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }
}
