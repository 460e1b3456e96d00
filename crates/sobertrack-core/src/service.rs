//! Streak service.
//!
//! Wires a store, a clock and the device timezone around the pure calculator.
//! Every date check runs against "today" in the profile's resolved timezone.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{parse_timezone, resolve_timezone, CalendarDate};
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::profile::{Profile, ProfileStore};
use crate::slipup::{NewSlipUp, SlipUpRecord, SlipUpStore};
use crate::streak::{compute_streak, MilestoneProgress, StreakSummary, DEFAULT_MILESTONES};

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakReport {
    #[serde(flatten)]
    pub summary: StreakSummary,
    pub timezone: String,
    pub today: CalendarDate,
    pub milestones: MilestoneProgress,
}

pub struct StreakService<S, C> {
    store: S,
    clock: C,
    device_tz: Tz,
    milestones: Vec<u32>,
}

impl<S, C> StreakService<S, C>
where
    S: SlipUpStore + ProfileStore,
    C: Clock,
{
    pub fn new(store: S, clock: C, device_tz: Tz) -> Self {
        Self {
            store,
            clock,
            device_tz,
            milestones: DEFAULT_MILESTONES.to_vec(),
        }
    }

    pub fn with_milestones(mut self, milestones: Vec<u32>) -> Self {
        self.milestones = milestones;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create and persist a new profile.
    ///
    /// # Errors
    /// [`CoreError::ProfileExists`] if the user already onboarded; the
    /// journey start then only changes through [`Self::correct_sobriety_date`].
    pub fn onboard(
        &self,
        user_id: &str,
        sobriety_date: CalendarDate,
        timezone: Option<&str>,
    ) -> Result<Profile> {
        if self.store.load_profile(user_id)?.is_some() {
            return Err(CoreError::ProfileExists(user_id.to_string()));
        }
        let tz = match timezone {
            Some(name) => parse_timezone(name)?,
            None => self.device_tz,
        };
        let profile = Profile::new(user_id, sobriety_date, timezone, self.clock.today_in(tz))?;
        self.store.save_profile(&profile)?;
        tracing::info!(
            user_id,
            sobriety_date = %sobriety_date,
            timezone = tz.name(),
            "profile created"
        );
        Ok(profile)
    }

    /// # Errors
    /// [`CoreError::ProfileNotFound`] if the user has not onboarded.
    pub fn profile(&self, user_id: &str) -> Result<Profile> {
        self.store
            .load_profile(user_id)?
            .ok_or_else(|| CoreError::ProfileNotFound(user_id.to_string()))
    }

    pub fn timezone_for(&self, profile: &Profile) -> Tz {
        resolve_timezone(profile, self.device_tz)
    }

    pub fn today_for(&self, profile: &Profile) -> CalendarDate {
        self.clock.today_in(self.timezone_for(profile))
    }

    pub fn log_slip_up(&self, user_id: &str, slip_up: NewSlipUp) -> Result<SlipUpRecord> {
        let profile = self.profile(user_id)?;
        let today = self.today_for(&profile);
        self.store.record_slip_up(user_id, slip_up, today)
    }

    pub fn slip_ups(&self, user_id: &str) -> Result<Vec<SlipUpRecord>> {
        self.store.list_slip_ups(user_id)
    }

    /// The explicit corrective action for a mis-entered journey start.
    pub fn correct_sobriety_date(&self, user_id: &str, date: CalendarDate) -> Result<Profile> {
        let mut profile = self.profile(user_id)?;
        let previous = profile.sobriety_date;
        let today = self.today_for(&profile);
        profile.correct_sobriety_date(date, today)?;
        self.store.save_profile(&profile)?;
        tracing::info!(user_id, from = %previous, to = %date, "sobriety date corrected");
        Ok(profile)
    }

    pub fn set_timezone(&self, user_id: &str, timezone: Option<&str>) -> Result<Profile> {
        let mut profile = self.profile(user_id)?;
        profile.set_timezone(timezone)?;
        self.store.save_profile(&profile)?;
        Ok(profile)
    }

    /// Current streak as of today in the profile's timezone.
    pub fn summary(&self, user_id: &str) -> Result<StreakReport> {
        let profile = self.profile(user_id)?;
        let today = self.today_for(&profile);
        self.report(&profile, today)
    }

    /// Streak as of an explicit `today`.
    pub fn summary_on(&self, user_id: &str, today: CalendarDate) -> Result<StreakReport> {
        let profile = self.profile(user_id)?;
        self.report(&profile, today)
    }

    fn report(&self, profile: &Profile, today: CalendarDate) -> Result<StreakReport> {
        let tz = self.timezone_for(profile);
        let slip_ups = self.store.list_slip_ups(&profile.user_id)?;
        let summary = compute_streak(profile.sobriety_date, &slip_ups, &today, tz);
        tracing::debug!(
            user_id = %profile.user_id,
            days_sober = summary.days_sober,
            slip_ups = slip_ups.len(),
            "streak derived"
        );
        Ok(StreakReport {
            summary,
            timezone: tz.name().to_string(),
            today,
            milestones: MilestoneProgress::from_days(summary.days_sober, &self.milestones),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ValidationError;
    use crate::slipup::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn service_at(y: i32, m: u32, d: u32, h: u32) -> StreakService<MemoryStore, FixedClock> {
        let now = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        StreakService::new(MemoryStore::new(), FixedClock(now), Tz::UTC)
    }

    #[test]
    fn summary_requires_profile() {
        let svc = service_at(2024, 4, 10, 12);
        assert!(matches!(svc.summary("ghost"), Err(CoreError::ProfileNotFound(_))));
    }

    #[test]
    fn summary_without_slip_ups() {
        let svc = service_at(2024, 4, 10, 12);
        svc.onboard("u1", date("2024-01-01"), None).unwrap();
        let report = svc.summary("u1").unwrap();
        assert_eq!(report.summary.days_sober, 100);
        assert_eq!(report.timezone, "UTC");
        assert_eq!(report.milestones.reached, Some(90));
        assert_eq!(report.milestones.next, Some(180));
    }

    #[test]
    fn onboarding_twice_is_rejected() {
        let svc = service_at(2024, 4, 10, 12);
        svc.onboard("u1", date("2024-01-01"), None).unwrap();
        let err = svc.onboard("u1", date("2024-02-01"), None).unwrap_err();
        assert!(matches!(err, CoreError::ProfileExists(_)));
        assert_eq!(svc.profile("u1").unwrap().sobriety_date, date("2024-01-01"));
    }

    #[test]
    fn today_is_taken_in_profile_zone() {
        // 2024-06-10 20:00 UTC is already the 11th in Tokyo.
        let svc = service_at(2024, 6, 10, 20);
        svc.onboard("u1", date("2024-06-11"), Some("Asia/Tokyo")).unwrap();
        assert_eq!(svc.summary("u1").unwrap().today, date("2024-06-11"));

        let err = svc.onboard("u2", date("2024-06-11"), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::FutureSobrietyDate { .. })
        ));
    }

    #[test]
    fn logging_slip_up_keeps_journey_start() {
        let svc = service_at(2024, 6, 10, 12);
        svc.onboard("u1", date("2024-01-01"), None).unwrap();
        svc.log_slip_up("u1", NewSlipUp::parse("2024-06-01", "2024-06-02").unwrap())
            .unwrap();

        let report = svc.summary("u1").unwrap();
        assert_eq!(report.summary.days_sober, 8);
        assert_eq!(report.summary.journey_start_date, date("2024-01-01"));
        assert_eq!(svc.profile("u1").unwrap().sobriety_date, date("2024-01-01"));
    }

    #[test]
    fn future_slip_rejected_in_profile_zone() {
        let svc = service_at(2024, 6, 10, 12);
        svc.onboard("u1", date("2024-01-01"), Some("America/Los_Angeles")).unwrap();
        let err = svc
            .log_slip_up("u1", NewSlipUp::parse("2024-06-11", "2024-06-11").unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::FutureSlipDate { .. })
        ));
    }

    #[test]
    fn correction_and_timezone_changes_persist() {
        let svc = service_at(2024, 6, 10, 12);
        svc.onboard("u1", date("2024-01-01"), None).unwrap();
        svc.correct_sobriety_date("u1", date("2023-12-01")).unwrap();
        svc.set_timezone("u1", Some("Europe/Berlin")).unwrap();

        let profile = svc.profile("u1").unwrap();
        assert_eq!(profile.sobriety_date, date("2023-12-01"));
        assert_eq!(profile.timezone.as_deref(), Some("Europe/Berlin"));
        assert!(svc.correct_sobriety_date("u1", date("2024-07-01")).is_err());
    }

    #[test]
    fn summary_on_explicit_day() {
        let svc = service_at(2024, 6, 10, 12).with_milestones(vec![5]);
        svc.onboard("u1", date("2024-06-01"), None).unwrap();
        let report = svc.summary_on("u1", date("2024-06-03")).unwrap();
        assert_eq!(report.summary.days_sober, 2);
        assert_eq!(report.milestones.next, Some(5));
        assert_eq!(report.milestones.days_until_next, Some(3));
    }

    #[test]
    fn report_json_is_flat() {
        let svc = service_at(2024, 4, 10, 12);
        svc.onboard("u1", date("2024-01-01"), None).unwrap();
        let json = serde_json::to_value(svc.summary("u1").unwrap()).unwrap();
        assert_eq!(json["daysSober"], 100);
        assert_eq!(json["hasSlipUps"], false);
        assert_eq!(json["timezone"], "UTC");
        assert_eq!(json["milestones"]["reached"], 90);
    }
}
