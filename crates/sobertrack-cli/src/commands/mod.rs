pub mod config;
pub mod profile;
pub mod slipup;
pub mod streak;

use sobertrack_core::{Config, Database, StreakService, SystemClock};

pub type Service = StreakService<Database, SystemClock>;

/// Open the on-disk store with the configured fallback timezone.
pub fn open_service(config: &Config) -> Result<Service, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let fallback_tz = config.fallback_timezone();
    tracing::debug!(
        user_id = %config.general.user_id,
        fallback_tz = fallback_tz.name(),
        "store opened"
    );
    let service = StreakService::new(db, SystemClock, fallback_tz)
        .with_milestones(config.milestones.thresholds.clone());
    Ok(service)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
