//! Lazily populated, concurrently readable settings cache.
//!
//! `SettingsCache` builds its mapping at most once. The first caller of
//! [`SettingsCache::all`] claims the population, every caller waits on a
//! one-shot status notification, and all of them receive the same frozen
//! [`SettingsMap`].

mod settings_cache;
mod snapshot;
mod status;

pub use settings_cache::{FanOut, SettingsCache};
pub use snapshot::SettingsMap;
pub use status::LoadStatus;
