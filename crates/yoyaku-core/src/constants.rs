/// Default knobs shared between `Settings` defaults and tests
pub const DEFAULT_HORIZON_DAYS: u32 = 14;
pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 30;

pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
/// Share of entries dropped when the cache is still full after purging
/// expired ones (1/5 = the oldest 20%).
pub const CACHE_EVICTION_DIVISOR: usize = 5;

pub const DEFAULT_PERSISTENCE_TIMEOUT_MS: u64 = 5000;

/// Buffered live-update events per subscriber before a slow one lags.
pub const LIVE_UPDATE_CHANNEL_CAPACITY: usize = 64;

pub const MINUTES_PER_DAY: u32 = 24 * 60;
