/// Errors listed in a text report before the "... and N more" line
pub const MAX_REPORT_ERRORS: usize = 20;

/// Records shown as samples by `stats`
pub const STATS_SAMPLE_SIZE: usize = 5;

/// Lines containing any of these (case-insensitive) are not data
pub const BOILERPLATE_MARKERS: &[&str] = &["обслуживается", "клириками"];

pub const DEFAULT_LOGS_DIR: &str = "./logs";
