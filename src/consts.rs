/// Hours that make up one full working day
pub const FULL_DAY_HOURS: i64 = 8;

/// Hours credited for a half day
pub const HALF_DAY_HOURS: i64 = 4;

/// Longest note accepted on an advance payment
pub const MAX_NOTE_LEN: usize = 200;

pub const DEFAULT_COMPANY_NAME: &str = "My Company";

/// Widest window a monthly trend covers
pub const MAX_TREND_MONTHS: usize = 24;
