pub const SESSION_COOKIE: &str = "session";
pub const SESSION_TTL_HOURS: i64 = 1;

pub const MAX_BODY_BYTES: u64 = 16 * 1024;

/* NUMERIC(5, 2) on recipes.price */
pub const PRICE_MAX_DIGITS: u32 = 5;
pub const PRICE_DECIMAL_PLACES: u32 = 2;
