/// Lodestone identifiers (characters and Free Companies) are numeric, but
/// Free Company ids exceed `i64::MAX`, so they are kept in their canonical
/// decimal string form.
pub type LodestoneId = String;

/// Chat-platform identifiers (users, guilds, roles) are 64-bit snowflakes.
pub type Snowflake = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Whether `raw` is a canonical, non-zero Lodestone id: ASCII digits with no
/// leading zero.
pub fn is_lodestone_id(raw: &str) -> bool {
    !raw.starts_with('0') && !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Canonical form of a decimal id: leading zeros stripped, `"000"` becomes
/// `"0"`. `None` for empty or non-numeric input.
pub fn canonical_lodestone_id(raw: &str) -> Option<LodestoneId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.trim_start_matches('0') {
        "" => Some("0".to_string()),
        digits => Some(digits.to_string()),
    }
}
