use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

const DASHED: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const COMPACT: &[FormatItem<'static>] = format_description!("[year][month][day]");
const CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Current local time, UTC when the local offset cannot be determined
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Calendar date as `YYYY-MM-DD`
pub fn dashed(at: OffsetDateTime) -> String {
    at.format(DASHED).unwrap_or_default()
}

/// Calendar date as `YYYYMMDD`
pub fn compact(at: OffsetDateTime) -> String {
    at.format(COMPACT).unwrap_or_default()
}

/// Wall clock as `HH:MM:SS`
pub fn clock(at: OffsetDateTime) -> String {
    at.format(CLOCK).unwrap_or_default()
}

/// Today's local date, the key northbound flow rows are matched against
pub fn today() -> String {
    dashed(now_local())
}

/// First day of the year of `at`, `YYYY0101`
pub fn year_start(at: OffsetDateTime) -> String {
    format!("{:04}0101", at.year())
}
