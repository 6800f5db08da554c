use std::ops::Index;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    // Accepts 2024-01-15, 2024-1-15, 2024-01-15 10:42, 2024-01-15T10:42:32.123Z ...
    // Any zone suffix is ignored and the value is read as UTC.
    static ref DATE_REGEX: Regex = Regex::new(
        r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(?:\.\d+)?)?"
    ).unwrap();
}

fn to_int<T: std::str::FromStr>(caps: &Captures, idx: usize) -> Option<T> {
    match caps.get(idx) {
        Some(m) => m.as_str().parse::<T>().ok(),
        None => "0".parse::<T>().ok(),
    }
}

/// Parses the loose date strings found in post front matter.
pub fn parse_post_date(buf: &str) -> Option<NaiveDateTime> {
    let caps = DATE_REGEX.captures(buf)?;

    let y: i32 = caps.index(1).parse().ok()?;
    let m: u32 = caps.index(2).parse().ok()?;
    let d: u32 = caps.index(3).parse().ok()?;
    let h: u32 = to_int(&caps, 4)?;
    let mn: u32 = to_int(&caps, 5)?;
    let s: u32 = to_int(&caps, 6)?;

    let date = NaiveDate::from_ymd_opt(y, m, d)?;
    let time = NaiveTime::from_hms_opt(h, mn, s)?;

    Some(NaiveDateTime::new(date, time))
}

/// `2024-01-15` becomes `Jan 15, 2024`. Anything unparseable is returned as is.
pub fn format_display_date(raw: &str) -> String {
    match parse_post_date(raw) {
        Some(date_time) => date_time.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn format_rfc2822(raw: &str) -> Option<String> {
    let date_time = parse_post_date(raw)?;
    Some(Utc.from_utc_datetime(&date_time).to_rfc2822())
}

/// Upper-cases the first character only, the rest is kept untouched.
pub fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
