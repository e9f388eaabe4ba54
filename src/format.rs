use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Weekday};

const PLACEHOLDER: &str = "—";

const MONTHS_SHORT: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
    "дек.",
];

fn weekday_short(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "пн",
        Weekday::Tue => "вт",
        Weekday::Wed => "ср",
        Weekday::Thu => "чт",
        Weekday::Fri => "пт",
        Weekday::Sat => "сб",
        Weekday::Sun => "вс",
    }
}

/// Local wall-clock time of a timestamp. Offsets, when present, are kept
/// as written rather than converted.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.naive_local()))
}

pub fn format_time(s: &str) -> String {
    match parse_timestamp(s) {
        Some(t) => format!("{:02}:{:02}", t.hour(), t.minute()),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_date_day(s: &str) -> String {
    match parse_timestamp(s) {
        Some(t) => format!(
            "{} {} {}",
            t.day(),
            MONTHS_SHORT[t.month0() as usize],
            weekday_short(t.weekday())
        ),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_duration(minutes: u32) -> String {
    format!("{} ч {} мин", minutes / 60, minutes % 60)
}

pub fn plural<'a>(singular: &'a str, plural: &'a str, count: u32) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

pub fn segment_stops(count: u32) -> String {
    format!("{count} {}", plural("пересадка", "пересадок", count))
}

/// Label for a stop-count filter option.
pub fn stops_label(count: u32) -> String {
    if count == 0 {
        "без пересадок".to_string()
    } else {
        segment_stops(count)
    }
}
