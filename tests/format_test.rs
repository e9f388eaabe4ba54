use flightview::format::{
    format_date_day, format_duration, format_time, plural, segment_stops, stops_label,
};

#[test]
fn time_is_zero_padded() {
    assert_eq!(format_time("2020-08-18T06:05:00"), "06:05");
    assert_eq!(format_time("2020-08-18T23:40:00"), "23:40");
}

#[test]
fn time_keeps_wall_clock_of_offset_stamps() {
    assert_eq!(format_time("2020-08-18T11:20:00+03:00"), "11:20");
}

#[test]
fn date_day_in_russian() {
    assert_eq!(format_date_day("2020-08-18T11:20:00"), "18 авг. вт");
    assert_eq!(format_date_day("2020-09-20T00:00:00"), "20 сент. вс");
    assert_eq!(format_date_day("2021-05-01T10:00"), "1 мая сб");
}

#[test]
fn bad_timestamp_renders_placeholder() {
    assert_eq!(format_time("tomorrow"), "—");
    assert_eq!(format_date_day(""), "—");
}

#[test]
fn duration_hours_and_minutes() {
    assert_eq!(format_duration(0), "0 ч 0 мин");
    assert_eq!(format_duration(59), "0 ч 59 мин");
    assert_eq!(format_duration(325), "5 ч 25 мин");
    assert_eq!(format_duration(1440), "24 ч 0 мин");
}

#[test]
fn plural_only_singular_for_one() {
    assert_eq!(plural("пересадка", "пересадок", 1), "пересадка");
    assert_eq!(plural("пересадка", "пересадок", 0), "пересадок");
    assert_eq!(plural("пересадка", "пересадок", 2), "пересадок");
}

#[test]
fn stop_labels() {
    assert_eq!(segment_stops(0), "0 пересадок");
    assert_eq!(segment_stops(1), "1 пересадка");
    assert_eq!(stops_label(0), "без пересадок");
    assert_eq!(stops_label(1), "1 пересадка");
    assert_eq!(stops_label(3), "3 пересадок");
}
