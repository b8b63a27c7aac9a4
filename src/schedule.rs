//! Weekly timetable lookups: what is running now, what comes next.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::Serialize;

use crate::models::ClassSession;

/// Something that recurs weekly in a `[start, end)` slot.
pub trait Scheduled {
    /// 0 = Sunday .. 6 = Saturday.
    fn day_of_week(&self) -> u8;
    fn start_time(&self) -> NaiveTime;
    fn end_time(&self) -> NaiveTime;
}

impl Scheduled for ClassSession {
    fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    fn end_time(&self) -> NaiveTime {
        self.end_time
    }
}

/// A scheduled item pinned to the calendar date it next falls on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence<'a, T> {
    pub item: &'a T,
    pub date: NaiveDate,
}

pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

// The timetable works in whole minutes.
fn minute_of(now: NaiveDateTime) -> NaiveTime {
    NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(NaiveTime::MIN)
}

/// Items on `day`, earliest start first. Ties keep their input order.
pub fn classes_for_day<T: Scheduled>(schedule: &[T], day: u8) -> Vec<&T> {
    let mut out: Vec<&T> = schedule.iter().filter(|c| c.day_of_week() == day).collect();
    out.sort_by_key(|c| c.start_time());
    out
}

pub fn current_item<T: Scheduled>(schedule: &[T], now: NaiveDateTime) -> Option<&T> {
    let day = weekday_index(now.weekday());
    let t = minute_of(now);
    schedule
        .iter()
        .find(|c| c.day_of_week() == day && c.start_time() <= t && t < c.end_time())
}

/// Next item to start strictly after `now`. Looks at the rest of today first,
/// then up to a full week ahead, so a lone weekly class is found again
/// seven days out.
pub fn next_item<T: Scheduled>(schedule: &[T], now: NaiveDateTime) -> Option<Occurrence<'_, T>> {
    let today = now.date();
    let day = weekday_index(now.weekday());
    let t = minute_of(now);

    if let Some(item) = classes_for_day(schedule, day)
        .into_iter()
        .find(|c| c.start_time() > t)
    {
        return Some(Occurrence { item, date: today });
    }

    (1..=7u8).find_map(|ahead| {
        let d = (day + ahead) % 7;
        classes_for_day(schedule, d).first().map(|item| Occurrence {
            item: *item,
            date: today + Duration::days(i64::from(ahead)),
        })
    })
}

/// Day order shown on the dashboard header. Sunday folds onto 6.
pub fn day_order(date: NaiveDate) -> u8 {
    match weekday_index(date.weekday()) {
        0 => 6,
        d => d,
    }
}

pub fn day_name(day: u8) -> &'static str {
    match day % 7 {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

/// `9:05 AM`, `12:00 PM`, `12:30 AM`.
pub fn format_clock(t: NaiveTime) -> String {
    let (pm, hour) = t.hour12();
    format!("{}:{:02} {}", hour, t.minute(), if pm { "PM" } else { "AM" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Slot {
        name: &'static str,
        day: u8,
        start: NaiveTime,
        end: NaiveTime,
    }

    impl Scheduled for Slot {
        fn day_of_week(&self) -> u8 {
            self.day
        }
        fn start_time(&self) -> NaiveTime {
            self.start
        }
        fn end_time(&self) -> NaiveTime {
            self.end
        }
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("time")
    }

    fn slot(name: &'static str, day: u8, start: (u32, u32), end: (u32, u32)) -> Slot {
        Slot {
            name,
            day,
            start: hm(start.0, start.1),
            end: hm(end.0, end.1),
        }
    }

    // 2024-03-04 is a Monday.
    fn monday(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("datetime")
    }

    fn week() -> Vec<Slot> {
        vec![
            slot("calculus", 1, (14, 0), (15, 0)),
            slot("data-structures", 1, (9, 0), (10, 0)),
            slot("lab", 1, (10, 30), (12, 30)),
            slot("algorithms", 2, (9, 0), (10, 0)),
        ]
    }

    #[test]
    fn classes_for_day_sorts_by_start() {
        let w = week();
        let names: Vec<&str> = classes_for_day(&w, 1).iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["data-structures", "lab", "calculus"]);
        assert!(classes_for_day(&w, 0).is_empty());
    }

    #[test]
    fn current_item_ignores_seconds() {
        let w = week();
        assert_eq!(current_item(&w, monday(9, 59, 59)).map(|s| s.name), Some("data-structures"));
        assert_eq!(current_item(&w, monday(10, 0, 30)), None);
        assert_eq!(current_item(&w, monday(11, 0, 0)).map(|s| s.name), Some("lab"));
    }

    #[test]
    fn next_item_prefers_later_today() {
        let w = week();
        let next = next_item(&w, monday(10, 0, 0)).expect("next");
        assert_eq!(next.item.name, "lab");
        assert_eq!(next.date, monday(0, 0, 0).date());
    }

    #[test]
    fn next_item_skips_a_class_starting_this_minute() {
        let w = week();
        let next = next_item(&w, monday(10, 30, 0)).expect("next");
        assert_eq!(next.item.name, "calculus");
    }

    #[test]
    fn next_item_rolls_to_tomorrow_after_last_class() {
        let w = week();
        let next = next_item(&w, monday(16, 0, 0)).expect("next");
        assert_eq!(next.item.name, "algorithms");
        assert_eq!(next.date, NaiveDate::from_ymd_opt(2024, 3, 5).expect("date"));
    }

    #[test]
    fn lone_class_comes_back_a_week_later() {
        let w = vec![slot("only", 1, (9, 0), (10, 0))];
        let next = next_item(&w, monday(11, 0, 0)).expect("next");
        assert_eq!(next.item.name, "only");
        assert_eq!(next.date, NaiveDate::from_ymd_opt(2024, 3, 11).expect("date"));
    }

    #[test]
    fn empty_schedule_has_nothing_next() {
        let w: Vec<Slot> = vec![];
        assert!(next_item(&w, monday(9, 0, 0)).is_none());
        assert!(current_item(&w, monday(9, 0, 0)).is_none());
    }

    #[test]
    fn day_order_folds_sunday() {
        assert_eq!(day_order(NaiveDate::from_ymd_opt(2024, 3, 3).expect("sun")), 6);
        assert_eq!(day_order(NaiveDate::from_ymd_opt(2024, 3, 4).expect("mon")), 1);
        assert_eq!(day_order(NaiveDate::from_ymd_opt(2024, 3, 9).expect("sat")), 6);
        assert_eq!(day_name(3), "Wednesday");
    }

    #[test]
    fn format_clock_uses_twelve_hour_time() {
        assert_eq!(format_clock(hm(9, 5)), "9:05 AM");
        assert_eq!(format_clock(hm(12, 0)), "12:00 PM");
        assert_eq!(format_clock(hm(0, 30)), "12:30 AM");
        assert_eq!(format_clock(hm(14, 0)), "2:00 PM");
    }
}
