//! Departure time policy for provider queries.
//!
//! Both routing providers are asked for a journey leaving at 08:00 on the
//! next weekday. The rule, applied uniformly: today if the current time is
//! strictly before 08:00 on a weekday, otherwise the next day, rolling
//! forward past Saturday and Sunday. At exactly 08:00 the departure is the
//! next weekday.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// The 08:00 departure instant the providers should be queried for.
pub fn next_weekday_8am(now: DateTime<Utc>) -> DateTime<Utc> {
    let eight = NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time");

    let mut date = now.date_naive();
    if is_weekend(now.weekday()) || now.time() >= eight {
        date += Duration::days(1);
    }
    while is_weekend(date.weekday()) {
        date += Duration::days(1);
    }

    date.and_time(eight).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn weekday_before_eight_departs_same_day() {
        // Wednesday 07:30 -> Wednesday 08:00.
        let departure = next_weekday_8am(utc(2026, 9, 2, 7, 30));
        assert_eq!(departure, utc(2026, 9, 2, 8, 0));
    }

    #[test]
    fn weekday_after_eight_departs_next_day() {
        // Wednesday 09:00 -> Thursday 08:00.
        let departure = next_weekday_8am(utc(2026, 9, 2, 9, 0));
        assert_eq!(departure, utc(2026, 9, 3, 8, 0));
    }

    #[test]
    fn exactly_eight_rolls_to_next_day() {
        // Wednesday 08:00 sharp counts as missed.
        let departure = next_weekday_8am(utc(2026, 9, 2, 8, 0));
        assert_eq!(departure, utc(2026, 9, 3, 8, 0));
    }

    #[test]
    fn friday_evening_rolls_to_monday() {
        // Friday 18:00 -> Monday 08:00.
        let departure = next_weekday_8am(utc(2026, 9, 4, 18, 0));
        assert_eq!(departure, utc(2026, 9, 7, 8, 0));
    }

    #[test]
    fn saturday_rolls_to_monday_even_before_eight() {
        // Saturday 06:00 -> Monday 08:00.
        let departure = next_weekday_8am(utc(2026, 9, 5, 6, 0));
        assert_eq!(departure, utc(2026, 9, 7, 8, 0));
    }

    #[test]
    fn sunday_rolls_to_monday() {
        let departure = next_weekday_8am(utc(2026, 9, 6, 12, 0));
        assert_eq!(departure, utc(2026, 9, 7, 8, 0));
    }

    #[test]
    fn result_is_always_a_weekday_at_eight() {
        for day in 1..=14 {
            for hour in [0, 7, 8, 9, 23] {
                let departure = next_weekday_8am(utc(2026, 9, day, hour, 0));
                assert!(!is_weekend(departure.weekday()));
                assert_eq!(departure.time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
                assert!(departure > utc(2026, 9, day, hour, 0) || hour < 8);
            }
        }
    }
}
