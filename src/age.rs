use chrono::{Datelike, Local, NaiveDate};

/// Whole years between `birth` and `today`.
///
/// One year is subtracted while this year's birthday is still ahead. A birth
/// date after `today` yields a negative age; callers that care must check.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years - 1
    } else {
        years
    }
}

/// Age as of the local calendar date at the time of the call.
pub fn age(birth: NaiveDate) -> i32 {
    age_on(birth, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn birthday_not_reached_yet() {
        assert_eq!(age_on(date(2000, 7, 1), date(2024, 6, 15)), 23);
    }

    #[test]
    fn birthday_already_passed() {
        assert_eq!(age_on(date(2000, 6, 1), date(2024, 6, 15)), 24);
    }

    #[test]
    fn birthday_today() {
        assert_eq!(age_on(date(2000, 6, 15), date(2024, 6, 15)), 24);
    }

    #[test]
    fn born_today_is_zero() {
        let today = date(2024, 6, 15);
        assert_eq!(age_on(today, today), 0);
    }

    #[test]
    fn future_birth_date_is_negative() {
        assert_eq!(age_on(date(2030, 1, 1), date(2024, 6, 15)), -6);
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn age_uses_current_date() {
        let birth = date(2000, 1, 1);
        let before = age_on(birth, Local::now().date_naive());
        let current = age(birth);
        let after = age_on(birth, Local::now().date_naive());
        assert!((before..=after).contains(&current));
    }
}
