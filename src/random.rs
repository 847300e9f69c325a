use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::{
    error::{AppError, Result},
    models::Gender,
};

pub const DEFAULT_NAME_LENGTH: usize = 5;

/// Inclusive range of birth years, checked so every month/day pair with a day
/// of at most 28 is a valid date in both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        let representable = NaiveDate::from_ymd_opt(min, 1, 1).is_some()
            && NaiveDate::from_ymd_opt(max, 12, 28).is_some();
        if min > max || !representable {
            return Err(AppError::InvalidYearRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 1900,
            max: 2000,
        }
    }
}

fn random_lowercase<R: Rng>(rng: &mut R) -> char {
    char::from(b'a' + rng.random_range(0..26u8))
}

fn random_uppercase<R: Rng>(rng: &mut R) -> char {
    char::from(b'A' + rng.random_range(0..26u8))
}

/// One capitalised name: `leading` (or a random uppercase letter) followed by
/// `length` random lowercase letters.
pub fn random_name<R: Rng>(rng: &mut R, length: usize, leading: Option<char>) -> String {
    let mut name = String::with_capacity(length + 1);
    name.push(leading.unwrap_or_else(|| random_uppercase(rng)));
    for _ in 0..length {
        name.push(random_lowercase(rng));
    }
    name
}

/// "last first surname"; only the last name may have a forced first letter.
pub fn random_fullname<R: Rng>(rng: &mut R, leading: Option<char>) -> String {
    let last_name = random_name(rng, DEFAULT_NAME_LENGTH, leading);
    let first_name = random_name(rng, DEFAULT_NAME_LENGTH, None);
    let surname = random_name(rng, DEFAULT_NAME_LENGTH, None);
    format!("{last_name} {first_name} {surname}")
}

fn anchor_date<R: Rng>(rng: &mut R, year: i32) -> NaiveDate {
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day).expect("days 1..=28 exist in every month")
}

/// A birth date between two jittered anchors, one in each bound year.
///
/// This is not uniform over the calendar range: the result is interpolated
/// between a random day in the first year and a random day in the last year,
/// which is enough for plausible test data. The fractional day is floored.
pub fn random_date<R: Rng>(rng: &mut R, years: YearRange) -> NaiveDate {
    let start = anchor_date(rng, years.min);
    let end = anchor_date(rng, years.max);
    let span = (end - start).num_days() as f64;
    let offset = (span * rng.random::<f64>()).floor() as i64;
    start + Duration::days(offset)
}

pub fn random_gender<R: Rng>(rng: &mut R) -> Gender {
    if rng.random_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    }
}
