use std::{fmt, str::FromStr};

use chrono::NaiveDate;

use crate::{
    age,
    error::{AppError, Result},
};

pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(AppError::Gender(other.to_string())),
        }
    }
}

/// A record that has not been stored yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub fullname: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl NewEmployee {
    pub fn new(fullname: &str, birth_date: NaiveDate, gender: Gender) -> Self {
        Self {
            fullname: fullname.to_string(),
            birth_date,
            gender,
        }
    }

    /// Builds a record from operator input. The fullname is taken as is.
    pub fn parse(fullname: &str, birth_date: &str, gender: &str) -> Result<Self> {
        let birth_date = parse_birth_date(birth_date)?;
        let gender = gender.parse()?;
        Ok(Self::new(fullname, birth_date, gender))
    }
}

pub fn parse_birth_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, BIRTH_DATE_FORMAT).map_err(|source| AppError::DateFormat {
        input: input.to_string(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub fullname: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl Employee {
    /// Computed on every call, never stored.
    pub fn age(&self) -> i32 {
        age::age(self.birth_date)
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.fullname,
            self.birth_date,
            self.gender,
            self.age()
        )
    }
}

/// Projection returned by the filtered select; carries no age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub fullname: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl fmt::Display for EmployeeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.fullname, self.birth_date, self.gender)
    }
}
