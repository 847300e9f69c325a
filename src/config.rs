use std::env;

use anyhow::{Context, Result};

use crate::random::YearRange;

const DEFAULT_DATABASE_URL: &str = "sqlite://database.db";
const DEFAULT_CHUNK_SIZE: usize = 5_000;
// Three bound parameters per row must stay under SQLite's variable limit.
const MAX_CHUNK_SIZE: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub chunk_size: usize,
    pub years: YearRange,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            years: YearRange::default(),
        }
    }
}

impl Config {
    /// Reads settings from the environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Could not load .env file"),
        }

        let defaults = Config::default();
        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let chunk_size = parse_var("EMPS_CHUNK_SIZE")?
            .unwrap_or(defaults.chunk_size)
            .clamp(1, MAX_CHUNK_SIZE);
        let min_year = parse_var("EMPS_MIN_YEAR")?.unwrap_or(defaults.years.min());
        let max_year = parse_var("EMPS_MAX_YEAR")?.unwrap_or(defaults.years.max());
        let years = YearRange::new(min_year, max_year)?;

        Ok(Self {
            database_url,
            chunk_size,
            years,
        })
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: {value}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Could not read {name}")),
    }
}
