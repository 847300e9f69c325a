use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::io::{BufWriter, Write};

mod age;
mod commands;
mod config;
mod error;
mod generator;
mod models;
mod progress;
mod random;
mod repository;
mod schema;

use commands::{Args, Commands};
use config::Config;
use error::{AppError, ErrorKind};
use generator::BatchPlan;
use repository::Repository;

const USAGE_EXAMPLE: &str = r#"Example: emps 2 "Ivanov Ivan Ivanovich" "2000-01-01" Male"#;

async fn create_table(repository: &Repository) -> Result<(), AppError> {
    repository.create_schema().await?;
    println!("Table is ready");
    Ok(())
}

async fn create_employee(repository: &Repository, data: &[String]) -> Result<(), AppError> {
    let [fullname, birth_date, gender] = data else {
        return Err(AppError::Arity(data.len()));
    };
    repository.insert_one(fullname, birth_date, gender).await?;
    println!("Employee's account is created: {data:?}");
    Ok(())
}

async fn list_employees(repository: &Repository) -> Result<(), AppError> {
    let mut out = BufWriter::new(std::io::stdout().lock());
    let listed = repository
        .list_all_ordered(|employee| {
            writeln!(out, "{employee}")?;
            Ok(())
        })
        .await?;
    out.flush()?;

    tracing::info!("Listed {} employees", listed);
    Ok(())
}

async fn populate(repository: &Repository, config: &Config, letter: char) -> Result<(), AppError> {
    let plan = BatchPlan {
        forced_letter: letter,
        years: config.years,
        ..BatchPlan::default()
    };

    let start = std::time::Instant::now();
    let bar = progress::progress_bar(plan.total());
    let stored = repository
        .populate(&plan, rand::rng(), config.chunk_size, &bar)
        .await;
    if stored.is_err() {
        bar.finish_and_clear();
    }
    let stored = stored?;
    let elapsed = start.elapsed();
    let total = repository.count().await?;

    tracing::info!(
        "Populated {} employees in {:?}, table now holds {}",
        stored,
        elapsed,
        total
    );
    Ok(())
}

async fn select_employees(
    repository: &Repository,
    prefix: &str,
    gender: models::Gender,
) -> Result<(), AppError> {
    let start = std::time::Instant::now();

    let mut out = BufWriter::new(std::io::stdout().lock());
    repository
        .select_filtered(prefix, gender, |employee| {
            writeln!(out, "{employee}")?;
            Ok(())
        })
        .await?;
    writeln!(out, "Time of executing: {:?}", start.elapsed())?;
    out.flush()?;

    Ok(())
}

async fn run(command: Commands, repository: &Repository, config: &Config) -> Result<(), AppError> {
    match command {
        Commands::CreateTable => create_table(repository).await,
        Commands::CreateEmployee { data } => create_employee(repository, &data).await,
        Commands::List => list_employees(repository).await,
        Commands::Populate { letter } => populate(repository, config, letter).await,
        Commands::Select { prefix, gender } => select_employees(repository, &prefix, gender).await,
    }
}

fn report(err: &AppError) {
    tracing::debug!("Operation failed: {:?}", err);
    match err.kind() {
        ErrorKind::Precondition => {
            println!("{err}. Create the table first with the \"emps 1\" command")
        }
        ErrorKind::Format => println!("{err}. {USAGE_EXAMPLE}"),
        ErrorKind::Connectivity => println!("{err}"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Args::parse();
    let Some(command) = cli.command else {
        println!("Run with --help to see instructions");
        return Ok(());
    };

    let config = Config::from_env()?;
    tracing::debug!("Connecting to database {}", config.database_url);
    let repository = match Repository::connect(&config.database_url).await {
        Ok(repository) => repository,
        Err(e) => {
            report(&e);
            return Ok(());
        }
    };

    if let Err(e) = run(command, &repository, &config).await {
        report(&e);
    }

    repository.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn create_employee_checks_arity_first() {
        let repository = Repository::connect("sqlite::memory:").await.unwrap();
        repository.create_schema().await.unwrap();

        let err = create_employee(&repository, &args(&["Ivanov Ivan Ivanovich", "2000-01-01"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Arity(2)));
        assert_eq!(err.kind(), ErrorKind::Format);

        create_employee(
            &repository,
            &args(&["Ivanov Ivan Ivanovich", "2000-01-01", "Male"]),
        )
        .await
        .unwrap();
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn populate_without_table_is_a_precondition_error() {
        let repository = Repository::connect("sqlite::memory:").await.unwrap();
        let err = populate(&repository, &Config::default(), 'F')
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }
}
