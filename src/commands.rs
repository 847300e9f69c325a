use clap::{Parser, Subcommand};

use crate::{generator::DEFAULT_FORCED_LETTER, models::Gender};

#[derive(Parser)]
#[command(about = "Manage and seed the employee_account table")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the employee table
    #[command(visible_alias = "1")]
    CreateTable,
    /// Create an employee's account: 'fullname' 'birth_date' 'gender'
    #[command(visible_alias = "2")]
    CreateEmployee {
        /// Fullname, birth date (YYYY-MM-DD) and gender (Male or Female)
        #[arg(allow_hyphen_values = true)]
        data: Vec<String>,
    },
    /// List all employees ordered by fullname
    #[command(visible_alias = "3")]
    List,
    /// Populate the table with random employees
    #[command(visible_alias = "4")]
    Populate {
        /// First letter of the last names in the forced-letter sub-batch
        #[arg(long, default_value_t = DEFAULT_FORCED_LETTER)]
        letter: char,
    },
    /// Select employees by fullname prefix and gender, timing the query
    #[command(visible_alias = "5")]
    Select {
        /// Case-insensitive fullname prefix
        #[arg(long, default_value = "F")]
        prefix: String,
        /// Exact gender to match
        #[arg(long, default_value = "Male", value_parser = parse_gender)]
        gender: Gender,
    },
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    value.parse().map_err(|e: crate::error::AppError| e.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn numeric_tokens_select_commands() {
        let args = Args::try_parse_from(["emps", "1"]).unwrap();
        assert!(matches!(args.command, Some(Commands::CreateTable)));

        let args = Args::try_parse_from(["emps", "4"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Populate { letter: 'F' })));
    }

    #[test]
    fn create_employee_collects_raw_arguments() {
        let args =
            Args::try_parse_from(["emps", "2", "Ivanov Ivan Ivanovich", "2000-01-01"]).unwrap();
        match args.command {
            Some(Commands::CreateEmployee { data }) => assert_eq!(data.len(), 2),
            _ => panic!("expected create-employee"),
        }
    }

    #[test]
    fn select_defaults_and_overrides() {
        let args = Args::try_parse_from(["emps", "select"]).unwrap();
        match args.command {
            Some(Commands::Select { prefix, gender }) => {
                assert_eq!(prefix, "F");
                assert_eq!(gender, Gender::Male);
            }
            _ => panic!("expected select"),
        }

        let args =
            Args::try_parse_from(["emps", "5", "--prefix", "Iv", "--gender", "Female"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Select { gender: Gender::Female, .. })
        ));

        assert!(Args::try_parse_from(["emps", "5", "--gender", "Other"]).is_err());
    }
}
