//! Command-line front end over `peopledb_core`.
//!
//! # Responsibility
//! - Turn arguments and `PEOPLEDB_*` variables into a `StoreConfig`.
//! - Run one repository operation per invocation and print the outcome.
//!
//! # Invariants
//! - The CLI owns the connection; repositories only borrow it.

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use log::info;
use peopledb_core::{init_logging, PeopleRepository, Person, PersonId, StoreConfig};
use rust_decimal::Decimal;
use std::error::Error;

#[derive(Debug, Parser)]
#[command(name = "peopledb")]
#[command(about = "Manage people records in a SQLite store", long_about = None)]
struct Cli {
    /// SQLite file path; `:memory:` or unset uses a throwaway database.
    #[arg(long, env = "PEOPLEDB_DATABASE")]
    database: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "PEOPLEDB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long, env = "PEOPLEDB_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Save a new person and print the assigned id
    Add {
        first_name: String,
        last_name: String,
        /// Date of birth as RFC 3339, e.g. 1980-11-15T15:15:00+02:00
        #[arg(value_parser = parse_dob)]
        dob: DateTime<FixedOffset>,
        #[arg(long)]
        salary: Option<Decimal>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Print one person
    Show { id: PersonId },
    /// Print every person
    List,
    /// Print the number of people
    Count,
    /// Delete people by id in one statement
    Delete {
        #[arg(required = true)]
        ids: Vec<PersonId>,
    },
    /// Set a new salary for one person
    Raise { id: PersonId, salary: Decimal },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::from_inputs(
        cli.database.as_deref(),
        cli.log_level.as_deref(),
        cli.log_dir.as_deref(),
    )?;
    if let Some(log) = &config.log {
        init_logging(log)?;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        peopledb_core::core_version()
    );

    let conn = config.open_db()?;
    let repo = PeopleRepository::new(&conn);

    match cli.command {
        Commands::Add {
            first_name,
            last_name,
            dob,
            salary,
            email,
        } => {
            let mut person = Person::new(first_name, last_name, dob);
            if let Some(salary) = salary {
                person = person.with_salary(salary);
            }
            if let Some(email) = email {
                person = person.with_email(email);
            }
            let saved = repo.save(person)?;
            println!("{saved}");
        }
        Commands::Show { id } => match repo.find_by_id(id)? {
            Some(person) => println!("{person}"),
            None => println!("no person with id {id}"),
        },
        Commands::List => {
            for person in repo.find_all()? {
                println!("{person}");
            }
        }
        Commands::Count => println!("{}", repo.count()?),
        Commands::Delete { ids } => {
            let mut people = Vec::with_capacity(ids.len());
            for id in ids {
                match repo.find_by_id(id)? {
                    Some(person) => people.push(person),
                    None => eprintln!("skipping unknown id {id}"),
                }
            }
            repo.delete_many(&people)?;
            println!("deleted {}", people.len());
        }
        Commands::Raise { id, salary } => {
            let Some(mut person) = repo.find_by_id(id)? else {
                return Err(format!("no person with id {id}").into());
            };
            person.salary = salary;
            repo.update(&person)?;
            println!("{person}");
        }
    }
    Ok(())
}

fn parse_dob(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|err| format!("expected RFC 3339 timestamp, got `{value}`: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{parse_dob, Cli, Commands};
    use clap::Parser;

    #[test]
    fn parse_dob_keeps_offset() {
        let dob = parse_dob("1980-11-15T15:15:00+02:00").unwrap();
        assert_eq!(dob.offset().local_minus_utc(), 2 * 3600);
        assert!(parse_dob("15/11/1980").is_err());
    }

    #[test]
    fn add_command_parses_optional_fields() {
        let cli = Cli::try_parse_from([
            "peopledb",
            "--database",
            ":memory:",
            "add",
            "John",
            "Smith",
            "1980-11-15T15:15:00+02:00",
            "--salary",
            "120000.50",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { salary, email, .. } => {
                assert_eq!(salary.unwrap().to_string(), "120000.50");
                assert_eq!(email, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn delete_requires_at_least_one_id() {
        assert!(Cli::try_parse_from(["peopledb", "delete"]).is_err());
    }
}
