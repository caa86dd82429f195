use clap::{Args as ClapArgs, Parser, Subcommand};

/// Health metrics calculator client
#[derive(Parser, Debug)]
#[command(name = "healthcalc", author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the calculator API
    #[arg(long, env = "HEALTH_API_URL", default_value = "http://localhost:8000", global = true)]
    pub url: String,

    /// Username to save calculations under and to read history for
    #[arg(short = 'u', long, env = "HEALTH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "HEALTH_API_TIMEOUT", default_value_t = 30, value_name = "SECS", global = true)]
    pub timeout: u64,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Body Mass Index
    Bmi(BodyArgs),

    /// Body fat percentage from girth measurements
    BodyFat {
        #[command(flatten)]
        body: BodyArgs,

        /// Neck circumference in cm
        #[arg(long, value_name = "CM")]
        neck: String,

        /// Waist circumference in cm
        #[arg(long, value_name = "CM")]
        waist: String,

        /// Hip circumference in cm
        #[arg(long, value_name = "CM")]
        hip: String,
    },

    /// Daily calorie needs
    Calorie {
        #[command(flatten)]
        body: BodyArgs,

        /// Sedentary, Lightly Active, Moderately Active, Very Active or Extra Active
        #[arg(long, value_name = "LEVEL")]
        activity: String,
    },

    /// Basal Metabolic Rate
    Bmr(BodyArgs),

    /// Ideal weight range for a height
    IdealWeight {
        #[command(flatten)]
        person: PersonArgs,

        /// Height in cm
        #[arg(long, value_name = "CM")]
        height: String,
    },

    /// Browse and edit saved calculations
    #[command(subcommand)]
    History(HistoryCommand),

    /// Check that the API is reachable
    Health,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum HistoryCommand {
    /// List saved calculations, newest first
    List {
        /// Maximum number of records
        #[arg(long, value_name = "N")]
        limit: Option<String>,

        /// Number of records to skip
        #[arg(long, value_name = "N")]
        offset: Option<String>,
    },

    /// Show one record
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Replace a record's inputs and/or result
    Update {
        #[arg(value_name = "ID")]
        id: String,

        /// New inputs as a JSON object
        #[arg(long, value_name = "JSON")]
        inputs: Option<String>,

        /// New result as a JSON object
        #[arg(long, value_name = "JSON")]
        result: Option<String>,
    },

    /// Delete a record
    Delete {
        #[arg(value_name = "ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Age and gender, shared by every calculator.
#[derive(ClapArgs, Debug, Clone, PartialEq)]
pub struct PersonArgs {
    /// Age in years
    #[arg(long, value_name = "YEARS")]
    pub age: String,

    /// male or female
    #[arg(long)]
    pub gender: String,
}

#[derive(ClapArgs, Debug, Clone, PartialEq)]
pub struct BodyArgs {
    #[command(flatten)]
    pub person: PersonArgs,

    /// Weight in kg
    #[arg(long, value_name = "KG")]
    pub weight: String,

    /// Height in cm
    #[arg(long, value_name = "CM")]
    pub height: String,
}

impl Args {
    /// Log filter directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_arguments_stay_raw_text() {
        let args = Args::try_parse_from([
            "healthcalc", "--url", "http://api:9000", "bmi", "--age", "30", "--gender", "male",
            "--weight", "70", "--height", "abc",
        ])
        .unwrap();
        assert_eq!(args.url, "http://api:9000");
        match args.command {
            Command::Bmi(body) => {
                assert_eq!(body.person.age, "30");
                assert_eq!(body.height, "abc");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "healthcalc", "history", "list", "--limit", "5", "-u", "alice", "-vv",
        ])
        .unwrap();
        assert_eq!(args.username.as_deref(), Some("alice"));
        assert_eq!(args.log_level(), "debug");
        assert_eq!(
            args.command,
            Command::History(HistoryCommand::List {
                limit: Some("5".to_string()),
                offset: None
            })
        );
    }

    #[test]
    fn delete_takes_id_and_yes() {
        let args = Args::try_parse_from(["healthcalc", "history", "delete", "7", "--yes"]).unwrap();
        assert_eq!(
            args.command,
            Command::History(HistoryCommand::Delete {
                id: "7".to_string(),
                yes: true
            })
        );
    }

    #[test]
    fn body_fat_requires_girths() {
        let err = Args::try_parse_from([
            "healthcalc", "body-fat", "--age", "30", "--gender", "f", "--weight", "60", "--height",
            "165",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn default_verbosity_is_warn() {
        let args = Args::try_parse_from(["healthcalc", "health"]).unwrap();
        assert_eq!(args.log_level(), "warn");
        assert_eq!(args.timeout, 30);
    }
}
