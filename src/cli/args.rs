/***************************************/
/*        3rd party libraries          */
/***************************************/
use clap::Parser;
use std::path::PathBuf;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::cli::output::OutputFormat;
use crate::config::{CliConfig, ElevatorParams};

/// Command-line arguments of the elevator simulator.
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "elevator",
    version,
    about = "This is command line program, which emulate elevator life cycle and always waits \
             for input from the user and outputs the elevator actions in real time",
    after_help = "elevator events:
  elevator passed the floor
  elevator opened the doors
  elevator closed the doors

possible user actions:
  Press the button inside the elevator (Example: \"inside 3\")
  Press the button on the floor (Example: \"outside 1\")"
)]
#[clap(mut_arg("version", |a| a.short('v')))]
pub struct Args {
    /// N - number of floors in entrance
    #[clap(value_name = "N", value_parser)]
    pub n: u32,

    /// h (m) - height of floor
    #[clap(value_name = "h", value_parser = parse_positive)]
    pub h: f64,

    /// v (m/sec) - velocity of elevator
    #[clap(value_name = "v", value_parser = parse_positive)]
    pub v: f64,

    /// t (sec) - time before opening and closing elevator doors
    #[clap(value_name = "t", value_parser = parse_positive)]
    pub t: f64,

    /// Configuration file
    #[clap(short, long, value_name = "PATH", value_parser, default_value = "config.toml")]
    pub config: PathBuf,

    /// Print events as JSON lines
    #[clap(long, action)]
    pub json: bool,
}

impl Args {
    /// Checks the floor count against the configured range and builds the engine parameters.
    pub fn params(&self, limits: &CliConfig) -> Result<ElevatorParams, String> {
        if self.n < limits.min_floors || self.n > limits.max_floors {
            return Err(format!(
                "{} is not in {}..={}",
                self.n, limits.min_floors, limits.max_floors
            ));
        }

        Ok(ElevatorParams {
            n_floors: self.n,
            floor_height: self.h,
            velocity: self.v,
            door_open_time: self.t,
        })
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

fn parse_positive(value: &str) -> Result<f64, String> {
    let number: f64 = value
        .parse()
        .map_err(|_| format!("{} is not a number", value))?;
    if number.is_finite() && number > 0.0 {
        Ok(number)
    } else {
        Err(format!("{} is not a positive number", value))
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("elevator").chain(argv.iter().copied()))
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let args = parse(&["10", "3", "1.5", "2"]).unwrap();

        assert_eq!(args.n, 10);
        assert_eq!(args.h, 3.0);
        assert_eq!(args.v, 1.5);
        assert_eq!(args.t, 2.0);
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert_eq!(args.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_optional_flags() {
        let args = parse(&["--json", "-c", "other.toml", "5", "1", "1", "1"]).unwrap();

        assert_eq!(args.output_format(), OutputFormat::Json);
        assert_eq!(args.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn test_reject_non_positive_values() {
        assert!(parse(&["5", "0", "1", "1"]).is_err());
        assert!(parse(&["5", "1", "-2", "1"]).is_err());
        assert!(parse(&["5", "1", "1", "abc"]).is_err());
        assert!(parse(&["5", "1", "1"]).is_err());
    }

    #[test]
    fn test_usage_names_the_binary() {
        let mut cmd = Args::command();
        assert_eq!(cmd.get_name(), "elevator");

        let usage = cmd.render_usage();
        assert!(usage.contains("elevator [OPTIONS] <N> <h> <v> <t>"), "{}", usage);
        assert!(!usage.contains("elevator-sim"), "{}", usage);
    }

    #[test]
    fn test_short_version_flag() {
        let err = parse(&["-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_floor_count_range() {
        let limits = CliConfig::default();

        let params = parse(&["20", "4", "2", "1"]).unwrap().params(&limits).unwrap();
        assert_eq!(params.n_floors, 20);
        assert_eq!(params.floor_height, 4.0);
        assert_eq!(params.velocity, 2.0);
        assert_eq!(params.door_open_time, 1.0);

        assert!(parse(&["4", "4", "2", "1"]).unwrap().params(&limits).is_err());
        assert!(parse(&["21", "4", "2", "1"]).unwrap().params(&limits).is_err());
    }
}
