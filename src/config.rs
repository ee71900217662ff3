/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::info;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{ConfigError, ElevatorError};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub cli: CliConfig,
    pub engine: EngineConfig,
}

/// Bounds the command-line shell puts on the floor count.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub min_floors: u32,
    pub max_floors: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            min_floors: 5,
            max_floors: 20,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub idle_timeout_ms: u64,
    pub callback_failure: CallbackFailure,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            idle_timeout_ms: 100,
            callback_failure: CallbackFailure::Stop,
        }
    }
}

/// What the control loop does when an event callback returns an error.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallbackFailure {
    /// Terminate the control loop and hand the error to whoever joins it.
    Stop,
    /// Log the error and keep running.
    Log,
}

/**
 * Physical parameters of the simulated elevator.
 *
 * # Fields
 * - `n_floors`:        Number of floors served.
 * - `floor_height`:    Height of one floor, in distance units.
 * - `velocity`:        Cabin speed, in distance units per second.
 * - `door_open_time`:  Seconds the doors stay open on a visit.
 */
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ElevatorParams {
    pub n_floors: u32,
    pub floor_height: f64,
    pub velocity: f64,
    pub door_open_time: f64,
}

impl ElevatorParams {
    pub fn validate(&self) -> Result<(), ElevatorError> {
        if self.n_floors == 0 {
            return Err(ElevatorError::InvalidParameter {
                name: "n_floors",
                value: self.n_floors.to_string(),
            });
        }
        positive("floor_height", self.floor_height)?;
        positive("velocity", self.velocity)?;
        positive("door_open_time", self.door_open_time)?;
        Ok(())
    }

    /// Time one drive step takes.
    pub fn travel_time(&self) -> Result<Duration, ElevatorError> {
        seconds("travel_time", self.floor_height / self.velocity)
    }

    pub fn door_open_duration(&self) -> Result<Duration, ElevatorError> {
        seconds("door_open_time", self.door_open_time)
    }
}

/***************************************/
/*             Public API              */
/***************************************/
impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let config_str = fs::read_to_string(path)?;
        Config::from_toml(&config_str)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            info!("No configuration at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Config::load(path)
    }

    pub fn from_toml(config_str: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        config.cli.validate()?;
        config.engine.validate()?;
        Ok(config)
    }
}

impl CliConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_floors == 0 || self.min_floors > self.max_floors {
            return Err(ConfigError::InvalidFloorRange {
                min: self.min_floors,
                max: self.max_floors,
            });
        }
        Ok(())
    }
}

impl EngineConfig {
    /// A zero timeout would make the idle loop spin.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout_ms == 0 {
            return Err(ConfigError::InvalidIdleTimeout(self.idle_timeout_ms));
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

/***************************************/
/*             Helpers                 */
/***************************************/
fn positive(name: &'static str, value: f64) -> Result<(), ElevatorError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ElevatorError::InvalidParameter {
            name,
            value: value.to_string(),
        })
    }
}

fn seconds(name: &'static str, value: f64) -> Result<Duration, ElevatorError> {
    Duration::try_from_secs_f64(value).map_err(|_| ElevatorError::InvalidParameter {
        name,
        value: value.to_string(),
    })
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ElevatorParams {
        ElevatorParams {
            n_floors: 5,
            floor_height: 4.0,
            velocity: 2.0,
            door_open_time: 1.5,
        }
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cli.min_floors, 5);
        assert_eq!(config.cli.max_floors, 20);
        assert_eq!(config.engine.callback_failure, CallbackFailure::Stop);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
            [cli]
            min_floors = 2
            max_floors = 9

            [engine]
            idle_timeout_ms = 25
            callback_failure = "log"
            "#,
        )
        .unwrap();

        assert_eq!(config.cli.min_floors, 2);
        assert_eq!(config.cli.max_floors, 9);
        assert_eq!(config.engine.idle_timeout(), Duration::from_millis(25));
        assert_eq!(config.engine.callback_failure, CallbackFailure::Log);
    }

    #[test]
    fn test_reject_inverted_floor_range() {
        let result = Config::from_toml("[cli]\nmin_floors = 10\nmax_floors = 3\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidFloorRange { min: 10, max: 3 })
        ));
    }

    #[test]
    fn test_reject_zero_idle_timeout() {
        let result = Config::from_toml("[engine]\nidle_timeout_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidIdleTimeout(0))));

        let config = Config::from_toml("[engine]\nidle_timeout_ms = 1\n").unwrap();
        assert_eq!(config.engine.idle_timeout(), Duration::from_millis(1));
    }

    #[test]
    fn test_reject_unknown_callback_policy() {
        let result = Config::from_toml("[engine]\ncallback_failure = \"retry\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_or_default(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_params_validation() {
        assert!(params().validate().is_ok());

        let zero_floors = ElevatorParams { n_floors: 0, ..params() };
        assert!(matches!(
            zero_floors.validate(),
            Err(ElevatorError::InvalidParameter { name: "n_floors", .. })
        ));

        let negative_velocity = ElevatorParams { velocity: -1.0, ..params() };
        assert!(matches!(
            negative_velocity.validate(),
            Err(ElevatorError::InvalidParameter { name: "velocity", .. })
        ));

        let nan_height = ElevatorParams { floor_height: f64::NAN, ..params() };
        assert!(nan_height.validate().is_err());

        let zero_dwell = ElevatorParams { door_open_time: 0.0, ..params() };
        assert!(zero_dwell.validate().is_err());
    }

    #[test]
    fn test_durations() {
        assert_eq!(params().travel_time().unwrap(), Duration::from_secs(2));
        assert_eq!(params().door_open_duration().unwrap(), Duration::from_millis(1500));
    }
}
