//! Server configuration from the process environment.

use crate::credentials::{AdminCredentials, HashFormatError, PasswordHash};
use race_admin_core::{parse_car_list, CarId};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 9009;
const DEFAULT_USER: &str = "pi";
const DEFAULT_CARS: &str = "Thermo,Ground Shock,Skull,Guardian";
const DEFAULT_SCHEDULE_TIMEOUT_MS: u64 = 1_000;
const DEFAULT_EVENT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_IOT_TIMEOUT_MS: u64 = 10_000;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed.
    #[error("{name} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// `ADMIN_PASSWORD_HASH` is not a usable hash.
    #[error("ADMIN_PASSWORD_HASH is invalid: {0}")]
    PasswordHash(#[from] HashFormatError),

    /// `RACE_CARS` names no cars.
    #[error("RACE_CARS names no cars")]
    NoCars,
}

/// Everything the `race-admin` binary needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on.
    pub listen_addr: SocketAddr,
    /// Event service base URL.
    pub event_server: String,
    /// Directory service base URL.
    pub directory_url: String,
    /// Directory holding the race state files.
    pub state_dir: PathBuf,
    /// Cars with lap counters.
    pub cars: Vec<CarId>,
    /// Basic auth account.
    pub credentials: AdminCredentials,
    /// Schedule lookup timeout.
    pub schedule_timeout: Duration,
    /// Event delivery timeout.
    pub event_timeout: Duration,
    /// IoT lookup and trigger timeout.
    pub iot_timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any value
    /// is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any value
    /// is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match get("ADMINPORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "ADMINPORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let host = match get("ADMIN_HOST") {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                name: "ADMIN_HOST",
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let event_server = get("EVENTSERVER").ok_or(ConfigError::Missing("EVENTSERVER"))?;
        let directory_url = get("DBZONE").ok_or(ConfigError::Missing("DBZONE"))?;

        let state_dir = match get("RACE_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(get("HOME").ok_or(ConfigError::Missing("HOME"))?).join("setup"),
        };

        let cars = parse_car_list(&get("RACE_CARS").unwrap_or_else(|| DEFAULT_CARS.to_string()));
        if cars.is_empty() {
            return Err(ConfigError::NoCars);
        }

        let user = get("ADMIN_USER").unwrap_or_else(|| DEFAULT_USER.to_string());
        let hash: PasswordHash = get("ADMIN_PASSWORD_HASH")
            .ok_or(ConfigError::Missing("ADMIN_PASSWORD_HASH"))?
            .parse()?;

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            event_server,
            directory_url,
            state_dir,
            cars,
            credentials: AdminCredentials::new(user, hash),
            schedule_timeout: millis(&get, "SCHEDULE_TIMEOUT_MS", DEFAULT_SCHEDULE_TIMEOUT_MS)?,
            event_timeout: millis(&get, "EVENT_TIMEOUT_MS", DEFAULT_EVENT_TIMEOUT_MS)?,
            iot_timeout: millis(&get, "IOT_TIMEOUT_MS", DEFAULT_IOT_TIMEOUT_MS)?,
        })
    }
}

fn millis(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = get(name) else {
        return Ok(Duration::from_millis(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(e) => Err(ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}
