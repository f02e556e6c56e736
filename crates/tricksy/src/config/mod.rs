use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::access::{GuardPoints, Permission};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub access: AccessConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let superadmin_username =
            env::var("APP_SUPERADMIN").unwrap_or_else(|_| "admin".to_string());
        let assignment_guard = match env::var("APP_ASSIGNMENT_GUARD") {
            Ok(value) => parse_assignment_guard(&value)?,
            Err(_) => Permission::ManageBookings,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            access: AccessConfig {
                superadmin_username,
                assignment_guard,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Access-control knobs: which account gets bootstrapped as superadmin, and
/// which permission guards the assignment workflow (`APP_ASSIGNMENT_GUARD`,
/// `manage_bookings` by default, switchable to `assign_cleaners`).
#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub superadmin_username: String,
    pub assignment_guard: Permission,
}

impl AccessConfig {
    pub fn guard_points(&self) -> GuardPoints {
        GuardPoints {
            booking_mutation: Permission::ManageBookings,
            cleaner_assignment: self.assignment_guard,
        }
    }
}

fn parse_assignment_guard(value: &str) -> Result<Permission, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "manage_bookings" => Ok(Permission::ManageBookings),
        "assign_cleaners" => Ok(Permission::AssignCleaners),
        _ => Err(ConfigError::InvalidAssignmentGuard {
            value: value.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAssignmentGuard { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAssignmentGuard { value } => write!(
                f,
                "APP_ASSIGNMENT_GUARD must be manage_bookings or assign_cleaners, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidAssignmentGuard { .. } => None,
        }
    }
}
