use std::{
    env,
    fmt::{self, Display},
    path::PathBuf,
    str::FromStr,
};

use tracing::{info, warn};

/// Which storage backend the process persists todos in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    File,
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!(
                "unknown backend '{other}' (expected memory, file or sqlite)"
            )),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// How the caller identity reaches the server. Exactly one strategy is
/// active per deployment; they are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// Server issues a UUID in a long-lived cookie on first contact.
    Cookie,
    /// Clients must present the identity header; issuance happens only via
    /// the dedicated `/user-id` endpoint.
    Header,
}

impl FromStr for IdentityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cookie" => Ok(Self::Cookie),
            "header" => Ok(Self::Header),
            other => Err(format!(
                "unknown identity strategy '{other}' (expected cookie or header)"
            )),
        }
    }
}

impl Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cookie => write!(f, "cookie"),
            Self::Header => write!(f, "header"),
        }
    }
}

pub struct Config {
    pub port: u16,
    pub backend: BackendKind,
    pub data_path: PathBuf,
    pub sqlite_path: PathBuf,
    pub identity: IdentityStrategy,
    pub allowed_origins: Vec<String>,
    pub rate_limit_max: u32,
    pub production: bool,
    /// Whether PUT/PATCH may set an explicitly empty title. Off by default,
    /// keeping the create-time non-empty invariant.
    pub allow_empty_title_update: bool,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3001"),
            backend: try_load("TODO_BACKEND", "file"),
            data_path: PathBuf::from(var("TODO_DATA_PATH").unwrap_or_else(|| "todos.json".into())),
            sqlite_path: PathBuf::from(var("TODO_SQLITE_PATH").unwrap_or_else(|| "todos.db".into())),
            identity: try_load("IDENTITY_STRATEGY", "cookie"),
            allowed_origins: load_origins(),
            rate_limit_max: try_load("RATE_LIMIT_MAX", "100"),
            production: var("APP_ENV").map(|v| v == "production").unwrap_or(false),
            allow_empty_title_update: try_load("ALLOW_EMPTY_TITLE_UPDATE", "false"),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default.parse().unwrap_or_else(|e| {
                panic!("default for {key} must parse: {e}");
            })
        }
    }
}

fn load_origins() -> Vec<String> {
    match var("ALLOWED_ORIGINS") {
        Some(raw) => raw
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect(),
        None => vec![
            "http://localhost:5173".to_string(),
            "http://localhost:3000".to_string(),
        ],
    }
}
