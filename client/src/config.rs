use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;

/// How the client proves who it is to the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityMode {
    /// Let the server set and read its identity cookie; the cookie jar does
    /// the rest.
    Cookie,
    /// Send an `x-user-id` header with a token the client stores on disk.
    Header,
}

impl FromStr for IdentityMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cookie" => Ok(Self::Cookie),
            "header" => Ok(Self::Header),
            other => Err(anyhow!("unknown identity mode {other:?}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub use_server: bool,
    pub identity_mode: IdentityMode,
    pub state_dir: PathBuf,
}

impl ClientConfig {
    pub fn load() -> anyhow::Result<Self> {
        let base_url = std::env::var("TODO_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());

        let use_server = match std::env::var("TODO_USE_SERVER") {
            Ok(raw) => !matches!(raw.as_str(), "false" | "0" | "no"),
            Err(_) => true,
        };

        let identity_mode = match std::env::var("TODO_IDENTITY_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => IdentityMode::Cookie,
        };

        let state_dir = std::env::var("TODO_CLIENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".todo-client"));

        Ok(Self {
            base_url,
            use_server,
            identity_mode,
            state_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mode_parses_known_values() {
        assert_eq!("cookie".parse::<IdentityMode>().unwrap(), IdentityMode::Cookie);
        assert_eq!("header".parse::<IdentityMode>().unwrap(), IdentityMode::Header);
        assert!("basic".parse::<IdentityMode>().is_err());
    }
}
