//! Identity tokens on the client side.
//!
//! Whatever the mode, the resolved token lands in a `user-id` file under the
//! state directory so the same identity survives process restarts. Header
//! sessions replay it in `x-user-id`; cookie sessions re-seed the cookie jar
//! with it before the first request. Purely local sessions mint their own
//! token; it is deliberately shaped unlike a UUID so local records are
//! recognizable.

use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::api::ClientError;

/// The cookie the server issues in cookie-strategy deployments.
pub const USER_ID_COOKIE: &str = "todo-user-id";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuedId {
    user_id: String,
}

/// The token persisted by an earlier session, if any.
pub fn saved_token(state_dir: &Path) -> Result<Option<String>, ClientError> {
    match std::fs::read_to_string(state_dir.join("user-id")) {
        Ok(saved) => {
            let saved = saved.trim();
            Ok((!saved.is_empty()).then(|| saved.to_string()))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn persist_token(state_dir: &Path, token: &str) -> Result<(), ClientError> {
    std::fs::create_dir_all(state_dir)?;
    std::fs::write(state_dir.join("user-id"), token)?;
    Ok(())
}

/// Plants a previously issued identity cookie in the jar so the server
/// recognizes this session instead of minting a fresh identity.
pub fn seed_cookie(jar: &reqwest::cookie::Jar, base_url: &reqwest::Url, token: &str) {
    jar.add_cookie_str(&format!("{USER_ID_COOKIE}={token}"), base_url);
}

/// Returns the persisted header token, asking the server to issue one on
/// first use. If issuance fails the session continues with a locally minted
/// token instead of aborting.
pub async fn resolve_header_token(
    client: &reqwest::Client,
    base_url: &str,
    state_dir: &Path,
) -> Result<String, ClientError> {
    if let Some(saved) = saved_token(state_dir)? {
        return Ok(saved);
    }

    let token = match fetch_issued_token(client, base_url).await {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!("Identity issuance failed, minting a local token: {err}");
            local_token()
        }
    };

    persist_token(state_dir, &token)?;
    Ok(token)
}

pub(crate) async fn fetch_issued_token(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<String, ClientError> {
    let issued: IssuedId = client
        .get(format!("{base_url}/user-id"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(issued.user_id)
}

/// `local-<unix millis>-<7 base36 chars>`.
pub fn local_token() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect();

    format!("local-{millis}-{suffix}")
}

#[cfg(test)]
mod tests {
    use reqwest::cookie::CookieStore;

    use super::*;

    #[test]
    fn test_local_token_shape() {
        let token = local_token();
        let parts: Vec<&str> = token.splitn(3, '-').collect();

        assert_eq!(parts[0], "local");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 7);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_local_tokens_differ() {
        assert_ne!(local_token(), local_token());
    }

    #[test]
    fn test_saved_token_round_trips() {
        let dir = tempfile::tempdir().unwrap();

        assert!(saved_token(dir.path()).unwrap().is_none());

        persist_token(dir.path(), "abc").unwrap();
        assert_eq!(saved_token(dir.path()).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_token_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("user-id"), "  \n").unwrap();

        assert!(saved_token(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_seed_cookie_presents_the_saved_identity() {
        let dir = tempfile::tempdir().unwrap();
        persist_token(dir.path(), "abc").unwrap();

        let jar = reqwest::cookie::Jar::default();
        let url: reqwest::Url = "http://localhost:3001".parse().unwrap();
        let saved = saved_token(dir.path()).unwrap().unwrap();
        seed_cookie(&jar, &url, &saved);

        let header = jar.cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "todo-user-id=abc");
    }
}
