//! Configuration for the hubstat exporter.
//!
//! TOML file + `HUBSTAT_` environment overrides, with a credential
//! chain for the GitHub token (named env var, then plaintext, then
//! anonymous). The binary layers CLI flag overrides on top.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHub,

    #[serde(default)]
    pub repos: Repos,

    #[serde(default)]
    pub cache: Cache,

    #[serde(default)]
    pub server: Server,
}

/// Upstream API settings and credentials.
#[derive(Debug, Deserialize, Serialize)]
pub struct GitHub {
    /// API token (plaintext -- prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// API base URL. Overridable for GitHub Enterprise and tests.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GitHub {
    fn default() -> Self {
        Self {
            token: None,
            token_env: None,
            api_url: default_api_url(),
        }
    }
}

/// Which repositories to track.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Repos {
    /// Users/organizations whose full repository list is enumerated.
    #[serde(default)]
    pub users: Vec<String>,

    /// Explicit `<owner>/<name>` entries.
    #[serde(default)]
    pub repos: Vec<String>,

    /// Keep archived repositories in the output.
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Cache {
    /// Snapshot lifetime in seconds.
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            lifetime_secs: default_lifetime_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Server {
    /// Address the /metrics endpoint binds to.
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}
fn default_lifetime_secs() -> u64 {
    3600
}
fn default_listen() -> String {
    "0.0.0.0:9090".into()
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, a TOML file, and environment.
///
/// `HUBSTAT_` variables override the file; nested keys use `__`
/// (e.g. `HUBSTAT_SERVER__LISTEN`).
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = path.unwrap_or_else(|| Path::new("hubstat.toml"));

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed("HUBSTAT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

impl Config {
    /// Structural validation. Repository-name shape is deliberately
    /// NOT checked here: a malformed name must surface as a refresh
    /// cycle error, not a startup failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation {
                field: "server.listen".into(),
                reason: format!("not a socket address: {}", self.server.listen),
            });
        }
        if self.cache.lifetime_secs == 0 {
            return Err(ConfigError::Validation {
                field: "cache.lifetime_secs".into(),
                reason: "must be non-zero".into(),
            });
        }
        if self.repos.users.iter().any(String::is_empty) {
            return Err(ConfigError::Validation {
                field: "repos.users".into(),
                reason: "empty user name".into(),
            });
        }
        if self.repos.repos.iter().any(String::is_empty) {
            return Err(ConfigError::Validation {
                field: "repos.repos".into(),
                reason: "empty repository name".into(),
            });
        }
        Ok(())
    }

    /// Resolve the GitHub token: named env var, then plaintext, then
    /// anonymous. A named env var that is missing is an error rather
    /// than a silent fallback.
    pub fn resolve_token(&self) -> Result<Option<SecretString>, ConfigError> {
        if let Some(ref env_name) = self.github.token_env {
            return match std::env::var(env_name) {
                Ok(val) => Ok(Some(SecretString::from(val))),
                Err(_) => Err(ConfigError::Validation {
                    field: "github.token_env".into(),
                    reason: format!("environment variable {env_name} is not set"),
                }),
            };
        }

        Ok(self
            .github
            .token
            .as_ref()
            .map(|t| SecretString::from(t.clone())))
    }

    pub fn cache_lifetime(&self) -> Duration {
        Duration::from_secs(self.cache.lifetime_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_are_sane() {
        figment::Jail::expect_with(|_| {
            let config = load(None).unwrap();

            assert_eq!(config.github.api_url, "https://api.github.com");
            assert_eq!(config.cache.lifetime_secs, 3600);
            assert_eq!(config.server.listen, "0.0.0.0:9090");
            assert!(!config.repos.include_archived);
            assert!(config.repos.users.is_empty());
            config.validate().unwrap();
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "hubstat.toml",
                r#"
                    [repos]
                    users = ["acct1"]
                    repos = ["acct1/x", "other/z"]
                    include_archived = true

                    [cache]
                    lifetime_secs = 120
                "#,
            )?;

            let config = load(None).unwrap();

            assert_eq!(config.repos.users, vec!["acct1"]);
            assert_eq!(config.repos.repos, vec!["acct1/x", "other/z"]);
            assert!(config.repos.include_archived);
            assert_eq!(config.cache_lifetime(), Duration::from_secs(120));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("hubstat.toml", "[server]\nlisten = \"0.0.0.0:9090\"\n")?;
            jail.set_env("HUBSTAT_SERVER__LISTEN", "127.0.0.1:9999");

            let config = load(None).unwrap();
            assert_eq!(config.server.listen, "127.0.0.1:9999");
            Ok(())
        });
    }

    #[test]
    fn token_env_takes_precedence_over_plaintext() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MY_TOKEN", "from-env");

            let config = Config {
                github: GitHub {
                    token: Some("plaintext".into()),
                    token_env: Some("MY_TOKEN".into()),
                    ..GitHub::default()
                },
                ..Config::default()
            };

            let token = config.resolve_token().unwrap().unwrap();
            assert_eq!(token.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_named_token_env_is_an_error() {
        let config = Config {
            github: GitHub {
                token_env: Some("HUBSTAT_TEST_DEFINITELY_UNSET".into()),
                ..GitHub::default()
            },
            ..Config::default()
        };

        assert!(matches!(
            config.resolve_token(),
            Err(ConfigError::Validation { ref field, .. }) if field == "github.token_env"
        ));
    }

    #[test]
    fn no_token_means_anonymous() {
        let config = Config::default();
        assert!(config.resolve_token().unwrap().is_none());
    }

    #[test]
    fn validation_rejects_bad_listen_address() {
        let config = Config {
            server: Server {
                listen: "not-an-address".into(),
            },
            ..Config::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "server.listen"
        ));
    }

    #[test]
    fn validation_rejects_zero_lifetime() {
        let config = Config {
            cache: Cache { lifetime_secs: 0 },
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_repo_names_pass_validation() {
        // Name shape is the engine's concern; it must become a cycle
        // error, not a startup failure.
        let config = Config {
            repos: Repos {
                repos: vec!["onlyonesegment".into()],
                ..Repos::default()
            },
            ..Config::default()
        };

        config.validate().unwrap();
    }
}
