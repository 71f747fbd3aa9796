//! Runtime [`Config`] and API key resolution.
//!
//! The key is looked up once, first in a TOML secrets file and then in the
//! process environment. A local `.env` file is loaded into the environment
//! by [`Config::from_env`] before anything is read.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{client, key, model, Client, Key, Model};

/// Name of the API key, both in the secrets file and in the environment.
pub const KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding [`Config::base_url`].
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding [`Config::model`].
pub const MODEL_VAR: &str = "GHOSTWRITER_MODEL";
/// Environment variable setting [`Config::timeout`] in whole seconds. `0`
/// means no timeout.
pub const TIMEOUT_VAR: &str = "GHOSTWRITER_TIMEOUT_SECS";
/// Environment variable overriding [`Config::secrets_path`].
pub const SECRETS_VAR: &str = "GHOSTWRITER_SECRETS";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither the secrets file nor the environment has a key.
    #[error(
        "No API key found in {} or the OPENAI_API_KEY environment variable",
        .path.display()
    )]
    MissingKey {
        /// Secrets file that was checked.
        path: PathBuf,
    },
    /// The key was found but is unusable.
    #[error("Key error: {0}")]
    Key(#[from] key::InvalidKey),
    /// The secrets file exists but could not be read.
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        /// Secrets file.
        path: PathBuf,
        /// Cause.
        source: std::io::Error,
    },
    /// The secrets file is not valid TOML.
    #[error("Could not parse {}: {source}", .path.display())]
    Secrets {
        /// Secrets file.
        path: PathBuf,
        /// Cause.
        source: toml::de::Error,
    },
    /// The timeout is not a whole number of seconds.
    #[error("Invalid timeout: {0:?}")]
    InvalidTimeout(String),
    /// The model is not known.
    #[error(transparent)]
    Model(#[from] model::UnknownModel),
    /// The client could not be built.
    #[error(transparent)]
    Client(#[from] client::Error),
}

/// Settings for building a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the API.
    pub base_url: String,
    /// [`Model`] to generate with.
    pub model: Model,
    /// Total request timeout. [`None`] waits forever.
    pub timeout: Option<Duration>,
    /// TOML secrets file checked before the environment.
    pub secrets_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Client::DEFAULT_BASE_URL.to_string(),
            model: Model::default(),
            timeout: None,
            secrets_path: PathBuf::from(Self::DEFAULT_SECRETS_PATH),
        }
    }
}

impl Config {
    /// Default secrets file, relative to the working directory.
    pub const DEFAULT_SECRETS_PATH: &'static str = ".streamlit/secrets.toml";

    /// Load `.env` if there is one, then read the configuration from the
    /// environment.
    pub fn from_env() -> Result<Self, Error> {
        match dotenvy::dotenv() {
            #[allow(unused_variables)]
            Ok(path) => {
                #[cfg(feature = "log")]
                log::debug!("Loaded environment from {}", path.display());
            }
            #[allow(unused_variables)]
            Err(e) => {
                #[cfg(feature = "log")]
                log::debug!("No .env loaded: {}", e);
            }
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value. Unset and empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get(BASE_URL_VAR) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(model) = get(MODEL_VAR) {
            config.model = model.trim().parse()?;
        }

        if let Some(secs) = get(TIMEOUT_VAR) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| Error::InvalidTimeout(secs.clone()))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(path) = get(SECRETS_VAR) {
            config.secrets_path = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Resolve the API key from [`Self::secrets_path`], falling back to the
    /// [`KEY_VAR`] environment variable.
    pub fn resolve_key(&self) -> Result<Key, Error> {
        self.resolve_key_with(|name| std::env::var(name).ok())
    }

    /// [`Self::resolve_key`] with a custom environment `lookup`.
    pub fn resolve_key_with<F>(&self, lookup: F) -> Result<Key, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = read_secret(&self.secrets_path, KEY_VAR)? {
            #[cfg(feature = "log")]
            log::info!("Using API key from {}", self.secrets_path.display());

            return Ok(Key::try_from(key)?);
        }

        match lookup(KEY_VAR) {
            Some(key) => {
                #[cfg(feature = "log")]
                log::info!("Using API key from the environment");

                Ok(Key::try_from(key)?)
            }
            None => Err(Error::MissingKey {
                path: self.secrets_path.clone(),
            }),
        }
    }

    /// Build a [`Client`] using `key`.
    pub fn client_with_key(&self, key: Key) -> Result<Client, Error> {
        Ok(Client::from_key(key)?
            .model(self.model)
            .base_url(self.base_url.as_str())
            .timeout(self.timeout)?)
    }

    /// Resolve the key and build a [`Client`].
    pub fn client(&self) -> Result<Client, Error> {
        self.client_with_key(self.resolve_key()?)
    }
}

/// Read a top level string `name` from the TOML file at `path`. A missing
/// file or a missing entry is `Ok(None)`.
fn read_secret(path: &Path, name: &str) -> Result<Option<String>, Error> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let table: toml::Table =
        toml::from_str(&text).map_err(|source| Error::Secrets {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(table
        .get(name)
        .and_then(toml::Value::as_str)
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const FILE_KEY: &str = "sk-from-file-0123456789";
    const ENV_KEY: &str = "sk-from-env-0123456789";

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn config_in(dir: &tempfile::TempDir) -> Config {
        Config {
            secrets_path: dir.path().join("secrets.toml"),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, Model::Gpt4oMini);
        assert_eq!(config.timeout, None);
        assert_eq!(
            config.secrets_path,
            PathBuf::from(".streamlit/secrets.toml")
        );
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(vars(&[
            (BASE_URL_VAR, "http://localhost:8080/v1/"),
            (MODEL_VAR, "gpt-4o"),
            (TIMEOUT_VAR, "30"),
            (SECRETS_VAR, "/run/secrets/app.toml"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, Model::Gpt4o);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.secrets_path, PathBuf::from("/run/secrets/app.toml"));

        let config = Config::from_lookup(vars(&[(TIMEOUT_VAR, "0")])).unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(matches!(
            Config::from_lookup(vars(&[(TIMEOUT_VAR, "soon")])),
            Err(Error::InvalidTimeout(_))
        ));
        assert!(matches!(
            Config::from_lookup(vars(&[(MODEL_VAR, "davinci")])),
            Err(Error::Model(_))
        ));
    }

    #[test]
    fn test_key_prefers_secrets_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        std::fs::write(
            &config.secrets_path,
            format!("{KEY_VAR} = \"{FILE_KEY}\"\nOTHER = 1\n"),
        )
        .unwrap();

        let key = config
            .resolve_key_with(vars(&[(KEY_VAR, ENV_KEY)]))
            .unwrap();
        assert_eq!(key.read(), FILE_KEY);
    }

    #[test]
    fn test_key_falls_back_to_environment() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        // No file at all.
        let key = config
            .resolve_key_with(vars(&[(KEY_VAR, ENV_KEY)]))
            .unwrap();
        assert_eq!(key.read(), ENV_KEY);

        // A file without the key.
        std::fs::write(&config.secrets_path, "OTHER = \"x\"\n").unwrap();
        let key = config
            .resolve_key_with(vars(&[(KEY_VAR, ENV_KEY)]))
            .unwrap();
        assert_eq!(key.read(), ENV_KEY);
    }

    #[test]
    fn test_key_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let err = config.resolve_key_with(vars(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingKey { .. }));
        assert!(err.to_string().contains(KEY_VAR));

        let err = config
            .resolve_key_with(vars(&[(KEY_VAR, " ")]))
            .unwrap_err();
        assert!(matches!(err, Error::Key(key::InvalidKey::Empty)));
    }

    #[test]
    fn test_bad_secrets_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        std::fs::write(&config.secrets_path, "this is = = not toml").unwrap();

        assert!(matches!(
            config.resolve_key_with(vars(&[(KEY_VAR, ENV_KEY)])),
            Err(Error::Secrets { .. })
        ));
    }

    #[test]
    fn test_client_with_key() {
        let config = Config {
            base_url: "http://localhost:1234/v1".to_string(),
            model: Model::Gpt41Mini,
            timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        };
        let client = config
            .client_with_key(Key::try_from(ENV_KEY.to_string()).unwrap())
            .unwrap();

        assert_eq!(client.model, Model::Gpt41Mini);
        assert_eq!(client.endpoint(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(client.get_timeout(), Some(Duration::from_secs(5)));
    }
}
