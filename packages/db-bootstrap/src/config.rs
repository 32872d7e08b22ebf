use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dialect::{Dialect, MSSQL};
use crate::error::BootstrapError;

const DEFAULT_DIRECTORY: &str = "tmp";
const DEFAULT_DATABASE: &str = "sequelize_test";
const DEFAULT_HOST: &str = "127.0.0.1";

/// Connection parameters for one dialect.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    pub username: String,
    pub password: Option<String>,
    /// On-disk database file, used by file-backed dialects.
    pub storage: Option<PathBuf>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: None,
            database: DEFAULT_DATABASE.to_string(),
            username: String::new(),
            password: None,
            storage: None,
        }
    }
}

/// Per-dialect configuration table plus the shared storage directory that
/// database resets clean up.
///
/// The JSON form keeps dialect entries at the top level next to `directory`:
///
/// ```json
/// { "directory": "tmp", "postgres": { "host": "db", "port": 5432 } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(flatten)]
    pub dialects: BTreeMap<String, DialectConfig>,
}

fn default_directory() -> PathBuf {
    PathBuf::from(DEFAULT_DIRECTORY)
}

impl TestConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            dialects: BTreeMap::new(),
        }
    }

    pub fn with_dialect(mut self, name: impl Into<String>, entry: DialectConfig) -> Self {
        self.dialects.insert(name.into(), entry);
        self
    }

    /// Look up the entry for `name`. Absent keys are a configuration error.
    pub fn dialect(&self, name: &str) -> Result<&DialectConfig, BootstrapError> {
        self.dialects
            .get(name)
            .ok_or_else(|| BootstrapError::MissingDialectConfig {
                dialect: name.to_string(),
            })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, BootstrapError> {
        serde_json::from_str(raw)
            .map_err(|e| BootstrapError::config(format!("invalid config JSON: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BootstrapError::config(format!("failed to read config {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Built-in defaults for every known dialect, overridden from the process
    /// environment.
    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TestConfig::from_env`] with an explicit variable source.
    ///
    /// Each field reads `SEQ_<DIALECT>_<FIELD>` first, then `SEQ_<FIELD>`.
    /// Fields are `HOST`, `PORT`, `DB`, `USER`, `PW` and `STORAGE`; the
    /// storage directory comes from `SEQ_TMP_DIR`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BootstrapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let directory = lookup("SEQ_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_directory);

        let mut config = TestConfig::new(directory.clone());
        for (name, defaults) in builtin_defaults(&directory) {
            let var = |field: &str| {
                lookup(&format!("SEQ_{}_{field}", name.to_uppercase()))
                    .or_else(|| lookup(&format!("SEQ_{field}")))
            };

            let port = match var("PORT") {
                Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                    BootstrapError::config(format!("invalid port for {name}: '{raw}'"))
                })?),
                None => defaults.port,
            };

            let entry = DialectConfig {
                host: var("HOST").unwrap_or(defaults.host),
                port,
                database: var("DB").unwrap_or(defaults.database),
                username: var("USER").unwrap_or(defaults.username),
                password: var("PW").or(defaults.password),
                storage: var("STORAGE").map(PathBuf::from).or(defaults.storage),
            };
            config.dialects.insert(name.to_string(), entry);
        }

        Ok(config)
    }
}

fn builtin_defaults(directory: &Path) -> Vec<(&'static str, DialectConfig)> {
    let server = |dialect: Dialect, username: &str, password: &str| DialectConfig {
        port: dialect.default_port(),
        username: username.to_string(),
        password: Some(password.to_string()),
        ..DialectConfig::default()
    };

    vec![
        (
            Dialect::MariaDb.as_str(),
            server(Dialect::MariaDb, "sequelize_test", "sequelize_test"),
        ),
        (
            MSSQL,
            DialectConfig {
                host: "localhost".to_string(),
                port: Some(1433),
                username: "SA".to_string(),
                password: Some("Password12!".to_string()),
                ..DialectConfig::default()
            },
        ),
        (
            Dialect::MySql.as_str(),
            server(Dialect::MySql, "sequelize_test", "sequelize_test"),
        ),
        (
            Dialect::Postgres.as_str(),
            server(Dialect::Postgres, "sequelize_test", "sequelize_test"),
        ),
        (
            Dialect::Sqlite.as_str(),
            DialectConfig {
                storage: Some(directory.join("db.sqlite")),
                ..DialectConfig::default()
            },
        ),
    ]
}
