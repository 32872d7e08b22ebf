use std::fmt;
use std::str::FromStr;

use sea_orm::DatabaseBackend;

use crate::error::BootstrapError;

/// Spelling of the native-protocol Postgres variant accepted in `DIALECT`.
pub const POSTGRES_NATIVE: &str = "postgres-native";

/// Dialect used when neither the caller nor `DIALECT` names one.
pub(crate) const DEFAULT_DIALECT: &str = "mysql";

/// Enterprise backend that has connection settings but no client backend.
pub const MSSQL: &str = "mssql";

/// Backends the database client ships support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dialect {
    MariaDb,
    MySql,
    Postgres,
    Sqlite,
}

// Sorted by name.
const SUPPORTED: [Dialect; 4] = [
    Dialect::MariaDb,
    Dialect::MySql,
    Dialect::Postgres,
    Dialect::Sqlite,
];

pub fn supported_dialects() -> &'static [Dialect] {
    &SUPPORTED
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::MariaDb => "mariadb",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// The sea-orm backend used to talk to this dialect.
    pub fn backend(self) -> DatabaseBackend {
        match self {
            Dialect::MariaDb | Dialect::MySql => DatabaseBackend::MySql,
            Dialect::Postgres => DatabaseBackend::Postgres,
            Dialect::Sqlite => DatabaseBackend::Sqlite,
        }
    }

    /// Port used when neither the config file nor the environment sets one.
    /// `None` for file-backed dialects.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Dialect::MariaDb => Some(3306),
            Dialect::MySql => Some(3306),
            Dialect::Postgres => Some(5432),
            Dialect::Sqlite => None,
        }
    }

    /// URL scheme understood by the sqlx drivers behind sea-orm.
    pub(crate) fn url_scheme(self) -> &'static str {
        match self {
            Dialect::MariaDb | Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| BootstrapError::UnknownDialect {
                value: s.to_string(),
            })
    }
}
