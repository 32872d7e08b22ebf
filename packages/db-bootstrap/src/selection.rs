use std::fmt;

use crate::dialect::{Dialect, DEFAULT_DIALECT, POSTGRES_NATIVE};
use crate::error::BootstrapError;

/// Environment variable naming the dialect under test.
pub const DIALECT_ENV: &str = "DIALECT";

/// Raw environment inputs consulted by the connection factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Unnormalized `DIALECT` value, e.g. `postgres-native` or `mssql`.
    pub dialect: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            dialect: std::env::var(DIALECT_ENV).ok(),
        }
    }

    pub fn with_dialect(dialect: impl Into<String>) -> Self {
        Self {
            dialect: Some(dialect.into()),
        }
    }

    pub(crate) fn is(&self, name: &str) -> bool {
        self.dialect.as_deref() == Some(name)
    }
}

/// The dialect a test suite runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestDialect {
    pub dialect: Dialect,
    /// Selected through the native-protocol spelling.
    pub native: bool,
}

impl TestDialect {
    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::resolve(std::env::var(DIALECT_ENV).ok().as_deref())
    }

    /// Resolve a raw `DIALECT` value, defaulting to mysql when unset.
    pub fn resolve(raw: Option<&str>) -> Result<Self, BootstrapError> {
        let raw = raw.unwrap_or(DEFAULT_DIALECT);
        if raw == POSTGRES_NATIVE {
            return Ok(Self {
                dialect: Dialect::Postgres,
                native: true,
            });
        }

        let dialect = raw.parse::<Dialect>()?;
        Ok(Self {
            dialect,
            native: false,
        })
    }

    /// Dialect name as written in `DIALECT`, keeping the native spelling.
    pub fn name(&self) -> &'static str {
        if self.native {
            POSTGRES_NATIVE
        } else {
            self.dialect.as_str()
        }
    }

    pub fn label(&self) -> String {
        self.name().to_uppercase()
    }

    /// Heading prefix for test output, e.g. `[POSTGRES] Model`.
    pub fn teaser(&self, module_name: &str) -> String {
        format!("[{}] {module_name}", self.label())
    }
}

impl fmt::Display for TestDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
