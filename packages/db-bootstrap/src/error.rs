use std::path::PathBuf;

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No configuration entry for dialect '{dialect}'")]
    MissingDialectConfig { dialect: String },

    #[error("The dialect you have passed is unknown. Did you really mean: {value}")]
    UnknownDialect { value: String },

    #[error("Dialect '{dialect}' has no backend in the database client")]
    UnsupportedBackend { dialect: String },

    #[error("failed to connect to {dialect}: {source}")]
    Connect {
        dialect: String,
        #[source]
        source: DbErr,
    },

    #[error("failed to drop all tables: {0}")]
    DropTables(#[source] DbErr),

    #[error("filesystem error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Undefined expectation for \"{dialect}\"!")]
    MissingExpectation { dialect: String },

    #[error("expected value for \"{dialect}\" to match /{pattern}/, got: {value}")]
    ExpectationMismatch {
        dialect: String,
        value: String,
        pattern: String,
    },
}

impl BootstrapError {
    pub fn config(message: impl Into<String>) -> Self {
        BootstrapError::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path_without_naming_an_operation() {
        let err = BootstrapError::Io {
            path: PathBuf::from("tmp/db.sqlite"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "filesystem error at tmp/db.sqlite: denied");
    }
}
