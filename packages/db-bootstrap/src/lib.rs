//! Test environment bootstrapping for database-backed test suites.
//! Builds clients from a per-dialect config table, resets databases between
//! runs, and resolves which dialect a suite is running against.

pub mod client;
pub mod config;
pub mod dialect;
pub mod error;
pub mod expectations;
pub mod init;
pub mod reset;
pub mod selection;

pub use client::{create_client, ClientHandle, ClientOptions, ClientSettings, MssqlOptions};
pub use config::{DialectConfig, TestConfig};
pub use dialect::{supported_dialects, Dialect, MSSQL, POSTGRES_NATIVE};
pub use error::BootstrapError;
pub use expectations::check_match_for_dialects;
pub use init::{init_tests, InitHooks, TestDatabase};
pub use reset::{clear_database, clear_database_then, ResetReport, SchemaReset};
pub use selection::{EnvOverrides, TestDialect, DIALECT_ENV};
