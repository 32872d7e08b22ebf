use sea_orm::DatabaseConnection;
use tracing::info;

use crate::client::{create_client, ClientHandle, ClientOptions};
use crate::config::TestConfig;
use crate::error::BootstrapError;
use crate::reset::{clear_database, ResetReport};
use crate::selection::EnvOverrides;

/// A freshly reset database ready for a test suite.
#[derive(Debug)]
pub struct TestDatabase {
    pub client: ClientHandle,
    pub conn: DatabaseConnection,
    pub report: ResetReport,
}

type Hook = Box<dyn FnOnce(&TestDatabase) + Send>;

/// Callbacks run once the database has been reset, `before_complete` first.
#[derive(Default)]
pub struct InitHooks {
    before_complete: Option<Hook>,
    on_complete: Option<Hook>,
}

impl InitHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_complete<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&TestDatabase) + Send + 'static,
    {
        self.before_complete = Some(Box::new(hook));
        self
    }

    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&TestDatabase) + Send + 'static,
    {
        self.on_complete = Some(Box::new(hook));
        self
    }
}

/// Build a client, connect, reset the database, then run the hooks.
///
/// Hooks never run when any earlier step fails.
pub async fn init_tests(
    config: &TestConfig,
    options: &ClientOptions,
    env: &EnvOverrides,
    hooks: InitHooks,
) -> Result<TestDatabase, BootstrapError> {
    let client = create_client(config, options, env)?;
    let conn = client.connect().await?;
    let report = clear_database(&conn, &config.directory).await?;

    let db = TestDatabase {
        client,
        conn,
        report,
    };

    if let Some(hook) = hooks.before_complete {
        hook(&db);
    }
    if let Some(hook) = hooks.on_complete {
        hook(&db);
    }

    info!("init=done dialect={}", db.client.dialect);
    Ok(db)
}
