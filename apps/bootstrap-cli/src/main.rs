use std::path::PathBuf;

use clap::{Parser, Subcommand};
use db_bootstrap::{
    clear_database, create_client, supported_dialects, BootstrapError, ClientOptions,
    EnvOverrides, TestConfig, TestDialect,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "db-bootstrap")]
#[command(about = "Test database bootstrap tool")]
struct Args {
    /// JSON config table; defaults to SEQ_* environment variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the dialect selected by DIALECT
    Dialect,
    /// Print a test heading prefixed with the selected dialect
    Teaser { module: String },
    /// List the dialects the database client supports
    Supported,
    /// Drop all tables and clean the storage directory
    Reset {
        /// Dialect key in the config table; defaults to the DIALECT selection
        #[arg(short, long)]
        dialect: Option<String>,
        /// Enable driver statement logging
        #[arg(long)]
        logging: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_env_filter("db_bootstrap=info,sqlx=warn")
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("bootstrap=failed err={}", e);
        eprintln!("db-bootstrap failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), BootstrapError> {
    match args.command {
        Command::Dialect => {
            println!("{}", TestDialect::from_env()?.dialect);
        }
        Command::Teaser { module } => {
            println!("{}", TestDialect::from_env()?.teaser(&module));
        }
        Command::Supported => {
            for dialect in supported_dialects() {
                println!("{dialect}");
            }
        }
        Command::Reset { dialect, logging } => {
            let config = match &args.config {
                Some(path) => TestConfig::load(path)?,
                None => TestConfig::from_env()?,
            };
            let dialect = match dialect {
                Some(name) => name,
                None => TestDialect::from_env()?.dialect.to_string(),
            };

            info!(
                "bootstrap=reset dialect={} directory={}",
                dialect,
                config.directory.display()
            );
            let options = ClientOptions::for_dialect(dialect).logging(logging);
            let client = create_client(&config, &options, &EnvOverrides::from_env())?;
            let conn = client.connect().await?;
            let report = clear_database(&conn, &config.directory).await?;

            println!(
                "reset {} ({}): removed {} file(s) from {}",
                client.dialect,
                client.sanitized_url()?,
                report.removed.len(),
                config.directory.display()
            );
            for path in &report.removed {
                println!("  {}", path.display());
            }
        }
    }
    Ok(())
}
