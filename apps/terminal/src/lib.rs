//! # Caja Terminal
//!
//! Line-oriented sale screen for Caja POS.
//!
//! ## Module Organization
//! ```text
//! caja_terminal/
//! ├── lib.rs      ◄─── You are here (startup & command loop)
//! ├── cli.rs      ◄─── clap flags
//! ├── config.rs   ◄─── PosConfig: file, env, validation
//! ├── session.rs  ◄─── Command parsing and routing
//! ├── panel.rs    ◄─── Summary panel (ledger listener)
//! ├── table.rs    ◄─── Sales table rendering
//! ├── alerts.rs   ◄─── Alert stack
//! └── error.rs    ◄─── UserMessage and AppError
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, so stdout stays the screen)
//! 2. Load configuration and apply flags
//! 3. Build the catalog client (HTTP, or in-memory with `--demo`)
//! 4. Create the session
//! 5. Read commands until `salir` or end of input

pub mod alerts;
pub mod cli;
pub mod config;
pub mod error;
pub mod panel;
pub mod session;
pub mod table;

use caja_catalog::{HttpCatalog, InMemoryCatalog, ProductCatalog};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use cli::Cli;
pub use config::{ConfigError, PosConfig};
pub use error::{AppError, ErrorCode, UserMessage};
pub use session::{Command, Reply, Session};

const PROMPT: &str = "caja> ";

/// Runs the sale screen on stdin/stdout.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = PosConfig::load(cli.config.clone())?;
    if let Some(url) = cli.base_url {
        config.catalog.base_url = url;
    }
    config.validate()?;

    if cli.print_config {
        let text = toml::to_string_pretty(&config)?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        return Ok(());
    }

    let catalog: Arc<dyn ProductCatalog> = if cli.demo {
        info!("Using the built-in sample catalog");
        Arc::new(InMemoryCatalog::demo())
    } else {
        info!(base_url = %config.catalog.base_url, "Using the catalog server");
        Arc::new(HttpCatalog::new(config.catalog.clone())?)
    };

    let mut session = Session::new(catalog, &config);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    drive(&mut session, stdin, tokio::io::stdout()).await?;

    info!("Sale screen closed");
    Ok(())
}

/// Feeds lines from `input` to the session and writes replies to `output`.
///
/// Stops at `salir` or end of input.
pub async fn drive<R, W>(session: &mut Session, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output.write_all(session.panel().render().as_bytes()).await?;
    output.write_all(b"\n").await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match session.handle_line(&line).await {
            Reply::Output(text) if text.is_empty() => {}
            Reply::Output(text) => {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            Reply::Quit => break,
        }
    }

    output.flush().await
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=caja=trace` - Show trace for caja crates only
/// - Default: INFO, with debug for caja crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caja=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
