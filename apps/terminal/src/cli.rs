//! Command-line flags.

use clap::Parser;
use std::path::PathBuf;

/// Sale screen for Caja POS.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "caja", version, about = "Pantalla de venta de Caja POS")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Catalog server, overrides the config file and CAJA_BASE_URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Serve products from a built-in sample catalog instead of the server
    #[arg(long)]
    pub demo: bool,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "caja",
            "--config",
            "/tmp/caja.toml",
            "--base-url",
            "http://10.0.0.2:5000",
            "--demo",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/caja.toml")));
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.2:5000"));
        assert!(cli.demo);
        assert!(!cli.print_config);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["caja"]);
        assert!(cli.config.is_none());
        assert!(!cli.demo);
    }
}
