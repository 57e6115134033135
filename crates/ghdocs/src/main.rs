//! ghdocs CLI - documentation page fetcher.
//!
//! Provides commands for:
//! - `page`: Print the markdown of a documentation page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::PageArgs;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ghdocs - documentation pages from a GitHub repository.
#[derive(Parser)]
#[command(name = "ghdocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the markdown of a documentation page.
    Page(PageArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Page(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Page(args) => args.execute(VERSION),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_page_command() {
        let cli = Cli::try_parse_from([
            "ghdocs",
            "page",
            "intro",
            "--section",
            "quickstart",
            "--branch",
            "develop",
            "--no-cache",
        ])
        .unwrap();

        let Commands::Page(args) = cli.command;
        assert_eq!(args.page, "intro");
        assert_eq!(args.section.as_deref(), Some("quickstart"));
        assert_eq!(args.branch.as_deref(), Some("develop"));
        assert!(args.no_cache);
        assert!(!args.verbose);
    }

    #[test]
    fn test_page_requires_name() {
        assert!(Cli::try_parse_from(["ghdocs", "page"]).is_err());
    }
}
