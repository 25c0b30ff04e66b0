use anyhow::Result;
use clap::Parser;
use descriptor_index::cli::{self, Cli};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // stdout carries JSON output and the MCP transport; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("descriptor_index=debug,tower_http=debug")
        } else {
            EnvFilter::new("descriptor_index=info")
        }
    });
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();

    cli::run(args).await
}
