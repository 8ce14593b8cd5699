use crate::offline::{run_browse, run_sitemap, BrowseArgs, SitemapArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sqft_listings::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sqft listings",
    about = "Serve and inspect the sqft by PD property listings catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Filter and sort a CSV export of listings without starting the server
    Browse(BrowseArgs),
    /// Print the sitemap for a CSV export of listings
    Sitemap(SitemapArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store from a listings CSV export
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Browse(args) => run_browse(args),
        Command::Sitemap(args) => run_sitemap(args),
    }
}
