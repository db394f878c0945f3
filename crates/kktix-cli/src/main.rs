mod collect;
mod logging;
mod timeline;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kktix-orders")]
#[command(about = "Export KKTIX order history to JSON and a timeline page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in, collect every order, write the JSON file and the timeline
    Collect(CollectArgs),
    /// Rebuild the timeline page next to an existing orders JSON file
    Timeline {
        /// Path to an `orders_<timestamp>.json` file
        json: PathBuf,

        /// Do not open the page in the default browser
        #[arg(long)]
        no_open: bool,
    },
    /// Log in and save the first order-list page as HTML
    DumpPage,
}

#[derive(Debug, Default, Args)]
struct CollectArgs {
    /// Override `KKTIX_HEADLESS`
    #[arg(long)]
    headless: Option<bool>,

    /// Do not open registration pages for event times
    #[arg(long)]
    skip_details: bool,

    /// Write only the JSON file
    #[arg(long)]
    no_timeline: bool,

    /// Do not open the timeline in the default browser
    #[arg(long)]
    no_open: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = kktix_core::load_app_config()?;
    let _guard = logging::init_logging(&config.log_dir, config.debug)?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        None => collect::run_collect(&config, &CollectArgs::default()).await,
        Some(Commands::Collect(args)) => collect::run_collect(&config, &args).await,
        Some(Commands::Timeline { json, no_open }) => {
            let html = timeline::rebuild_timeline(&json)?;
            timeline::present_timeline(&html, no_open, webbrowser::open)?;
            Ok(())
        }
        Some(Commands::DumpPage) => {
            collect::run_dump_page(&config).await?;
            Ok(())
        }
    }
}
