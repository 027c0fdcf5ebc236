use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use notion_provisioner::{config, report, Config, NotionSession, Provisioner};
use tracing_subscriber::EnvFilter;

// Creates the Commands database under NOTION_PARENT_PAGE_ID and writes its id to
// notion_db_ids.json. Every successful run creates a new database.

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let opts: Opts = Opts::parse();
    init_tracing();

    if !opts.no_dotenv {
        config::load_dotenv();
    }
    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let api = Arc::new(NotionSession::try_new(&config)?);
    let mut builder = Provisioner::builder();
    builder.api(api).output_path(opts.output);
    if let Some(title) = opts.title {
        builder.title(title);
    }
    if let Some(icon) = opts.icon {
        builder.icon(icon);
    }
    let provisioner = builder.build()?;

    if opts.dry_run {
        let request = provisioner.plan(&config.credentials()?);
        println!("{}", report::dry_run(&request)?);
        return Ok(());
    }

    println!("{}", report::header());
    let outcome = provisioner
        .run(&config)
        .await
        .context("Failed to provision the Commands database")?;
    println!("{}", report::summary(&outcome));

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notion_provisioner=info,notion_setup=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Parser, Debug)]
#[command(version, about = "Create the Commands database in Notion")]
struct Opts {
    /// Where to write the database id
    #[arg(short, long, default_value = notion_provisioner::provisioner::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Database title
    #[arg(long)]
    title: Option<String>,

    /// Database icon (an emoji)
    #[arg(long)]
    icon: Option<String>,

    /// Print the request that would be sent and exit
    #[arg(long)]
    dry_run: bool,

    /// Do not load a .env file
    #[arg(long)]
    no_dotenv: bool,
}
