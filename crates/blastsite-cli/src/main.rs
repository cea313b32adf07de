mod assets;
mod call;
mod embeds;
mod head;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blastsite-cli")]
#[command(about = "Blastsite page metadata and integration tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the managed head and headings for a page path
    Head {
        /// Page path, e.g. /services
        path: String,
        /// Skip the metadata lookup and render from local props and defaults
        #[arg(long)]
        offline: bool,
    },
    /// Log a tracked call and print the dial link
    Call {
        /// Where on the page the button sits (e.g. header, hero)
        #[arg(long, default_value = "header")]
        location: String,
        /// Referrer to attach to the log entry
        #[arg(long, default_value = "")]
        referrer: String,
    },
    /// Print the lazy-loading variants for an image URL
    Image {
        url: String,
        #[arg(long, default_value = "1200")]
        width: u32,
        #[arg(long, default_value = "800")]
        height: u32,
    },
    /// Mount the lead-capture form through its bridge and print the create call
    Form {
        /// Selector of the form mount point
        #[arg(long, default_value = "#quote-form")]
        target: String,
    },
    /// Draw the service-area map through its bridge and print each call
    Map {
        /// Id of the map container element
        #[arg(long, default_value = "service-map")]
        container: String,
    },
    /// Load and validate the site profile
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = blastsite_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Head { path, offline } => head::run_head(&config, &path, offline).await?,
        Commands::Call { location, referrer } => {
            call::run_call(&config, &location, &referrer).await?;
        }
        Commands::Image { url, width, height } => {
            assets::run_image(&config, &url, width, height);
        }
        Commands::Form { target } => embeds::run_form(&config, &target).await?,
        Commands::Map { container } => embeds::run_map(&config, &container)?,
        Commands::Validate => run_validate(&config)?,
    }

    Ok(())
}

fn run_validate(config: &blastsite_core::AppConfig) -> anyhow::Result<()> {
    let profile = blastsite_core::load_site_profile(&config.site_path)?;
    println!(
        "{}: {} page(s), {} review(s), {} service(s), form {}",
        profile.site.site_name,
        profile.pages.len(),
        profile.reviews.len(),
        profile.business.services.len(),
        if profile.form.is_some() {
            "configured"
        } else {
            "not configured"
        },
    );
    Ok(())
}
