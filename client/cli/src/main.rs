use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod actions;
mod api;
mod config;
mod error;
mod query;
mod sequence;
#[cfg(test)]
mod testing;
mod types;

use actions::Action;
use api::CatalogClient;
use config::Config;
use error::ErrorKind;
use query::ViewState;
use sequence::{ListingOutcome, Session};
use types::{FileEntry, ListingRequest, ListingResponse};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Browse a remote photo and product catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ListingArgs {
    /// Page number (1-based)
    #[arg(long, short, default_value_t = 1)]
    page: u64,
    /// Search text
    #[arg(long, short, default_value = "")]
    query: String,
    /// Only items with stock available
    #[arg(long)]
    in_stock: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of the catalog
    List {
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Run an action on an entry of a listing page
    Get {
        action: Action,
        /// Entry file name
        name: String,
        #[command(flatten)]
        listing: ListingArgs,
        /// Directory for downloaded files
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
    },
    /// Write the configuration file
    Setup {
        /// API base URL
        #[arg(long)]
        url: String,
        /// Deployment has no stock filter
        #[arg(long)]
        no_stock_filter: bool,
        /// Actions to turn off
        #[arg(long, value_delimiter = ',')]
        disable: Vec<Action>,
    },
    /// Show effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Setup {
            url,
            no_stock_filter,
            disable,
        } => {
            setup(&url, no_stock_filter, &disable)?;
        }
        Commands::Config => {
            show_config()?;
        }
        Commands::List { listing } => {
            let config = Config::load()?;
            list(&config, &listing).await?;
        }
        Commands::Get {
            action,
            name,
            listing,
            output,
        } => {
            let config = Config::load()?;
            get(&config, action, &name, &listing, &output).await?;
        }
    }

    Ok(())
}

fn setup(url: &str, no_stock_filter: bool, disable: &[Action]) -> anyhow::Result<()> {
    let path = Config::config_path()?;
    let mut config = Config::load_from(&path)?;
    config.apply_base_url(url)?;
    config.stock_filter_enabled = !no_stock_filter;
    for action in Action::ALL {
        config.enabled_actions.set(action, !disable.contains(&action));
    }
    config.save_to(&path)?;

    println!("saved {}", path.display());
    Ok(())
}

fn show_config() -> anyhow::Result<()> {
    let config = Config::load()?;
    println!("config: {}", Config::config_path()?.display());
    println!("api: {}", config.endpoint_base_url);
    println!(
        "stock filter: {}",
        if config.stock_filter_enabled { "on" } else { "off" }
    );
    println!("timeout: {}s", config.timeout_secs);
    let enabled: Vec<_> = config
        .enabled_actions
        .iter_enabled()
        .map(action_name)
        .collect();
    println!("actions: {}", enabled.join(", "));
    Ok(())
}

fn action_name(action: Action) -> String {
    action
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_else(|| format!("{:?}", action))
}

/// Fetch the page described by `args`. Prior output is never reused: on error
/// nothing from an earlier listing is shown.
async fn load_page(config: &Config, args: &ListingArgs) -> anyhow::Result<(Session, ListingResponse)> {
    if args.in_stock && !config.stock_filter_enabled {
        tracing::warn!("stock filter is disabled for this deployment; ignoring --in-stock");
    }

    let requested = ListingRequest::new(args.page, args.query.as_str(), args.in_stock)?;
    let view = ViewState::default()
        .with_query(requested.query)
        .with_stock_filter(requested.in_stock)
        .go_to(requested.page);

    let session = Session::new(CatalogClient::new(config)?, config.stock_filter_enabled);
    let outcome = match session.load(&view).await {
        Ok(Some(outcome)) => outcome,
        Ok(None) => anyhow::bail!("listing request was superseded"),
        Err(err) => {
            tracing::debug!(status = ?err.status(), kind = ?err.kind(), "listing failed");
            if err.kind() == ErrorKind::Transport {
                anyhow::bail!("cannot reach {}: {}", session.client().base_url(), err);
            }
            return Err(anyhow::anyhow!(err.message()));
        }
    };

    let resp = match outcome {
        ListingOutcome::Results(resp) => resp,
        ListingOutcome::NoResults {
            current_page,
            total_pages,
        } => ListingResponse {
            files: vec![],
            current_page,
            total_pages,
            total_files: Some(0),
        },
    };
    Ok((session, resp))
}

async fn list(config: &Config, args: &ListingArgs) -> anyhow::Result<()> {
    let (_, resp) = load_page(config, args).await?;

    if resp.is_empty() {
        println!("no results");
        return Ok(());
    }

    for file in &resp.files {
        let price = file.price.as_ref().map(|p| p.to_string()).unwrap_or_default();
        println!(
            "{:>6}  {:>12}  {}  ({})",
            format_stock(file.stock),
            price,
            file.label(),
            file.name
        );
    }

    let view = ViewState::default().reconcile(&resp);
    let mut footer = format!("page {} of {}", view.page(), view.total_pages());
    if let Some(total) = resp.total_files {
        footer.push_str(&format!(", {} items", total));
    }
    println!("{}", footer);
    if resp.has_prev() {
        println!("prev: --page {}", view.prev_page().page());
    }
    if resp.has_next() {
        println!("next: --page {}", view.next_page().page());
    }

    Ok(())
}

async fn get(
    config: &Config,
    action: Action,
    name: &str,
    args: &ListingArgs,
    output: &Path,
) -> anyhow::Result<()> {
    if !config.enabled_actions.is_enabled(action) {
        anyhow::bail!("action '{}' is disabled for this deployment", action_name(action));
    }

    let (session, resp) = load_page(config, args).await?;
    let entry = resp.find(name).ok_or_else(|| {
        anyhow::anyhow!(
            "'{}' not found on page {} of {}",
            name,
            resp.current_page,
            resp.total_pages
        )
    })?;

    if action.is_binary() {
        let client = session.client();
        let data = match action {
            Action::Download => client.download(entry).await?,
            _ => client.fetch_preview(entry).await?,
        };
        let path = save_file(output, entry, &data)?;
        println!("{}  {}", format_size(data.len() as u64), path.display());
        return Ok(());
    }

    match action.text_payload(entry) {
        Some(text) => println!("{}", text),
        None if action.needs_price() => anyhow::bail!("'{}' has no price", entry.name),
        None => anyhow::bail!("nothing to copy for '{}'", entry.name),
    }
    Ok(())
}

fn save_file(dir: &Path, entry: &FileEntry, data: &[u8]) -> anyhow::Result<PathBuf> {
    // entry names come from the server; keep only the final component
    let file_name = Path::new(&entry.name)
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid file name: {}", entry.name))?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, data)?;
    Ok(path)
}

fn format_stock(stock: Option<u64>) -> String {
    match stock {
        None => "?".to_string(),
        Some(0) => "out".to_string(),
        Some(n) => n.to_string(),
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
