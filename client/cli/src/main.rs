use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod chart;
mod config;
mod dashboard;
mod error;
mod file_manager;
mod page;
mod share;
#[cfg(test)]
mod testing;

use api::types::ItemId;
use api::ApiClient;
use config::Config;
use dashboard::Dashboard;
use file_manager::FileManager;
use page::{ids, paint, Page};
use share::ShareOptions;

#[derive(Parser)]
#[command(name = "teltech")]
#[command(about = "TelTech file manager client", long_about = None)]
struct Cli {
    /// Backend URL, overriding the config file
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save connection settings (pass --server to set the backend)
    Setup {
        /// Public origin used in share links
        #[arg(long)]
        origin: Option<String>,
        /// Base URL serving chart series
        #[arg(long)]
        metrics: Option<String>,
    },
    /// Show current settings
    Status,
    /// Show summary counters and charts
    Dashboard,
    /// List folders and files
    Ls,
    /// Create a folder
    Mkdir {
        name: String,
    },
    /// Upload a local file
    Upload {
        path: PathBuf,
    },
    /// Generate a share link for a file
    Share {
        /// File id from `ls`
        id: ItemId,
        /// read or write
        #[arg(long, default_value = "read")]
        access: String,
        /// Expiration, YYYY-MM-DDTHH:MM:SS or RFC 3339
        #[arg(long, default_value = "")]
        expires: String,
        /// Password protecting the link
        #[arg(long, conflicts_with = "password_prompt")]
        password: Option<String>,
        /// Read the password from the terminal without echo
        #[arg(long)]
        password_prompt: bool,
    },
    /// Rename a folder
    Rename {
        folder_id: ItemId,
        new_name: String,
    },
    /// Delete a folder and its contents
    Rmdir {
        folder_id: ItemId,
    },
    /// Download a file by its server path
    Download {
        file_path: String,
        /// Destination (defaults to the file's name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch the file behind a share link
    OpenShare {
        /// Share token or full share URL
        link: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teltech=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.server_url = Some(server);
    }

    let ok = match cli.command {
        Commands::Setup { origin, metrics } => {
            setup(config, origin, metrics).await?;
            true
        }
        Commands::Status => {
            status(&config)?;
            true
        }
        Commands::Dashboard => dashboard(&config).await?,
        command => file_manager(&config, command).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn setup(
    mut config: Config,
    origin: Option<String>,
    metrics: Option<String>,
) -> anyhow::Result<()> {
    if origin.is_some() {
        config.origin = origin;
    }
    if metrics.is_some() {
        config.metrics_url = metrics;
    }
    // validates server/origin before anything is written
    let share_origin = config.share_origin()?;
    config.save()?;
    println!("saved {}", Config::config_path()?.display());
    println!("share links: {}/file/share/<token>", share_origin);

    let client = ApiClient::new(config.server_url()?);
    match client.get_summary().await {
        Ok(_) => println!("server: reachable"),
        Err(e) => println!("server: unreachable ({})", e),
    }
    Ok(())
}

fn status(config: &Config) -> anyhow::Result<()> {
    match &config.server_url {
        Some(server) => {
            println!("server: {}", server);
            println!("origin: {}", config.share_origin()?);
            println!(
                "charts: {}",
                config.metrics_url.as_deref().unwrap_or("sample data")
            );
        }
        None => {
            println!("not configured");
            println!("run: teltech setup --server <url>");
        }
    }
    Ok(())
}

fn print_page(page: &Mutex<Page>) -> anyhow::Result<()> {
    paint(page, |p| p.render(&mut io::stdout().lock()))?;
    Ok(())
}

async fn dashboard(config: &Config) -> anyhow::Result<bool> {
    let page = Arc::new(Mutex::new(Page::dashboard()));
    let controller = Dashboard::new(ApiClient::new(config.server_url()?), page.clone())
        .with_metrics_url(config.metrics_url.clone());

    let result = controller.load().await;
    print_page(&page)?;
    Ok(result.is_ok())
}

async fn file_manager(config: &Config, command: Commands) -> anyhow::Result<bool> {
    let page = Arc::new(Mutex::new(Page::file_manager()));
    let controller = FileManager::new(
        ApiClient::new(config.server_url()?),
        page.clone(),
        &config.share_origin()?,
    );

    let ok = match command {
        Commands::Ls => controller.load_listing().await.is_ok(),
        Commands::Mkdir { name } => {
            paint(&page, |p| p.set_input(ids::FOLDER_NAME, &name));
            controller.submit_create_folder().await.is_ok()
        }
        Commands::Upload { path } => {
            paint(&page, |p| p.set_input(ids::FILE_UPLOAD, &path.to_string_lossy()));
            controller.submit_upload().await.is_ok()
        }
        Commands::Share {
            id,
            access,
            expires,
            password,
            password_prompt,
        } => {
            let password = match (password, password_prompt) {
                (_, true) => rpassword::prompt_password("Share password (blank for none): ")?,
                (Some(password), false) => password,
                (None, false) => String::new(),
            };
            let options = ShareOptions::parse(&access, &expires, &password)?;
            controller.request_share(&id, options).await.is_ok()
        }
        Commands::Rename {
            folder_id,
            new_name,
        } => controller.rename_folder(&folder_id, &new_name).await.is_ok(),
        Commands::Rmdir { folder_id } => controller.delete_folder(&folder_id).await.is_ok(),
        Commands::Download { file_path, output } => {
            let dest = output.unwrap_or_else(|| default_download_name(&file_path));
            controller.download_file(&file_path, &dest).await.is_ok()
        }
        Commands::OpenShare {
            link,
            password,
            output,
        } => controller
            .open_share(&link, password.as_deref(), &output)
            .await
            .is_ok(),
        Commands::Setup { .. } | Commands::Status | Commands::Dashboard => {
            unreachable!("handled in main")
        }
    };

    print_page(&page)?;
    Ok(ok)
}

fn default_download_name(file_path: &str) -> PathBuf {
    Path::new(file_path)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("download"))
}
