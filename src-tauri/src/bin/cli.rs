//! pdf-unlocker CLI - unlock password-protected PDFs from the terminal
//!
//! Usage: pdf-unlocker-cli [OPTIONS] <COMMAND>
//!
//! Drives the same form controller as the desktop app: the file argument
//! stands in for a drop, the password flag for the password field.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pdf_unlocker_lib::api::v1::UnlockApiV1;
use pdf_unlocker_lib::api::UnlockApi;
use pdf_unlocker_lib::error::AppError;
use pdf_unlocker_lib::logging;
use pdf_unlocker_lib::models::settings::AppSettings;
use pdf_unlocker_lib::services::delivery::{DeliveredArtifact, Platform, PlatformDelivery, SystemViewer};
use pdf_unlocker_lib::services::dropped_files;
use pdf_unlocker_lib::services::notifier::ConsoleNotifier;
use pdf_unlocker_lib::services::unlock_form::{SubmitOutcome, UnlockForm};
use pdf_unlocker_lib::storage::settings;

#[derive(Parser)]
#[command(name = "pdf-unlocker-cli", version, about = "Unlock password-protected PDF files")]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a PDF and its password to the unlock service
    Unlock {
        /// The protected PDF
        file: PathBuf,
        #[arg(short, long)]
        password: String,
        /// Unlock service base URL
        #[arg(long)]
        server: Option<String>,
        /// Directory for the unlocked download
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// User agent used for the mobile/desktop delivery check
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// Check whether the unlock service answers
    Health {
        #[arg(long)]
        server: Option<String>,
    },
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    SetServer { url: String },
    SetDownloadDir { dir: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings_path = cli.settings.unwrap_or_else(settings::default_settings_path);
    match run(cli.command, settings_path).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, settings_path: PathBuf) -> Result<ExitCode, AppError> {
    let mut app_settings = settings::get_settings(&settings_path)?;

    match command {
        Commands::Unlock {
            file,
            password,
            server,
            out,
            user_agent,
        } => {
            if let Some(server) = server {
                app_settings.server_url = server;
            }
            if let Some(out) = out {
                app_settings.download_dir = Some(out);
            }
            if user_agent.is_some() {
                app_settings.user_agent = user_agent;
            }
            unlock(file, password, &app_settings).await
        }
        Commands::Health { server } => {
            if let Some(server) = server {
                app_settings.server_url = server;
            }
            let api = UnlockApiV1::from_settings(&app_settings)?;
            if api.check_health().await {
                println!("{} is up", api.base_url());
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{} is unreachable", api.base_url());
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    println!("# {}", settings_path.display());
                    println!("{}", serde_json::to_string_pretty(&app_settings)?);
                    return Ok(ExitCode::SUCCESS);
                }
                ConfigAction::SetServer { url } => {
                    // Fail early on a URL the client could never use.
                    UnlockApiV1::new(&url, None)?;
                    app_settings.server_url = url;
                }
                ConfigAction::SetDownloadDir { dir } => {
                    app_settings.download_dir = Some(dir);
                }
            }
            settings::save_settings(&settings_path, &app_settings)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn unlock(file: PathBuf, password: String, app_settings: &AppSettings) -> Result<ExitCode, AppError> {
    let api = UnlockApiV1::from_settings(app_settings)?;
    let platform = Platform::detect(app_settings.user_agent.as_deref());
    let delivery = PlatformDelivery::new(platform, app_settings.resolved_download_dir(), SystemViewer)?;
    let form = UnlockForm::new(api, delivery, ConsoleNotifier);

    let files = dropped_files::resolve_dropped_paths(vec![file]).await?;
    form.accept_dropped_files(files).await;
    form.set_password(password).await;

    match form.submit().await {
        SubmitOutcome::Unlocked { artifact, .. } => {
            match artifact {
                DeliveredArtifact::Downloaded { path } => println!("{}", path.display()),
                DeliveredArtifact::Opened { url } => {
                    println!("{}", url);
                    // The viewer reads the blob after we hand it over; the
                    // store releases it when the process ends.
                    wait_for_viewer().await;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

async fn wait_for_viewer() {
    eprintln!("Press Enter when done viewing...");
    let _ = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)
    })
    .await;
}
