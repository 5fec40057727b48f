//! songshelf - manage imported music playlists from the terminal.
//!
//! Each subcommand opens one page: it runs the page's auth check, performs
//! the action, and then follows wherever the page navigated (the dashboard
//! after signing in, the login hint after the session ends).

mod ui;

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use songshelf_core::navigation::PlaylistId;
use songshelf_core::pages::playlist_detail::INVALID_PLAYLIST_ID;
use songshelf_core::pages::{
    init_page, DashboardPage, LoginPage, PlaylistDetailPage, RegisterPage, SearchPage,
};
use songshelf_core::{AppContext, Config, NavigationLog, PageError, Route, View};

use ui::styles;
use ui::terminal::{prompt_line, TerminalView};

/// Log file name prefix inside the configured log directory
const LOG_FILE_PREFIX: &str = "songshelf.log";

#[derive(Parser, Debug)]
#[command(name = "songshelf")]
#[command(about = "Import, browse and export your music playlists")]
#[command(version)]
struct Cli {
    /// Backend API base URL, overriding the config file
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and show the dashboard
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List your playlists
    Dashboard,
    /// Import a playlist from the remote music service by its id
    Import { remote_id: String },
    /// Delete one of your playlists
    Delete {
        id: PlaylistId,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Search playlists on the remote music service
    Search {
        keyword: String,
        /// Import this result after searching
        #[arg(long, value_name = "REMOTE_ID")]
        import: Option<String>,
    },
    /// Show a playlist and its songs
    Show { id: String },
    /// Export a playlist, or the whole library, as a text file
    Export {
        #[arg(required_unless_present = "all")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
}

/// Initialize the tracing subscriber for logging
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=songshelf_core=debug).
/// With a log directory configured, a daily rolling file is written as well;
/// the returned guard must live until exit so buffered lines are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(ref url) = cli.base_url {
        config.base_url = url.clone();
    }

    let _log_guard = init_tracing(config.log_dir.as_deref());
    info!(base_url = %config.base_url, "songshelf starting");

    let navigator = Arc::new(NavigationLog::new());
    let ctx = AppContext::from_config(&config, navigator.clone())?;
    let assume_yes = matches!(cli.command, Commands::Delete { yes: true, .. });
    let view = TerminalView::new(assume_yes);

    let code = match run(&cli.command, &ctx, &view, &config).await {
        Ok(code) => code,
        Err(e) => {
            // Page errors have already been shown
            if e.downcast_ref::<PageError>().is_none() {
                view.show_error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    };

    follow_navigation(&ctx, &view, &navigator).await;
    Ok(code)
}

async fn run(
    command: &Commands,
    ctx: &AppContext,
    view: &TerminalView,
    config: &Config,
) -> Result<ExitCode> {
    match command {
        Commands::Login { username } => {
            init_page(ctx, Route::Login, view);
            let username = match username {
                Some(username) => username.clone(),
                None => prompt_line("Username: ", config.last_username.as_deref())?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            LoginPage::new(ctx, view).submit(&username, &password).await?;
            remember_username(&username);
        }

        Commands::Register { username, email } => {
            init_page(ctx, Route::Register, view);
            let username = match username {
                Some(username) => username.clone(),
                None => prompt_line("Username: ", None)?,
            };
            let email = match email {
                Some(email) => email.clone(),
                None => prompt_line("Email: ", None)?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            let confirm = rpassword::prompt_password("Confirm password: ")?;
            RegisterPage::new(ctx, view)
                .submit(&username, &email, &password, &confirm)
                .await?;
        }

        Commands::Logout => {
            ctx.logout()?;
            println!("{}", styles::success("Signed out."));
        }

        Commands::Whoami => {
            let session = ctx.session.snapshot();
            if session.is_authenticated() {
                println!(
                    "Signed in as {} at {}",
                    styles::highlight(&ctx.session.display_name_or_default()),
                    config.base_url
                );
            } else {
                println!("{}", styles::muted("Not signed in."));
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Dashboard => {
            if !init_page(ctx, Route::Dashboard, view) {
                return Ok(ExitCode::FAILURE);
            }
            DashboardPage::new(ctx, view).init().await?;
        }

        Commands::Import { remote_id } => {
            if !init_page(ctx, Route::Dashboard, view) {
                return Ok(ExitCode::FAILURE);
            }
            DashboardPage::new(ctx, view)
                .import_playlist(remote_id)
                .await?;
        }

        Commands::Delete { id, .. } => {
            if !init_page(ctx, Route::Dashboard, view) {
                return Ok(ExitCode::FAILURE);
            }
            if !DashboardPage::new(ctx, view).request_delete(*id).await? {
                println!("{}", styles::muted("Cancelled."));
            }
        }

        Commands::Search { keyword, import } => {
            if !init_page(ctx, Route::Search, view) {
                return Ok(ExitCode::FAILURE);
            }
            let page = SearchPage::new(ctx, view);
            page.perform_search(keyword).await?;
            if let Some(remote_id) = import {
                page.import_playlist(remote_id).await?;
            }
        }

        Commands::Show { id } => {
            let route = Route::PlaylistDetail(
                PlaylistDetailPage::parse_id(Some(id)).unwrap_or_default(),
            );
            if !init_page(ctx, route, view) {
                return Ok(ExitCode::FAILURE);
            }
            PlaylistDetailPage::new(ctx, view).init(Some(id)).await?;
        }

        Commands::Export { all: true, .. } => {
            if !init_page(ctx, Route::Dashboard, view) {
                return Ok(ExitCode::FAILURE);
            }
            DashboardPage::new(ctx, view).export_all().await?;
        }

        Commands::Export { id, all: false } => {
            let Some(id) = PlaylistDetailPage::parse_id(id.as_deref()) else {
                view.show_error(INVALID_PLAYLIST_ID);
                return Err(PageError::Validation(INVALID_PLAYLIST_ID.to_string()).into());
            };
            if !init_page(ctx, Route::PlaylistDetail(id), view) {
                return Ok(ExitCode::FAILURE);
            }
            PlaylistDetailPage::new(ctx, view).export(id).await?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Store the username for the next login prompt. Reads the file afresh so
/// command-line and environment overrides are not written back.
fn remember_username(username: &str) {
    let result = Config::load_file().and_then(|mut stored| {
        stored.last_username = Some(username.to_string());
        stored.save()
    });
    if let Err(e) = result {
        warn!(error = %e, "Failed to save last username");
    }
}

/// What the terminal does with a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowUp {
    ShowDashboard,
    LoginHint,
    Ignore,
}

fn follow_up(route: Route) -> FollowUp {
    match route {
        Route::Dashboard => FollowUp::ShowDashboard,
        Route::Login => FollowUp::LoginHint,
        _ => FollowUp::Ignore,
    }
}

/// Render the page the last action navigated to, repeating while pages
/// navigate further. Returns the steps taken.
async fn follow_navigation(
    ctx: &AppContext,
    view: &TerminalView,
    navigator: &NavigationLog,
) -> Vec<FollowUp> {
    let mut steps = Vec::new();
    while let Some(route) = navigator.take_pending() {
        let step = follow_up(route);
        match step {
            FollowUp::ShowDashboard => {
                if init_page(ctx, Route::Dashboard, view) {
                    // Failures are shown by the page; a 401 queues the login hint
                    let _ = DashboardPage::new(ctx, view).init().await;
                }
            }
            FollowUp::LoginHint => {
                println!(
                    "{} {} {}",
                    styles::muted("Not signed in. Run"),
                    styles::key("songshelf login"),
                    styles::muted("to sign in."),
                );
            }
            FollowUp::Ignore => debug!(route = %route, "No terminal page for route"),
        }
        steps.push(step);
    }
    steps
}
