use clap::{Parser, Subcommand};
use colored::*;
use std::io;
use std::process;
use std::sync::Arc;
use vending_cli::{commands, logging};
use vending_tokens::{
    AppId, EnglishCatalog, GatewayConfig, HttpTokenGateway, ListController, TokenId,
    VendingConfig,
};

#[derive(Parser)]
#[command(name = "vending")]
#[command(about = "Manage the ownership tokens of a Flathub application")]
#[command(version)]
struct Cli {
    /// Vending API base URL (overrides VENDING_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface
    Tui {
        /// Application ID, e.g. org.example.App
        #[arg(long)]
        app_id: String,
    },
    /// List ownership tokens
    List {
        #[arg(long)]
        app_id: String,
    },
    /// Create an ownership token and print its secret
    Create {
        #[arg(long)]
        app_id: String,
        /// Name of the new token
        #[arg(short, long)]
        name: String,
    },
    /// Cancel an ownership token
    Revoke {
        #[arg(long)]
        app_id: String,
        /// ID of the token to cancel
        #[arg(long)]
        token_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = VendingConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config.gateway.api_url = GatewayConfig::new(api_url)?.api_url;
    }

    match &cli.command {
        Commands::Tui { .. } => {
            if let Some(path) = &config.log_file {
                logging::init_file(path)?;
            }
        }
        _ => logging::init_stderr(),
    }

    tracing::debug!(api_url = %config.gateway.api_url, "Using vending API");

    let gateway = HttpTokenGateway::new(&config.gateway)?;
    let mut controller =
        ListController::new(Arc::new(gateway)).with_action_errors(config.action_errors);
    let catalog = EnglishCatalog;
    let mut stdout = io::stdout();

    match cli.command {
        Commands::Tui { app_id } => start_tui(controller, AppId::from(app_id)).await,
        Commands::List { app_id } => {
            commands::list(&mut controller, AppId::from(app_id), &catalog, &mut stdout).await
        }
        Commands::Create { app_id, name } => {
            commands::create(&mut controller, AppId::from(app_id), &name, &catalog, &mut stdout)
                .await
        }
        Commands::Revoke { app_id, token_id } => {
            commands::revoke(
                &mut controller,
                AppId::from(app_id),
                TokenId::from(token_id),
                &catalog,
                &mut stdout,
            )
            .await
        }
    }
}

async fn start_tui(controller: ListController, app_id: AppId) -> anyhow::Result<()> {
    use crossterm::{execute, terminal};

    let mut app = vending_tui::App::new(controller, app_id);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if there was an error
    let cleanup_result = (|| -> anyhow::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    })();

    if let Err(cleanup_error) = cleanup_result {
        eprintln!("Terminal cleanup error: {}", cleanup_error);
    }

    result
}
