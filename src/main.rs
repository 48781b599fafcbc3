use anyhow::Result;
use cambio::core::log::init_logging;
use cambio::core::theme::Theme;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the converter dashboard
    Dashboard,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert; defaults to the last converted amount
        amount: Option<f64>,
        /// Source currency code
        from: Option<String>,
        /// Target currency code
        to: Option<String>,
    },
    /// Swap the source and target currencies and reconvert
    Swap,
    /// List all known exchange rates
    Rates,
    /// Render the one-month trend chart for a currency pair
    Chart {
        /// Source currency code
        from: Option<String>,
        /// Target currency code
        to: Option<String>,
    },
    /// Show recent currency news
    News,
    /// Manage favorite currencies
    #[command(subcommand)]
    Fav(FavCommands),
    /// Switch between the light and dark palette
    Theme {
        /// light or dark; toggles when omitted
        theme: Option<String>,
    },
    /// Set the display language
    Lang {
        /// Language code (en, es, fr, de); lists languages when omitted
        code: Option<String>,
    },
}

#[derive(Subcommand)]
enum FavCommands {
    /// Add or remove a currency from favorites
    Toggle { code: String },
    /// Add a currency to favorites
    Add { code: String },
    /// Remove a currency from favorites
    Remove { code: String },
    /// List favorite currencies
    List,
    /// Convert from a favorite currency
    Use { code: String },
}

fn to_app_command(cmd: Commands) -> Result<cambio::AppCommand> {
    use cambio::AppCommand;

    Ok(match cmd {
        Commands::Setup => unreachable!("Setup command should be handled separately"),
        Commands::Dashboard => AppCommand::Dashboard,
        Commands::Convert { amount, from, to } => AppCommand::Convert { amount, from, to },
        Commands::Swap => AppCommand::Swap,
        Commands::Rates => AppCommand::Rates,
        Commands::Chart { from, to } => AppCommand::Chart { from, to },
        Commands::News => AppCommand::News,
        Commands::Fav(FavCommands::Toggle { code }) => AppCommand::FavToggle { code },
        Commands::Fav(FavCommands::Add { code }) => AppCommand::FavAdd { code },
        Commands::Fav(FavCommands::Remove { code }) => AppCommand::FavRemove { code },
        Commands::Fav(FavCommands::List) => AppCommand::FavList,
        Commands::Fav(FavCommands::Use { code }) => AppCommand::FavUse { code },
        Commands::Theme { theme } => AppCommand::Theme {
            theme: match theme {
                Some(code) => Some(Theme::from_code(&code).ok_or_else(|| {
                    anyhow::anyhow!("Unknown theme: {code} (expected light or dark)")
                })?),
                None => None,
            },
        },
        Commands::Lang { code } => AppCommand::Language { code },
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => match to_app_command(cmd) {
            Ok(command) => cambio::run_command(command, cli.config_path.as_deref()).await,
            Err(e) => Err(e),
        },
        None => cambio::run_command(cambio::AppCommand::Dashboard, cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> Result<()> {
    use anyhow::Context;

    let path = cambio::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Include the example config as a string literal in the binary
    let default_config = include_str!("../docs/example_config.yaml");

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
