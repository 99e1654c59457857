mod commands;
mod config;
mod display;

use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tombola_core::{KeyValueStore, MemoryStore, SqliteStore};
use tombola_draw::{DrawError, RestoreOutcome, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tombola")]
#[command(about = "Tombola - prize drawings for rosters, rounds and prizes")]
#[command(version)]
struct Cli {
    /// Data directory for the session store
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep state in memory only, nothing is written to disk
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a roster workbook (first sheet people, optional second sheet prizes)
    Import {
        /// Spreadsheet file (.xlsx, .xls, .ods)
        file: PathBuf,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change rounds, winners per round and prizes
    Settings(commands::SettingsArgs),
    /// List the imported roster
    Roster,
    /// Show the current round and what can be done next
    Status,
    /// Draw the winners of the current round
    Draw {
        /// How long the names roll before stopping, in milliseconds
        #[arg(long, default_value_t = 1500)]
        roll_ms: u64,
    },
    /// Hand out prizes to the current round's winners
    Prizes,
    /// Move between rounds
    #[command(subcommand)]
    Round(commands::RoundCommands),
    /// List every recorded winner
    Results {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Export the results to a spreadsheet
    Export {
        /// Output file, defaults to draw-results_<date>.xlsx
        path: Option<PathBuf>,
    },
    /// Interactive presenter with key shortcuts
    Present,
    /// Audio preferences and uploaded media
    #[command(subcommand)]
    Audio(commands::AudioCommands),
    /// Delete all stored draw data
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = CliConfig::new(cli.data_dir, cli.verbose, cli.memory);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open the store
    let kv: Arc<dyn KeyValueStore> = if config.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        Arc::new(SqliteStore::open(&config.store_config()).await?)
    };

    // Rehydrate the session
    let store = SessionStore::new(kv);
    let (session, outcome) = store.restore().await?;
    if let RestoreOutcome::Discarded { reason } = &outcome {
        eprintln!("Stored draw data was unreadable and has been cleared ({})", reason);
    }

    let mut ctx = commands::Context::new(store, session);

    // Execute command
    let result = match cli.command {
        Commands::Import { file, yes } => commands::import_roster(&mut ctx, &file, yes).await,
        Commands::Settings(args) => commands::handle_settings(&mut ctx, args).await,
        Commands::Roster => commands::show_roster(&ctx),
        Commands::Status => commands::show_status(&ctx),
        Commands::Draw { roll_ms } => commands::draw_round(&mut ctx, roll_ms).await,
        Commands::Prizes => commands::draw_prizes(&mut ctx).await,
        Commands::Round(cmd) => commands::handle_round_command(cmd, &mut ctx).await,
        Commands::Results { json } => commands::show_results(&ctx, json),
        Commands::Export { path } => commands::export_results(&ctx, path),
        Commands::Present => commands::present(&mut ctx).await,
        Commands::Audio(cmd) => commands::handle_audio_command(cmd, &mut ctx).await,
        Commands::Clear { yes } => commands::clear_data(&mut ctx, yes).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<DrawError>() {
            Some(DrawError::NoRoster) => {
                eprintln!("Error: No roster imported yet");
                eprintln!("Use 'tombola import <file>' to load participants");
            }
            Some(DrawError::RoundAlreadyDrawn(round)) => {
                eprintln!("Error: Round {} has already been drawn", round);
                eprintln!("Use 'tombola round next' to move on");
            }
            Some(DrawError::NotEnoughParticipants { need, available }) => {
                eprintln!("Error: Not enough participants left");
                eprintln!("Need: {}, Available: {}", need, available);
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
