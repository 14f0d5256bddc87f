//! card-arena - command-line driver
//!
//! Runs one game command against file-backed player and alliance stores and
//! prints the outcome as JSON. Stands in for the chat dispatcher during local
//! play and testing.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use card_arena::{
    Alliance, AllianceId, CardCatalog, CardId, EngineConfig, FileRepository, GameService, Player,
    PlayerId, Result, StoreError, StoreFormat,
};

#[derive(Parser)]
#[command(name = "card-arena")]
#[command(about = "Collectible card mini-game engine", long_about = None)]
struct Cli {
    /// Directory holding the player and alliance files
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Card catalog file (default: <data-dir>/cards.json)
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// TOML engine config (default: built-in rules)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Store file format: json or bincode
    #[arg(long, global = true, default_value = "json")]
    format: StoreFormat,

    /// RNG seed for reproducible draws and battles
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a player, or rename an existing one
    Register { player: String, name: String },

    /// Draw a card (costs one energy)
    Draw { player: String },

    /// Show a player's profile
    Profile { player: String },

    /// List the card shop
    Shop,

    /// Buy a card from the shop
    Buy { player: String, card: String },

    /// Upgrade an owned card one level
    Upgrade { player: String, card: String },

    /// Attack another player
    Battle { attacker: String, defender: String },

    /// Refill your own energy
    Boost { player: String },

    /// Refill the energy of everyone in the room
    GroupBoost {
        player: String,

        /// Ids of the players in the room
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// Give gold to another player
    Donate {
        donor: String,
        recipient: String,
        amount: u64,
    },

    /// Top players by battles won
    Leaderboard {
        #[arg(default_value_t = 10)]
        count: usize,
    },

    /// Alliance commands
    #[command(subcommand)]
    Alliance(AllianceCommand),
}

#[derive(Subcommand)]
enum AllianceCommand {
    /// Found an alliance
    Create { player: String, name: String },

    /// Invite a player (leader only)
    Invite {
        alliance: AllianceId,
        target: String,
        inviter: String,
    },

    /// Accept your pending invite
    Accept { player: String },

    /// Decline your pending invite
    Decline { player: String },

    /// Show your pending invite
    Pending { player: String },

    /// Leave your alliance (the leader leaving dissolves it)
    Leave { player: String },

    /// Show your alliance
    Show { player: String },

    /// Donate gold to the treasury
    Donate { player: String, amount: u64 },

    /// Withdraw treasury gold (leader only)
    Withdraw { player: String, amount: u64 },

    /// Top alliances by power
    Top {
        #[arg(default_value_t = 10)]
        count: usize,
    },
}

fn setup_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    setup_logger();
    let cli = Cli::parse();

    match run(cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_catalog(path: &Path) -> CardCatalog {
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("bin") => StoreFormat::Bincode,
        _ => StoreFormat::Json,
    };
    match CardCatalog::load(path, format) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Could not load card catalog {:?}, continuing empty: {}", path, e);
            CardCatalog::default()
        }
    }
}

fn build_service(cli: &Cli) -> Result<GameService> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("cards.json"));
    let ext = cli.format.extension();

    let players = FileRepository::<Player>::open(cli.data_dir.join(format!("players.{ext}")), cli.format);
    let alliances =
        FileRepository::<Alliance>::open(cli.data_dir.join(format!("alliances.{ext}")), cli.format);

    let mut builder = GameService::builder()
        .with_config(config)
        .with_catalog(load_catalog(&catalog_path))
        .with_players(Arc::new(players))
        .with_alliances(Arc::new(alliances));
    if let Some(seed) = cli.seed {
        builder = builder.with_seed(seed);
    }
    Ok(builder.build())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value).map_err(StoreError::from)?)
}

fn run(cli: Cli) -> Result<String> {
    let service = build_service(&cli)?;
    let id = |s: &str| PlayerId::new(s);

    match cli.command {
        Commands::Register { player, name } => to_json(&service.register(&id(&player), &name)?),
        Commands::Draw { player } => to_json(&service.draw(&id(&player))?),
        Commands::Profile { player } => to_json(&service.show_profile(&id(&player))?),
        Commands::Shop => to_json(&service.list_shop()),
        Commands::Buy { player, card } => {
            to_json(&service.purchase(&id(&player), &CardId::new(card))?)
        }
        Commands::Upgrade { player, card } => {
            to_json(&service.upgrade(&id(&player), &CardId::new(card))?)
        }
        Commands::Battle { attacker, defender } => {
            to_json(&service.battle(&id(&attacker), &id(&defender))?)
        }
        Commands::Boost { player } => to_json(&service.personal_boost(&id(&player))?),
        Commands::GroupBoost { player, members } => {
            let members: Vec<PlayerId> = members.iter().map(|m| id(m)).collect();
            to_json(&service.group_boost(&id(&player), &members)?)
        }
        Commands::Donate {
            donor,
            recipient,
            amount,
        } => to_json(&service.donate_gold(&id(&donor), &id(&recipient), amount)?),
        Commands::Leaderboard { count } => to_json(&service.leaderboard(count)),
        Commands::Alliance(cmd) => run_alliance(&service, cmd),
    }
}

fn run_alliance(service: &GameService, cmd: AllianceCommand) -> Result<String> {
    let id = |s: &str| PlayerId::new(s);

    match cmd {
        AllianceCommand::Create { player, name } => {
            to_json(&service.alliance_create(&name, &id(&player))?)
        }
        AllianceCommand::Invite {
            alliance,
            target,
            inviter,
        } => to_json(&service.alliance_invite(&alliance, &id(&target), &id(&inviter))?),
        AllianceCommand::Accept { player } => {
            to_json(&service.alliance_accept_invite(&id(&player))?)
        }
        AllianceCommand::Decline { player } => {
            to_json(&service.alliance_decline_invite(&id(&player)))
        }
        AllianceCommand::Pending { player } => {
            to_json(&service.alliance_pending_invite(&id(&player)))
        }
        AllianceCommand::Leave { player } => to_json(&service.alliance_leave(&id(&player))?),
        AllianceCommand::Show { player } => to_json(&service.alliance_show(&id(&player))?),
        AllianceCommand::Donate { player, amount } => {
            to_json(&service.alliance_donate(&id(&player), amount)?)
        }
        AllianceCommand::Withdraw { player, amount } => {
            to_json(&service.alliance_withdraw(&id(&player), amount)?)
        }
        AllianceCommand::Top { count } => to_json(&service.alliance_leaderboard(count)?),
    }
}
