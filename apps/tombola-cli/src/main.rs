use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tombola_core::protocol::GameStatusDto;
use tombola_core::GameId;
use tombola_sync::{
    CardView, ControlPanel, GameApi, GameSnapshot, GameSyncClient, HttpGameApi, RefreshChannel,
    SyncConfig, SyncError, SyncHandle, SyncState, SyncView,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "tombola")]
#[command(about = "Tombola operator console and public board")]
struct Args {
    /// Backend API base URL (defaults to TOMBOLA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Refresh period in seconds for board views (defaults to TOMBOLA_POLL_SECS)
    #[arg(long, global = true)]
    poll_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new game
    Create { name: String },
    /// Start a game
    Start {
        #[arg(short, long)]
        game: GameId,
    },
    /// End a game
    End {
        #[arg(short, long)]
        game: GameId,
    },
    /// Draw a random number
    Draw {
        #[arg(short, long)]
        game: GameId,
    },
    /// Draw a called-out number
    DrawNumber {
        #[arg(short, long)]
        game: GameId,
        number: i32,
    },
    /// Ask the backend for a card's win level
    CheckWin {
        #[arg(short, long)]
        game: GameId,
        #[arg(short, long)]
        card: i64,
    },
    /// Show game metadata
    Status {
        #[arg(short, long)]
        game: GameId,
    },
    /// Show the 90-number board
    Board {
        #[arg(short, long)]
        game: GameId,
        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Show a game's cards with drawn numbers marked
    Cards {
        #[arg(short, long)]
        game: GameId,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_env_filter("tombola=info,tombola_sync=warn")
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args.command, config).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<SyncConfig, SyncError> {
    let mut config = SyncConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_base_url(url.clone());
    }
    match args.poll_secs {
        Some(0) => return Err(SyncError::Decode("poll interval must be positive".into())),
        Some(secs) => config = config.with_poll_interval(Duration::from_secs(secs)),
        None => {}
    }
    Ok(config)
}

async fn run(command: Command, config: SyncConfig) -> Result<(), SyncError> {
    let api: Arc<dyn GameApi> = Arc::new(HttpGameApi::new(&config)?);

    match command {
        Command::Create { name } => {
            let game = api.create_game(&name).await?;
            info!(game_id = game.id, "game created");
            println!("{}", describe(&game));
        }
        Command::Start { game } => {
            let panel = open_panel(&api, game, &config).await?;
            panel.start().await?;
            println!("Game {game} started");
            panel.close().await;
        }
        Command::End { game } => {
            let panel = open_panel(&api, game, &config).await?;
            panel.end().await?;
            println!("Game {game} ended");
            panel.close().await;
        }
        Command::Draw { game } => {
            let panel = open_panel(&api, game, &config).await?;
            let number = panel.draw_random().await?;
            println!("Drawn: {number}");
            panel.close().await;
        }
        Command::DrawNumber { game, number } => {
            let panel = open_panel(&api, game, &config).await?;
            let number = panel.draw_manual(number).await?;
            println!("Drawn: {number}");
            panel.close().await;
        }
        Command::CheckWin { game, card } => {
            let result = api.check_win(game, card).await?;
            match result.message {
                Some(message) => println!("{message}"),
                None => println!("{}", result.error.unwrap_or_default()),
            }
        }
        Command::Status { game } => {
            let status = api.status(game).await?;
            println!("{}", describe(&status));
        }
        Command::Board { game, watch } => {
            let handle = GameSyncClient::new(Arc::clone(&api), game, &config).spawn();
            let result = if watch {
                watch_board(&handle).await
            } else {
                settle(&handle, &config).await.map(|view| print_board(&view))
            };
            handle.shutdown().await;
            result?;
        }
        Command::Cards {
            game,
            page,
            limit,
            search,
        } => {
            let handle = GameSyncClient::new(Arc::clone(&api), game, &config).spawn();
            let view = settle(&handle, &config).await;
            handle.shutdown().await;
            let snapshot = view?
                .snapshot
                .ok_or_else(|| SyncError::Fetch(format!("game {game} unavailable")))?;

            let cards = api.cards(game, page, limit, search.as_deref()).await?;
            println!(
                "Cards {}-{} of {} (page {}/{})",
                (cards.page - 1) * cards.limit + usize::from(!cards.data.is_empty()),
                (cards.page - 1) * cards.limit + cards.data.len(),
                cards.total,
                cards.page,
                cards.pages.max(1)
            );
            for card in &cards.data {
                println!("\n#{} {}", card.id, card.name);
                print!("{}", render_card(&snapshot, &snapshot.card_view(card)));
            }
        }
    }
    Ok(())
}

/// Operator panel with its first snapshot loaded, so manual draws are
/// checked against the current board.
async fn open_panel(
    api: &Arc<dyn GameApi>,
    game: GameId,
    config: &SyncConfig,
) -> Result<ControlPanel, SyncError> {
    let panel = ControlPanel::open(Arc::clone(api), RefreshChannel::new(), game, config);
    if let Err(e) = settle(panel.sync(), config).await {
        warn!(game_id = game, error = %e, "board not loaded, relying on backend checks");
    }
    Ok(panel)
}

/// Wait for the first fetch to succeed or fail.
async fn settle(handle: &SyncHandle, config: &SyncConfig) -> Result<SyncView, SyncError> {
    let settled = tokio::time::timeout(
        config.request_timeout * 3,
        handle.wait_for(|v| matches!(v.state, SyncState::Ready | SyncState::Error)),
    )
    .await
    .map_err(|_| SyncError::Fetch("timed out waiting for the backend".into()))?
    .ok_or_else(|| SyncError::Fetch("sync client stopped".into()))?;

    if settled.state == SyncState::Error {
        let error = settled
            .error
            .unwrap_or_else(|| "refresh failed".to_string());
        return Err(SyncError::Fetch(error));
    }
    Ok(settled)
}

async fn watch_board(handle: &SyncHandle) -> Result<(), SyncError> {
    let mut views = handle.subscribe();
    let mut shown = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            changed = views.changed() => {
                if changed.is_err() {
                    return Err(SyncError::Fetch("sync client stopped".into()));
                }
            }
        }

        let view = views.borrow_and_update().clone();
        match view.state {
            SyncState::Ready if view.generation > shown => {
                shown = view.generation;
                print_board(&view);
            }
            SyncState::Error => {
                if let Some(error) = &view.error {
                    eprintln!("refresh failed, showing last board: {error}");
                }
            }
            _ => {}
        }
    }
}

fn print_board(view: &SyncView) {
    match &view.snapshot {
        Some(snapshot) => {
            let state = if snapshot.is_ended {
                "ended"
            } else if snapshot.is_started {
                "running"
            } else {
                "not started"
            };
            println!("{} (game {}, {state})", snapshot.name, snapshot.game_id);
            print!("{}", snapshot.board().render());
        }
        None => println!("No board available"),
    }
}

fn render_card(snapshot: &GameSnapshot, view: &CardView) -> String {
    match view {
        CardView::Ok { grid, win } => {
            format!("{}{}\n", grid.render(&snapshot.drawn_set()), win.message())
        }
        CardView::Malformed { reason } => format!("unusable card: {reason}\n"),
    }
}

fn describe(game: &GameStatusDto) -> String {
    let state = match (game.started_at.is_some(), game.ended_at.is_some()) {
        (_, true) => "ended",
        (true, false) => "running",
        (false, false) => "not started",
    };
    let latest = game
        .last_draw
        .map_or_else(|| "-".to_string(), |d| d.number.to_string());
    format!(
        "Game {} \"{}\": {state}, {} drawn, latest {latest}",
        game.id, game.name, game.total_numbers_drawn
    )
}
