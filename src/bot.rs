// DeepBox player
//
// Ties configuration, strategy selection and decision logging together
// behind the methods the HTTP handlers and the coordinator client call.

use log::{error, info};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::board::{Board, Edge};
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::strategy::{choose_move, random_move, Strategy};
use crate::types::{GameRequest, MoveRequest, MoveResponse};

/// Dots and Boxes player with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            logger: DebugLogger::disabled(),
        }
    }

    /// Attaches a decision logger
    pub fn with_logger(mut self, logger: DebugLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.server.player_name
    }

    /// Returns player metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "name": self.config.server.player_name,
            "strategy": self.config.strategy.default.as_str(),
            "version": env!("CARGO_PKG_VERSION"),
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, request: &GameRequest) {
        info!("GAME START {}", request.game_id.as_deref().unwrap_or("-"));
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, request: &GameRequest) {
        info!("GAME OVER {}", request.game_id.as_deref().unwrap_or("-"));
    }

    /// Turn time for a request, falling back to the configured default
    fn turn_time(&self, turn_time_ms: Option<u64>) -> Duration {
        turn_time_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.timing.turn_time())
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The search is CPU-bound, so it runs on tokio's blocking pool. If that
    /// task fails the player still answers with a random free edge.
    ///
    /// # Returns
    /// * `Result<Value, String>` - `{"move": edge}`, or an error for a malformed or full board
    pub async fn get_move(&self, request: &MoveRequest) -> Result<Value, String> {
        let board: Board = request.board.parse()?;
        let edge = self
            .decide(board, request.turn, self.turn_time(request.turn_time_ms))
            .await?;
        serde_json::to_value(MoveResponse { edge })
            .map_err(|e| format!("Failed to encode move: {}", e))
    }

    /// Chooses an edge for `board` with the configured strategy
    pub async fn decide(&self, board: Board, turn: u32, turn_time: Duration) -> Result<Edge, String> {
        if board.is_terminal() {
            return Err("Board has no free edge".to_string());
        }

        let start_time = Instant::now();
        let strategy = self.config.strategy.default;
        info!(
            "Turn {}: Computing move with {} ({} free edges)",
            turn,
            strategy,
            board.num_free_edges()
        );

        let config = self.config.clone();
        let result = tokio::task::spawn_blocking(move || {
            choose_move(strategy, &board, &config, turn_time)
        })
        .await;

        let edge = match result {
            Ok(edge) => edge,
            Err(e) => {
                error!("Turn {}: search task failed ({}), playing a random edge", turn, e);
                random_move(&board, &mut rand::rng())
            }
        };

        let elapsed = start_time.elapsed().as_millis();
        info!("Turn {}: Chose edge {} (time: {}ms)", turn, edge, elapsed);
        self.logger.log_move(turn, &board, edge, strategy, elapsed);

        Ok(edge)
    }

    /// Strategy used for every decision
    pub fn strategy(&self) -> Strategy {
        self.config.strategy.default
    }
}
