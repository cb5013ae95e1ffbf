//! A game between a human and the model.
//!
//! The human's move is parsed once; an unreadable move is reported straight
//! back. The model gets a bounded number of attempts per turn, each one a
//! fresh prompt, a deadline-bounded completion call and an extraction. Every
//! failed attempt bumps the failure counter, which switches the prompt to the
//! variant that spells out the legal moves.

use chess::ChessMove;
use log::{error, info, warn};
use std::sync::Arc;

use crate::completion::{CallFailure, CompletionService, TimedCompletion};
use crate::game::extractor::{pre_clean, MoveExtractor};
use crate::game::oracle::{ChessBoard, LegalityOracle};
use crate::game::prompt::PromptBuilder;
use crate::game::record::MoveRecord;
use crate::game::retry::{AttemptOutcome, FailureCounter, FatalReason, RetryReason};
use crate::models::config::GameConfig;

/// Errors surfaced to whoever drives the session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("the move {text:?} can't be played")]
    InvalidPlayerMove { text: String },
}

pub struct GameSession {
    board: ChessBoard,
    failures: FailureCounter,
    last_move: MoveRecord,
    status: String,
    config: GameConfig,
    extractor: MoveExtractor,
    prompts: PromptBuilder,
    completion: TimedCompletion,
}

impl GameSession {
    pub fn new(completion: Arc<dyn CompletionService>, config: GameConfig) -> Self {
        Self::with_board(ChessBoard::new(), completion, config)
    }

    /// Resume from a given position
    pub fn with_board(board: ChessBoard, completion: Arc<dyn CompletionService>, config: GameConfig) -> Self {
        GameSession {
            board,
            failures: FailureCounter::new(config.max_failures),
            last_move: MoveRecord::default(),
            status: String::new(),
            extractor: MoveExtractor::new(),
            prompts: PromptBuilder::new(config.prompts.clone()),
            completion: TimedCompletion::new(completion, config.completion_timeout()),
            config,
        }
    }

    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    pub fn failures(&self) -> u32 {
        self.failures.get()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_move(&self) -> &MoveRecord {
        &self.last_move
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Play the human's move, then fetch the model's answer.
    ///
    /// Returns `Ok(None)` when the game is already over or the model ran out
    /// of attempts; check [`status`](Self::status) to tell them apart.
    pub async fn play(&mut self, move_text: &str) -> Result<Option<ChessMove>, SessionError> {
        if self.board.is_game_over() {
            info!("Game is already over, ignoring {:?}", move_text);
            return Ok(None);
        }

        let accepted = match self.extractor.extract(move_text, &mut self.board, &mut self.last_move.player) {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Rejected player move: {}", e);
                return Err(SessionError::InvalidPlayerMove { text: move_text.to_string() });
            }
        };

        self.last_move.model.clear();
        self.status = format!(
            "Player move {} ({} match on {:?})",
            self.last_move.player.san, accepted.stage, accepted.token
        );
        info!("{}", self.status);
        self.failures.reset();

        Ok(self.get_model_move().await)
    }

    /// Ask the model for its move, retrying up to the configured limit
    pub async fn get_model_move(&mut self) -> Option<ChessMove> {
        if self.board.is_game_over() {
            info!("Game is already over, not asking the model");
            return None;
        }

        for attempt in 1..=self.config.max_attempts {
            match self.attempt().await {
                AttemptOutcome::Accepted(accepted) => {
                    self.status = format!(
                        "Model move {} ({} match on {:?}, failures before: {})",
                        self.last_move.model.san,
                        accepted.stage,
                        accepted.token,
                        self.failures.get()
                    );
                    info!("{}", self.status);
                    self.failures.reset();
                    return Some(accepted.mv);
                }
                AttemptOutcome::Retryable(reason) => {
                    self.failures.increment();
                    warn!(
                        "Attempt {}/{} failed: {} (failures: {})",
                        attempt,
                        self.config.max_attempts,
                        reason,
                        self.failures.get()
                    );
                }
                AttemptOutcome::Fatal(reason) => {
                    self.status = format!("Model unavailable: {}", reason);
                    error!("{}", self.status);
                    return None;
                }
            }
        }

        self.status = format!("Move fail limit reached ({})", self.failures.get());
        warn!("{}", self.status);
        None
    }

    async fn attempt(&mut self) -> AttemptOutcome {
        let prompt = self.prompts.build(&self.board, self.failures.get());
        info!("Prompting model: {}", prompt);

        let reply = match self.completion.call(prompt, self.config.max_reply_tokens).await {
            Ok(reply) => reply,
            Err(CallFailure::TimedOut(limit)) => {
                return AttemptOutcome::Retryable(RetryReason::Timeout(limit));
            }
            Err(CallFailure::Service(e)) if e.is_fatal() => {
                return AttemptOutcome::Fatal(FatalReason::Misconfigured(e.to_string()));
            }
            Err(CallFailure::Service(e)) => {
                return AttemptOutcome::Retryable(RetryReason::ServiceError(e.to_string()));
            }
        };

        info!("Model replied {:?}", reply);
        let cleaned = pre_clean(&reply);
        match self.extractor.extract(&cleaned, &mut self.board, &mut self.last_move.model) {
            Ok(accepted) => AttemptOutcome::Accepted(accepted),
            Err(_) => AttemptOutcome::Retryable(RetryReason::NoLegalMove(reply)),
        }
    }
}
