use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece};
use std::str::FromStr;

use crate::game::san::{self, IllegalMove};
use crate::game::utils::has_insufficient_material;

/// Plies without a capture or pawn move that end the game
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Occurrences of one position that end the game
const FIVEFOLD: usize = 5;

/// Everything the move pipeline needs to know about chess rules
pub trait LegalityOracle {
    fn is_game_over(&self) -> bool;

    fn side_to_move(&self) -> Color;

    /// Legal moves in generation order
    fn legal_moves(&self) -> Vec<ChessMove>;

    fn parse_standard_notation(&self, text: &str) -> Result<ChessMove, IllegalMove>;

    /// Play a move previously returned by `parse_standard_notation`
    fn apply(&mut self, mv: ChessMove);

    fn is_starting_position(&self) -> bool;

    /// PGN movetext of the game so far, without headers or result token
    fn render_movetext(&self) -> String;

    fn san(&self, mv: ChessMove) -> String;
}

/// A move as it was played, with its SAN fixed at the time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: ChessMove,
    pub san: String,
}

/// Position plus the history needed for movetext and draw rules
#[derive(Debug, Clone)]
pub struct ChessBoard {
    start: Board,
    board: Board,
    history: Vec<PlayedMove>,
    halfmove_clock: u32,
    positions: Vec<u64>,
}

impl ChessBoard {
    pub fn new() -> Self {
        Self::from_board(Board::default())
    }

    pub fn from_board(board: Board) -> Self {
        ChessBoard {
            start: board,
            board,
            history: Vec::new(),
            halfmove_clock: 0,
            positions: vec![board.get_hash()],
        }
    }

    /// Start from an arbitrary position; `None` if the FEN is invalid.
    ///
    /// The halfmove clock is taken from the FEN, so the 75-move rule counts
    /// plies played before the position too.
    pub fn from_fen(fen: &str) -> Option<Self> {
        let mut board = Self::from_board(Board::from_str(fen).ok()?);
        board.halfmove_clock = fen
            .split_whitespace()
            .nth(4)
            .and_then(|field| field.parse().ok())
            .unwrap_or(0);
        Some(board)
    }

    /// The current position
    pub fn position(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    /// True when the game has ended without a winner
    pub fn is_draw(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
            || has_insufficient_material(&self.board)
            || self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES
            || self.repetitions() >= FIVEFOLD
    }

    fn repetitions(&self) -> usize {
        let current = self.board.get_hash();
        self.positions.iter().filter(|h| **h == current).count()
    }
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl LegalityOracle for ChessBoard {
    fn is_game_over(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate || self.is_draw()
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    fn parse_standard_notation(&self, text: &str) -> Result<ChessMove, IllegalMove> {
        match san::parse_san(&self.board, text) {
            Ok(mv) => Ok(mv),
            Err(err) => san::parse_uci(&self.board, text).ok_or(err),
        }
    }

    fn apply(&mut self, mv: ChessMove) {
        debug_assert!(self.board.legal(mv), "applying illegal move {mv}");

        let san = san::render_san(&self.board, mv);
        let irreversible = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();

        self.board = self.board.make_move_new(mv);
        self.history.push(PlayedMove { mv, san });

        if irreversible {
            self.halfmove_clock = 0;
            self.positions.clear();
        } else {
            self.halfmove_clock += 1;
        }
        self.positions.push(self.board.get_hash());
    }

    fn is_starting_position(&self) -> bool {
        self.board == Board::default()
    }

    fn render_movetext(&self) -> String {
        let mut movetext = String::new();
        let mut fullmove = 1;
        let mut color = self.start.side_to_move();

        for (ply, played) in self.history.iter().enumerate() {
            if !movetext.is_empty() {
                movetext.push(' ');
            }
            if color == Color::White {
                movetext.push_str(&format!("{}. ", fullmove));
            } else if ply == 0 {
                movetext.push_str(&format!("{}... ", fullmove));
            }
            movetext.push_str(&played.san);

            if color == Color::Black {
                fullmove += 1;
            }
            color = !color;
        }

        movetext
    }

    fn san(&self, mv: ChessMove) -> String {
        san::render_san(&self.board, mv)
    }
}
