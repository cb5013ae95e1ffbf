//! Standard Algebraic Notation on top of the `chess` crate.
//!
//! Parsing is lenient: over-specified origins, missing or superfluous capture
//! marks and unchecked `+`/`#` suffixes are accepted, as long as exactly one
//! legal move fits. Pawn captures still need their origin file, so `d5` never
//! means `exd5`. Rendering produces canonical SAN.
//!
//! `ChessMove::from_san` reports every failure as one opaque error; parsing
//! here keeps unparseable, unmatched and ambiguous text apart and accepts the
//! same grammar that `render_san` produces.

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

/// Longest text a single move can take, e.g. `Nb1-c3=Q+`.
pub const MAX_MOVE_TOKEN_LEN: usize = 9;

lazy_static! {
    static ref SAN_PATTERN: Regex =
        Regex::new(r"^([NBKRQ])?([a-h])?([1-8])?[\-x]?([a-h][1-8])(=?[nbrqNBRQ])?[\+#]?$")
            .expect("SAN pattern compiles");
    static ref CASTLE_PATTERN: Regex =
        Regex::new(r"^(O-O-O|O-O|0-0-0|0-0)[\+#]?$").expect("castling pattern compiles");
}

/// Reasons a piece of text is not a playable move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("not a move in standard notation: {0:?}")]
    Unparseable(String),

    #[error("no legal move matches {0:?}")]
    NoMatch(String),

    #[error("{0:?} matches more than one legal move")]
    Ambiguous(String),
}

/// Resolve SAN text against the legal moves of `board`
pub fn parse_san(board: &Board, text: &str) -> Result<ChessMove, IllegalMove> {
    if let Some(caps) = CASTLE_PATTERN.captures(text) {
        let long = caps[1].len() == 5;
        return find_castle(board, long).ok_or_else(|| IllegalMove::NoMatch(text.to_string()));
    }

    let caps = SAN_PATTERN
        .captures(text)
        .ok_or_else(|| IllegalMove::Unparseable(text.to_string()))?;

    let piece = caps
        .get(1)
        .and_then(|m| piece_from_letter(m.as_str()))
        .unwrap_or(Piece::Pawn);
    let from_file = caps.get(2).map(|m| index_of(m.as_str(), b'a'));
    let from_rank = caps.get(3).map(|m| index_of(m.as_str(), b'1'));
    let dest = square_from_name(&caps[4]);
    let promotion = caps
        .get(5)
        .and_then(|m| piece_from_letter(m.as_str().trim_start_matches('=')));

    let mut found: Option<ChessMove> = None;
    for candidate in MoveGen::new_legal(board) {
        let source = candidate.get_source();
        if candidate.get_dest() != dest || candidate.get_promotion() != promotion {
            continue;
        }
        if board.piece_on(source) != Some(piece) {
            continue;
        }
        // A pawn move without an origin file is a push, never a capture
        if piece == Piece::Pawn && from_file.is_none() && source.get_file() != dest.get_file() {
            continue;
        }
        if from_file.is_some_and(|file| source.get_file().to_index() != file) {
            continue;
        }
        if from_rank.is_some_and(|rank| source.get_rank().to_index() != rank) {
            continue;
        }
        if found.replace(candidate).is_some() {
            return Err(IllegalMove::Ambiguous(text.to_string()));
        }
    }

    found.ok_or_else(|| IllegalMove::NoMatch(text.to_string()))
}

/// Accept coordinate notation such as `g1f3` or `e7e8q` when the move is legal
pub fn parse_uci(board: &Board, text: &str) -> Option<ChessMove> {
    if !(4..=5).contains(&text.len()) {
        return None;
    }
    ChessMove::from_str(text).ok().filter(|m| board.legal(*m))
}

/// Render a legal move of `board` in canonical SAN
pub fn render_san(board: &Board, mv: ChessMove) -> String {
    let source = mv.get_source();
    let dest = mv.get_dest();
    let moving = board.piece_on(source);

    let mut san = if is_castle(board, mv) {
        if dest.get_file().to_index() > source.get_file().to_index() {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else {
        let mut core = String::new();
        match moving {
            Some(Piece::Pawn) | None => {
                // Pawns only change file when capturing, en passant included
                if source.get_file() != dest.get_file() {
                    core.push(file_char(source));
                    core.push('x');
                }
            }
            Some(piece) => {
                core.push(piece_letter(piece));
                core.push_str(&disambiguation(board, mv, piece));
                if board.piece_on(dest).is_some() {
                    core.push('x');
                }
            }
        }
        core.push_str(&dest.to_string());
        if let Some(promo) = mv.get_promotion() {
            core.push('=');
            core.push(piece_letter(promo));
        }
        core
    };

    let after = board.make_move_new(mv);
    if after.status() == BoardStatus::Checkmate {
        san.push('#');
    } else if after.checkers().popcnt() > 0 {
        san.push('+');
    }
    san
}

/// Minimal origin hint: file, then rank, then both
fn disambiguation(board: &Board, mv: ChessMove, piece: Piece) -> String {
    let source = mv.get_source();
    let rivals: Vec<Square> = MoveGen::new_legal(board)
        .filter(|m| *m != mv && m.get_dest() == mv.get_dest())
        .filter(|m| board.piece_on(m.get_source()) == Some(piece))
        .map(|m| m.get_source())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|sq| sq.get_file() == source.get_file());
    let shares_rank = rivals.iter().any(|sq| sq.get_rank() == source.get_rank());

    let name = source.to_string();
    if !shares_file {
        name[..1].to_string()
    } else if !shares_rank {
        name[1..].to_string()
    } else {
        name
    }
}

fn is_castle(board: &Board, mv: ChessMove) -> bool {
    let source = mv.get_source();
    let dest = mv.get_dest();
    board.piece_on(source) == Some(Piece::King)
        && source.get_rank() == dest.get_rank()
        && source.get_file().to_index().abs_diff(dest.get_file().to_index()) == 2
}

fn find_castle(board: &Board, long: bool) -> Option<ChessMove> {
    let king = board.king_square(board.side_to_move());
    MoveGen::new_legal(board).find(|m| {
        m.get_source() == king
            && is_castle(board, *m)
            && (m.get_dest().get_file().to_index() < king.get_file().to_index()) == long
    })
}

fn piece_from_letter(letter: &str) -> Option<Piece> {
    match letter {
        "N" | "n" => Some(Piece::Knight),
        "B" | "b" => Some(Piece::Bishop),
        "R" | "r" => Some(Piece::Rook),
        "Q" | "q" => Some(Piece::Queen),
        "K" => Some(Piece::King),
        _ => None,
    }
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn index_of(text: &str, base: u8) -> usize {
    (text.as_bytes()[0] - base) as usize
}

fn square_from_name(name: &str) -> Square {
    let bytes = name.as_bytes();
    Square::make_square(
        chess::Rank::from_index((bytes[1] - b'1') as usize),
        chess::File::from_index((bytes[0] - b'a') as usize),
    )
}
