//! Turning free text into a move on the board.
//!
//! Interpretations are tried from strictest to loosest and the first one the
//! oracle accepts is played:
//!
//! 1. the trimmed text, with the first letter upper-cased when it is longer
//!    than two characters (piece letters typed in lower case);
//! 2. the same text with the first letter lower-cased (capitalised pawn moves);
//! 3. every substring of the text, longest first and then leftmost first.
//!
//! Scan candidates are capped at `MAX_MOVE_TOKEN_LEN` characters, so the scan
//! stays linear in the length of the reply.

use chess::ChessMove;
use log::debug;
use std::fmt;

use crate::game::oracle::LegalityOracle;
use crate::game::record::MoveNotation;
use crate::game::san::MAX_MOVE_TOKEN_LEN;

/// Which interpretation produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Direct,
    CaseFlip,
    Scan,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Direct => write!(f, "direct"),
            Stage::CaseFlip => write!(f, "case-flip"),
            Stage::Scan => write!(f, "scan"),
        }
    }
}

/// A move found in text and already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub mv: ChessMove,
    /// The exact text that parsed
    pub token: String,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no legal move found in {text:?}")]
pub struct NoLegalMoveFound {
    pub text: String,
}

/// Strip move-number and punctuation artifacts from a model reply.
///
/// Newlines, periods and spaces are removed, then the leading run of digits.
pub fn pre_clean(reply: &str) -> String {
    let squeezed: String = reply
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '.' | ' '))
        .collect();
    squeezed
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveExtractor;

impl MoveExtractor {
    pub fn new() -> Self {
        MoveExtractor
    }

    /// Find a legal move in `text`, play it and record it in `slot`.
    ///
    /// On failure neither the board nor the slot is touched.
    pub fn extract<O: LegalityOracle>(
        &self,
        text: &str,
        oracle: &mut O,
        slot: &mut MoveNotation,
    ) -> Result<Extraction, NoLegalMoveFound> {
        let found = self.interpret(text, oracle).ok_or_else(|| NoLegalMoveFound {
            text: text.to_string(),
        })?;

        debug!("Extracted {:?} from {:?} ({})", found.token, text, found.stage);

        slot.san = oracle.san(found.mv);
        slot.uci = found.mv.to_string();
        oracle.apply(found.mv);

        Ok(found)
    }

    fn interpret<O: LegalityOracle>(&self, text: &str, oracle: &O) -> Option<Extraction> {
        let direct = capitalize_piece(text.trim());
        if let Ok(mv) = oracle.parse_standard_notation(&direct) {
            return Some(Extraction { mv, token: direct, stage: Stage::Direct });
        }

        let flipped = lowercase_first(&direct);
        if let Ok(mv) = oracle.parse_standard_notation(&flipped) {
            return Some(Extraction { mv, token: flipped, stage: Stage::CaseFlip });
        }

        self.scan(text, oracle)
    }

    fn scan<O: LegalityOracle>(&self, text: &str, oracle: &O) -> Option<Extraction> {
        let chars: Vec<char> = text.chars().collect();
        let longest = chars.len().min(MAX_MOVE_TOKEN_LEN);
        for len in (1..=longest).rev() {
            for start in 0..=chars.len() - len {
                let candidate: String = chars[start..start + len].iter().collect();
                if let Ok(mv) = oracle.parse_standard_notation(&candidate) {
                    return Some(Extraction { mv, token: candidate, stage: Stage::Scan });
                }
            }
        }

        None
    }
}

fn capitalize_piece(text: &str) -> String {
    if text.chars().count() <= 2 {
        return text.to_string();
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
