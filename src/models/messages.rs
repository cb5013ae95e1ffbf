use serde::{Deserialize, Serialize};

use crate::game::oracle::LegalityOracle;
use crate::game::record::MoveRecord;
use crate::game::session::GameSession;
use crate::game::utils::{color_to_string, get_game_status};

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub message_type: String,
    pub move_text: Option<String>,
    pub model_color: Option<String>,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ServerMessage {
    pub message_type: String,
    pub session_id: String,
    pub fen: Option<String>,
    pub side_to_move: Option<String>,
    pub movetext: Option<String>,
    pub game_status: Option<String>,
    pub failures: Option<u32>,
    pub status: Option<String>,
    pub last_move: Option<MoveRecord>,
    pub model_move: Option<String>,
    pub error: Option<String>,
}

impl ServerMessage {
    /// Full picture of a session
    pub fn snapshot(message_type: &str, session_id: &str, session: &GameSession) -> Self {
        let board = session.board();
        ServerMessage {
            message_type: message_type.to_string(),
            session_id: session_id.to_string(),
            fen: Some(board.fen()),
            side_to_move: Some(color_to_string(board.side_to_move())),
            movetext: Some(board.render_movetext()),
            game_status: Some(get_game_status(board)),
            failures: Some(session.failures()),
            status: Some(session.status().to_string()),
            last_move: Some(session.last_move().clone()),
            model_move: None,
            error: None,
        }
    }

    pub fn error(session_id: &str, error: impl Into<String>) -> Self {
        ServerMessage {
            message_type: "error".to_string(),
            session_id: session_id.to_string(),
            error: Some(error.into()),
            ..ServerMessage::default()
        }
    }
}
