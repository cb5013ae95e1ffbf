use actix_web_actors::ws;
use futures::FutureExt;
use log::{info, warn};

use crate::game::session::GameSession;
use crate::models::{ClientMessage, ServerMessage};
use crate::websocket::handler::ChessWebSocket;

impl ChessWebSocket {
    pub fn handle_new_game(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        info!("Starting new game for {}", self.id);

        // Create a fresh session with the shared completion service
        let mut session = GameSession::new(self.app_state.completion.clone(), self.app_state.config.clone());

        // The model opens when it plays white
        match msg.model_color.as_deref() {
            Some("white") => {
                info!("Model plays white in session {}", self.id);
                let call = async move {
                    let model_move = session.get_model_move().await;
                    (session, Ok(model_move))
                }
                .boxed_local();
                self.drive(call, "game_created", ctx);
            }
            None | Some("black") => {
                // Store the session and send a response to the client
                let message = ServerMessage::snapshot("game_created", &self.id, &session);
                self.session = Some(session);
                self.send(ctx, &message);
            }
            Some(other) => {
                warn!("Invalid model color: {}", other);
                self.send(ctx, &ServerMessage::error(&self.id, format!("Invalid model color: {}", other)));
            }
        }
    }

    pub fn handle_move(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        info!("Processing move: {:?}", msg.move_text);

        // Get the move from the message
        let move_text = match msg.move_text {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn!("No move provided");
                self.send(ctx, &ServerMessage::error(&self.id, "No move provided"));
                return;
            }
        };

        // Take the session out while the call runs
        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                warn!("Session {} is busy", self.id);
                self.send(ctx, &ServerMessage::error(&self.id, "Session is busy"));
                return;
            }
        };

        // Play the move; the model answers in the same call
        let call = async move {
            let outcome = session.play(&move_text).await;
            (session, outcome)
        }
        .boxed_local();
        self.drive(call, "move_result", ctx);
    }

    pub fn handle_model_move(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        info!("Requesting model move for {}", self.id);

        // Take the session out while the call runs
        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                warn!("Session {} is busy", self.id);
                self.send(ctx, &ServerMessage::error(&self.id, "Session is busy"));
                return;
            }
        };

        // Ask the model again, e.g. after an exhausted round
        let call = async move {
            let model_move = session.get_model_move().await;
            (session, Ok(model_move))
        }
        .boxed_local();
        self.drive(call, "move_result", ctx);
    }

    pub fn handle_state(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        // Report the current position without touching the game
        let message = match &self.session {
            Some(session) => ServerMessage::snapshot("state", &self.id, session),
            None => ServerMessage::error(&self.id, "Session is busy"),
        };
        self.send(ctx, &message);
    }
}
