use actix::prelude::*;
use actix_web::web;
use actix_web_actors::ws;
use chess::ChessMove;
use futures::future::LocalBoxFuture;
use log::{info, warn};

use crate::game::session::{GameSession, SessionError};
use crate::models::{AppState, ClientMessage, ServerMessage};

/// A session handed to an async call, returned together with its outcome
pub type SessionCall = LocalBoxFuture<'static, (GameSession, Result<Option<ChessMove>, SessionError>)>;

/// WebSocket handler for one human-versus-model game
pub struct ChessWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
    /// `None` only while a call on the session is in flight
    pub session: Option<GameSession>,
}

impl ChessWebSocket {
    pub fn new(id: String, app_state: web::Data<AppState>) -> Self {
        let session = GameSession::new(app_state.completion.clone(), app_state.config.clone());
        ChessWebSocket {
            id,
            app_state,
            session: Some(session),
        }
    }
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        let total_sessions = self.app_state.register(&self.id);
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        let total_sessions = self.app_state.unregister(&self.id);
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                // Parse the message and dispatch it
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => self.handle_message(client_msg, ctx),
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send(ctx, &ServerMessage::error(&self.id, format!("Invalid message format: {}", e)));
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(ctx, &ServerMessage::error(&self.id, "Binary messages are not supported"));
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl ChessWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        // Route the message based on its type
        match msg.message_type.as_str() {
            "new_game" => self.handle_new_game(msg, ctx),
            "move" => self.handle_move(msg, ctx),
            "model_move" => self.handle_model_move(ctx),
            "state" => self.handle_state(ctx),
            _ => {
                warn!("Unknown message type: {}", msg.message_type);
                self.send(ctx, &ServerMessage::error(&self.id, format!("Unknown message type: {}", msg.message_type)));
            }
        }
    }

    /// Serialize and push a message to the client
    pub fn send(&self, ctx: &mut ws::WebsocketContext<Self>, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Error serializing message: {}", e),
        }
    }

    /// Run a session call to completion before handling further messages
    pub fn drive(&mut self, call: SessionCall, reply_type: &'static str, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.wait(call.into_actor(self).map(move |(session, outcome), act, ctx| {
            // Build the reply from the session as the call left it
            let reply = match outcome {
                Ok(model_move) => {
                    let mut reply = ServerMessage::snapshot(reply_type, &act.id, &session);
                    if model_move.is_some() {
                        reply.model_move = Some(session.last_move().model.san.clone());
                    }
                    reply
                }
                Err(e) => {
                    // A rejected player move still reports the unchanged game
                    let mut reply = ServerMessage::snapshot("error", &act.id, &session);
                    reply.error = Some(e.to_string());
                    reply
                }
            };
            // Put the session back, then send a response to the client
            act.session = Some(session);
            act.send(ctx, &reply);
        }));
    }
}
