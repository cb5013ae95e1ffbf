use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::info;
use uuid::Uuid;

use crate::models::AppState;

pub mod game_handlers;
pub mod handler;

pub use handler::ChessWebSocket;

/// Upgrade a request to a websocket with its own game session
pub async fn ws_index(req: HttpRequest, stream: web::Payload, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    ws::start(ChessWebSocket::new(id, app_state), &req, stream)
}
