use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::{info, warn};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chess_chat_app::completion::OpenAiCompletion;
use chess_chat_app::models::{AppState, GameConfig, ProviderConfig};
use chess_chat_app::routes::configure_routes;

/// Play chess against a chat-completion model over a websocket
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "CHESS_CHAT_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// API key of the completion provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// Model name sent with every request
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-3.5-turbo")]
    model: String,

    /// JSON file overriding game settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    info!("Game settings: {:?}", config);

    if args.api_key.is_none() {
        warn!("No API key configured; the model will not be able to move");
    }

    let provider = ProviderConfig {
        api_key: args.api_key,
        base_url: args.base_url,
        model: args.model,
        ..ProviderConfig::default()
    };
    let completion = OpenAiCompletion::new(provider).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    // Create shared application state
    let app_state = web::Data::new(AppState::new(Arc::new(completion), config));

    info!("Starting chess chat server at http://{}", args.bind);

    // Start HTTP server
    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(configure_routes))
        .bind(&args.bind)?
        .run()
        .await
}
