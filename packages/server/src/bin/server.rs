//! Signaling relay server for peer-to-peer video calls.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin huddle-server
//! cargo run --bin huddle-server -- --host 0.0.0.0 --port 3000
//! PORT=3000 CORS_ORIGIN=https://meet.example.com cargo run --bin huddle-server
//! ```

use std::sync::Arc;

use clap::Parser;
use huddle_server::{
    config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig},
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::SessionCoordinator,
};
use huddle_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "huddle-server")]
#[command(about = "WebRTC signaling relay with room presence and chat", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Allowed CORS origin for the HTTP API ("*" allows any)
    #[arg(long, env = "CORS_ORIGIN", default_value = "*")]
    cors_origin: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ServerConfig::new(args.host, args.port, &args.cors_origin) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. SessionCoordinator
    // 3. Server
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let coordinator = Arc::new(SessionCoordinator::new(
        message_pusher,
        Arc::new(SystemClock),
    ));

    let server = Server::new(coordinator, config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
