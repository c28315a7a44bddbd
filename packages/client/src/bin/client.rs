//! Terminal chat client with automatic reconnection.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pixel-chat-client -- --url ws://localhost:3001/ws --nickname alice
//! ```

use clap::Parser;
use pixel_chat_client::ui::Args;
use pixel_chat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the client
    if let Err(e) = pixel_chat_client::run_client(args).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
