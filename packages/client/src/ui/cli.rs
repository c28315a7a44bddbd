//! Command-line arguments and input line parsing.

use clap::Parser;
use thiserror::Error;

use crate::{
    config::{DEFAULT_WS_URL, WS_URL_ENV},
    domain::{MessageContent, Nickname, ValueObjectError},
};

/// Terminal client for Pixel Chat
#[derive(Debug, Parser)]
#[command(name = "pixel-chat-client", version, about)]
pub struct Args {
    /// WebSocket endpoint of the chat server
    #[arg(long, env = WS_URL_ENV, default_value = DEFAULT_WS_URL)]
    pub url: String,

    /// Join automatically with this nickname once connected
    #[arg(short, long)]
    pub nickname: Option<String>,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// One line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Join(Option<Nickname>),
    Say(MessageContent),
    Ping,
    Users,
    Reconnect,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error(transparent)]
    Invalid(#[from] ValueObjectError),

    #[error("unknown command '/{0}', type /help for a list")]
    UnknownCommand(String),
}

pub const HELP: &str = "\
/join [nickname]  enter the chat (nickname up to 8 characters)
/ping             check the server is alive
/users            show who is online
/reconnect        connect again after the client gave up
/quit             leave
anything else     send a message";

/// Parse an input line. Blank lines yield `Ok(None)`.
pub fn parse_input(line: &str) -> Result<Option<Input>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(command) = line.strip_prefix('/') else {
        return Ok(Some(Input::Say(MessageContent::new(line)?)));
    };

    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let input = match name {
        "join" => Input::Join(Nickname::parse(rest)?),
        "ping" => Input::Ping,
        "users" => Input::Users,
        "reconnect" => Input::Reconnect,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(input))
}
