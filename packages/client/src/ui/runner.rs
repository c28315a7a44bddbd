//! Terminal chat loop.

use std::thread;

use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    config::{ClientConfig, ConfigError},
    connection::{ChatClient, RECONNECT_EXHAUSTED_MESSAGE},
    domain::{Nickname, ValueObjectError},
};

use super::{
    cli::{Args, HELP, Input, parse_input},
    render,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid --nickname: {0}")]
    Nickname(#[from] ValueObjectError),
}

/// Run the interactive client until `/quit`, EOF or Ctrl-C.
pub async fn run(args: Args) -> Result<(), ClientError> {
    let config = ClientConfig::new(args.url)?;
    let auto_join = match args.nickname.as_deref() {
        Some(nickname) => Some(Nickname::parse(nickname)?),
        None => None,
    };

    let client = ChatClient::new(config.clone());
    let state = AppState::new();
    register_handlers(&client, &state, auto_join);

    println!("Connecting to {} ...", config.url());
    client.connect();

    let mut lines = spawn_line_reader();
    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match parse_input(&line) {
            Ok(Some(Input::Quit)) => break,
            Ok(Some(input)) => handle_input(&client, &state, input),
            Ok(None) => {}
            Err(e) => println!("{}", render::format_error(&e.to_string())),
        }
    }

    client.disconnect_and_wait().await;
    client.clear_subscriptions();
    tracing::info!("Client stopped");
    Ok(())
}

fn register_handlers(client: &ChatClient, state: &AppState, auto_join: Option<Option<Nickname>>) {
    {
        let handle = client.clone();
        let state = state.clone();
        client.on_connected(move || {
            state.view().gave_up = false;
            println!("Connected.");
            match &auto_join {
                Some(nickname) => handle.join(nickname.clone().map(Nickname::into_string)),
                None => println!("Type /join [nickname] to enter the chat, /help for commands."),
            }
        });
    }
    {
        let state = state.clone();
        client.on_disconnected(move || {
            state.apply_disconnected();
            println!("Disconnected.");
        });
    }
    {
        let state = state.clone();
        client.on_joined(move |event| {
            state.apply_joined(event);
            println!("{}", render::format_welcome(&event.user));
            for message in &event.messages {
                println!("{}", render::format_message(message));
            }
        });
    }
    client.on_user_joined(|event| println!("{}", render::format_user_joined(&event.user)));
    client.on_user_left(|event| println!("{}", render::format_user_left(&event.user)));
    client.on_new_message(|event| println!("{}", render::format_message(&event.message)));
    {
        let state = state.clone();
        client.on_user_list(move |event| {
            state.apply_user_list(event);
            println!("{}", render::format_user_list(&event.users));
        });
    }
    {
        let state = state.clone();
        client.on_error(move |event| {
            println!("{}", render::format_error(&event.message));
            if event.message == RECONNECT_EXHAUSTED_MESSAGE {
                state.view().gave_up = true;
                println!("Type /reconnect to try again.");
            }
        });
    }
    client.on_pong(|| println!("pong"));
}

fn handle_input(client: &ChatClient, state: &AppState, input: Input) {
    match input {
        Input::Join(nickname) => {
            if !client.is_connected() {
                println!("{}", render::format_error("not connected"));
                return;
            }
            client.join(nickname.map(Nickname::into_string));
        }
        Input::Say(content) => {
            if !client.is_connected() {
                let hint = if state.view().gave_up {
                    "not connected, type /reconnect"
                } else {
                    "not connected"
                };
                println!("{}", render::format_error(hint));
                return;
            }
            if !state.has_joined() {
                println!("{}", render::format_error("join the chat before sending messages"));
                return;
            }
            client.send_message(content.into_string());
        }
        Input::Ping => client.ping(),
        Input::Users => println!("{}", render::format_user_list(&state.view().online_users)),
        Input::Reconnect => {
            if client.is_connected() {
                println!("Already connected.");
                return;
            }
            println!("Reconnecting ...");
            client.connect();
        }
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
}

/// Read lines on a dedicated thread; the channel closes on EOF, Ctrl-C or
/// when the terminal cannot be used.
fn spawn_line_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to start line editor: {}", e);
                return;
            }
        };
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });

    rx
}
