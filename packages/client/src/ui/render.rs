//! Plain-text rendering of chat events.

use pixel_chat_shared::time::{local_clock_now, rfc3339_to_local_clock};

use crate::domain::{Message, User};

fn clock(timestamp: &str) -> String {
    rfc3339_to_local_clock(timestamp).unwrap_or_else(local_clock_now)
}

pub fn format_message(message: &Message) -> String {
    let time = clock(&message.timestamp);
    if message.is_system() {
        format!("[{}] * {}", time, message.content)
    } else {
        format!("[{}] {}: {}", time, message.user_nickname, message.content)
    }
}

pub fn format_user_joined(user: &User) -> String {
    format!("[{}] -> {} joined", local_clock_now(), user.nickname)
}

pub fn format_user_left(user: &User) -> String {
    format!("[{}] <- {} left", local_clock_now(), user.nickname)
}

pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "[online: 0]".to_string();
    }
    let names: Vec<&str> = users.iter().map(|u| u.nickname.as_str()).collect();
    format!("[online: {}] {}", users.len(), names.join(", "))
}

pub fn format_welcome(user: &User) -> String {
    format!("Joined as {} (ID: {})", user.nickname, user.id)
}

pub fn format_error(message: &str) -> String {
    format!("! {}", message)
}
