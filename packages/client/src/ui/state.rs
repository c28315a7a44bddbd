//! Front-end state kept up to date by event callbacks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{JoinedEvent, User, UserListEvent};

#[derive(Debug, Default)]
pub struct ChatView {
    /// Our own profile, once the server confirmed the join
    pub current_user: Option<User>,
    /// Latest online list pushed by the server
    pub online_users: Vec<User>,
    /// Set once the retry budget is spent; cleared on the next connect
    pub gave_up: bool,
}

/// Shared handle to [`ChatView`]
#[derive(Debug, Clone, Default)]
pub struct AppState {
    view: Arc<Mutex<ChatView>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> MutexGuard<'_, ChatView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply_joined(&self, event: &JoinedEvent) {
        self.view().current_user = Some(event.user.clone());
    }

    pub fn apply_user_list(&self, event: &UserListEvent) {
        self.view().online_users = event.users.clone();
    }

    /// The server forgets us when the socket drops, so a reconnect
    /// requires joining again.
    pub fn apply_disconnected(&self) {
        let mut view = self.view();
        view.current_user = None;
        view.online_users.clear();
    }

    pub fn has_joined(&self) -> bool {
        self.view().current_user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            socket_id: String::new(),
            nickname: id.to_string(),
            avatar: String::new(),
            join_time: String::new(),
            last_activity: String::new(),
            is_online: true,
        }
    }

    #[test]
    fn test_join_and_disconnect_cycle() {
        // テスト項目: joined で参加状態になり、切断でリセットされる
        // given (前提条件):
        let state = AppState::new();
        assert!(!state.has_joined());

        // when (操作):
        state.apply_joined(&JoinedEvent {
            user: user("u1"),
            messages: vec![],
        });
        state.apply_user_list(&UserListEvent {
            users: vec![user("u1"), user("u2")],
        });

        // then (期待する結果):
        assert!(state.has_joined());
        assert_eq!(state.view().online_users.len(), 2);

        state.apply_disconnected();
        assert!(!state.has_joined());
        assert!(state.view().online_users.is_empty());
    }
}
