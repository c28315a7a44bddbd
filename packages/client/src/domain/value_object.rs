//! Value Objects for user input.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity. The connection core
//! never validates what it sends; these types are applied by front ends
//! before handing input to it.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum nickname length in characters
pub const NICKNAME_MAX_CHARS: usize = 8;

/// Maximum message length in characters
pub const MESSAGE_CONTENT_MAX_CHARS: usize = 500;

/// Nickname value object.
///
/// Surrounding whitespace is trimmed. A nickname that is empty after
/// trimming is represented by `Option::None` from [`Nickname::parse`], which
/// lets the server assign one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    /// Parse user input into an optional nickname.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Nickname))` - a non-empty nickname within the length limit
    /// * `Ok(None)` - blank input
    /// * `Err(ValueObjectError::NicknameTooLong)` - more than 8 characters
    pub fn parse(input: &str) -> Result<Option<Self>, ValueObjectError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let len = trimmed.chars().count();
        if len > NICKNAME_MAX_CHARS {
            return Err(ValueObjectError::NicknameTooLong {
                max: NICKNAME_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Some(Self(trimmed.to_string())))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Represents the content of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent from raw input.
    ///
    /// # Arguments
    ///
    /// * `content` - The message content string, trimmed before validation
    ///
    /// # Returns
    ///
    /// A Result containing the MessageContent or an error if validation fails
    pub fn new(content: &str) -> Result<Self, ValueObjectError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = trimmed.chars().count();
        if len > MESSAGE_CONTENT_MAX_CHARS {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_parse_success() {
        // テスト項目: 有効なニックネームを作成できる（前後の空白は除去される）
        // when (操作):
        let result = Nickname::parse("  alice ");

        // then (期待する結果):
        let nickname = result.unwrap().unwrap();
        assert_eq!(nickname.as_str(), "alice");
    }

    #[test]
    fn test_nickname_parse_blank_is_none() {
        // テスト項目: 空白のみの入力はサーバー割り当て（None）として扱われる
        assert_eq!(Nickname::parse("   "), Ok(None));
        assert_eq!(Nickname::parse(""), Ok(None));
    }

    #[test]
    fn test_nickname_parse_too_long_fails() {
        // テスト項目: 9 文字以上のニックネームは作成できない
        // given (前提条件):
        let input = "a".repeat(9);

        // when (操作):
        let result = Nickname::parse(&input);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::NicknameTooLong { max: 8, actual: 9 })
        );
    }

    #[test]
    fn test_nickname_counts_characters_not_bytes() {
        // テスト項目: マルチバイト文字は文字数で数えられる
        // given (前提条件): 8 文字（24 バイト）
        let input = "像素聊天室用户名";

        // when (操作):
        let result = Nickname::parse(input);

        // then (期待する結果):
        assert!(result.unwrap().is_some());
    }

    #[test]
    fn test_message_content_new_success() {
        // テスト項目: 有効なメッセージ内容を作成できる
        // when (操作):
        let result = MessageContent::new(" Hello, world! ");

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "Hello, world!");
    }

    #[test]
    fn test_message_content_new_empty_fails() {
        // テスト項目: 空白のみのメッセージ内容は作成できない
        // when (操作):
        let result = MessageContent::new(" \t ");

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageContentEmpty);
    }

    #[test]
    fn test_message_content_new_too_long_fails() {
        // テスト項目: 501 文字以上のメッセージ内容は作成できない
        // given (前提条件):
        let content = "a".repeat(501);

        // when (操作):
        let result = MessageContent::new(&content);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageContentTooLong {
                max: 500,
                actual: 501
            }
        );
    }
}
