//! Chat slice: assistant conversation history and session flags
//!
//! History is append-only and capped at [`MAX_MESSAGES`]; once full, the
//! oldest messages are dropped. `is_typing`, `is_processing` and
//! `is_listening` are independent flags: any combination is valid.

use crate::bounded::BoundedList;
use crate::environment::AppEnvironment;
use serde::{Deserialize, Serialize};
use vibes_core::{action::ActionName, reducer::Reducer, DateTime, Utc};

/// Most messages kept in history
pub const MAX_MESSAGES: usize = 100;

/// Chat history, oldest first
pub type MessageHistory = BoundedList<ChatMessage, MAX_MESSAGES>;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Written by the user
    User,
    /// Written by the assistant
    Assistant,
    /// Status or error notice
    System,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message id
    pub id: String,
    /// Author
    pub role: MessageRole,
    /// Text body
    pub content: String,
    /// When the message was written
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        role: MessageRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp,
        }
    }
}

/// Conversation context the assistant is working in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatMode {
    /// Open-ended discovery
    #[default]
    General,
    /// Questions about specific venues
    Venues,
    /// Planning a trip
    TripPlanning,
    /// Venue-owner tools
    Business,
}

/// Chat slice state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    /// Conversation history
    pub messages: MessageHistory,
    /// Assistant is composing a reply
    pub is_typing: bool,
    /// A request is in flight
    pub is_processing: bool,
    /// Speech capture is active
    pub is_listening: bool,
    /// Active conversation context
    pub chat_mode: ChatMode,
    /// Chat panel is open
    pub is_open: bool,
    /// Current speech-to-text buffer
    pub transcript: String,
}

/// Chat slice actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Open or close the chat panel
    SetChatOpen(bool),
    /// Set the typing flag
    SetTyping(bool),
    /// Set the processing flag
    SetProcessing(bool),
    /// Set the listening flag
    SetListening(bool),
    /// Replace the transcript buffer
    SetTranscript(String),
    /// Switch conversation context
    SetChatMode(ChatMode),
    /// Replace history (newest [`MAX_MESSAGES`] kept)
    SetMessages(Vec<ChatMessage>),
    /// Append to history
    AddMessage(ChatMessage),
    /// Empty history
    ClearMessages,
}

impl ActionName for ChatAction {
    fn name(&self) -> &'static str {
        match self {
            Self::SetChatOpen(_) => "chat/setChatOpen",
            Self::SetTyping(_) => "chat/setTyping",
            Self::SetProcessing(_) => "chat/setProcessing",
            Self::SetListening(_) => "chat/setListening",
            Self::SetTranscript(_) => "chat/setTranscript",
            Self::SetChatMode(_) => "chat/setChatMode",
            Self::SetMessages(_) => "chat/setMessages",
            Self::AddMessage(_) => "chat/addMessage",
            Self::ClearMessages => "chat/clearMessages",
        }
    }
}

/// Reducer for [`ChatState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatReducer;

impl Reducer for ChatReducer {
    type State = ChatState;
    type Action = ChatAction;
    type Environment = AppEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        match action {
            ChatAction::SetChatOpen(open) => state.is_open = open,
            ChatAction::SetTyping(typing) => state.is_typing = typing,
            ChatAction::SetProcessing(processing) => state.is_processing = processing,
            ChatAction::SetListening(listening) => state.is_listening = listening,
            ChatAction::SetTranscript(transcript) => state.transcript = transcript,
            ChatAction::SetChatMode(mode) => state.chat_mode = mode,
            ChatAction::SetMessages(messages) => state.messages.replace(messages),
            ChatAction::AddMessage(message) => {
                if let Some(evicted) = state.messages.push(message) {
                    tracing::trace!(
                        evicted = %evicted.id,
                        "Chat history full, dropped oldest message"
                    );
                }
            },
            ChatAction::ClearMessages => state.messages.clear(),
        }
    }
}
