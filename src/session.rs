//! Selection and send logic behind the chat window.
//!
//! `ChatSession` is the only writer of the current selection. The header label renders it;
//! nothing reads the label back. Network calls go through [`ChatBackend`] so the same logic runs
//! against the HTTP client or an in-memory fake.

use std::fmt;
use std::future::Future;

use crate::api::error::ApiError;
use crate::api::models::{Contact, OutgoingMessage};

pub const ALL_CHATS: &str = "All Chats";
pub const DEFAULT_IDENTITY: &str = "Me";

pub trait ChatBackend {
    fn fetch_contacts(&self) -> impl Future<Output = Result<Vec<Contact>, ApiError>> + Send;
    fn send_message(&self, message: &OutgoingMessage) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// The conversation target. Exactly one is active; the last selection wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    AllChats,
    Contact(String),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::AllChats => f.write_str(ALL_CHATS),
            Selection::Contact(username) => f.write_str(username),
        }
    }
}

/// Result of one send attempt, deciding what happens to the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank after trimming, or another send is in flight; nothing was sent.
    Skipped,
    /// Delivered; the input is cleared.
    Sent,
    /// Logged; the input is set to the trimmed text that failed to send.
    Failed,
}

impl SendOutcome {
    /// New contents for the input field, or `None` to leave it alone.
    ///
    /// `sent` is the field text when the send started, `current` is the text now. If the user
    /// edited the field while the request was out, their edit wins.
    pub fn input_after(self, sent: &str, current: &str) -> Option<String> {
        if current != sent {
            return None;
        }
        match self {
            SendOutcome::Skipped => None,
            SendOutcome::Sent => Some(String::new()),
            SendOutcome::Failed => Some(sent.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    identity: String,
    contacts: Vec<Contact>,
    selection: Selection,
    sending: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY)
    }
}

impl ChatSession {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            contacts: Vec::new(),
            selection: Selection::default(),
            sending: false,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Header text for the current selection.
    pub fn header_text(&self) -> String {
        self.selection.to_string()
    }

    /// Replace the contact list with a load result. On failure the previous list is kept.
    /// Returns whether the list changed, i.e. whether the sidebar needs a re-render.
    ///
    /// A selected contact that is missing from the new list falls back to All Chats.
    pub fn apply_contacts(&mut self, result: Result<Vec<Contact>, ApiError>) -> bool {
        match result {
            Ok(contacts) => {
                log::info!("Loaded {} contacts", contacts.len());
                self.contacts = contacts;
                if let Selection::Contact(username) = &self.selection {
                    if !self.contacts.iter().any(|c| &c.username == username) {
                        log::info!("{username} is no longer listed, selecting {ALL_CHATS}");
                        self.selection = Selection::AllChats;
                    }
                }
                true
            }
            Err(err) => {
                log::error!("Error fetching contacts: {err}");
                false
            }
        }
    }

    pub async fn load_contacts<B: ChatBackend>(&mut self, backend: &B) -> bool {
        let result = backend.fetch_contacts().await;
        self.apply_contacts(result)
    }

    /// Select a contact by its key (the username). Unknown keys leave the selection as is.
    pub fn select_contact(&mut self, key: &str) -> Option<&Selection> {
        if !self.contacts.iter().any(|c| c.username == key) {
            log::warn!("Ignoring selection of unknown contact {key:?}");
            return None;
        }
        self.selection = Selection::Contact(key.to_string());
        log::debug!("Selected {}", self.selection);
        Some(&self.selection)
    }

    pub fn select_all_chats(&mut self) -> &Selection {
        self.selection = Selection::AllChats;
        log::debug!("Selected {}", self.selection);
        &self.selection
    }

    /// Build the message for `input`, or `None` when it is blank after trimming.
    pub fn compose(&self, input: &str) -> Option<OutgoingMessage> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        Some(OutgoingMessage {
            sender: self.identity.clone(),
            receiver: self.selection.to_string(),
            message: message.to_string(),
        })
    }

    /// Start a send: compose the message and mark it in flight until [`Self::finish_send`].
    /// Returns `None` for blank input or while another send is still out.
    pub fn begin_send(&mut self, input: &str) -> Option<OutgoingMessage> {
        if self.sending {
            log::debug!("Send already in flight, ignoring");
            return None;
        }
        let message = self.compose(input)?;
        self.sending = true;
        Some(message)
    }

    pub fn finish_send(&mut self, result: Result<(), ApiError>) -> SendOutcome {
        self.sending = false;
        match result {
            Ok(()) => {
                log::info!("Message sent successfully");
                SendOutcome::Sent
            }
            Err(err) => {
                log::error!("Error sending message: {err}");
                SendOutcome::Failed
            }
        }
    }

    pub async fn send<B: ChatBackend>(&mut self, backend: &B, input: &str) -> SendOutcome {
        let Some(message) = self.begin_send(input) else {
            return SendOutcome::Skipped;
        };
        let result = backend.send_message(&message).await;
        self.finish_send(result)
    }
}
