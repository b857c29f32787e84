use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Contact {
    pub username: String,
}

impl Contact {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }
}

/// Body of `POST /send_message/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub sender: String,
    pub receiver: String,
    pub message: String,
}

// The backend has served both a bare array of user objects and `{"users": ["name", ...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContactRecord {
    Object { username: String },
    Name(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContactListBody {
    Bare(Vec<ContactRecord>),
    Wrapped { users: Vec<ContactRecord> },
}

/// Decode a `/users/` response body, keeping backend order.
pub fn decode_contacts(bytes: &[u8]) -> Result<Vec<Contact>, serde_json::Error> {
    let body: ContactListBody = serde_json::from_slice(bytes)?;
    let records = match body {
        ContactListBody::Bare(list) => list,
        ContactListBody::Wrapped { users } => users,
    };
    Ok(records
        .into_iter()
        .map(|r| match r {
            ContactRecord::Object { username } => Contact { username },
            ContactRecord::Name(username) => Contact { username },
        })
        .collect())
}
