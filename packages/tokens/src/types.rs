//! Data model for ownership tokens
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GatewayError, GatewayResult};

/// Identifier of the application whose tokens are managed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub String);

impl AppId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AppId {
    fn from(id: String) -> Self {
        AppId(id)
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        AppId(id.to_string())
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a token, stable across refreshes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub String);

impl TokenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        TokenId(id)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        TokenId(id.to_string())
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Redemption state reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    Unredeemed,
    Redeemed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TokenState {
    /// Catalog key used when displaying the state
    pub fn message_key(&self) -> &'static str {
        match self {
            TokenState::Unredeemed => "token-state-unredeemed",
            TokenState::Redeemed => "token-state-redeemed",
            TokenState::Cancelled => "token-state-cancelled",
            TokenState::Unknown => "token-state-unknown",
        }
    }

    /// Cancelled tokens cannot be revoked a second time
    pub fn is_revocable(&self) -> bool {
        !matches!(self, TokenState::Cancelled)
    }
}

/// A single ownership token. Everything except `id` is opaque to the list
/// controller and only rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub name: String,
    pub state: TokenState,
    /// Secret value, only returned by the backend when the token is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub changed: Option<DateTime<Utc>>,
}

/// Tokens returned by one list call, in gateway order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCollection {
    pub tokens: Vec<Token>,
}

impl TokenCollection {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn get(&self, id: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|token| &token.id == id)
    }
}

impl<'a> IntoIterator for &'a TokenCollection {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Parameters for creating a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenParams {
    pub name: String,
}

impl CreateTokenParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Reject blank names before they reach the network
    pub fn validate(&self) -> GatewayResult<()> {
        if self.name.trim().is_empty() {
            return Err(GatewayError::rejected(400, "token-name-required"));
        }
        Ok(())
    }
}
