//! Vending Ownership Tokens
//!
//! List controller, view model and HTTP gateway for the ownership tokens of
//! an application listing.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod http;
pub mod types;
pub mod view;

// Re-export commonly used types and traits
pub use catalog::{EnglishCatalog, MessageCatalog};
pub use config::{ConfigError, GatewayConfig, VendingConfig};
pub use controller::{
    ActionErrorPolicy, ActionFailure, FetchState, ListController, RefreshTicket, TokenAction,
};
pub use error::{GatewayError, GatewayResult};
pub use gateway::TokenGateway;
pub use http::HttpTokenGateway;
pub use types::{AppId, CreateTokenParams, Token, TokenCollection, TokenId, TokenState};
pub use view::{compose, Disclosure, ListContainer, ListView, TokenCreateView, TokenItemView};
