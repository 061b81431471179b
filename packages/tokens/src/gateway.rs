use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::types::{AppId, CreateTokenParams, Token, TokenCollection, TokenId};

/// Backend that issues, lists and revokes ownership tokens for an application
#[async_trait]
pub trait TokenGateway: Send + Sync {
    /// Fetch the full token collection for an application
    async fn list(&self, app_id: &AppId) -> GatewayResult<TokenCollection>;

    /// Create a token and return it, including its secret value
    async fn create(&self, app_id: &AppId, params: &CreateTokenParams) -> GatewayResult<Token>;

    /// Revoke (cancel) a token
    async fn revoke(&self, app_id: &AppId, token_id: &TokenId) -> GatewayResult<()>;
}
