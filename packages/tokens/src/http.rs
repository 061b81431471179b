//! HTTP implementation of [`TokenGateway`] against the vending API
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;
use url::Url;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::TokenGateway;
use crate::types::{AppId, CreateTokenParams, Token, TokenCollection, TokenId};

/// Gateway talking to `{base}/vending/app/{app_id}/tokens`
#[derive(Clone)]
pub struct HttpTokenGateway {
    http_client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpTokenGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Build the tokens endpoint for an app, optionally with a trailing action
    fn tokens_url(&self, app_id: &AppId, action: Option<&str>) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::config(format!("Invalid base URL: {}", self.base_url)))?;
            segments
                .pop_if_empty()
                .extend(["vending", "app", app_id.as_str(), "tokens"]);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn non-success statuses into rejections
    async fn check(response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::from_status(status.as_u16(), &body))
    }
}

#[async_trait]
impl TokenGateway for HttpTokenGateway {
    async fn list(&self, app_id: &AppId) -> GatewayResult<TokenCollection> {
        let url = self.tokens_url(app_id, None)?;
        debug!(%url, "Listing ownership tokens");

        let response = self.authorize(self.http_client.get(url)).send().await?;
        let response = Self::check(response).await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn create(&self, app_id: &AppId, params: &CreateTokenParams) -> GatewayResult<Token> {
        let url = self.tokens_url(app_id, None)?;
        debug!(%url, name = %params.name, "Creating ownership token");

        let response = self
            .authorize(self.http_client.post(url))
            .json(&[&params.name])
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body = response.text().await?;
        let created: Vec<Token> = serde_json::from_str(&body)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::invalid_response("Create returned no token"))
    }

    async fn revoke(&self, app_id: &AppId, token_id: &TokenId) -> GatewayResult<()> {
        let url = self.tokens_url(app_id, Some("cancel"))?;
        debug!(%url, token_id = %token_id, "Revoking ownership token");

        let response = self
            .authorize(self.http_client.post(url))
            .json(&[token_id.as_str()])
            .send()
            .await?;
        Self::check(response).await?;

        Ok(())
    }
}
