/// Translates message keys (headings, token states, error keys) into display text
pub trait MessageCatalog: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Built-in English strings. Unknown keys are shown as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn translate(&self, key: &str) -> String {
        let text = match key {
            "ownership-tokens" => "Ownership tokens",
            "create-token" => "Create token",
            "token-name" => "Token name",
            "revoke-token" => "Cancel token",
            "revoke-token-confirm" => "Cancel this token? It can no longer be redeemed.",
            "token-state-unredeemed" => "Unredeemed",
            "token-state-redeemed" => "Redeemed",
            "token-state-cancelled" => "Cancelled",
            "token-state-unknown" => "Unknown",
            "token-created" => "Token created",
            "token-name-required" => "A token name is required",
            "network-error" => "Could not reach the server",
            "network-timeout" => "The server took too long to respond",
            "invalid-response" => "The server sent an unexpected response",
            "configuration-error" => "The client is misconfigured",
            "not-authorized" => "You are not allowed to manage tokens for this app",
            "app-not-found" => "This app does not exist",
            "request-rejected" => "The request was rejected",
            "server-error" => "The server encountered an error",
            other => return other.to_string(),
        };
        text.to_string()
    }
}
