use crate::output;
use anyhow::{bail, Result};
use colored::*;
use std::io::Write;
use vending_tokens::view::HEADING_KEY;
use vending_tokens::{
    AppId, CreateTokenParams, FetchState, ListController, MessageCatalog, TokenId,
};

/// Fetch the list for `app_id` and print it
pub async fn list(
    controller: &mut ListController,
    app_id: AppId,
    catalog: &dyn MessageCatalog,
    out: &mut impl Write,
) -> Result<()> {
    controller.mount(app_id).await;
    print_list(controller, catalog, out)
}

/// Create a token, print it with its secret, then print the refreshed list
pub async fn create(
    controller: &mut ListController,
    app_id: AppId,
    name: &str,
    catalog: &dyn MessageCatalog,
    out: &mut impl Write,
) -> Result<()> {
    // The post-create refresh is the only fetch
    controller.associate(app_id);

    if let Some(token) = controller.create(&CreateTokenParams::new(name)).await {
        writeln!(out, "{} {}", "✓".green(), output::created_summary(&token, catalog))?;
    }

    print_list(controller, catalog, out)?;
    check_failure(controller, catalog)
}

/// Revoke a token, then print the refreshed list
pub async fn revoke(
    controller: &mut ListController,
    app_id: AppId,
    token_id: TokenId,
    catalog: &dyn MessageCatalog,
    out: &mut impl Write,
) -> Result<()> {
    controller.associate(app_id);
    controller.revoke(&token_id).await;

    print_list(controller, catalog, out)?;
    check_failure(controller, catalog)
}

fn print_list(
    controller: &ListController,
    catalog: &dyn MessageCatalog,
    out: &mut impl Write,
) -> Result<()> {
    match controller.state() {
        FetchState::Success(tokens) if tokens.is_empty() => {
            writeln!(out, "{}", "No tokens found".yellow())?;
        }
        FetchState::Success(tokens) => {
            writeln!(out, "{}", catalog.translate(HEADING_KEY).blue().bold())?;
            writeln!(out, "{}", output::tokens_table(tokens, catalog))?;
            writeln!(out, "Total: {} tokens", tokens.len().to_string().cyan())?;
        }
        FetchState::Error(error) => bail!("{}", catalog.translate(error.message_key())),
        FetchState::Idle | FetchState::Pending => bail!("Token list was not loaded"),
    }
    Ok(())
}

/// Only set when failures are surfaced
fn check_failure(controller: &ListController, catalog: &dyn MessageCatalog) -> Result<()> {
    if let Some(failure) = controller.last_failure() {
        bail!(
            "{} failed: {}",
            failure.action,
            catalog.translate(failure.error.message_key())
        );
    }
    Ok(())
}
