//! Composition of the token list: maps controller state to what gets shown.
use std::collections::HashSet;

use crate::controller::{ListController, RefreshTicket, TokenAction};
use crate::error::{GatewayError, GatewayResult};
use crate::types::{AppId, CreateTokenParams, Token, TokenCollection, TokenId};

/// Catalog key of the heading shown above the list
pub const HEADING_KEY: &str = "ownership-tokens";

/// What the list currently looks like
#[derive(Debug, PartialEq)]
pub enum ListView<'a> {
    /// Nothing fetched yet or a fetch is in flight
    Loading,
    /// The last fetch failed; neither items nor the create affordance are shown
    Failed(&'a GatewayError),
    /// One item per token in gateway order, then the create affordance
    Populated {
        items: Vec<TokenItemView<'a>>,
        create: TokenCreateView<'a>,
    },
}

impl<'a> ListView<'a> {
    pub fn heading_key(&self) -> Option<&'static str> {
        match self {
            ListView::Loading => None,
            _ => Some(HEADING_KEY),
        }
    }

    pub fn items(&self) -> &[TokenItemView<'a>] {
        match self {
            ListView::Populated { items, .. } => items,
            _ => &[],
        }
    }

    pub fn create(&self) -> Option<&TokenCreateView<'a>> {
        match self {
            ListView::Populated { create, .. } => Some(create),
            _ => None,
        }
    }
}

/// One token row
#[derive(Debug, Clone, PartialEq)]
pub struct TokenItemView<'a> {
    pub app_id: &'a AppId,
    pub token: &'a Token,
    pub expanded: bool,
}

impl<'a> TokenItemView<'a> {
    /// Stable key for the row
    pub fn key(&self) -> &'a TokenId {
        &self.token.id
    }

    pub fn can_revoke(&self) -> bool {
        self.token.state.is_revocable()
    }

    /// Revoke action for this row, if the token can still be revoked
    pub fn revoke_action(&self) -> Option<TokenAction> {
        self.can_revoke()
            .then(|| TokenAction::Revoke(self.token.id.clone()))
    }
}

/// The creation affordance at the end of the list
#[derive(Debug, Clone, PartialEq)]
pub struct TokenCreateView<'a> {
    pub app_id: &'a AppId,
}

/// Expanded/collapsed state of each row, keyed by token id
#[derive(Debug, Clone, Default)]
pub struct Disclosure {
    open: HashSet<TokenId>,
}

impl Disclosure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, id: &TokenId) -> bool {
        self.open.contains(id)
    }

    /// Flip a row and return its new state
    pub fn toggle(&mut self, id: &TokenId) -> bool {
        if self.open.remove(id) {
            false
        } else {
            self.open.insert(id.clone());
            true
        }
    }

    /// Forget rows that are no longer in the collection
    pub fn retain(&mut self, tokens: &TokenCollection) {
        self.open.retain(|id| tokens.get(id).is_some());
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }
}

/// The token list for one application: controller plus row disclosure state
pub struct ListContainer {
    controller: ListController,
    disclosure: Disclosure,
}

impl ListContainer {
    pub fn new(controller: ListController) -> Self {
        Self {
            controller,
            disclosure: Disclosure::new(),
        }
    }

    pub fn controller(&self) -> &ListController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ListController {
        &mut self.controller
    }

    pub fn disclosure(&self) -> &Disclosure {
        &self.disclosure
    }

    pub fn disclosure_mut(&mut self) -> &mut Disclosure {
        &mut self.disclosure
    }

    /// Show the list for `app_id`, fetching it if the application changed
    pub async fn mount(&mut self, app_id: AppId) {
        if self.controller.app_id() != Some(&app_id) {
            self.disclosure.clear();
        }
        self.controller.mount(app_id).await;
    }

    /// Re-fetch the list
    pub async fn refresh(&mut self) {
        self.controller.refresh().await;
        self.sync_disclosure();
    }

    /// Revoke a token; the list is refreshed whatever the outcome
    pub async fn revoke(&mut self, token_id: &TokenId) {
        self.controller.revoke(token_id).await;
        self.sync_disclosure();
    }

    /// Create a token; the list is refreshed whatever the outcome
    pub async fn create(&mut self, params: &CreateTokenParams) -> Option<Token> {
        let created = self.controller.create(params).await;
        self.sync_disclosure();
        created
    }

    /// Apply a list result fetched elsewhere. Returns `false` for stale tickets.
    pub fn apply(
        &mut self,
        ticket: &RefreshTicket,
        result: GatewayResult<TokenCollection>,
    ) -> bool {
        let applied = self.controller.apply(ticket, result);
        if applied {
            self.sync_disclosure();
        }
        applied
    }

    /// Drop disclosure entries for tokens that disappeared after a refresh
    fn sync_disclosure(&mut self) {
        if let Some(tokens) = self.controller.state().tokens() {
            self.disclosure.retain(tokens);
        }
    }

    pub fn view(&self) -> ListView<'_> {
        compose(&self.controller, |id| self.disclosure.is_open(id))
    }
}

/// Build the view for a controller's current state
pub fn compose<'a, F>(controller: &'a ListController, is_expanded: F) -> ListView<'a>
where
    F: Fn(&TokenId) -> bool,
{
    let state = controller.state();
    if state.is_loading() {
        return ListView::Loading;
    }
    if let Some(error) = state.error() {
        return ListView::Failed(error);
    }

    // Success without an app id cannot happen; treat it as still loading
    let (Some(tokens), Some(app_id)) = (state.tokens(), controller.app_id()) else {
        return ListView::Loading;
    };

    let items = tokens
        .iter()
        .map(|token| TokenItemView {
            app_id,
            token,
            expanded: is_expanded(&token.id),
        })
        .collect();

    ListView::Populated {
        items,
        create: TokenCreateView { app_id },
    }
}
