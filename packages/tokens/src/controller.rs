//! Fetch lifecycle for one application's token list.
//!
//! The controller is a synchronous state machine ([`ListController::begin_refresh`]
//! hands out a [`RefreshTicket`], [`ListController::apply`] consumes its result)
//! with async conveniences on top for hosts that can simply await the gateway.
//! Every refresh bumps a generation counter; a result is only applied when its
//! ticket carries the current generation, so the displayed list always belongs
//! to the most recent request rather than the most recent completion.
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::TokenGateway;
use crate::types::{AppId, CreateTokenParams, Token, TokenCollection, TokenId};

/// Lifecycle of the token list fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Pending,
    Success(TokenCollection),
    Error(GatewayError),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Idle | FetchState::Pending)
    }

    pub fn tokens(&self) -> Option<&TokenCollection> {
        match self {
            FetchState::Success(tokens) => Some(tokens),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GatewayError> {
        match self {
            FetchState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Pending => "pending",
            FetchState::Success(_) => "success",
            FetchState::Error(_) => "error",
        }
    }
}

/// Handle for one outstanding list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    app_id: AppId,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// Run the list call this ticket stands for
    pub async fn fetch(&self, gateway: &dyn TokenGateway) -> GatewayResult<TokenCollection> {
        gateway.list(&self.app_id).await
    }
}

/// What to do with create/revoke failures besides refreshing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionErrorPolicy {
    /// Only the refreshed list tells the user whether the action worked
    #[default]
    Silent,
    /// Keep the last failure around so the view can show it
    Surface,
}

/// A mutation performed on the token list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAction {
    Create,
    Revoke(TokenId),
}

impl fmt::Display for TokenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenAction::Create => write!(f, "create"),
            TokenAction::Revoke(id) => write!(f, "revoke {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    pub action: TokenAction,
    pub error: GatewayError,
}

/// Owns the fetch state and token collection for one application
pub struct ListController {
    gateway: Arc<dyn TokenGateway>,
    app_id: Option<AppId>,
    state: FetchState,
    generation: u64,
    action_errors: ActionErrorPolicy,
    last_failure: Option<ActionFailure>,
}

impl ListController {
    pub fn new(gateway: Arc<dyn TokenGateway>) -> Self {
        Self {
            gateway,
            app_id: None,
            state: FetchState::Idle,
            generation: 0,
            action_errors: ActionErrorPolicy::default(),
            last_failure: None,
        }
    }

    pub fn with_action_errors(mut self, policy: ActionErrorPolicy) -> Self {
        self.action_errors = policy;
        self
    }

    pub fn gateway(&self) -> Arc<dyn TokenGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn app_id(&self) -> Option<&AppId> {
        self.app_id.as_ref()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn action_errors(&self) -> ActionErrorPolicy {
        self.action_errors
    }

    /// Last failed create/revoke, only ever set under [`ActionErrorPolicy::Surface`]
    pub fn last_failure(&self) -> Option<&ActionFailure> {
        self.last_failure.as_ref()
    }

    pub fn dismiss_failure(&mut self) {
        self.last_failure = None;
    }

    /// Associate the controller with an application without fetching.
    ///
    /// Returns `false` when already associated with `app_id`. A new
    /// application resets the state to `Idle` and clears any recorded failure.
    pub fn associate(&mut self, app_id: AppId) -> bool {
        if self.app_id.as_ref() == Some(&app_id) {
            debug!(app_id = %app_id, "Token list already initialized");
            return false;
        }

        info!(app_id = %app_id, "Loading ownership tokens");
        self.app_id = Some(app_id);
        self.state = FetchState::Idle;
        self.last_failure = None;
        true
    }

    /// Associate the controller with an application.
    ///
    /// Returns a ticket for the initial fetch, or `None` when the controller
    /// is already associated with `app_id`.
    pub fn initialize(&mut self, app_id: AppId) -> Option<RefreshTicket> {
        if !self.associate(app_id) {
            return None;
        }
        self.begin_refresh()
    }

    /// Enter `Pending` and hand out a ticket for a new list call. Any ticket
    /// issued earlier becomes stale.
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        let app_id = self.app_id.clone()?;

        self.generation += 1;
        self.state = FetchState::Pending;
        debug!(app_id = %app_id, generation = self.generation, "Refreshing ownership tokens");

        Some(RefreshTicket {
            generation: self.generation,
            app_id,
        })
    }

    /// Apply the outcome of a list call. Returns `false` if the ticket was
    /// stale and the result was dropped.
    pub fn apply(
        &mut self,
        ticket: &RefreshTicket,
        result: GatewayResult<TokenCollection>,
    ) -> bool {
        if ticket.generation != self.generation || self.app_id.as_ref() != Some(&ticket.app_id) {
            debug!(
                app_id = %ticket.app_id,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale token list response"
            );
            return false;
        }

        self.state = match result {
            Ok(tokens) => {
                debug!(app_id = %ticket.app_id, count = tokens.len(), "Ownership tokens loaded");
                FetchState::Success(tokens)
            }
            Err(error) => {
                warn!(app_id = %ticket.app_id, error = %error, "Failed to load ownership tokens");
                FetchState::Error(error)
            }
        };
        true
    }

    /// Record the outcome of a create/revoke according to the policy
    pub fn finish_action<T>(&mut self, action: TokenAction, result: GatewayResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                info!(action = %action, "Token action completed");
                self.last_failure = None;
                Some(value)
            }
            Err(error) => {
                warn!(action = %action, error = %error, "Token action failed");
                if self.action_errors == ActionErrorPolicy::Surface {
                    self.last_failure = Some(ActionFailure { action, error });
                }
                None
            }
        }
    }

    /// Initialize for `app_id` and wait for the initial fetch
    pub async fn mount(&mut self, app_id: AppId) {
        if let Some(ticket) = self.initialize(app_id) {
            self.run(ticket).await;
        }
    }

    /// Re-fetch the full collection. Failures end up in [`FetchState::Error`].
    pub async fn refresh(&mut self) {
        if let Some(ticket) = self.begin_refresh() {
            self.run(ticket).await;
        }
    }

    /// Revoke a token, then refresh regardless of the outcome
    pub async fn revoke(&mut self, token_id: &TokenId) {
        let Some(app_id) = self.app_id.clone() else {
            return;
        };

        let result = self.gateway.revoke(&app_id, token_id).await;
        self.finish_action(TokenAction::Revoke(token_id.clone()), result);
        self.refresh().await;
    }

    /// Create a token, then refresh regardless of the outcome. Returns the
    /// created token, whose secret is not part of later list responses.
    pub async fn create(&mut self, params: &CreateTokenParams) -> Option<Token> {
        let app_id = self.app_id.clone()?;

        let result = match params.validate() {
            Ok(()) => self.gateway.create(&app_id, params).await,
            Err(err) => Err(err),
        };
        let created = self.finish_action(TokenAction::Create, result);
        self.refresh().await;
        created
    }

    async fn run(&mut self, ticket: RefreshTicket) {
        let result = ticket.fetch(self.gateway.as_ref()).await;
        self.apply(&ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::{mock, predicate::*};
    use pretty_assertions::assert_eq;

    use crate::types::TokenState;

    mock! {
        Gateway {}

        #[async_trait]
        impl TokenGateway for Gateway {
            async fn list(&self, app_id: &AppId) -> GatewayResult<TokenCollection>;
            async fn create(
                &self,
                app_id: &AppId,
                params: &CreateTokenParams,
            ) -> GatewayResult<Token>;
            async fn revoke(&self, app_id: &AppId, token_id: &TokenId) -> GatewayResult<()>;
        }
    }

    fn token(id: &str) -> Token {
        Token {
            id: TokenId::from(id),
            name: format!("token {}", id),
            state: TokenState::Unredeemed,
            token: None,
            created: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            changed: None,
        }
    }

    fn collection(ids: &[&str]) -> TokenCollection {
        TokenCollection::new(ids.iter().map(|id| token(id)).collect())
    }

    fn controller(gateway: MockGateway) -> ListController {
        ListController::new(Arc::new(gateway))
    }

    #[test]
    fn test_starts_idle_without_app() {
        let mut ctl = controller(MockGateway::new());
        assert_eq!(ctl.state(), &FetchState::Idle);
        assert!(ctl.state().is_loading());
        assert!(ctl.begin_refresh().is_none());
        assert_eq!(ctl.generation(), 0);
    }

    #[test]
    fn test_initialize_once_per_app() {
        let mut ctl = controller(MockGateway::new());

        let first = ctl.initialize(AppId::from("app1")).unwrap();
        assert_eq!(first.generation(), 1);
        assert_eq!(ctl.state(), &FetchState::Pending);

        assert!(ctl.initialize(AppId::from("app1")).is_none());
        assert_eq!(ctl.generation(), 1);

        let second = ctl.initialize(AppId::from("app2")).unwrap();
        assert_eq!(second.app_id(), &AppId::from("app2"));
        assert_eq!(second.generation(), 2);
    }

    #[tokio::test]
    async fn test_associate_skips_initial_fetch() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create()
            .times(1)
            .returning(|_, _| Ok(token("t1")));
        gateway
            .expect_list()
            .times(1)
            .returning(|_| Ok(collection(&["t1"])));

        let mut ctl = controller(gateway);
        assert!(ctl.associate(AppId::from("app1")));
        assert!(!ctl.associate(AppId::from("app1")));
        assert_eq!(ctl.state(), &FetchState::Idle);
        assert_eq!(ctl.generation(), 0);

        let created = ctl.create(&CreateTokenParams::new("ci")).await;

        assert_eq!(created.map(|t| t.id), Some(TokenId::from("t1")));
        assert_eq!(ctl.generation(), 1);
        assert_eq!(ctl.state(), &FetchState::Success(collection(&["t1"])));
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut ctl = controller(MockGateway::new());
        let old = ctl.initialize(AppId::from("app1")).unwrap();
        let new = ctl.begin_refresh().unwrap();

        // Newer request resolves first, older one arrives late
        assert!(ctl.apply(&new, Ok(collection(&["t2"]))));
        assert!(!ctl.apply(&old, Ok(collection(&["t1"]))));

        assert_eq!(ctl.state(), &FetchState::Success(collection(&["t2"])));
    }

    #[test]
    fn test_stale_app_response_does_not_overwrite_new_app() {
        let mut ctl = controller(MockGateway::new());
        let app1 = ctl.initialize(AppId::from("app1")).unwrap();
        let app2 = ctl.initialize(AppId::from("app2")).unwrap();

        assert!(!ctl.apply(&app1, Err(GatewayError::Timeout)));
        assert_eq!(ctl.state(), &FetchState::Pending);

        assert!(ctl.apply(&app2, Ok(collection(&[]))));
        assert_eq!(ctl.state(), &FetchState::Success(TokenCollection::default()));
    }

    #[test]
    fn test_error_replaces_previous_success() {
        let mut ctl = controller(MockGateway::new());
        let ticket = ctl.initialize(AppId::from("app1")).unwrap();
        ctl.apply(&ticket, Ok(collection(&["t1"])));

        let ticket = ctl.begin_refresh().unwrap();
        ctl.apply(&ticket, Err(GatewayError::network("reset")));

        assert!(ctl.state().tokens().is_none());
        assert_eq!(ctl.state().error(), Some(&GatewayError::network("reset")));
    }

    #[tokio::test]
    async fn test_mount_lists_once() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .with(eq(AppId::from("app1")))
            .times(1)
            .returning(|_| Ok(collection(&["t1", "t2"])));

        let mut ctl = controller(gateway);
        ctl.mount(AppId::from("app1")).await;
        ctl.mount(AppId::from("app1")).await;

        assert_eq!(ctl.state().tokens().map(|t| t.len()), Some(2));
    }

    #[tokio::test]
    async fn test_list_failure_becomes_error_state() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .times(1)
            .returning(|_| Err(GatewayError::Timeout));

        let mut ctl = controller(gateway);
        ctl.mount(AppId::from("app1")).await;

        assert_eq!(ctl.state(), &FetchState::Error(GatewayError::Timeout));
    }

    #[tokio::test]
    async fn test_revoke_refreshes_even_on_failure() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .times(2)
            .returning(|_| Ok(collection(&["t1"])));
        gateway
            .expect_revoke()
            .with(eq(AppId::from("app1")), eq(TokenId::from("t1")))
            .times(1)
            .returning(|_, _| Err(GatewayError::rejected(403, "not-authorized")));

        let mut ctl = controller(gateway);
        ctl.mount(AppId::from("app1")).await;
        ctl.revoke(&TokenId::from("t1")).await;

        // Silent policy: nothing but the unchanged list
        assert!(ctl.last_failure().is_none());
        assert_eq!(ctl.state().tokens().map(|t| t.len()), Some(1));
    }

    #[tokio::test]
    async fn test_surface_policy_records_failure() {
        let mut gateway = MockGateway::new();
        gateway.expect_list().returning(|_| Ok(collection(&[])));
        gateway
            .expect_create()
            .times(1)
            .returning(|_, _| Err(GatewayError::rejected(400, "token-limit-reached")));

        let mut ctl = controller(gateway).with_action_errors(ActionErrorPolicy::Surface);
        ctl.mount(AppId::from("app1")).await;
        let created = ctl.create(&CreateTokenParams::new("ci")).await;

        assert!(created.is_none());
        let failure = ctl.last_failure().unwrap();
        assert_eq!(failure.action, TokenAction::Create);
        assert_eq!(failure.error.message_key(), "token-limit-reached");

        ctl.dismiss_failure();
        assert!(ctl.last_failure().is_none());
    }

    #[tokio::test]
    async fn test_blank_name_skips_gateway_but_refreshes() {
        let mut gateway = MockGateway::new();
        gateway.expect_list().times(2).returning(|_| Ok(collection(&[])));
        gateway.expect_create().never();

        let mut ctl = controller(gateway).with_action_errors(ActionErrorPolicy::Surface);
        ctl.mount(AppId::from("app1")).await;
        assert!(ctl.create(&CreateTokenParams::new(" ")).await.is_none());

        assert_eq!(
            ctl.last_failure().map(|f| f.error.message_key()),
            Some("token-name-required")
        );
    }

    #[tokio::test]
    async fn test_actions_without_app_do_nothing() {
        let mut gateway = MockGateway::new();
        gateway.expect_list().never();
        gateway.expect_revoke().never();
        gateway.expect_create().never();

        let mut ctl = controller(gateway);
        ctl.refresh().await;
        ctl.revoke(&TokenId::from("t1")).await;
        assert!(ctl.create(&CreateTokenParams::new("ci")).await.is_none());
        assert_eq!(ctl.state(), &FetchState::Idle);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(TokenAction::Create.to_string(), "create");
        assert_eq!(TokenAction::Revoke(TokenId::from("t9")).to_string(), "revoke t9");
    }
}
