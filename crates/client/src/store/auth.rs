//! Auth state manager: current user identity and token lifecycle.
//!
//! Three states: `Unknown` (not yet checked), `Anonymous` (checked, no
//! valid session), `Authenticated` (the server accepted the persisted
//! credential at the most recent identity check). A failed identity
//! check silently demotes to anonymous and discards the credential -
//! it never blocks the view.
//!
//! This manager gates cart-mutating actions elsewhere: views offer
//! mutation affordances only when the state is authenticated.

use vitrine_core::User;

use crate::gateway::CatalogApi;
use crate::persist::{StateStore, keys};
use crate::session;

/// Identity as currently known to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState<'a> {
    /// No identity check has completed yet.
    Unknown,
    /// Checked: no valid session.
    Anonymous,
    /// Checked: the server confirmed this user.
    Authenticated(&'a User),
}

/// Owner of the current user identity.
#[derive(Debug)]
pub struct AuthStore {
    user: Option<User>,
    /// Distinguishes "not yet determined" from "determined anonymous".
    loaded: bool,
    persist: StateStore,
}

impl AuthStore {
    /// Construct the store. The last confirmed user is reloaded as a
    /// provisional value for instant display, but the state stays
    /// `Unknown` until [`Self::load_user`] confirms it.
    #[must_use]
    pub fn load(persist: StateStore) -> Self {
        let user = persist.load::<Option<User>>(keys::AUTH).flatten();
        Self {
            user,
            loaded: false,
            persist,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AuthState<'_> {
        if !self.loaded {
            AuthState::Unknown
        } else {
            self.user
                .as_ref()
                .map_or(AuthState::Anonymous, AuthState::Authenticated)
        }
    }

    /// The confirmed user, if the state is authenticated.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        if self.loaded { self.user.as_ref() } else { None }
    }

    /// Whether cart-mutating affordances should be offered.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.loaded && self.user.is_some()
    }

    /// Install an identity check result and persist it.
    fn set_user(&mut self, user: Option<User>) {
        self.user = user;
        self.loaded = true;
        self.persist.save(keys::AUTH, &self.user);
    }

    /// Accept a credential: persist it, drop back to `Unknown`, then
    /// immediately confirm the identity behind it.
    pub async fn set_token<G: CatalogApi>(&mut self, gateway: &G, token: &str) {
        session::save_token(&self.persist, token);
        self.loaded = false;
        self.load_user(gateway).await;
    }

    /// Resolve the identity state.
    ///
    /// Without a persisted credential this settles to anonymous with no
    /// network call. With one, the identity endpoint decides; any
    /// failure (expired or invalid credential, network error) discards
    /// the credential and demotes to anonymous.
    pub async fn load_user<G: CatalogApi>(&mut self, gateway: &G) {
        if session::load_token(&self.persist).is_none() {
            self.set_user(None);
            return;
        }

        match gateway.current_user().await {
            Ok(user) => self.set_user(Some(user)),
            Err(error) => {
                tracing::warn!(%error, "identity check failed, demoting to anonymous");
                session::clear_token(&self.persist);
                self.set_user(None);
            }
        }
    }

    /// Discard the credential and become anonymous, unconditionally and
    /// synchronously.
    pub fn logout(&mut self) {
        session::clear_token(&self.persist);
        self.set_user(None);
    }

    /// Exchange credentials for a token and confirm the identity behind
    /// it. Returns whether the session ended up authenticated.
    pub async fn login<G: CatalogApi>(&mut self, gateway: &G, email: &str, password: &str) -> bool {
        match gateway.login(email, password).await {
            Ok(token) => {
                self.set_token(gateway, &token.access_token).await;
                self.is_authenticated()
            }
            Err(error) => {
                tracing::warn!(%error, "login rejected");
                false
            }
        }
    }

    /// Create an account. Returns the created user, or `None` on
    /// rejection (already registered, weak password, ...).
    pub async fn register<G: CatalogApi>(
        &mut self,
        gateway: &G,
        email: &str,
        password: &str,
    ) -> Option<User> {
        match gateway.register(email, password).await {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!(%error, "registration rejected");
                None
            }
        }
    }
}
