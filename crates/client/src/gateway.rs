//! Storefront API gateway.
//!
//! One typed function per server operation; every outgoing request
//! carries the persisted session identity (`X-Session-ID`) and, when a
//! credential is persisted, an `Authorization: Bearer` header. The
//! credential is re-read per request so a login or logout takes effect
//! without rebuilding the gateway.
//!
//! The gateway performs no retries and no caching; retry policy is the
//! caller's responsibility. It also sets no request timeout - a hung
//! request keeps its caller's optimistic state visible until it
//! resolves. Known limitation, kept deliberately.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use vitrine_core::{
    AccessToken, CartItemId, CartSnapshot, ProductDetail, ProductId, ProductPage, ProductQuery,
    User,
};

use crate::config::ClientConfig;
use crate::error::{GatewayError, GatewayResult, body_snippet};
use crate::persist::StateStore;
use crate::session;

/// Header carrying the opaque session identity.
const SESSION_HEADER: &str = "X-Session-ID";

/// Typed access to the storefront API.
///
/// The state managers are generic over this trait so their optimistic
/// protocol (apply, await confirmation, commit or roll back) can be
/// exercised against a fake without a network.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// List products matching `query` (filter, sort, paging).
    async fn list_products(&self, query: &ProductQuery) -> GatewayResult<ProductPage>;

    /// Fetch a single product with its description.
    async fn get_product(&self, id: ProductId) -> GatewayResult<ProductDetail>;

    /// Fetch the authoritative cart for this session.
    async fn get_cart(&self) -> GatewayResult<CartSnapshot>;

    /// Add `quantity` units of a product; returns the updated cart.
    async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> GatewayResult<CartSnapshot>;

    /// Set a cart line's quantity; returns the updated cart.
    async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: u32,
    ) -> GatewayResult<CartSnapshot>;

    /// Remove a cart line; returns the updated cart.
    async fn remove_cart_item(&self, item_id: CartItemId) -> GatewayResult<CartSnapshot>;

    /// Exchange credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> GatewayResult<AccessToken>;

    /// Create an account.
    async fn register(&self, email: &str, password: &str) -> GatewayResult<User>;

    /// Fetch the identity behind the persisted credential.
    async fn current_user(&self) -> GatewayResult<User>;
}

/// Request body for adding a product to the cart.
#[derive(Debug, Serialize)]
struct AddItemBody {
    product_id: ProductId,
    quantity: u32,
}

/// Request body for changing a cart line's quantity.
#[derive(Debug, Serialize)]
struct UpdateItemBody {
    quantity: u32,
}

/// Request body for registration.
#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// HTTP implementation of [`CatalogApi`].
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    base_url: url::Url,
    session_id: String,
    persist: StateStore,
}

impl HttpGateway {
    /// Create a gateway for the configured API, resolving the session
    /// identity eagerly (generating it on first run).
    #[must_use]
    pub fn new(config: &ClientConfig, persist: StateStore) -> Self {
        let session_id = session::get_or_create_session_id(&persist);

        Self {
            inner: Arc::new(HttpGatewayInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                session_id,
                persist,
            }),
        }
    }

    /// The session identity attached to every request.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Resolve a path against the configured base URL.
    fn url(&self, path: &str) -> GatewayResult<url::Url> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Attach identity headers: session id always, bearer credential
    /// when one is persisted.
    fn with_identity(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header(SESSION_HEADER, &self.inner.session_id);
        match session::load_token(&self.inner.persist) {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and decode the JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> GatewayResult<T> {
        let response = self.with_identity(request).send().await?;
        let status = response.status();

        // Body as text first for better error diagnostics
        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(body_snippet(&text)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body_snippet(&text),
                "storefront API returned non-success status"
            );
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: body_snippet(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body_snippet(&text),
                "failed to decode storefront API response"
            );
            GatewayError::Parse(e)
        })
    }
}

impl CatalogApi for HttpGateway {
    #[instrument(skip(self, query))]
    async fn list_products(&self, query: &ProductQuery) -> GatewayResult<ProductPage> {
        let url = self.url("api/products/")?;
        self.execute(self.inner.client.get(url).query(query)).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> GatewayResult<ProductDetail> {
        let url = self.url(&format!("api/products/{id}/"))?;
        self.execute(self.inner.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn get_cart(&self) -> GatewayResult<CartSnapshot> {
        let url = self.url("api/cart/")?;
        self.execute(self.inner.client.get(url)).await
    }

    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> GatewayResult<CartSnapshot> {
        let url = self.url("api/cart/")?;
        let body = AddItemBody {
            product_id,
            quantity,
        };
        self.execute(self.inner.client.post(url).json(&body)).await
    }

    #[instrument(skip(self), fields(item_id = %item_id, quantity))]
    async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: u32,
    ) -> GatewayResult<CartSnapshot> {
        let url = self.url(&format!("api/cart/{item_id}/"))?;
        let body = UpdateItemBody { quantity };
        self.execute(self.inner.client.put(url).json(&body)).await
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn remove_cart_item(&self, item_id: CartItemId) -> GatewayResult<CartSnapshot> {
        let url = self.url(&format!("api/cart/{item_id}/"))?;
        self.execute(self.inner.client.delete(url)).await
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> GatewayResult<AccessToken> {
        // OAuth2 password-flow shape: form-urlencoded with a `username` field
        let url = self.url("api/auth/login")?;
        let form = [("username", email), ("password", password)];
        self.execute(self.inner.client.post(url).form(&form)).await
    }

    #[instrument(skip(self, password))]
    async fn register(&self, email: &str, password: &str) -> GatewayResult<User> {
        let url = self.url("api/auth/register")?;
        let body = RegisterBody { email, password };
        self.execute(self.inner.client.post(url).json(&body)).await
    }

    #[instrument(skip(self))]
    async fn current_user(&self) -> GatewayResult<User> {
        let url = self.url("api/auth/me")?;
        self.execute(self.inner.client.get(url)).await
    }
}
