//! Test support: an in-memory [`CatalogApi`] with scripted responses.
//!
//! Each operation returns the configured value, or a rejected-request
//! error when none is configured. A call log lets tests assert which
//! operations were (or were not) reached.

use std::cell::RefCell;

use vitrine_core::{
    AccessToken, CartItemId, CartSnapshot, ProductDetail, ProductId, ProductPage, ProductQuery,
    User,
};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::CatalogApi;

#[derive(Default)]
pub(crate) struct FakeApi {
    /// Response for every cart operation (get/add/update/remove).
    pub cart: Option<CartSnapshot>,
    pub page: Option<ProductPage>,
    pub detail: Option<ProductDetail>,
    pub token: Option<AccessToken>,
    pub user: Option<User>,
    pub calls: RefCell<Vec<&'static str>>,
}

impl FakeApi {
    fn respond<T: Clone>(&self, op: &'static str, value: &Option<T>) -> GatewayResult<T> {
        self.calls.borrow_mut().push(op);
        value.clone().ok_or(GatewayError::Rejected {
            status: 500,
            body: format!("scripted failure for {op}"),
        })
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == op).count()
    }
}

impl CatalogApi for FakeApi {
    async fn list_products(&self, _query: &ProductQuery) -> GatewayResult<ProductPage> {
        self.respond("list_products", &self.page)
    }

    async fn get_product(&self, _id: ProductId) -> GatewayResult<ProductDetail> {
        self.respond("get_product", &self.detail)
    }

    async fn get_cart(&self) -> GatewayResult<CartSnapshot> {
        self.respond("get_cart", &self.cart)
    }

    async fn add_cart_item(
        &self,
        _product_id: ProductId,
        _quantity: u32,
    ) -> GatewayResult<CartSnapshot> {
        self.respond("add_cart_item", &self.cart)
    }

    async fn update_cart_item(
        &self,
        _item_id: CartItemId,
        _quantity: u32,
    ) -> GatewayResult<CartSnapshot> {
        self.respond("update_cart_item", &self.cart)
    }

    async fn remove_cart_item(&self, _item_id: CartItemId) -> GatewayResult<CartSnapshot> {
        self.respond("remove_cart_item", &self.cart)
    }

    async fn login(&self, _email: &str, _password: &str) -> GatewayResult<AccessToken> {
        self.respond("login", &self.token)
    }

    async fn register(&self, _email: &str, _password: &str) -> GatewayResult<User> {
        self.respond("register", &self.user)
    }

    async fn current_user(&self) -> GatewayResult<User> {
        self.respond("current_user", &self.user)
    }
}
