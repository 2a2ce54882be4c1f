//! Application root: owns the stores and the gateway.
//!
//! Stores are explicit state containers injected where needed rather
//! than ambient globals; commands receive the whole `App` and pick the
//! pieces they use.

use vitrine_client::persist::StateStore;
use vitrine_client::store::{AuthStore, CartStore, CompareStore};
use vitrine_client::{ClientConfig, HttpGateway};

/// Everything a command needs: the gateway plus the three stores, all
/// sharing one state directory.
pub struct App {
    pub gateway: HttpGateway,
    pub cart: CartStore,
    pub compare: CompareStore,
    pub auth: AuthStore,
}

impl App {
    /// Load configuration, open the state directory, and construct the
    /// gateway and stores (each reloading its persisted snapshot).
    pub fn init() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        let persist = StateStore::open(&config.state_dir)?;
        let gateway = HttpGateway::new(&config, persist.clone());

        Ok(Self {
            gateway,
            cart: CartStore::load(persist.clone()),
            compare: CompareStore::load(persist.clone()),
            auth: AuthStore::load(persist),
        })
    }

    /// Resolve the identity and report whether cart mutations may be
    /// offered. Cart-mutating commands call this first.
    pub async fn require_login(&mut self) -> bool {
        self.auth.load_user(&self.gateway).await;
        self.auth.is_authenticated()
    }
}
