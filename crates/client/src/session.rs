//! Session identity and credential persistence.
//!
//! The session identity is an opaque client-generated string, created
//! once per state directory and sent on every request so the server can
//! associate anonymous carts before login. It is never regenerated once
//! created.
//!
//! The bearer credential lives next to it; it is an external persisted
//! secret from the state managers' point of view, handled as a
//! [`SecretString`] in memory.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::SecretString;

use crate::persist::{StateStore, keys};

/// Length of the random suffix in a generated session id.
const SESSION_SUFFIX_LEN: usize = 9;

/// Return the persisted session identity, generating and persisting one
/// on first use.
pub fn get_or_create_session_id(store: &StateStore) -> String {
    if let Some(id) = store.load::<String>(keys::SESSION) {
        return id;
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(SESSION_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    let id = format!("sess_{millis}_{suffix}");
    store.save(keys::SESSION, &id);
    tracing::debug!(session_id = %id, "generated session identity");
    id
}

/// Load the persisted bearer credential, if any.
#[must_use]
pub fn load_token(store: &StateStore) -> Option<SecretString> {
    store.load::<String>(keys::TOKEN).map(SecretString::from)
}

/// Persist the bearer credential.
pub fn save_token(store: &StateStore, token: &str) {
    store.save(keys::TOKEN, &token);
}

/// Discard the persisted bearer credential.
pub fn clear_token(store: &StateStore) {
    store.remove(keys::TOKEN);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_session_id_is_created_once() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::open(tmp.path()).unwrap();

        let first = get_or_create_session_id(&store);
        let second = get_or_create_session_id(&store);

        assert!(first.starts_with("sess_"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_session_id_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let first = {
            let store = StateStore::open(tmp.path()).unwrap();
            get_or_create_session_id(&store)
        };
        let store = StateStore::open(tmp.path()).unwrap();
        assert_eq!(get_or_create_session_id(&store), first);
    }

    #[test]
    fn test_token_lifecycle() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::open(tmp.path()).unwrap();

        assert!(load_token(&store).is_none());

        save_token(&store, "tok-123");
        let token = load_token(&store).unwrap();
        assert_eq!(token.expose_secret(), "tok-123");

        clear_token(&store);
        assert!(load_token(&store).is_none());
    }
}
