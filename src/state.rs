use crate::{
    auth::{AuthService, TokenSigner},
    services::store_service::StoreService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(db: Arc<SqlitePool>, signer: TokenSigner) -> Self {
        let store = StoreService::new(db);
        let auth = AuthService::new(store.clone(), signer);
        Self { store, auth }
    }
}
