//! Authentication: credential parsing, password and token verification.
//!
//! Accepted `Authorization` forms:
//! - `Basic base64(username:password)`
//! - `Basic base64(token:<anything>)`, the token standing in for the username
//! - `Bearer <token>`

pub mod extractor;
pub mod password;
pub mod token;

pub use extractor::AuthUser;
pub use token::{Claims, TokenError, TokenSigner};

use crate::{
    models::user::User,
    services::store_service::{StoreError, StoreService},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredentials,
    #[error("invalid Authorization header")]
    MalformedHeader,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid or expired token: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Credentials pulled out of an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Bearer(String),
}

/// Parse an `Authorization` header value.
pub fn parse_authorization(value: &str) -> Result<Credentials, AuthError> {
    let (scheme, rest) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;
    let rest = rest.trim();

    if scheme.eq_ignore_ascii_case("basic") {
        let decoded = STANDARD
            .decode(rest)
            .map_err(|_| AuthError::MalformedHeader)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedHeader)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedHeader)?;
        Ok(Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        })
    } else if scheme.eq_ignore_ascii_case("bearer") && !rest.is_empty() {
        Ok(Credentials::Bearer(rest.to_string()))
    } else {
        Err(AuthError::MalformedHeader)
    }
}

/// Resolves credentials to users and hands out tokens.
#[derive(Clone)]
pub struct AuthService {
    store: StoreService,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(store: StoreService, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.signer.ttl_secs()
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        Ok(self.signer.issue(user.id)?)
    }

    /// Create an account with a freshly hashed password.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if password.trim().is_empty() {
            return Err(StoreError::EmptyField("password").into());
        }
        let plain = password.to_string();
        let hash = tokio::task::spawn_blocking(move || password::hash_password(&plain)).await??;
        Ok(self.store.create_user(username, &hash).await?)
    }

    /// Resolve any accepted credential form to a user.
    ///
    /// For Basic credentials the username slot is tried as a token first.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<User, AuthError> {
        match credentials {
            Credentials::Bearer(token) => self.authenticate_token(&token).await,
            Credentials::Basic { username, password } => match self.signer.verify(&username) {
                Ok(claims) => self.user_for_claims(claims).await,
                Err(_) => self.authenticate_password(&username, password).await,
            },
        }
    }

    pub async fn authenticate_password(
        &self,
        username: &str,
        plain: String,
    ) -> Result<User, AuthError> {
        let Some(user) = self.store.find_user_by_username(username).await? else {
            debug!("login attempt for unknown user {}", username);
            return Err(AuthError::InvalidCredentials);
        };

        let phc = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || password::verify_password(&plain, &phc))
                .await?;
        if matches {
            Ok(user)
        } else {
            debug!(user_id = user.id, "password mismatch");
            Err(AuthError::InvalidCredentials)
        }
    }

    pub async fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.signer.verify(token)?;
        self.user_for_claims(claims).await
    }

    async fn user_for_claims(&self, claims: Claims) -> Result<User, AuthError> {
        self.store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken(TokenError::UnknownSubject))
    }
}
