//! Operator authentication: credential check and server-side sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "carousel_session";

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("System random number generator failed")]
    Random,
}

/// The configured operator credentials.
///
/// Only HMAC tags of the secrets are kept, under a per-process random key,
/// so verification is a constant-time tag comparison regardless of input
/// length.
pub struct Credentials {
    key: hmac::Key,
    username_tag: hmac::Tag,
    password_tag: hmac::Tag,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Result<Self, AuthError> {
        let rng = SystemRandom::new();
        let key = hmac::Key::generate(hmac::HMAC_SHA256, &rng).map_err(|_| AuthError::Random)?;
        Ok(Self {
            username_tag: hmac::sign(&key, username.as_bytes()),
            password_tag: hmac::sign(&key, password.as_bytes()),
            key,
        })
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok =
            hmac::verify(&self.key, username.as_bytes(), self.username_tag.as_ref()).is_ok();
        let password_ok =
            hmac::verify(&self.key, password.as_bytes(), self.password_tag.as_ref()).is_ok();
        username_ok & password_ok
    }
}

/// Live admin sessions, keyed by opaque random token.
pub struct SessionRegistry {
    rng: SystemRandom,
    sessions: Mutex<HashMap<String, DateTime<Utc>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            rng: SystemRandom::new(),
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a new session and return its token.
    pub fn create(&self) -> Result<String, AuthError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        self.rng.fill(&mut bytes).map_err(|_| AuthError::Random)?;
        let token = URL_SAFE_NO_PAD.encode(bytes);

        let now = Utc::now();
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(token.clone(), now + self.ttl);
        Ok(token)
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let now = Utc::now();
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match sessions.get(token) {
            Some(expires_at) if *expires_at > now => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    pub fn revoke(&self, token: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(token);
    }
}

/// Pull the session token out of the `Cookie` request headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.num_seconds()
    )
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
