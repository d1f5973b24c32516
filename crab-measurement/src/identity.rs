//! Client / session identity resolution from GA cookies
//!
//! # Cookie formats
//!
//! ```text
//! _ga            GA1.1.<random id>.<first visit ts>
//! _ga_<STREAM>   GS1.1.<session id>.<session number>.<...>
//! ```
//!
//! Malformed or missing cookies never fail: the client id falls back to a
//! synthesized `"<random>.<now>"` value and the session id to a random number.

use crate::cookies::CookieSource;
use rand::Rng;
use shared::analytics::Identity;
use std::ops::Range;

/// Measurement Protocol API version the `_ga` cookie must match
pub const API_VERSION: u8 = 1;

/// Long-lived client cookie
pub const CLIENT_COOKIE: &str = "_ga";

/// Range of the synthesized client id component
const CLIENT_ID_RANGE: Range<u64> = 100_000_000..1_000_000_000;

/// Range of the synthesized session id
const SESSION_ID_RANGE: Range<u64> = 100_000..1_000_000_000;

/// Session cookie name for a measurement id: `G-ABC123` → `_ga_ABC123`
pub fn session_cookie_name(measurement_id: &str) -> String {
    let stream = measurement_id.strip_prefix("G-").unwrap_or(measurement_id);
    format!("_ga_{}", stream)
}

/// Session part of an identity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionData {
    pub id: Option<String>,
    pub number: Option<String>,
}

/// Derives [`Identity`] values from cookie state
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver {
    api_version: u8,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(API_VERSION)
    }
}

impl IdentityResolver {
    pub fn new(api_version: u8) -> Self {
        Self { api_version }
    }

    /// Expected first token of the `_ga` cookie, e.g. `GA1`
    pub fn version_tag(&self) -> String {
        format!("GA{}", self.api_version)
    }

    /// Client id carried by a well-formed `_ga` cookie
    pub fn client_id_from_cookie(&self, cookie: Option<&str>) -> Option<String> {
        let tokens: Vec<&str> = cookie.unwrap_or_default().split('.').collect();
        if tokens.len() < 4 {
            return None;
        }

        if tokens[0] != self.version_tag() {
            tracing::warn!(
                cookie_version = tokens[0],
                expected = %self.version_tag(),
                "Google Analytics cookie version differs from Measurement Protocol API version; please upgrade"
            );
            return None;
        }

        let (user_id, timestamp) = (tokens[2], tokens[3]);
        if user_id.is_empty() || timestamp.is_empty() {
            return None;
        }

        Some(format!("{}.{}", user_id, timestamp))
    }

    /// Client id from the cookie, or a temporary one for `order_ref`
    pub fn client_id<R: Rng + ?Sized>(
        &self,
        cookie: Option<&str>,
        order_ref: &str,
        rng: &mut R,
        now: i64,
    ) -> String {
        if let Some(client_id) = self.client_id_from_cookie(cookie) {
            return client_id;
        }

        let client_id = format!("{}.{}", rng.gen_range(CLIENT_ID_RANGE), now);
        tracing::info!(
            order = order_ref,
            client_id = %client_id,
            "Google Analytics cookie for order {} not found, generated temporary value: {}",
            order_ref,
            client_id
        );
        client_id
    }

    /// Session id / number from the session cookie named `cookie_name`
    pub fn session<R: Rng + ?Sized>(
        &self,
        cookie: Option<&str>,
        cookie_name: &str,
        rng: &mut R,
    ) -> SessionData {
        let cookie = match cookie {
            Some(c) if !c.is_empty() => c,
            _ => {
                let session_id = rng.gen_range(SESSION_ID_RANGE);
                tracing::info!(
                    cookie = cookie_name,
                    session_id,
                    "Google Analytics cookie {} not found, generated random GA session id: {}",
                    cookie_name,
                    session_id
                );
                return SessionData {
                    id: Some(session_id.to_string()),
                    number: None,
                };
            }
        };

        let tokens: Vec<&str> = cookie.split('.').collect();
        if tokens.len() < 4 {
            return SessionData::default();
        }

        SessionData {
            id: Some(tokens[2].to_string()),
            number: Some(tokens[3].to_string()),
        }
    }

    /// Resolve a full identity with explicit randomness and clock
    pub fn resolve_with<R: Rng + ?Sized>(
        &self,
        cookies: &dyn CookieSource,
        measurement_id: &str,
        order_ref: &str,
        rng: &mut R,
        now: i64,
    ) -> Identity {
        let cookie_name = session_cookie_name(measurement_id);
        let session = self.session(cookies.get_cookie(&cookie_name).as_deref(), &cookie_name, rng);
        let client_id = self.client_id(
            cookies.get_cookie(CLIENT_COOKIE).as_deref(),
            order_ref,
            rng,
            now,
        );

        Identity {
            client_id,
            session_id: session.id,
            session_number: session.number,
        }
    }

    /// Resolve a full identity using the thread rng and the current time
    pub fn resolve(
        &self,
        cookies: &dyn CookieSource,
        measurement_id: &str,
        order_ref: &str,
    ) -> Identity {
        self.resolve_with(
            cookies,
            measurement_id,
            order_ref,
            &mut rand::thread_rng(),
            shared::util::now_secs(),
        )
    }
}
