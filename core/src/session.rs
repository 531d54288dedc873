//! Session credential storage.
//!
//! The server identifies a session by a cookie it sets on signup/login. A
//! browser would replay that cookie automatically; here `Session` keeps the
//! pairs and `Connection` copies them onto every outgoing request. The
//! stored value is opaque: nothing in the client reads or builds it.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use cookie::Cookie;

use crate::http::{HttpRequest, HttpResponse};

/// Cloneable handle to the cookies of the current session.
///
/// Clones share storage, so the transport and the auth service see the same
/// credential.
#[derive(Debug, Clone, Default)]
pub struct Session {
    cookies: Arc<RwLock<BTreeMap<String, String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every `Set-Cookie` of `response`. An empty value or a
    /// non-positive `Max-Age` deletes the cookie instead.
    pub fn store_from(&self, response: &HttpResponse) {
        let mut cookies = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
        for header in response.header_values("set-cookie") {
            let Ok(cookie) = Cookie::parse(header) else {
                tracing::debug!(header, "ignoring malformed set-cookie");
                continue;
            };
            if expires_now(&cookie) {
                cookies.remove(cookie.name());
            } else {
                cookies.insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }
    }

    pub fn clear(&self) {
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn is_active(&self) -> bool {
        !self
            .cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Value for a `cookie` request header, `None` when nothing is stored.
    pub fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookies.read().unwrap_or_else(PoisonError::into_inner);
        if cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = cookies.iter().map(|(k, v)| format!("{k}={v}")).collect();
        Some(pairs.join("; "))
    }

    pub fn attach(&self, request: &mut HttpRequest) {
        if let Some(value) = self.cookie_header() {
            request.set_header("cookie", &value);
        }
    }
}

fn expires_now(cookie: &Cookie<'_>) -> bool {
    cookie.value().is_empty() || cookie.max_age().is_some_and(|age| !age.is_positive())
}
