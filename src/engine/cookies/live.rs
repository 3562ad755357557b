use std::sync::Arc;
use async_trait::async_trait;
use url::Url;
use crate::engine::cookies::{Cookie, CookieWrite};
use crate::engine::errors::CookieError;

/// The browser's single, shared cookie store.
///
/// There is no container axis here: the engine repurposes this one store for
/// whichever container currently owns a domain.
#[async_trait]
pub trait LiveCookieStore: Send + Sync {
    /// Returns the live cookies related to `domain`.
    ///
    /// The result must include every cookie for which
    /// [`Cookie::matches_domain`] holds. It may include more; callers filter.
    async fn get_all(&self, domain: &str) -> Result<Vec<Cookie>, CookieError>;

    /// Removes the cookie `name` that would be sent to `url`.
    async fn remove(&self, url: &Url, name: &str) -> Result<(), CookieError>;

    /// Creates or overwrites a cookie.
    async fn set(&self, cookie: &CookieWrite) -> Result<(), CookieError>;
}

/// Shared handle to the live cookie store.
pub type LiveCookieHandle = Arc<dyn LiveCookieStore>;
