//! In-memory live cookie store.
//!
//! [`InMemoryCookieStore`] behaves like a browser's cookie store as far as the
//! engine can observe it: domain attributes are normalized to a leading dot,
//! writes that the browser would refuse are rejected, and `remove(url, name)`
//! only affects cookies that would be sent to `url`. It also counts every
//! mutation attempt so callers can verify that a code path left the store alone.
//!
//! ## Notes & limitations
//! - Expiration is stored but not enforced.
//! - `Set-Cookie` parsing (see [`InMemoryCookieStore::store_response_cookie`])
//!   handles `Path`, `Domain`, `Max-Age`, `SameSite`, `Secure` and `HttpOnly`;
//!   `Expires` dates are ignored.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use async_trait::async_trait;
use url::Url;
use crate::engine::cookies::cookies::is_subdomain_of;
use crate::engine::cookies::{Cookie, CookieWrite, LiveCookieStore, SameSite};
use crate::engine::errors::CookieError;

#[derive(Debug, Default)]
struct Inner {
    cookies: Vec<Cookie>,
    mutations: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryCookieStore {
    inner: Mutex<Inner>,
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`remove` calls received so far, successful or not.
    pub fn mutation_count(&self) -> usize {
        self.inner.lock().unwrap().mutations
    }

    /// Every cookie currently held.
    pub fn snapshot(&self) -> Vec<Cookie> {
        self.inner.lock().unwrap().cookies.clone()
    }

    /// Cookies that belong to `domain`'s live state.
    pub fn cookies_for(&self, domain: &str) -> Vec<Cookie> {
        self.inner
            .lock()
            .unwrap()
            .cookies
            .iter()
            .filter(|c| c.matches_domain(domain))
            .cloned()
            .collect()
    }

    /// Stores a cookie received in a `Set-Cookie` header of a response for `url`,
    /// the way a page load would. Does not count as a mutation.
    pub fn store_response_cookie(&self, url: &Url, header: &str) -> Result<(), CookieError> {
        let Some((name, rest)) = header.split_once('=') else {
            return Err(CookieError::Rejected { name: header.to_string(), reason: "missing '='".into() });
        };

        let default_path = url.path().rsplit_once('/').map_or("/", |(a, _)| if a.is_empty() { "/" } else { a });
        let mut parts = rest.split(';');
        let mut write = CookieWrite {
            url: url.clone(),
            name: name.trim().to_string(),
            value: parts.next().unwrap_or_default().trim().to_string(),
            path: default_path.to_string(),
            secure: false,
            http_only: false,
            expiration_date: None,
            domain: None,
            same_site: None,
        };

        for part in parts {
            let part = part.trim();
            if let Some((k, v)) = part.split_once('=') {
                let v = v.trim();
                match k.trim().to_ascii_lowercase().as_str() {
                    "path" => write.path = v.to_string(),
                    "domain" => write.domain = Some(v.to_string()),
                    "max-age" => {
                        if let Ok(secs) = v.parse::<f64>() {
                            write.expiration_date = Some(now_secs() + secs);
                        }
                    }
                    "samesite" => {
                        write.same_site = Some(if v.eq_ignore_ascii_case("lax") {
                            SameSite::Lax
                        } else if v.eq_ignore_ascii_case("strict") {
                            SameSite::Strict
                        } else if v.eq_ignore_ascii_case("none") {
                            SameSite::NoRestriction
                        } else {
                            SameSite::Unspecified
                        });
                    }
                    _ => {}
                }
            } else if part.eq_ignore_ascii_case("secure") {
                write.secure = true;
            } else if part.eq_ignore_ascii_case("httponly") {
                write.http_only = true;
            }
        }

        let mut inner = self.inner.lock().unwrap();
        apply_write(&mut inner.cookies, &write)
    }
}

#[async_trait]
impl LiveCookieStore for InMemoryCookieStore {
    async fn get_all(&self, domain: &str) -> Result<Vec<Cookie>, CookieError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .cookies
            .iter()
            .filter(|c| {
                let own = c.bare_domain();
                own.eq_ignore_ascii_case(domain) || is_subdomain_of(own, domain) || is_subdomain_of(domain, own)
            })
            .cloned()
            .collect())
    }

    async fn remove(&self, url: &Url, name: &str) -> Result<(), CookieError> {
        let mut inner = self.inner.lock().unwrap();
        inner.mutations += 1;
        inner.cookies.retain(|c| !(c.name == name && sent_to(c, url)));
        Ok(())
    }

    async fn set(&self, cookie: &CookieWrite) -> Result<(), CookieError> {
        let mut inner = self.inner.lock().unwrap();
        inner.mutations += 1;
        apply_write(&mut inner.cookies, cookie)
    }
}

/// Validates a write like a browser would and upserts it by (name, domain, path).
fn apply_write(cookies: &mut Vec<Cookie>, w: &CookieWrite) -> Result<(), CookieError> {
    let reject = |reason: &str| CookieError::Rejected { name: w.name.clone(), reason: reason.to_string() };

    let host = w.url.host_str().ok_or_else(|| reject("URL has no host"))?.to_ascii_lowercase();
    let is_https = w.url.scheme() == "https";

    if w.secure && !is_https {
        return Err(reject("secure cookie set from an insecure URL"));
    }
    if w.same_site == Some(SameSite::NoRestriction) && !w.secure {
        return Err(reject("SameSite=None requires Secure"));
    }

    let (domain, host_only) = match &w.domain {
        Some(d) => {
            let bare = d.trim_start_matches('.').to_ascii_lowercase();
            if bare != host && !is_subdomain_of(&host, &bare) {
                return Err(reject("domain attribute does not match the URL host"));
            }
            (format!(".{bare}"), false)
        }
        None => (host, true),
    };
    let path = if w.path.starts_with('/') { w.path.clone() } else { "/".to_string() };

    let cookie = Cookie {
        name: w.name.clone(),
        value: w.value.clone(),
        domain,
        path,
        host_only,
        secure: w.secure,
        http_only: w.http_only,
        same_site: w.same_site,
        expiration_date: w.expiration_date,
    };

    // Replace existing cookie with same name, domain and path
    if let Some(existing) = cookies
        .iter_mut()
        .find(|c| c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path)
    {
        *existing = cookie;
    } else {
        cookies.push(cookie);
    }
    Ok(())
}

/// Would `cookie` be sent with a request to `url`?
fn sent_to(cookie: &Cookie, url: &Url) -> bool {
    let host = url.host_str().unwrap_or_default();
    let domain_ok = if cookie.host_only {
        cookie.domain.eq_ignore_ascii_case(host)
    } else {
        let own = cookie.bare_domain();
        own.eq_ignore_ascii_case(host) || is_subdomain_of(host, own)
    };
    let path_ok = url.path().starts_with(&cookie.path);
    let secure_ok = !cookie.secure || url.scheme() == "https";

    domain_ok && path_ok && secure_ok
}

fn now_secs() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or_default()
}
