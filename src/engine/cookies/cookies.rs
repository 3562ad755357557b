//! Cookie core types.
//!
//! [`Cookie`] is the record as the browser reports it and as it is persisted in
//! a jar. Its serialized shape (`camelCase`, `hostOnly`, `expirationDate`, ...)
//! is part of the stored format and must stay stable.
//!
//! [`CookieWrite`] is what gets handed back to the browser when a saved cookie
//! is replayed. It is derived with [`Cookie::to_write`], which keeps the
//! original scoping intact:
//!
//! - the URL is rebuilt from the `secure` flag, the bare domain and the path;
//! - host-only cookies are written **without** a domain attribute, otherwise
//!   the browser would widen them to every subdomain;
//! - `sameSite` is only sent when the original cookie had one.
//!
//! ```rust
//! use gosub_containers::cookies::Cookie;
//!
//! let c = Cookie {
//!     name: "session".into(),
//!     value: "abc123".into(),
//!     domain: ".example.com".into(),
//!     path: "/".into(),
//!     host_only: false,
//!     secure: true,
//!     http_only: true,
//!     same_site: None,
//!     expiration_date: None, // session cookie
//! };
//! assert!(c.matches_domain("www.example.com"));
//! assert_eq!(c.url().unwrap().as_str(), "https://example.com/");
//! ```

use crate::engine::errors::CookieError;
use serde::{Deserialize, Serialize};
use url::Url;

/// SameSite policy, using the browser extension API's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    NoRestriction,
    Lax,
    Strict,
    Unspecified,
}

/// A cookie as reported by the live cookie store and saved in jars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value (not URL-decoded).
    pub value: String,

    /// Domain as reported by the browser. Domain cookies carry a leading dot
    /// (`.example.com`), host-only cookies the bare host.
    pub domain: String,

    /// Path scoping (e.g., `"/"`).
    pub path: String,

    /// If `true`, the cookie is only sent to its exact host.
    pub host_only: bool,

    /// If `true`, cookie is sent only over HTTPS.
    pub secure: bool,

    /// If `true`, cookie is blocked from access by client-side scripts.
    pub http_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,

    /// Expiration in seconds since the UNIX epoch. Session cookies have `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
}

impl Cookie {
    /// The cookie domain without its leading dot.
    pub fn bare_domain(&self) -> &str {
        self.domain.trim_start_matches('.')
    }

    /// Returns true when this cookie belongs to the live state of `domain`.
    ///
    /// Host-only cookies match their exact host. Domain cookies also match
    /// every subdomain, so `.x.com` belongs to `www.x.com` as well.
    pub fn matches_domain(&self, domain: &str) -> bool {
        let own = self.bare_domain();
        if own.eq_ignore_ascii_case(domain) {
            return true;
        }
        !self.host_only && is_subdomain_of(domain, own)
    }

    /// URL addressing this cookie: scheme by `secure`, bare domain and path.
    pub fn url(&self) -> Result<Url, CookieError> {
        let scheme = if self.secure { "https" } else { "http" };
        let path = if self.path.starts_with('/') { self.path.as_str() } else { "/" };
        let raw = format!("{scheme}://{}{path}", self.bare_domain());
        Url::parse(&raw).map_err(|_| CookieError::InvalidUrl(raw))
    }

    /// URL that removes this cookie while clearing `domain`.
    ///
    /// A parent-domain cookie is addressed through `domain` itself, so a
    /// same-named host-only cookie on the parent stays in place.
    pub fn removal_url(&self, domain: &str) -> Result<Url, CookieError> {
        if self.host_only || self.bare_domain().eq_ignore_ascii_case(domain) {
            return self.url();
        }
        let scheme = if self.secure { "https" } else { "http" };
        let path = if self.path.starts_with('/') { self.path.as_str() } else { "/" };
        let raw = format!("{scheme}://{domain}{path}");
        Url::parse(&raw).map_err(|_| CookieError::InvalidUrl(raw))
    }

    /// Builds the write that recreates this cookie with its original scoping.
    pub fn to_write(&self) -> Result<CookieWrite, CookieError> {
        Ok(CookieWrite {
            url: self.url()?,
            name: self.name.clone(),
            value: self.value.clone(),
            path: self.path.clone(),
            secure: self.secure,
            http_only: self.http_only,
            expiration_date: self.expiration_date,
            domain: (!self.host_only).then(|| self.domain.clone()),
            same_site: self.same_site,
        })
    }
}

/// Parameters of a single write into the live cookie store.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieWrite {
    pub url: Url,
    pub name: String,
    pub value: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub expiration_date: Option<f64>,
    /// `None` creates a host-only cookie for `url`'s host.
    pub domain: Option<String>,
    pub same_site: Option<SameSite>,
}

/// True when `host` is a strict subdomain of `parent` (`a.b.c` of `b.c`).
pub(crate) fn is_subdomain_of(host: &str, parent: &str) -> bool {
    if parent.is_empty() || host.len() <= parent.len() {
        return false;
    }
    let split = host.len() - parent.len();
    host.as_bytes()[split - 1] == b'.' && host[split..].eq_ignore_ascii_case(parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(domain: &str, host_only: bool, secure: bool) -> Cookie {
        Cookie {
            name: "n".into(),
            value: "v".into(),
            domain: domain.into(),
            path: "/app".into(),
            host_only,
            secure,
            http_only: false,
            same_site: None,
            expiration_date: None,
        }
    }

    #[test]
    fn domain_cookie_matches_itself_and_subdomains() {
        let c = cookie(".x.com", false, false);
        assert!(c.matches_domain("x.com"));
        assert!(c.matches_domain("www.x.com"));
        assert!(c.matches_domain("a.b.x.com"));
        assert!(!c.matches_domain("notx.com"));
        assert!(!c.matches_domain("y.com"));
    }

    #[test]
    fn host_only_cookie_matches_exact_host() {
        let c = cookie("x.com", true, false);
        assert!(c.matches_domain("x.com"));
        assert!(c.matches_domain("X.COM"));
        assert!(!c.matches_domain("www.x.com"));
    }

    #[test]
    fn subdomain_cookie_does_not_match_parent() {
        let c = cookie(".www.x.com", false, false);
        assert!(!c.matches_domain("x.com"));
        assert!(!c.matches_domain("api.x.com"));
    }

    #[test]
    fn url_uses_secure_flag_and_bare_domain() {
        assert_eq!(cookie(".x.com", false, true).url().unwrap().as_str(), "https://x.com/app");
        assert_eq!(cookie("x.com", true, false).url().unwrap().as_str(), "http://x.com/app");
    }

    #[test]
    fn parent_cookie_is_removed_through_the_cleared_domain() {
        let parent = cookie(".x.com", false, true);
        assert_eq!(parent.removal_url("www.x.com").unwrap().as_str(), "https://www.x.com/app");
        assert_eq!(parent.removal_url("x.com").unwrap().as_str(), "https://x.com/app");

        let host = cookie("www.x.com", true, false);
        assert_eq!(host.removal_url("www.x.com").unwrap().as_str(), "http://www.x.com/app");
    }

    #[test]
    fn unbuildable_url_is_an_error() {
        let c = cookie("bad host", true, false);
        assert!(matches!(c.url(), Err(CookieError::InvalidUrl(_))));
        assert!(c.to_write().is_err());
    }

    #[test]
    fn host_only_write_omits_domain() {
        let w = cookie("x.com", true, true).to_write().unwrap();
        assert_eq!(w.domain, None);

        let w = cookie(".x.com", false, true).to_write().unwrap();
        assert_eq!(w.domain.as_deref(), Some(".x.com"));
    }

    #[test]
    fn same_site_only_when_set() {
        let mut c = cookie("x.com", true, true);
        assert_eq!(c.to_write().unwrap().same_site, None);
        c.same_site = Some(SameSite::Strict);
        assert_eq!(c.to_write().unwrap().same_site, Some(SameSite::Strict));
    }

    #[test]
    fn serialized_shape_is_stable() {
        let mut c = cookie(".x.com", false, true);
        c.same_site = Some(SameSite::NoRestriction);
        c.expiration_date = Some(1_900_000_000.5);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["hostOnly"], false);
        assert_eq!(json["httpOnly"], false);
        assert_eq!(json["sameSite"], "no_restriction");
        assert_eq!(json["expirationDate"], 1_900_000_000.5);

        let session = cookie("x.com", true, false);
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("expirationDate").is_none());
        let back: Cookie = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn subdomain_check() {
        assert!(is_subdomain_of("www.x.com", "x.com"));
        assert!(!is_subdomain_of("x.com", "x.com"));
        assert!(!is_subdomain_of("wwwx.com", "x.com"));
        assert!(!is_subdomain_of("x.com", ""));
    }
}
