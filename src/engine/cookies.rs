// src/engine/cookies.rs
//! Cookies: the [`Cookie`] record, the live [`LiveCookieStore`] the browser
//! exposes, and the per-(domain, container) [`CookieJarStore`].

mod cookies;
mod in_memory;
mod jar_store;
mod live;

pub use cookies::{Cookie, CookieWrite, SameSite};
pub use in_memory::InMemoryCookieStore;
pub use jar_store::CookieJarStore;
pub use live::{LiveCookieHandle, LiveCookieStore};
