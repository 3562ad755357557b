//! Cookie isolation per container for browsers that only expose a single,
//! shared cookie store.
//!
//! The engine keeps one "owner" container per domain. Whenever a tab of another
//! container needs that domain, the live cookies are saved into the owner's jar,
//! purged from the browser, and the incoming container's jar is replayed.
//!
//! See [`ContainerEngine`] for the entry point.

pub mod engine;

pub use engine::*;
