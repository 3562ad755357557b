//! Site policies ("always open this site in…") and the navigation resolver
//! that enforces them.

mod resolver;
mod sites;

pub use resolver::{NavigationPolicyResolver, Resolution};
pub use sites::SitePolicyTable;
