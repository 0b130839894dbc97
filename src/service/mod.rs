//! Service layer: alias resolution and local alias lifecycle.
//!
//! [`AliasResolver`] coordinates the alias store, the bridge service, and
//! the federation client. [`RequestContext`] carries the per-request
//! deadline into the upstream calls.

pub mod alias_resolver;
pub mod context;

pub use alias_resolver::AliasResolver;
pub use context::RequestContext;
