//! Authentication results and team authorization
//!
//! A [`Principal`] is resolved once per request, either from an interactive
//! session or from an application token header. Every team-scoped operation
//! then asks the [`TeamAuthorizationScope`] what the principal may see and do.

mod failure;
mod policy;
mod principal;
mod scope;

pub use failure::AuthenticationFailure;
pub use policy::{evaluate, PrincipalKind, ResourceKind, TeamAction, TeamCreationPolicy};
pub use principal::{AuthMethod, Principal};
pub use scope::TeamAuthorizationScope;
