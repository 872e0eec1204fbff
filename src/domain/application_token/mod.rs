//! Application token domain module
//!
//! An application token is a long-lived secret a user creates per
//! application label for non-interactive API access. Only a salted hash of
//! the secret is ever stored.

mod credential;
mod entity;
mod repository;
mod validation;

pub use credential::TokenCredential;
pub use entity::{ApplicationToken, ApplicationTokenId, NewApplicationToken};
pub use repository::ApplicationTokenRepository;
pub use validation::{validate_application, validate_secret, ApplicationTokenValidationError};
