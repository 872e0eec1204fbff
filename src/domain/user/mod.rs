//! User domain module
//!
//! Users own application tokens and join teams through memberships. The
//! administrator flag lives on the user record.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_password, validate_username, UserValidationError};
