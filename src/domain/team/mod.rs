//! Team domain module
//!
//! Teams group users through memberships and own namespaces. Every
//! team-scoped read goes through the authorization scope in `domain::auth`.

mod entity;
mod membership;
mod repository;
mod validation;

pub use entity::{NewTeam, Team, TeamId};
pub use membership::{TeamMembership, TeamRole};
pub use repository::TeamRepository;
pub use validation::{validate_team_description, validate_team_name, TeamValidationError};
