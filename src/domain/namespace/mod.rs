//! Namespace domain module
//!
//! Namespaces are owned by teams. The access core only reads them by team.

mod entity;
mod repository;

pub use entity::{Namespace, NamespaceId, NewNamespace};
pub use repository::NamespaceRepository;
