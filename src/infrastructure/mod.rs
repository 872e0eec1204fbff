//! Infrastructure layer - storage, authentication and services

pub mod application_token;
pub mod audit;
pub mod logging;
pub mod namespace;
pub mod storage;
pub mod team;
pub mod user;
