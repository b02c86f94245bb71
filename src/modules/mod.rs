pub mod auth;
pub mod identities;
