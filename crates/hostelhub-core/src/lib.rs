//! # HostelHub Core
//!
//! Core types, errors, and utilities for the HostelHub API.
//!
//! - [`errors`]: [`AppError`] with HTTP response conversion and the
//!   [`AuthError`] taxonomy
//! - [`password`]: bcrypt hashing and verification behind [`HashedSecret`]
//! - [`roles`]: the closed [`Role`] enumeration and [`RoleSet`] allow-lists
//!
//! # Example
//!
//! ```ignore
//! use hostelhub_core::{Role, RoleSet, hash_password, verify_password};
//!
//! let hashed = hash_password("Passw0rd!")?;
//! assert!(verify_password("Passw0rd!", &hashed));
//! assert!(RoleSet::STAFF_AND_ADMIN.contains(Role::Staff));
//! ```

pub mod errors;
pub mod password;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use password::{HashedSecret, hash_password, verify_password};
pub use roles::{Role, RoleSet};
