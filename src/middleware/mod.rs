//! Middleware modules for request processing.
//!
//! - [`auth`]: bearer token authentication and the [`auth::CurrentIdentity`]
//!   extractor
//! - [`role`]: role allow-list checks
//!
//! # Request Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `authenticate` verifies the token, loads the identity, and stores a
//!    `CurrentIdentity` in the request extensions
//! 3. `require_roles` checks that identity's role against the route's `RoleSet`
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::CurrentIdentity;
//!
//! async fn get_me(current: CurrentIdentity) -> impl IntoResponse {
//!     // Only reached behind the `authenticate` layer
//! }
//! ```

pub mod auth;
pub mod role;
