//! # HostelHub Models
//!
//! Domain models and DTOs for the HostelHub API.
//!
//! # Modules
//!
//! - [`auth`]: login, login response, password change
//! - [`identities`]: the stored identity record, its public views, and the
//!   administration DTOs
//!
//! # Example
//!
//! ```ignore
//! use hostelhub_models::{Identity, PublicProfile, normalize_handle};
//!
//! let handle = normalize_handle(" staff001 ");
//! let profile: PublicProfile = identity.public_profile();
//! ```

pub mod auth;
pub mod identities;

// Re-export commonly used types at crate root for convenience
pub use auth::{ChangePasswordDto, Claims, LoginRequest, LoginResponse, MessageResponse};

pub use identities::{
    Identity, IdentityFilter, NewIdentity, ProfileChanges, PublicProfile, RegisterIdentityDto,
    ResetPasswordDto, SessionUser, UpdateIdentityDto, normalize_handle,
};
