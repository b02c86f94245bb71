//! # HostelHub Auth
//!
//! Session token types and utilities for the HostelHub API.
//!
//! - [`claims`]: the JWT claim structure ([`Claims`])
//! - [`jwt`]: [`TokenIssuer`] for minting and verifying tokens
//!
//! Tokens are stateless: nothing is stored server-side, and a token stays
//! valid until it expires. The identity's liveness is checked separately by
//! the request authentication gate.

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{IssuedToken, TokenError, TokenIssuer};
