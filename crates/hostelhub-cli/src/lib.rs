//! # HostelHub CLI
//!
//! Identity administration for operators with database access.
//!
//! This library crate provides the commands used by the CLI binary. They
//! take any [`hostelhub_db::IdentityStore`], so they run the same against
//! Postgres and the in-memory store.
//!
//! ## Usage
//!
//! ```ignore
//! use hostelhub_cli::admin::create_admin;
//!
//! let store = PgIdentityStore::new(pool);
//! create_admin(&store, "Chief Warden", "ADMIN001", "Sup3rSecret!").await?;
//! ```

pub mod admin;
