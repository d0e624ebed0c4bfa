//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Repositories and catalogs backed by PostgreSQL
//! - `storage` - In-memory repositories and catalogs
//! - `auth` - Session lookup and administrator checks
//! - `clock` - System and fixed clocks in the studio timezone
//! - `http` - Axum REST API

pub mod auth;
pub mod clock;
pub mod http;
pub mod postgres;
pub mod storage;
