//! HTTP adapter for membership endpoints.
//!
//! Exposes the subscription lifecycle to members via REST API:
//! - `GET /api/membership` - Current subscription
//! - `POST /api/membership` - Subscribe
//! - `POST /api/membership/default` - Subscribe to the default plan
//! - `POST /api/membership/change` - Change plan
//! - `POST /api/membership/cancel` - Cancel
//! - `POST /api/membership/freeze` - Request a freeze
//! - `POST /api/membership/freeze/cancel` - Withdraw a freeze request
//! - `POST /api/membership/unfreeze` - Unfreeze
//! - `GET /api/memberships` - Active plans

pub mod dto;
mod handlers;
mod routes;

pub use routes::membership_routes;
