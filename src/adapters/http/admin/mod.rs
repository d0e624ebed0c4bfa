//! HTTP adapter for staff endpoints: rules, member subscriptions,
//! freeze approval, card adjustment and the catalog.

pub mod dto;
mod handlers;
mod routes;

pub use routes::admin_routes;
