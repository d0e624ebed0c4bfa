//! HTTP adapter for klippekort (punch card) endpoints.

pub mod dto;
mod handlers;
mod routes;

pub use routes::klippekort_routes;
