//! Studio Membership - membership and klippekort lifecycle service for a
//! fitness studio.
//!
//! Members subscribe to plans, freeze and cancel them within the studio's
//! binding rules, and spend punch cards on classes. Staff manage the catalog
//! and the studio-wide membership rules.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
