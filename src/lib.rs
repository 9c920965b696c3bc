//! Retail Promotions - Promotion lifecycle and redemption engine
//!
//! This crate manages discount codes for a retail storefront: defining
//! promotions, deriving their lifecycle status from admin intent and
//! validity window, pricing them against orders, and redeeming them
//! exactly once per order under a usage limit.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
