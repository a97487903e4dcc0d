//! Copyforge - Subscription-Gated AI Campaign Copy Studio
//!
//! This crate implements the entitlement layer for a metered SaaS copy
//! generator: trial accounts with a fixed credit allowance, a credit
//! ledger gated by a pure entitlement evaluator, reconciliation of
//! billing-provider events, and checkout initiation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
