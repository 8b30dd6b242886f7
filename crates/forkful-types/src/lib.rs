//! Shared domain types for Forkful.
//!
//! This crate contains the data shapes exchanged with the recommendation
//! backend (chat requests/responses, restaurants, sessions, health) plus the
//! local conversation and location types and their error enums.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod health;
pub mod location;
pub mod preferences;
pub mod restaurant;
pub mod timestamp;
