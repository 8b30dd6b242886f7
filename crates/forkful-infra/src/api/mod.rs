//! HTTP client for the Forkful recommendation backend.

pub mod client;

pub use client::RestClient;
