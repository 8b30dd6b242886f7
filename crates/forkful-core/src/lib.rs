//! Client-side conversation and location logic for Forkful.
//!
//! This crate defines the "ports" (`ChatBackend`, `GeolocationSource`) that
//! the infrastructure layer implements, plus the two stateful components
//! the front end observes: the conversation manager and the location
//! provider. It depends only on `forkful-types` -- never on
//! `forkful-infra` or any HTTP crate.

pub mod backend;
pub mod conversation;
pub mod geolocation;
pub mod location;
