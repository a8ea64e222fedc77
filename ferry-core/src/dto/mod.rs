//! Data Transfer Objects
//!
//! Request and response shapes exchanged with the remote services.
//! `ferry-client` translates them to and from the service SDK types, so the
//! executor never depends on an SDK directly. Field names follow the
//! services' JSON protocols.

pub mod ecs;
pub mod logs;
pub mod sts;
