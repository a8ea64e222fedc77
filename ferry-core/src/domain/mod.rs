//! Core domain types
//!
//! This module contains the core domain structures used across Ferry crates.
//! They describe one remote unit of work: who it is, what it runs, where it
//! runs, and how far along it is.

pub mod call;
pub mod definition;
pub mod log;
pub mod network;
pub mod status;
pub mod task;
