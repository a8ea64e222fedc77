//! Ferry Core
//!
//! Core types and abstractions for the Ferry remote executor.
//!
//! This crate contains:
//! - Domain types: Task identity, calls, definitions, lifecycle states
//! - DTOs: Wire shapes for the container, log and identity services

pub mod domain;
pub mod dto;
