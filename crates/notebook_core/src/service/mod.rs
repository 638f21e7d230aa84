//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and engine calls into use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod notebook_service;
