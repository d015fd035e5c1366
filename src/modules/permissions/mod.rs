//! Permission override module.
//!
//! This module implements the per-tenant permission configuration layer:
//! a static registry of known permissions with default role sets, plus
//! tenant-scoped override rows that replace those defaults entirely.
//! The resolver answers "may this role do this?" and "does the result
//! need review?" for the lesson plan workflow.

pub mod controller;
pub mod router;
pub mod service;
