//! Utility modules for the Sproutplan API.
//!
//! This module contains shared utilities used throughout the application:
//!
//! - [`auth_helpers`]: Helper functions for tenant scoping from auth claims

pub mod auth_helpers;
