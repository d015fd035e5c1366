//! In-app notifications.
//!
//! Notifications are produced by the review workflow (a rejected plan turns
//! into a `lesson_plan_returned` notification for its submitter) and are
//! consumed by their recipient, who can list, read, and dismiss them.

pub mod controller;
pub mod router;
pub mod service;
