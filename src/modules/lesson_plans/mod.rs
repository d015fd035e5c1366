//! Lesson plan review workflow.
//!
//! Plans are addressed by their natural key (room, week, schedule type) and
//! move through draft, submitted, approved, and rejected states. Submitting
//! upserts the row and either queues it for review or approves it directly,
//! depending on how the submitter's role resolves against the tenant's
//! permission configuration. Rejected plans carry reviewer notes back to
//! their submitter as a notification and can be resubmitted.

pub mod controller;
pub mod router;
pub mod service;
