pub mod lesson_plans;
pub mod notifications;
pub mod permissions;
