//! Aggregate views over detected skills.

pub mod handlers;
