//! Candidate listing and detail views.

pub mod handlers;
