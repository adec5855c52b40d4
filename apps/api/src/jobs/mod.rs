//! Job postings and ranking runs.

pub mod handlers;
pub mod ranking;
