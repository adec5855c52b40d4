//! Matching core: contact parsing, canonical skill detection, embedding
//! similarity, and the weighted aggregation that ranks resumes per posting.

pub mod contacts;
pub mod ranking;
pub mod similarity;
pub mod skills;
