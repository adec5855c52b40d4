//! Resume upload pipeline: store the file, extract text, parse contacts,
//! match skills, embed, persist.

pub mod handlers;
pub mod storage;
