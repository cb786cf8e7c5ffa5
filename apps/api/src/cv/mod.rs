// CV intake: PDF text extraction, keyword scanning, storage.

pub mod handlers;
pub mod parser;
pub mod repository;
pub mod skills;
