pub mod cover_letter;
pub mod cv;
pub mod job;
