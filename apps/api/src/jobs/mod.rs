// Job matching: runs the match engine against stored CVs, keeps history and the
// user's tracked applications.

pub mod handlers;
pub mod repository;
pub mod status;
