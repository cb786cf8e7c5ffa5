// Cover letters: template or LLM drafting, persisted per tracked job.

pub mod handlers;
pub mod prompts;
pub mod repository;
pub mod writer;
