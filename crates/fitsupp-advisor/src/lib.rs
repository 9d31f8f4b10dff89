pub mod advisor;
pub mod chat_log;
pub mod config;
pub mod error;
pub mod fallback;
pub mod openai;
pub mod prompt;
