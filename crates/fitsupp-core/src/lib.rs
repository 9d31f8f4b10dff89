pub mod catalog;
pub mod designer;
pub mod error;
pub mod exercises;
pub mod ids;
pub mod profile;
pub mod recommend;
pub mod schedule;
pub mod stack;
pub mod workout;
