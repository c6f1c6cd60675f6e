//! System prompts

mod embedded;

pub use embedded::SYSTEM;
