//! Embedded prompts
//!
//! Compiled into the binary from .pmt files at build time.

/// Default system prompt seeding every session
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");
