//! Headless self-play harness: seeded bot-only Cabo rounds written out as JSONL rows plus a
//! Markdown summary.

pub mod config;
pub mod logging;
pub mod rotation;
pub mod runner;
