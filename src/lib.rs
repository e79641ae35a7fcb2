// Mode enums expose an Option-returning `from_str`.
#![allow(clippy::should_implement_trait)]

pub mod app;
pub mod common;
pub mod config;
pub mod dns;
pub mod prefs;
pub mod tile;
