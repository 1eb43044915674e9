//! Shared UI crate for Fysioscreen. Cross-platform logic and views live
//! here; the `web` and `desktop` crates are thin launchers around it.

pub mod charts;
pub mod components;
pub mod core;
pub mod views;
