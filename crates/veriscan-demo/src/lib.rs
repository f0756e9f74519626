#![forbid(unsafe_code)]

//! VeriScan showcase: the product page wired together.
//!
//! This crate is the thin glue around the controllers in `veriscan-ui`:
//! section layout and scrolling, the collapsible nav menu, anchor jumps
//! with a fixed-header offset, and two front ends (interactive terminal
//! and a deterministic headless script).

pub mod app;
pub mod cli;
pub mod page;
pub mod script;
pub mod tui;
