//! Micromouse maze simulation kernel.
//!
//! A 16x16 bit-packed wall grid with competition legality checking, a
//! discrete robot pose and motion model, a family of pluggable
//! navigation strategies, and the listener plumbing that lets UIs
//! observe cell changes without polling.

pub mod ai;
pub mod error;
pub mod listener;
pub mod maze;
pub mod render;
pub mod robot;
