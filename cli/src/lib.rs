//! netdesk CLI library
//!
//! The binary is a thin clap front over these modules: [`config`] and
//! [`session`] manage files under `~/.netdesk`, [`views`] turn backend data
//! into role-specific pages, and [`output`] draws them.

#![warn(clippy::all)]

pub mod config;
pub mod output;
pub mod session;
pub mod views;

pub use views::{ViewContext, ViewOutcome};
