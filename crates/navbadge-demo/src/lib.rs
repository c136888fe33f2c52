#![forbid(unsafe_code)]

//! Scripted driver for the navbadge navigation bar.
//!
//! [`screen::BadgesScreen`] plays the role of the hosting UI: it subscribes a
//! renderer to the badge store while attached and turns navigation and menu
//! events into store operations. The `navbadge` binary feeds it a step
//! script and prints the bar after every step.

pub mod cli;
pub mod error;
pub mod screen;
pub mod script;

pub use cli::{Cli, run, run_from_env};
pub use error::{DemoError, Result};
