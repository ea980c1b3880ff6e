//! Headstart is a terminal client for a guided service consultation.
//!
//! A session moves through three pages: a welcome screen, a consultation
//! chat whose assistant replies stream in from a remote endpoint, and a list
//! of recommended services with a booking form.
//!
//! - [`core`] owns the session state machine, the streaming chat exchange,
//!   and configuration.
//! - [`ui`] renders the pages and runs the interactive event loop.
//! - [`cli`] parses arguments and dispatches into the interactive session or
//!   the one-shot `say` command.
//!
//! The binary (`src/main.rs`) only calls [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
