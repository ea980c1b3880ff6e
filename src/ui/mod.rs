//! Terminal UI for the consultation flow.
//!
//! - [`chat_loop`]: terminal lifecycle, key handling, and the event loop that
//!   folds background stream events into the [`crate::core::app::App`].
//! - [`renderer`] and [`layout`]: per-page frame composition.
//! - [`theme`]: styles.

pub mod chat_loop;
pub mod layout;
pub mod renderer;
pub mod theme;
