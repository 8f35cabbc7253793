//! Update handlers for controller messages.
//!
//! This module is split into submodules for maintainability:
//! - `player`: playback, queue editing and sink events
//! - `navigation`: view routing and back-navigation
//! - `filter`: search and filter changes

mod filter;
mod navigation;
mod player;

pub use filter::handle_filter;
pub use navigation::handle_navigation;
pub use player::{handle_player, preload_latest};
