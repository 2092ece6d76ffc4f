//! Widgets rendered by the terminal UI
//!
//! Every widget borrows the state it draws and holds nothing between frames.

pub mod actions;
pub mod browser;
pub mod device;
pub mod header;
pub mod log;
pub mod network;
pub mod plot;
pub mod settings;
pub mod updates;
