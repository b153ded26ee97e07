//! Keyboard input mapping

mod handler;

pub use handler::{InputHandler, KeyAction};
