//! Terminal rendering with ratatui

mod renderer;

pub use renderer::Renderer;
