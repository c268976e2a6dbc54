//! HTTP Handlers

mod chapter;
mod ping;
mod story;
mod websocket;

pub use chapter::*;
pub use ping::*;
pub use story::*;
pub use websocket::*;
