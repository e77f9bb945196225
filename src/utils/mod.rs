//! Utility modules shared by the content and generator layers.

pub mod date;
pub mod minify;
pub mod slug;
