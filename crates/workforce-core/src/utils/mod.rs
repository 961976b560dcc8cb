//! Small shared helpers

mod string;

pub use string::{preview, truncate_str};
