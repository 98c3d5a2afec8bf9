//! Key decoding and binding resolution.

pub mod binding;
pub mod input;

pub use binding::matchbind;
pub use input::{Key, KeyInput};
