//! Utility functions and shared structures.

pub mod buf;
pub mod consts;
pub mod util;
