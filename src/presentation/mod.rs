//! HTML fragment rendering.

pub mod views;
