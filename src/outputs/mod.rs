//! Report rendering.
//!
//! # Submodules
//!
//! - [`text`]: sectioned plain-text report for the terminal
//! - [`json`]: pretty-printed JSON for scripts and other tools
//!
//! Both render to a `String`; `main` decides where it goes.

pub mod json;
pub mod text;
