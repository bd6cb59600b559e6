// src/core/mod.rs

pub mod alias;
pub mod color;
pub mod completion;
pub mod config_loader;
pub mod interpolator;
pub mod paths;
pub mod variables;
