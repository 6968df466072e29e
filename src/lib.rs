//! recipe-pin - Recipe selector preprocessor and dependency pin resolver
//!
//! This library provides the two transformations a recipe build applies
//! before assembling its dependency lists:
//! - Selector filtering: `line  # [win]` is kept or dropped per target
//! - Version pinning: `numpy x.x` becomes `numpy 1.8*` from the configured override

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod render;
pub mod resolver;
pub mod selector;
