//! Step definitions for board sync behaviour scenarios.

pub mod given;
pub mod then;
pub mod world;
