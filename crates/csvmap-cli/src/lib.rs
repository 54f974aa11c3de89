//! Library components for the `csvmap` binary.

pub mod logging;
pub mod pipeline;
