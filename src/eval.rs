//! Per-frame layer resolution.

pub(crate) mod parallel;
pub(crate) mod resolver;
