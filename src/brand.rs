//! Brand style records: color parsing and the validated [`BrandProfile`](crate::BrandProfile).

pub(crate) mod color;
pub(crate) mod profile;
