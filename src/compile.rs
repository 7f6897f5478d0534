//! Whole-timeline derivations: frame fingerprints and the cue sheet.

pub(crate) mod cues;
pub(crate) mod fingerprint;
