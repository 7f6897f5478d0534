//! Authoring side: the event catalog, timeline construction, insight compilation and the
//! encoder-facing descriptor.

pub(crate) mod descriptor;
pub(crate) mod event;
pub(crate) mod insights;
pub(crate) mod timeline;
