use crate::{
    composition::timeline::Timeline,
    eval::resolver::active_events,
    foundation::core::{FrameIndex, FrameRange},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A maximal span of frames over which the visible layer stack does not change.
pub struct Cue {
    /// Frames covered by the cue.
    pub range: FrameRange,
    /// Whether the base media track is visible.
    pub media: bool,
    /// Insertion indices of the active events, in draw order.
    pub events: Vec<usize>,
}

/// Partition `[0, total_frames)` into cues.
///
/// Only window edges are visited, so the cost depends on the number of events rather than the
/// number of frames. Every frame's cue lists exactly what [`crate::resolve`] returns for it.
#[tracing::instrument(skip(timeline), fields(events = timeline.len()))]
pub fn cue_sheet(timeline: &Timeline) -> Vec<Cue> {
    let total = timeline.total_frames();
    let mut edges = Vec::with_capacity(timeline.len() * 2 + 4);
    edges.push(0);
    edges.push(total);
    if let Some(m) = timeline.media() {
        edges.push(m.window.start_frame);
        edges.push(m.window.end_frame());
    }
    for e in timeline.events() {
        edges.push(e.window.start_frame);
        edges.push(e.window.end_frame());
    }
    edges.sort_unstable();
    edges.dedup();

    let mut cues: Vec<Cue> = Vec::with_capacity(edges.len());
    for span in edges.windows(2) {
        let (start, end) = (span[0], span[1]);
        let probe = FrameIndex(start);
        let media = timeline.media().is_some_and(|m| m.window.contains(probe));
        let events: Vec<usize> = active_events(timeline, probe)
            .into_iter()
            .map(|(e, _)| e.index)
            .collect();

        if let Some(last) = cues.last_mut()
            && last.media == media
            && last.events == events
        {
            last.range.end = FrameIndex(end);
            continue;
        }
        cues.push(Cue {
            range: FrameRange {
                start: probe,
                end: FrameIndex(end),
            },
            media,
            events,
        });
    }

    tracing::debug!(cues = cues.len(), "cue sheet built");
    cues
}

#[cfg(test)]
#[path = "../../tests/unit/compile/cues.rs"]
mod tests;
