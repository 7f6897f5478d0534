use rayon::prelude::*;

use crate::{
    composition::timeline::Timeline,
    eval::resolver::{ResolvedFrame, resolve_in_bounds},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{OverlayError, OverlayResult},
};

#[derive(Clone, Debug)]
/// How [`resolve_range`] spreads work.
pub struct ResolveThreading {
    /// Resolve chunks on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Frames per chunk; `0` is treated as `1`.
    pub chunk_size: usize,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for ResolveThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Resolve every frame of `range`, returned in frame order.
///
/// The output is identical whether or not `threading.parallel` is set.
#[tracing::instrument(
    skip(timeline, threading),
    fields(parallel = threading.parallel, chunk_size = threading.chunk_size)
)]
pub fn resolve_range(
    timeline: &Timeline,
    range: FrameRange,
    threading: &ResolveThreading,
) -> OverlayResult<Vec<ResolvedFrame>> {
    let total_frames = timeline.total_frames();
    if range.end.0 > total_frames {
        let first_bad = range.start.0.max(total_frames);
        return Err(OverlayError::FrameOutOfBounds {
            frame: i64::try_from(first_bad).unwrap_or(i64::MAX),
            total_frames,
        });
    }

    let len = range.len_frames();
    let mut out = Vec::with_capacity(len.min(4096) as usize);

    if !threading.parallel {
        for f in range.start.0..range.end.0 {
            out.push(resolve_in_bounds(timeline, FrameIndex(f)));
        }
        return Ok(out);
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let mut frames: Vec<ResolvedFrame> = pool.install(|| {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|f| resolve_in_bounds(timeline, FrameIndex(f)))
                .collect()
        });
        out.append(&mut frames);
        chunk_start = chunk_end;
    }

    tracing::debug!(frames = out.len(), "resolved range");
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> OverlayResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(OverlayError::validation(
            "resolve threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| OverlayError::validation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/parallel.rs"]
mod tests;
