use crate::{
    composition::event::OverlayKind,
    eval::resolver::{ResolvedFrame, ResolvedLayer},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
/// 128-bit digest of a resolved frame.
pub struct FrameFingerprint {
    /// First lane.
    pub hi: u64,
    /// Second lane.
    pub lo: u64,
}

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Digest every field of a resolved frame.
///
/// Equal frames always produce equal fingerprints, across runs and platforms.
pub fn fingerprint_frame(frame: &ResolvedFrame) -> FrameFingerprint {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_u64_pair(&mut a, &mut b, frame.frame.0);
    match &frame.media {
        Some(m) => {
            write_u8_pair(&mut a, &mut b, 1);
            write_str_pair(&mut a, &mut b, &m.source);
            write_u64_pair(&mut a, &mut b, m.local_frame);
            write_u64_pair(&mut a, &mut b, m.source_time_secs.to_bits());
        }
        None => write_u8_pair(&mut a, &mut b, 0),
    }

    write_u64_pair(&mut a, &mut b, frame.layers.len() as u64);
    for layer in &frame.layers {
        write_layer(&mut a, &mut b, layer);
    }

    FrameFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_layer(a: &mut Fnv1a64, b: &mut Fnv1a64, layer: &ResolvedLayer) {
    write_u64_pair(a, b, layer.event_index as u64);
    write_u8_pair(a, b, layer.layer_class.rank());
    write_u64_pair(a, b, layer.z_order as u64);
    write_u64_pair(a, b, layer.window.start_frame);
    write_u64_pair(a, b, layer.window.duration_frames);
    write_u64_pair(a, b, layer.local_frame);
    write_u64_pair(a, b, layer.local_progress.to_bits());
    write_payload(a, b, &layer.payload);
}

fn write_payload(a: &mut Fnv1a64, b: &mut Fnv1a64, payload: &OverlayKind) {
    write_str_pair(a, b, payload.name());
    match payload {
        OverlayKind::TitleCard(t) => {
            write_str_pair(a, b, &t.text);
            write_str_pair(a, b, &t.quarter_label);
            write_u64_pair(a, b, u64::from(t.year));
        }
        OverlayKind::MetricOverlay(m) => {
            write_str_pair(a, b, &m.metric_name);
            write_str_pair(a, b, &m.value);
            write_str_pair(a, b, &m.change_label);
            write_u8_pair(a, b, m.change_sign as u8);
            write_u8_pair(a, b, m.screen_position as u8);
            write_u8_pair(a, b, m.animation_style as u8);
        }
        OverlayKind::SpeakerLabel(s) => {
            write_str_pair(a, b, &s.person_name);
            write_str_pair(a, b, &s.person_title);
            write_u8_pair(a, b, s.screen_position as u8);
            write_u8_pair(a, b, u8::from(s.show_photo));
        }
        OverlayKind::LogoWatermark(l) => {
            write_u8_pair(a, b, l.screen_position as u8);
            write_u8_pair(a, b, l.size_class as u8);
            write_u64_pair(a, b, l.opacity.to_bits());
        }
        OverlayKind::CallToAction(c) => {
            write_str_pair(a, b, &c.message);
            write_str_pair(a, b, &c.url);
            write_u8_pair(a, b, u8::from(c.show_subscribe));
        }
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
