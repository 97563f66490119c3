/// Verbose parse diagnostics

use crate::error::WdiError;
use crate::image::{SectorOutcome, TrackRecord};

/// Receiver for per-track and per-error diagnostics
///
/// Only called when the matching verbosity option is set. Implementations
/// cannot influence the parse.
pub trait Diagnostics {
    /// Called once for every decoded track
    fn track(&mut self, _track: &TrackRecord) {}

    /// Called with the error that aborted the parse
    fn error(&mut self, _error: &WdiError) {}
}

/// Discards all diagnostics
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn track(&mut self, track: &TrackRecord) {
        for line in track_listing(track) {
            log::info!("{}", line);
        }
    }

    fn error(&mut self, error: &WdiError) {
        log::error!("{}", error);
    }
}

/// Describe a track's sector layout, one line per entry
pub fn track_listing(track: &TrackRecord) -> Vec<String> {
    let mut lines = Vec::new();
    let location = format!("Cylinder: {} Head: {}", track.cylinder, track.head);

    if track.is_unreadable() {
        lines.push(format!("{} -> track unreadable (no sector IDs)", location));
        return lines;
    }

    lines.push(format!("{} -> {} sectors per track", location, track.sector_count()));

    let ids = track.sector_ids();
    let cylinders: Vec<String> = ids.iter().map(|id| id.cylinder.to_string()).collect();
    lines.push(format!("Logical cylinder numbers: [{}]", cylinders.join(", ")));

    let sdhs: Vec<String> = ids.iter().map(|id| format!("0x{:02X}", id.sdh)).collect();
    lines.push(format!("SDH bytes: [{}]", sdhs.join(", ")));

    let sectors: Vec<String> = ids.iter().map(|id| id.sector.to_string()).collect();
    let mut layout = format!("Logical sectors: [{}]", sectors.join(", "));
    if let Some(interleave) = track.interleave() {
        layout.push_str(&format!(" ({} interleave)", interleave));
    }
    lines.push(layout);

    for sector in track.sectors() {
        match sector.outcome() {
            SectorOutcome::Good => {}
            outcome => lines.push(format!("Sector {} : {}", sector.number(), outcome)),
        }
    }

    lines
}
