/// Sector interleave detection

use std::fmt;

/// Physical to logical sector interleave of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interleave {
    /// Consecutive logical sectors are K physical slots apart (K:1)
    Ratio(usize),
    /// No uniform distance between consecutive logical sectors
    Unknown,
}

impl fmt::Display for Interleave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interleave::Ratio(k) => write!(f, "{}:1", k),
            Interleave::Unknown => write!(f, "unknown"),
        }
    }
}

/// Detect the interleave from logical sector numbers in physical order
///
/// Returns `None` for an empty track. Tracks with fewer than three
/// sectors are reported as 1:1.
pub fn detect_interleave(sector_map: &[u8]) -> Option<Interleave> {
    if sector_map.is_empty() {
        return None;
    }
    if sector_map.len() < 3 {
        return Some(Interleave::Ratio(1));
    }

    Some(uniform_distance(sector_map).map_or(Interleave::Unknown, Interleave::Ratio))
}

/// Distance from `start` to the next slot holding `sector_map[start] + 1`
fn successor_distance(sector_map: &[u8], start: usize) -> Option<usize> {
    let next = sector_map[start].checked_add(1)?;
    sector_map[start..].iter().position(|&s| s == next)
}

fn uniform_distance(sector_map: &[u8]) -> Option<usize> {
    let interleave = successor_distance(sector_map, 0)?;

    // Only slots with more than `interleave` entries after them are checked
    let checked = sector_map.len().saturating_sub(interleave + 1);
    for idx in 0..checked {
        if successor_distance(sector_map, idx + 1)? != interleave {
            return None;
        }
    }

    Some(interleave)
}
