//! Scene boundaries from `showinfo` output.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PTS_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pts_time:\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("pts_time pattern is valid")
});

/// One detected scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

/// Result of scene detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneReport {
    pub scenes: Vec<Scene>,
    pub scene_count: usize,
    pub total_duration: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Timestamps of the frames `showinfo` reported, in order of appearance.
pub fn parse_cut_times(stderr: &str) -> Vec<f64> {
    stderr
        .lines()
        .filter(|line| line.contains("showinfo"))
        .filter_map(|line| PTS_TIME.captures(line))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t >= 0.0)
        .collect()
}

/// Split `[0, duration]` at the given cuts.
///
/// Cuts closer than `min_length` to the previous boundary are dropped, and a
/// trailing scene shorter than `min_length` is folded into its predecessor.
/// When the duration is unknown (zero) the last cut closes the final scene.
pub fn build_report(cuts: &[f64], duration: f64, min_length: f64) -> SceneReport {
    let mut sorted: Vec<f64> = cuts.to_vec();
    sorted.sort_by(f64::total_cmp);
    let end = sorted.last().copied().unwrap_or(0.0).max(duration);

    let mut boundaries = vec![0.0];
    for cut in sorted {
        let previous = boundaries[boundaries.len() - 1];
        if cut > previous && cut < end && cut - previous >= min_length {
            boundaries.push(cut);
        }
    }
    if boundaries.len() > 1 && end - boundaries[boundaries.len() - 1] < min_length {
        boundaries.pop();
    }
    if end > 0.0 {
        boundaries.push(end);
    }

    let scenes: Vec<Scene> = boundaries
        .windows(2)
        .map(|w| Scene {
            start: round2(w[0]),
            end: round2(w[1]),
            duration: round2(w[1] - w[0]),
        })
        .collect();

    SceneReport {
        scene_count: scenes.len(),
        scenes,
        total_duration: round2(end),
    }
}
