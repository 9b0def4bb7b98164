//! Arithmetic behind the filter graphs: tempo chains, grid cells, crossfade
//! offsets, colour names and split-screen geometry.
//!
//! Everything here is pure and independent of the engine.

use std::fmt;

use vfx_mcp_common::error::{Error, Result};

/// Width of the canvas used by mosaics and split screens.
pub const CANVAS_WIDTH: u32 = 1920;

/// Height of the canvas used by mosaics and split screens.
pub const CANVAS_HEIGHT: u32 = 1080;

/// Lowest factor a single `atempo` stage accepts.
pub const ATEMPO_MIN: f64 = 0.5;

/// Highest factor a single `atempo` stage accepts.
pub const ATEMPO_MAX: f64 = 2.0;

// =============================================================================
// Audio tempo
// =============================================================================

/// Decompose a playback speed into `atempo` stages within [0.5, 2.0].
///
/// Speeds above 2 emit 2.0 stages, halving the remainder while it is still
/// above 2, then one final stage for whatever remains above 1. Speeds below
/// 0.5 mirror this with 0.5 stages. The product of the stages is `speed`.
///
/// ```
/// use vfx_mcp_editor::graph::atempo_chain;
///
/// assert_eq!(atempo_chain(4.0), vec![2.0, 2.0]);
/// assert_eq!(atempo_chain(1.5), vec![1.5]);
/// ```
pub fn atempo_chain(speed: f64) -> Vec<f64> {
    if (ATEMPO_MIN..=ATEMPO_MAX).contains(&speed) {
        return vec![speed];
    }

    let mut stages = Vec::new();
    let mut remaining = speed;
    if speed > ATEMPO_MAX {
        while remaining > ATEMPO_MAX {
            stages.push(ATEMPO_MAX);
            remaining /= ATEMPO_MAX;
        }
        if remaining > 1.0 {
            stages.push(remaining);
        }
    } else {
        while remaining < ATEMPO_MIN {
            stages.push(ATEMPO_MIN);
            remaining /= ATEMPO_MIN;
        }
        if remaining < 1.0 {
            stages.push(remaining);
        }
    }
    stages
}

/// Render an `atempo` chain as comma-separated filters.
pub fn atempo_filters(speed: f64) -> String {
    atempo_chain(speed)
        .iter()
        .map(|s| format!("atempo={}", crate::command::num(*s)))
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// Grid layout
// =============================================================================

/// Largest number of columns or rows a mosaic grid may have.
pub const MAX_GRID_SIDE: u32 = 16;

/// A `cols x rows` mosaic grid on the fixed canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
}

impl GridLayout {
    /// Parse `"WxH"` such as `"2x2"` or `"3x1"`; each side is 1 to
    /// [`MAX_GRID_SIDE`].
    pub fn parse(layout: &str) -> Result<Self> {
        let invalid = || {
            Error::validation(format!(
                "layout: '{}' must be in format 'WxH' (e.g. '2x2', '3x1')",
                layout
            ))
        };
        let (cols, rows) = layout
            .trim()
            .to_lowercase()
            .split_once('x')
            .map(|(c, r)| (c.trim().parse::<u32>(), r.trim().parse::<u32>()))
            .ok_or_else(invalid)?;
        let (cols, rows) = match (cols, rows) {
            (Ok(cols), Ok(rows)) if cols >= 1 && rows >= 1 => (cols, rows),
            _ => return Err(invalid()),
        };
        if cols > MAX_GRID_SIDE || rows > MAX_GRID_SIDE {
            return Err(Error::validation(format!(
                "layout: '{}' exceeds the {max}x{max} maximum grid",
                layout,
                max = MAX_GRID_SIDE
            )));
        }
        Ok(Self { cols, rows })
    }

    /// Number of inputs the grid consumes.
    pub fn cells(&self) -> usize {
        (self.cols as usize).saturating_mul(self.rows as usize)
    }

    /// Pixel size of one cell (integer division of the canvas).
    pub fn cell_size(&self) -> (u32, u32) {
        (CANVAS_WIDTH / self.cols, CANVAS_HEIGHT / self.rows)
    }

    /// Top-left pixel offset of each cell in row-major order.
    pub fn offsets(&self) -> Vec<(u32, u32)> {
        let (w, h) = self.cell_size();
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (col * w, row * h)))
            .collect()
    }

    /// The `xstack` layout string, e.g. `0_0|960_0|0_540|960_540`.
    pub fn xstack_layout(&self) -> String {
        self.offsets()
            .iter()
            .map(|(x, y)| format!("{}_{}", x, y))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

// =============================================================================
// Crossfades
// =============================================================================

/// `xfade` offsets for clips of the given durations joined by transitions of
/// length `transition`.
///
/// The first transition starts at `d0 - t`; each later one at the previous
/// offset plus the previous clip's duration minus `t`.
pub fn crossfade_offsets(durations: &[f64], transition: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(durations.len().saturating_sub(1));
    let mut offset = 0.0;
    for duration in durations.iter().take(durations.len().saturating_sub(1)) {
        offset += duration - transition;
        offsets.push(offset);
    }
    offsets
}

/// Total length of clips joined by overlapping transitions.
pub fn crossfaded_duration(durations: &[f64], transition: f64) -> f64 {
    let total: f64 = durations.iter().sum();
    total - transition * durations.len().saturating_sub(1) as f64
}

// =============================================================================
// Colours
// =============================================================================

/// Named key colours and their hex values.
pub const NAMED_COLORS: &[(&str, &str)] = &[
    ("green", "0x00FF00"),
    ("blue", "0x0000FF"),
    ("red", "0xFF0000"),
    ("cyan", "0x00FFFF"),
    ("magenta", "0xFF00FF"),
    ("yellow", "0xFFFF00"),
    ("white", "0xFFFFFF"),
    ("black", "0x000000"),
    ("gray", "0x808080"),
    ("orange", "0xFFA500"),
    ("purple", "0x800080"),
    ("pink", "0xFFC0CB"),
];

/// Resolve a colour name or hex code to ffmpeg's `0xRRGGBB` form.
///
/// Accepts the names in [`NAMED_COLORS`] (case-insensitive), `#RRGGBB` and
/// `0xRRGGBB`.
pub fn parse_color(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let lower = trimmed.to_lowercase();
    if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok((*hex).to_string());
    }

    let digits = lower
        .strip_prefix('#')
        .or_else(|| lower.strip_prefix("0x"));
    match digits {
        Some(d) if d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()) => {
            Ok(format!("0x{}", d.to_uppercase()))
        }
        _ => Err(Error::validation(format!(
            "color: '{}' is not a known colour name, #RRGGBB or 0xRRGGBB",
            value
        ))),
    }
}

// =============================================================================
// Split screens
// =============================================================================

/// Placement of one split-screen pane on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pane {
    pub width: u32,
    pub height: u32,
}

/// Pane size for `panes` videos in one row (`side_by_side`) or one column,
/// with `border` pixels between neighbours.
pub fn strip_panes(panes: u32, border: u32, side_by_side: bool) -> Pane {
    let gaps = border * panes.saturating_sub(1);
    if side_by_side {
        Pane {
            width: (CANVAS_WIDTH - gaps) / panes,
            height: CANVAS_HEIGHT,
        }
    } else {
        Pane {
            width: CANVAS_WIDTH,
            height: (CANVAS_HEIGHT - gaps) / panes,
        }
    }
}

/// Pane size for a 2x2 split with a border between rows and columns.
pub fn quad_pane(border: u32) -> Pane {
    Pane {
        width: (CANVAS_WIDTH - border) / 2,
        height: (CANVAS_HEIGHT - border) / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // atempo
    // =========================================================================

    #[test]
    fn test_atempo_single_stage() {
        assert_eq!(atempo_chain(1.0), vec![1.0]);
        assert_eq!(atempo_chain(2.0), vec![2.0]);
        assert_eq!(atempo_chain(0.5), vec![0.5]);
    }

    #[test]
    fn test_atempo_four_is_two_stages() {
        assert_eq!(atempo_chain(4.0), vec![2.0, 2.0]);
        assert_eq!(atempo_filters(4.0), "atempo=2,atempo=2");
    }

    #[test]
    fn test_atempo_fractional_remainder() {
        assert_eq!(atempo_chain(3.0), vec![2.0, 1.5]);
        assert_eq!(atempo_chain(10.0), vec![2.0, 2.0, 2.0, 1.25]);
    }

    #[test]
    fn test_atempo_slow_down() {
        assert_eq!(atempo_chain(0.25), vec![0.5, 0.5]);
        assert_eq!(atempo_filters(0.3), "atempo=0.5,atempo=0.6");
    }

    // =========================================================================
    // Grid
    // =========================================================================

    #[test]
    fn test_grid_parse() {
        assert_eq!(GridLayout::parse("2x2").unwrap(), GridLayout { cols: 2, rows: 2 });
        assert_eq!(GridLayout::parse(" 3X1 ").unwrap(), GridLayout { cols: 3, rows: 1 });
        assert!(GridLayout::parse("2by2").is_err());
        assert!(GridLayout::parse("0x2").is_err());
        assert!(GridLayout::parse("x2").is_err());
        assert!(GridLayout::parse("2x").is_err());
        assert!(GridLayout::parse("-1x2").is_err());
    }

    #[test]
    fn test_grid_rejects_oversized_layouts() {
        assert_eq!(GridLayout::parse("16x16").unwrap().cells(), 256);
        assert!(GridLayout::parse("17x1").is_err());
        assert!(GridLayout::parse("1x17").is_err());
        assert!(GridLayout::parse("2000x1").is_err());

        let err = GridLayout::parse("65536x65536").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("maximum grid"));

        let wide = GridLayout { cols: 65536, rows: 65536 };
        assert_eq!(wide.cells(), 65536 * 65536);
    }

    #[test]
    fn test_grid_cells_and_offsets() {
        let grid = GridLayout::parse("2x2").unwrap();
        assert_eq!(grid.cells(), 4);
        assert_eq!(grid.cell_size(), (960, 540));
        assert_eq!(grid.xstack_layout(), "0_0|960_0|0_540|960_540");

        let grid = GridLayout::parse("3x1").unwrap();
        assert_eq!(grid.cell_size(), (640, 1080));
        assert_eq!(grid.offsets(), vec![(0, 0), (640, 0), (1280, 0)]);
        assert_eq!(grid.to_string(), "3x1");
    }

    // =========================================================================
    // Crossfades
    // =========================================================================

    #[test]
    fn test_crossfade_offsets_accumulate() {
        let offsets = crossfade_offsets(&[5.0, 4.0, 6.0], 1.0);
        assert_eq!(offsets, vec![4.0, 7.0]);
        assert_eq!(crossfaded_duration(&[5.0, 4.0, 6.0], 1.0), 13.0);
    }

    #[test]
    fn test_crossfade_offsets_single_clip() {
        assert!(crossfade_offsets(&[5.0], 1.0).is_empty());
        assert!(crossfade_offsets(&[], 1.0).is_empty());
    }

    // =========================================================================
    // Colours
    // =========================================================================

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("green").unwrap(), "0x00FF00");
        assert_eq!(parse_color("Blue").unwrap(), "0x0000FF");
        assert_eq!(parse_color("#1a2b3c").unwrap(), "0x1A2B3C");
        assert_eq!(parse_color("0x00ff00").unwrap(), "0x00FF00");
        assert!(parse_color("chartreuse-ish").is_err());
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("0xGGGGGG").is_err());
    }

    // =========================================================================
    // Split screens
    // =========================================================================

    #[test]
    fn test_strip_panes() {
        assert_eq!(strip_panes(2, 0, true), Pane { width: 960, height: 1080 });
        assert_eq!(strip_panes(2, 4, true), Pane { width: 958, height: 1080 });
        assert_eq!(strip_panes(3, 2, false), Pane { width: 1920, height: 358 });
        assert_eq!(quad_pane(2), Pane { width: 959, height: 539 });
    }

    proptest! {
        /// Every stage is within the engine's limits and the product is the speed.
        #[test]
        fn atempo_product_matches(speed in 0.01f64..100.0) {
            let stages = atempo_chain(speed);
            prop_assert!(!stages.is_empty());
            for stage in &stages {
                prop_assert!(*stage >= ATEMPO_MIN - 1e-12 && *stage <= ATEMPO_MAX + 1e-12);
            }
            let product: f64 = stages.iter().product();
            prop_assert!((product - speed).abs() < 1e-9 * speed.max(1.0));
        }

        /// Cells never overflow the canvas.
        #[test]
        fn grid_cells_fit_canvas(cols in 1u32..=MAX_GRID_SIDE, rows in 1u32..=MAX_GRID_SIDE) {
            let grid = GridLayout::parse(&format!("{}x{}", cols, rows)).unwrap();
            let (w, h) = grid.cell_size();
            prop_assert!(w * cols <= CANVAS_WIDTH);
            prop_assert!(h * rows <= CANVAS_HEIGHT);
            prop_assert_eq!(grid.offsets().len(), grid.cells());
        }

        /// Offsets increase strictly while every clip outlasts the transition.
        #[test]
        fn crossfade_offsets_increase(
            durations in prop::collection::vec(1.5f64..30.0, 2..8),
            transition in 0.1f64..1.0,
        ) {
            let offsets = crossfade_offsets(&durations, transition);
            prop_assert_eq!(offsets.len(), durations.len() - 1);
            prop_assert!(offsets[0] > 0.0);
            for pair in offsets.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
            let total = crossfaded_duration(&durations, transition);
            let last_end = offsets[offsets.len() - 1] + durations[durations.len() - 1];
            prop_assert!((total - last_end).abs() < 1e-9);
        }
    }
}
