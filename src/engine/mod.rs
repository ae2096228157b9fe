pub mod popup;
pub mod rows;

use self::rows::{layout_character_row, layout_double_sided_row, layout_special_row, RowEnv};
use crate::config::{DeviceProfile, LayoutConstants};
use crate::geometry::{Frame, Orientation, PixelGrid};
use crate::model::{KeyId, Keyboard, Page, RowKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub use self::popup::PopupPlacement;

/// Result of one layout pass: the frame of every key on the laid out page.
/// Iterates in key identity order so passes are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFrames {
    frames: BTreeMap<KeyId, Frame>,
}

impl KeyFrames {
    pub fn get(&self, key: KeyId) -> Option<Frame> {
        self.frames.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyId, Frame)> + '_ {
        self.frames.iter().map(|(k, f)| (*k, *f))
    }

    fn insert(&mut self, key: KeyId, frame: Frame) {
        self.frames.insert(key, frame);
    }
}

/// Page-wide lengths every row of a pass shares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageMetrics {
    pub orientation: Orientation,
    pub side_edges: f64,
    pub top_edge: f64,
    pub bottom_edge: f64,
    pub row_gap: f64,
    pub last_row_gap: f64,
    pub row_gap_total: f64,
    pub key_gap: f64,
    pub last_row_key_gap: f64,
    pub last_row_area_ratios: (f64, f64),
    pub row_count: usize,
    pub most_keys_in_row: usize,
    pub key_height: f64,
    pub letter_key_width: f64,
}

/// Geometry solver. Holds no per-pass state; the same inputs always produce
/// the same frames.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    constants: LayoutConstants,
    device: DeviceProfile,
    grid: PixelGrid,
}

impl LayoutEngine {
    pub fn new(constants: LayoutConstants, device: DeviceProfile) -> Self {
        Self {
            grid: PixelGrid::new(device.scale),
            constants,
            device,
        }
    }

    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Resolves every page-wide length for `page` laid out in `bounds`.
    /// `bounds` must be non-degenerate and `page` must have at least one row.
    pub fn page_metrics(&self, page: &Page, bounds: &Frame) -> PageMetrics {
        let c = &self.constants;
        let width = bounds.width;
        let orientation = Orientation::of(bounds, c.landscape_ratio);

        let mut side_edges = c.side_edges(orientation, width);
        let bottom_edge = side_edges;

        let normal_keyboard_size = width - 2.0 * side_edges;
        let shrunk_keyboard_size = c.keyboard_shrunk_size(normal_keyboard_size, self.device.is_pad);
        side_edges += (normal_keyboard_size - shrunk_keyboard_size) / 2.0;

        let top_edge = c.top_edge(orientation, width);
        let row_gap = c.row_gap(orientation, width);
        let last_row_gap = c.last_row_gap(orientation, width);

        let row_count = page.rows.len();
        let most_keys_in_row = page.most_keys_in_row().max(1);

        let row_gap_total = if row_count >= 2 {
            (row_count - 2) as f64 * row_gap + last_row_gap
        } else {
            0.0
        };

        let key_gap = c.key_gap(orientation, width, most_keys_in_row, self.device.is_pad);

        let key_height = {
            let total_gaps = bottom_edge + top_edge + row_gap_total;
            self.grid
                .round((bounds.height - total_gaps) / row_count.max(1) as f64)
        };

        let letter_key_width = {
            let most = most_keys_in_row as f64;
            let total_gaps = side_edges * 2.0 + key_gap * (most - 1.0);
            self.grid.round((width - total_gaps) / most)
        };

        PageMetrics {
            orientation,
            side_edges,
            top_edge,
            bottom_edge,
            row_gap,
            last_row_gap,
            row_gap_total,
            key_gap,
            last_row_key_gap: c.last_row_key_gap(orientation, width),
            last_row_area_ratios: c.last_row_area_ratios(orientation),
            row_count,
            most_keys_in_row,
            key_height,
            letter_key_width,
        }
    }

    /// Frame of row `r` before its keys are placed.
    pub fn row_frame(&self, metrics: &PageMetrics, bounds: &Frame, r: usize) -> Frame {
        let gaps = if r + 1 == metrics.row_count {
            metrics.row_gap_total
        } else {
            r as f64 * metrics.row_gap
        };
        let y = bounds.y + metrics.top_edge + r as f64 * metrics.key_height + gaps;

        self.grid.round_frame(Frame::new(
            bounds.x + metrics.side_edges,
            y,
            bounds.width - 2.0 * metrics.side_edges,
            metrics.key_height,
        ))
    }

    /// Computes the frame of every key on `page_index`.
    ///
    /// Returns `None` when `bounds` has no positive area; the caller skips the pass.
    /// A page index past the end of the keyboard yields an empty mapping.
    pub fn compute_frames(
        &self,
        keyboard: &Keyboard,
        bounds: Frame,
        page_index: usize,
    ) -> Option<KeyFrames> {
        if bounds.is_empty() {
            return None;
        }

        let mut key_frames = KeyFrames::default();

        let Some(page) = keyboard.page(page_index) else {
            warn!(
                "Page {} does not exist on keyboard '{}' ({} pages)",
                page_index,
                keyboard.name,
                keyboard.pages.len()
            );
            return Some(key_frames);
        };
        if page.rows.is_empty() {
            return Some(key_frames);
        }

        let metrics = self.page_metrics(page, &bounds);
        let env = RowEnv {
            grid: self.grid,
            constants: &self.constants,
            orientation: metrics.orientation,
            is_pad: self.device.is_pad,
        };

        for (r, row) in page.rows.iter().enumerate() {
            let frame = self.row_frame(&metrics, &bounds, r);

            let frames = match row.kind {
                RowKind::Character => layout_character_row(
                    &self.grid,
                    row.len(),
                    metrics.letter_key_width,
                    metrics.key_gap,
                    frame,
                ),
                RowKind::DoubleSided => layout_double_sided_row(
                    &env,
                    row.len(),
                    metrics.letter_key_width,
                    metrics.key_gap,
                    frame,
                ),
                RowKind::Special { space_index } => layout_special_row(
                    &self.grid,
                    row.len(),
                    space_index,
                    metrics.last_row_key_gap,
                    metrics.last_row_area_ratios,
                    frame,
                ),
            };

            debug_assert_eq!(row.len(), frames.len(), "row and frames don't match");
            for (key, frame) in row.keys.iter().zip(frames) {
                key_frames.insert(key.id, frame);
            }
        }

        debug!(
            "Laid out {} keys on page {} ({}, {} rows, key {:.1}x{:.1})",
            key_frames.len(),
            page_index,
            metrics.orientation,
            metrics.row_count,
            metrics.letter_key_width,
            metrics.key_height
        );

        Some(key_frames)
    }
}
