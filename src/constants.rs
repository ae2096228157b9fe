//! Bracket lookup for width-dependent layout constants.
//!
//! Every magic width threshold goes through [`find_threshold`]: a table of
//! `N` values and `N - 1` ascending thresholds, where a measurement picks the
//! value of the highest threshold it reaches, defaulting to the first value.

use crate::config::LayoutConstants;
use crate::geometry::Orientation;
use serde::{Deserialize, Serialize};

/// Index of the bracket `measurement` falls into: the number of thresholds
/// less than or equal to it.
pub fn find_threshold_index<W: PartialOrd + Copy>(thresholds: &[W], measurement: W) -> usize {
    for (i, threshold) in thresholds.iter().rev().enumerate() {
        if measurement >= *threshold {
            return thresholds.len() - i;
        }
    }
    0
}

/// Panics when `values.len() != thresholds.len() + 1`. A malformed table is
/// a configuration defect, not a runtime condition.
pub fn find_threshold<T: Copy, W: PartialOrd + Copy>(
    values: &[T],
    thresholds: &[W],
    measurement: W,
) -> T {
    assert!(
        values.len() == thresholds.len() + 1,
        "elements and thresholds do not match ({} values, {} thresholds)",
        values.len(),
        thresholds.len()
    );
    values[find_threshold_index(thresholds, measurement)]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piecewise {
    pub values: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl Piecewise {
    pub fn new(values: Vec<f64>, thresholds: Vec<f64>) -> Self {
        Self { values, thresholds }
    }

    pub fn is_well_formed(&self) -> bool {
        self.values.len() == self.thresholds.len() + 1
    }

    #[inline]
    pub fn resolve(&self, measurement: f64) -> f64 {
        find_threshold(&self.values, &self.thresholds, measurement)
    }

    #[inline]
    pub fn index(&self, measurement: f64) -> usize {
        find_threshold_index(&self.thresholds, measurement)
    }
}

impl LayoutConstants {
    pub fn side_edges(&self, orientation: Orientation, width: f64) -> f64 {
        match orientation {
            Orientation::Portrait => self.side_edges_portrait.resolve(width),
            Orientation::Landscape => self.side_edges_landscape,
        }
    }

    pub fn top_edge(&self, orientation: Orientation, width: f64) -> f64 {
        match orientation {
            Orientation::Portrait => self.top_edge_portrait.resolve(width),
            Orientation::Landscape => self.top_edge_landscape,
        }
    }

    pub fn row_gap(&self, orientation: Orientation, width: f64) -> f64 {
        match orientation {
            Orientation::Portrait => self.row_gap_portrait.resolve(width),
            Orientation::Landscape => self.row_gap_landscape,
        }
    }

    /// The gap above the last row. Portrait devices in one bracket use a
    /// tighter gap there than between the other rows.
    pub fn last_row_gap(&self, orientation: Orientation, width: f64) -> f64 {
        match orientation {
            Orientation::Portrait => {
                let index = self.row_gap_portrait.index(width);
                if index == self.row_gap_portrait_last_row_index {
                    self.row_gap_portrait_last_row
                } else {
                    self.row_gap_portrait.values[index]
                }
            }
            Orientation::Landscape => self.row_gap_landscape,
        }
    }

    pub fn is_compressed(&self, row_character_count: usize) -> bool {
        row_character_count >= self.key_compressed_threshold
    }

    pub fn key_gap(
        &self,
        orientation: Orientation,
        width: f64,
        row_character_count: usize,
        is_pad: bool,
    ) -> f64 {
        match orientation {
            Orientation::Portrait => self.key_gap_portrait(width, row_character_count),
            Orientation::Landscape => self.key_gap_landscape(width, row_character_count, is_pad),
        }
    }

    pub fn key_gap_portrait(&self, width: f64, row_character_count: usize) -> f64 {
        if self.is_compressed(row_character_count)
            && width < self.key_gap_portrait_uncompress_threshold
        {
            self.key_gap_portrait_small
        } else {
            self.key_gap_portrait_normal
        }
    }

    pub fn key_gap_landscape(&self, width: f64, row_character_count: usize, is_pad: bool) -> f64 {
        if self.is_compressed(row_character_count) || self.keyboard_is_shrunk(width, is_pad) {
            self.key_gap_landscape_small
        } else {
            self.key_gap_landscape_normal
        }
    }

    pub fn last_row_key_gap(&self, orientation: Orientation, width: f64) -> f64 {
        match orientation {
            Orientation::Portrait => self.last_row_key_gap_portrait,
            Orientation::Landscape => self.last_row_key_gap_landscape.resolve(width),
        }
    }

    pub fn last_row_area_ratios(&self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Portrait => (
                self.last_row_left_area_ratio_portrait,
                self.last_row_right_area_ratio_portrait,
            ),
            Orientation::Landscape => (
                self.last_row_left_area_ratio_landscape,
                self.last_row_right_area_ratio_landscape,
            ),
        }
    }

    /// Calibration of the double-sided row's end keys as `(m, c)`.
    pub fn flexible_end_row_calibration(&self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Portrait => (
                self.flexible_end_row_m_portrait,
                self.flexible_end_row_c_portrait,
            ),
            Orientation::Landscape => (
                self.flexible_end_row_m_landscape,
                self.flexible_end_row_c_landscape,
            ),
        }
    }

    pub fn keyboard_is_shrunk(&self, width: f64, is_pad: bool) -> bool {
        !is_pad && width >= self.keyboard_shrunk_size_base_width_threshold
    }

    /// Usable keyboard width. Wide phones in landscape leave blank margins
    /// on both sides; pads never shrink.
    pub fn keyboard_shrunk_size(&self, width: f64, is_pad: bool) -> f64 {
        if self.keyboard_is_shrunk(width, is_pad) {
            self.keyboard_shrunk_size.resolve(width)
        } else {
            width
        }
    }

    pub fn popup_total_height(&self, screen_width: f64) -> f64 {
        self.popup_total_height.resolve(screen_width)
    }
}
