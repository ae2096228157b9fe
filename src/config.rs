use crate::constants::Piecewise;
use crate::error::{LayoutError, LayoutResult};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Device characteristics the layout depends on. Passed by the hosting
/// surface; the CLI builds one from [`DeviceArgs`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Pixels per point.
    pub scale: f64,
    pub is_pad: bool,
    /// Native screen width in points (orientation independent). Drives popup height.
    pub screen_width: f64,
}

impl DeviceProfile {
    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(LayoutError::Config(format!(
                "pixel scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(self.screen_width.is_finite() && self.screen_width > 0.0) {
            return Err(LayoutError::Config(format!(
                "screen width must be a positive number, got {}",
                self.screen_width
            )));
        }
        Ok(())
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            scale: 2.0,
            is_pad: false,
            screen_width: 375.0,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    #[arg(long, default_value_t = 2.0)]
    pub scale: f64,
    #[arg(long, default_value_t = false)]
    pub pad: bool,
    /// Defaults to the width of the layout bounds.
    #[arg(long)]
    pub screen_width: Option<f64>,
}

impl DeviceArgs {
    pub fn to_profile(&self, fallback_width: f64) -> LayoutResult<DeviceProfile> {
        let profile = DeviceProfile {
            scale: self.scale,
            is_pad: self.pad,
            screen_width: self.screen_width.unwrap_or(fallback_width),
        };
        profile.validate()?;
        Ok(profile)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AppearanceArgs {
    #[arg(long, default_value_t = false)]
    pub dark: bool,
    #[arg(long, default_value_t = false)]
    pub solid_color: bool,
}

/// Width-indexed layout constants. Every field with a `Piecewise` value is
/// resolved against the current width; scalars apply unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstants {
    pub landscape_ratio: f64,

    // === EDGES ===
    pub side_edges_portrait: Piecewise,
    pub side_edges_landscape: f64,
    pub top_edge_portrait: Piecewise,
    pub top_edge_landscape: f64,

    // Keyboard area shrinks on wide bounds
    pub keyboard_shrunk_size: Piecewise,
    pub keyboard_shrunk_size_base_width_threshold: f64,

    // === ROW GAPS ===
    pub row_gap_portrait: Piecewise,
    pub row_gap_portrait_last_row: f64,
    pub row_gap_portrait_last_row_index: usize,
    pub row_gap_landscape: f64,

    // === KEY GAPS ===
    pub key_gap_portrait_normal: f64,
    pub key_gap_portrait_small: f64,
    pub key_gap_portrait_uncompress_threshold: f64,
    pub key_gap_landscape_normal: f64,
    pub key_gap_landscape_small: f64,
    pub key_compressed_threshold: usize,

    // === DOUBLE-SIDED ROWS ===
    // end key width = m * side space + c
    pub flexible_end_row_m_portrait: f64,
    pub flexible_end_row_c_portrait: f64,
    pub flexible_end_row_m_landscape: f64,
    pub flexible_end_row_c_landscape: f64,
    pub flexible_end_row_minimum_standard_key_count: f64,

    // === SPECIAL ROW ===
    pub last_row_key_gap_portrait: f64,
    pub last_row_key_gap_landscape: Piecewise,
    pub last_row_left_area_ratio_portrait: f64,
    pub last_row_left_area_ratio_landscape: f64,
    pub last_row_right_area_ratio_portrait: f64,
    pub last_row_right_area_ratio_landscape: f64,

    // === POPUPS ===
    pub popup_gap: f64,
    pub popup_width_increment: f64,
    pub popup_total_height: Piecewise,
    pub popup_edge_inset: f64,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            landscape_ratio: 2.0,

            side_edges_portrait: Piecewise::new(vec![3.0, 4.0], vec![400.0]),
            side_edges_landscape: 3.0,
            top_edge_portrait: Piecewise::new(vec![12.0, 10.0, 8.0], vec![350.0, 400.0]),
            top_edge_landscape: 6.0,

            keyboard_shrunk_size: Piecewise::new(vec![660.0, 524.0], vec![700.0]),
            keyboard_shrunk_size_base_width_threshold: 740.0,

            row_gap_portrait: Piecewise::new(vec![15.0, 11.0, 10.0], vec![350.0, 400.0]),
            row_gap_portrait_last_row: 9.0,
            row_gap_portrait_last_row_index: 1,
            row_gap_landscape: 7.0,

            key_gap_portrait_normal: 6.0,
            key_gap_portrait_small: 5.0,
            key_gap_portrait_uncompress_threshold: 350.0,
            key_gap_landscape_normal: 10.0,
            key_gap_landscape_small: 5.0,
            key_compressed_threshold: 11,

            flexible_end_row_m_portrait: 1.0,
            flexible_end_row_c_portrait: -14.0,
            flexible_end_row_m_landscape: 0.9231,
            flexible_end_row_c_landscape: -9.4615,
            flexible_end_row_minimum_standard_key_count: 7.0,

            last_row_key_gap_portrait: 6.0,
            last_row_key_gap_landscape: Piecewise::new(vec![8.0, 7.0, 5.0], vec![500.0, 700.0]),
            last_row_left_area_ratio_portrait: 0.24,
            last_row_left_area_ratio_landscape: 0.19,
            last_row_right_area_ratio_portrait: 0.24,
            last_row_right_area_ratio_landscape: 0.19,

            popup_gap: 8.0,
            popup_width_increment: 26.0,
            popup_total_height: Piecewise::new(vec![102.0, 108.0], vec![350.0]),
            popup_edge_inset: 3.0,
        }
    }
}

impl LayoutConstants {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LayoutResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> LayoutResult<Self> {
        let constants: LayoutConstants = serde_json::from_str(content)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Checks every table before it reaches the resolver, which treats a
    /// mismatch as a programming error.
    pub fn validate(&self) -> LayoutResult<()> {
        let tables = [
            ("side_edges_portrait", &self.side_edges_portrait),
            ("top_edge_portrait", &self.top_edge_portrait),
            ("keyboard_shrunk_size", &self.keyboard_shrunk_size),
            ("row_gap_portrait", &self.row_gap_portrait),
            ("last_row_key_gap_landscape", &self.last_row_key_gap_landscape),
            ("popup_total_height", &self.popup_total_height),
        ];

        for (name, table) in tables {
            if !table.is_well_formed() {
                return Err(LayoutError::Config(format!(
                    "'{}' has {} values for {} thresholds (expected {})",
                    name,
                    table.values.len(),
                    table.thresholds.len(),
                    table.thresholds.len() + 1
                )));
            }
            if table.thresholds.windows(2).any(|w| w[0] > w[1]) {
                return Err(LayoutError::Config(format!(
                    "'{}' thresholds must be ascending",
                    name
                )));
            }
        }

        if self.row_gap_portrait_last_row_index >= self.row_gap_portrait.values.len() {
            return Err(LayoutError::Config(format!(
                "row_gap_portrait_last_row_index {} is out of range",
                self.row_gap_portrait_last_row_index
            )));
        }
        if self.key_compressed_threshold < 2 {
            return Err(LayoutError::Config(
                "key_compressed_threshold must be at least 2".to_string(),
            ));
        }
        if self.landscape_ratio <= 0.0 {
            return Err(LayoutError::Config(
                "landscape_ratio must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
