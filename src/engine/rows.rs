//! The three row layout algorithms. Each returns one frame per key, in key
//! order, inside the row's frame.

use crate::config::LayoutConstants;
use crate::geometry::{Frame, Orientation, PixelGrid};

/// Per-pass inputs shared by the row algorithms.
#[derive(Debug, Clone, Copy)]
pub struct RowEnv<'a> {
    pub grid: PixelGrid,
    pub constants: &'a LayoutConstants,
    pub orientation: Orientation,
    pub is_pad: bool,
}

/// Uniform keys and gaps, centered in the row. When rounding makes the run
/// wider than the row, the margin drops to zero and the gap shrinks to fit.
pub fn layout_character_row(
    grid: &PixelGrid,
    count: usize,
    key_width: f64,
    gap: f64,
    frame: Frame,
) -> Vec<Frame> {
    if count == 0 {
        return Vec::new();
    }

    let n = count as f64;
    let key_space = n * key_width + (n - 1.0) * gap;
    let mut actual_gap = gap;
    let mut side_space = (frame.width - key_space) / 2.0;

    if side_space < 0.0 {
        side_space = 0.0;
        if count > 1 {
            actual_gap = (frame.width - n * key_width) / (n - 1.0);
        }
    }

    let mut origin = frame.x + side_space;
    let mut frames = Vec::with_capacity(count);

    for _ in 0..count {
        let mut x = grid.round(origin);
        if x + key_width > frame.max_x() {
            x = grid.round(frame.max_x() - key_width);
        }
        frames.push(Frame::new(x, frame.y, key_width, frame.height));
        origin += key_width + actual_gap;
    }

    frames
}

/// Two flexible end keys around `count - 2` character keys.
///
/// The middle run keeps the page's key width unless it would be narrower
/// than a canonical run of standard keys, in which case it widens to match
/// so short rows line up with full rows above them. End keys follow the
/// calibrated `m * side + c` rule, never narrower than a letter key. Whatever
/// is left becomes extra gap next to the end keys.
pub fn layout_double_sided_row(
    env: &RowEnv,
    count: usize,
    key_width: f64,
    key_gap: f64,
    frame: Frame,
) -> Vec<Frame> {
    debug_assert!(count >= 3, "double-sided rows need two ends and a middle");

    let c = env.constants;
    let grid = &env.grid;

    let standard_full_key_count = c.key_compressed_threshold - 1;
    let full = standard_full_key_count as f64;
    let standard_gap = c.key_gap(env.orientation, frame.width, standard_full_key_count, env.is_pad);
    let side_edges = c.side_edges(env.orientation, frame.width);
    let standard_key_width = (frame.width - 2.0 * side_edges - standard_gap * (full - 1.0)) / full;

    let standard_count = c.flexible_end_row_minimum_standard_key_count;
    let standard_width =
        standard_key_width * standard_count + standard_gap * (standard_count - 1.0);

    let middle = (count - 2) as f64;
    let current_width = middle * key_width + (middle - 1.0) * key_gap;

    let (target_width, middle_gap) = if current_width < standard_width {
        (standard_width, standard_gap)
    } else {
        (current_width, key_gap)
    };

    let middle_key_width = grid.round((target_width - (middle - 1.0) * middle_gap) / middle);
    let middle_span = middle * middle_key_width + (middle - 1.0) * middle_gap;
    let side_space = (frame.width - middle_span) / 2.0;

    let (m, intercept) = c.flexible_end_row_calibration(env.orientation);
    let end_width = grid.round((side_space * m + intercept).max(key_width));
    let end_gap = side_space - end_width;

    let mut frames = Vec::with_capacity(count);
    let mut origin = frame.x;

    frames.push(Frame::new(grid.round(origin), frame.y, end_width, frame.height));
    origin += end_width + end_gap;

    let middle_count = count - 2;
    for k in 0..middle_count {
        frames.push(Frame::new(
            grid.round(origin),
            frame.y,
            middle_key_width,
            frame.height,
        ));
        origin += middle_key_width;
        if k + 1 < middle_count {
            origin += middle_gap;
        }
    }

    origin += end_gap;
    frames.push(Frame::new(grid.round(origin), frame.y, end_width, frame.height));

    frames
}

/// Keys left of the flexible key share a left area, keys right of it share
/// a right area, each a fixed ratio of the row. The flexible key takes
/// exactly what remains, so widths plus gaps always add up to the row width.
pub fn layout_special_row(
    grid: &PixelGrid,
    count: usize,
    space_index: usize,
    gap: f64,
    (left_ratio, right_ratio): (f64, f64),
    frame: Frame,
) -> Vec<Frame> {
    if count == 0 {
        return Vec::new();
    }

    let space_index = space_index.min(count - 1);
    let keys_before = space_index;
    let keys_after = count - space_index - 1;

    let button_width = |ratio: f64, keys: usize| -> f64 {
        if keys == 0 {
            return 0.0;
        }
        let area = grid.round(frame.width * ratio);
        grid.round((area - gap * keys as f64) / keys as f64)
    };

    let left_width = button_width(left_ratio, keys_before);
    let right_width = button_width(right_ratio, keys_after);

    let left_area = keys_before as f64 * (left_width + gap);
    let right_area = keys_after as f64 * (right_width + gap);
    let space_width = grid.round(frame.width - left_area - right_area);

    let mut frames = Vec::with_capacity(count);
    let mut origin = frame.x;

    for i in 0..count {
        let width = match i.cmp(&space_index) {
            std::cmp::Ordering::Less => left_width,
            std::cmp::Ordering::Equal => space_width,
            std::cmp::Ordering::Greater => right_width,
        };
        frames.push(Frame::new(grid.round(origin), frame.y, width, frame.height));
        origin += width + gap;
    }

    frames
}
