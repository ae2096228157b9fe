use super::LayoutEngine;
use crate::geometry::{Direction, Frame};
use serde::Serialize;

/// Where a key's popup ends up once it has been kept inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopupPlacement {
    /// Popup rectangle in surface coordinates.
    pub frame: Frame,
    /// Side of the key the popup attaches to.
    pub attached: Direction,
    /// Set when the popup was flipped below the key, so its hide animation
    /// must run the other way.
    pub hide_direction_is_opposite: bool,
}

impl LayoutEngine {
    /// Popup frame relative to the key's own origin, before any clamping.
    /// The popup is wider than the key and centered over it; its height makes
    /// key plus gap plus popup add up to the device's popup total height.
    pub fn frame_for_popup(&self, key_frame: &Frame, direction: Direction) -> Frame {
        let c = &self.constants;
        let total_height = c.popup_total_height(self.device.screen_width);

        let width = key_frame.width + c.popup_width_increment;
        let height = total_height - c.popup_gap - key_frame.height;
        let x = (key_frame.width - width) / 2.0;

        let y = match direction {
            Direction::Down => key_frame.height + c.popup_gap,
            Direction::Up | Direction::Left | Direction::Right => -height - c.popup_gap,
        };

        Frame::new(x, y, width, height)
    }

    /// Places the popup in surface coordinates and pulls it back inside the
    /// surface: flipped below the key when it would clip the top edge, slid
    /// to align with the key's edge when it would clip a side.
    pub fn place_popup(
        &self,
        key_frame: &Frame,
        surface_bounds: &Frame,
        direction: Direction,
    ) -> PopupPlacement {
        let inset = self.constants.popup_edge_inset;
        let mut frame = self
            .frame_for_popup(key_frame, direction)
            .offset(key_frame.x, key_frame.y);

        let mut attached = direction;
        let mut hide_direction_is_opposite = false;

        if frame.y < surface_bounds.y + inset {
            frame.y = surface_bounds.y + inset;
            attached = Direction::Down;
            hide_direction_is_opposite = true;
        }

        if frame.x < surface_bounds.x + inset {
            frame.x = key_frame.x;
        }

        if frame.max_x() > surface_bounds.max_x() - inset {
            frame.x = key_frame.max_x() - frame.width;
        }

        PopupPlacement {
            frame,
            attached,
            hide_direction_is_opposite,
        }
    }
}
