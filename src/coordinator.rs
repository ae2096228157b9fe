//! Binds keys to pooled views and keeps those views in sync with the model.

use crate::appearance::{key_appearance, label_style};
use crate::config::LayoutConstants;
use crate::engine::{LayoutEngine, PopupPlacement};
use crate::geometry::{Direction, Frame, Point};
use crate::model::{KeyId, KeyType, Keyboard, ShiftState};
use crate::pool::{KeyView, KeyViewPool, ViewHandle};
use crate::shapes::{ShapeCache, ShapeKind};
use crate::surface::Surface;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::debug;

/// How the views of one positioning pass were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PassStats {
    pub keys: usize,
    /// Views reused without a size change.
    pub reused_exact: usize,
    /// Views reused from a bucket of another size.
    pub reused_other: usize,
    pub created: usize,
}

pub struct LayoutCoordinator<S: Surface> {
    keyboard: Arc<Keyboard>,
    surface: S,
    engine: LayoutEngine,
    pool: KeyViewPool,
    shapes: ShapeCache,
    key_to_view: BTreeMap<KeyId, ViewHandle>,
    view_to_key: HashMap<ViewHandle, KeyId>,
    dark_mode: bool,
    solid_color_mode: bool,
    batch_depth: usize,
}

/// Open presentation batch. Closing the outermost one commits every view to
/// the surface.
pub struct Batch<'a, S: Surface> {
    coordinator: &'a mut LayoutCoordinator<S>,
}

impl<S: Surface> Deref for Batch<'_, S> {
    type Target = LayoutCoordinator<S>;

    fn deref(&self) -> &Self::Target {
        self.coordinator
    }
}

impl<S: Surface> DerefMut for Batch<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.coordinator
    }
}

impl<S: Surface> Drop for Batch<'_, S> {
    fn drop(&mut self) {
        self.coordinator.end_batch();
    }
}

impl<S: Surface> LayoutCoordinator<S> {
    pub fn new(
        keyboard: Arc<Keyboard>,
        surface: S,
        constants: LayoutConstants,
        dark_mode: bool,
        solid_color_mode: bool,
    ) -> Self {
        let device = surface.device();
        Self {
            keyboard,
            engine: LayoutEngine::new(constants, device),
            pool: KeyViewPool::new(device.scale),
            shapes: ShapeCache::new(),
            surface,
            key_to_view: BTreeMap::new(),
            view_to_key: HashMap::new(),
            dark_mode,
            solid_color_mode,
            batch_depth: 0,
        }
    }

    pub fn keyboard(&self) -> &Arc<Keyboard> {
        &self.keyboard
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn pool(&self) -> &KeyViewPool {
        &self.pool
    }

    pub fn shapes(&self) -> &ShapeCache {
        &self.shapes
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn solid_color_mode(&self) -> bool {
        self.solid_color_mode
    }

    pub fn batch(&mut self) -> Batch<'_, S> {
        self.batch_depth += 1;
        self.surface.begin_batch();
        Batch { coordinator: self }
    }

    fn end_batch(&mut self) {
        if self.batch_depth == 1 {
            self.commit_all();
        }
        self.batch_depth = self.batch_depth.saturating_sub(1);
        self.surface.end_batch();
    }

    fn commit_all(&mut self) {
        for handle in self.pool.handles() {
            if let Some(view) = self.pool.view(handle) {
                self.surface.commit_view(handle, view);
            }
        }
    }

    /// Full layout of `page`: positions the keys, resets transient view
    /// state, then refreshes colors and caps. Returns `None` without
    /// touching any view when the surface has no area.
    pub fn layout_keys(
        &mut self,
        page: usize,
        uppercase: bool,
        character_uppercase: bool,
        shift_state: ShiftState,
    ) -> Option<PassStats> {
        if self.surface.bounds().is_empty() {
            return None;
        }

        let mut batch = self.batch();
        let stats = batch.position_keys(page)?;

        let handles: Vec<ViewHandle> = batch.key_to_view.values().copied().collect();
        for handle in handles {
            if let Some(view) = batch.pool.view_mut(handle) {
                view.popup = None;
                view.highlighted = false;
                view.visible = true;
            }
        }

        batch.update_key_appearance();
        batch.update_key_caps(true, uppercase, character_uppercase, shift_state);
        Some(stats)
    }

    /// Binds every key of `page` to a view sized for its new frame.
    ///
    /// Views whose current size already matches are taken first; the
    /// remaining keys take whatever is left in the pool, and new views are
    /// allocated only once the pool is drained.
    pub fn position_keys(&mut self, page: usize) -> Option<PassStats> {
        let bounds = self.surface.bounds();
        let frames = self.engine.compute_frames(&self.keyboard, bounds, page)?;

        let mut batch = self.batch();
        let this = &mut *batch;

        this.key_to_view.clear();
        this.view_to_key.clear();
        this.pool.reset_pool();

        let scale = this.pool.scale();
        let mut stats = PassStats {
            keys: frames.len(),
            ..PassStats::default()
        };

        for (key, frame) in frames.iter() {
            if let Some(handle) = this.pool.acquire_matching(frame.pixel_size(scale)) {
                this.bind(key, handle, frame);
                stats.reused_exact += 1;
            }
        }

        for (key, frame) in frames.iter() {
            if this.key_to_view.contains_key(&key) {
                continue;
            }
            if this.pool.pooled_len() > 0 {
                stats.reused_other += 1;
            } else {
                stats.created += 1;
            }
            let handle = this.pool.acquire_any(&mut this.surface);
            this.bind(key, handle, frame);
        }

        debug!(
            "Positioned {} keys on page {}: {} exact, {} resized, {} new",
            stats.keys, page, stats.reused_exact, stats.reused_other, stats.created
        );
        Some(stats)
    }

    fn bind(&mut self, key: KeyId, handle: ViewHandle, frame: Frame) {
        if let Some(view) = self.pool.view_mut(handle) {
            view.frame = frame;
            view.visible = true;
        }
        self.key_to_view.insert(key, handle);
        self.view_to_key.insert(handle, key);
    }

    /// Recolors every bound view from its key type and the current modes.
    pub fn update_key_appearance(&mut self) {
        let mut batch = self.batch();
        let this = &mut *batch;
        let is_pad = this.engine.device().is_pad;

        for (&id, &handle) in &this.key_to_view {
            let Some(key) = this.keyboard.key(id) else {
                continue;
            };
            if let Some(view) = this.pool.view_mut(handle) {
                view.appearance =
                    key_appearance(key.kind, this.dark_mode, this.solid_color_mode, is_pad);
            }
        }
    }

    /// Refreshes labels, glyphs and the shift highlight.
    ///
    /// `character_uppercase` applies to typable keys, `uppercase` to every
    /// other key. A full reset also reassigns label styles and glyphs.
    pub fn update_key_caps(
        &mut self,
        full_reset: bool,
        uppercase: bool,
        character_uppercase: bool,
        shift_state: ShiftState,
    ) {
        let mut batch = self.batch();
        let this = &mut *batch;

        for (&id, &handle) in &this.key_to_view {
            let Some(key) = this.keyboard.key(id) else {
                continue;
            };
            let Some(view) = this.pool.view_mut(handle) else {
                continue;
            };

            if full_reset {
                view.label = label_style(key.kind);
                view.shape = match key.kind {
                    KeyType::Shift => Some(this.shapes.get_shape(ShapeKind::Shift)),
                    KeyType::Backspace => Some(this.shapes.get_shape(ShapeKind::Backspace)),
                    KeyType::KeyboardChange => {
                        Some(this.shapes.get_shape(ShapeKind::Globe))
                    }
                    _ => None,
                };
            }

            if key.kind == KeyType::Shift {
                if view.shape.is_none() {
                    view.shape = Some(this.shapes.get_shape(ShapeKind::Shift));
                }
                if let Some(shape) = &view.shape {
                    shape.set_with_lock(shift_state == ShiftState::Locked);
                }
                view.highlighted = shift_state != ShiftState::Disabled;
            }

            if let Some(shape) = &view.shape {
                shape.set_frame(Frame::new(0.0, 0.0, view.frame.width, view.frame.height));
                view.text.clear();
            } else {
                let upper = if key.is_character() {
                    character_uppercase
                } else {
                    uppercase
                };
                view.text = key.keycap_for_case(upper).unwrap_or_default().to_string();
            }
        }
    }

    /// Callers follow up with [`update_key_appearance`](Self::update_key_appearance).
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    pub fn set_solid_color_mode(&mut self, solid_color_mode: bool) {
        self.solid_color_mode = solid_color_mode;
    }

    pub fn view_for_key(&self, key: KeyId) -> Option<ViewHandle> {
        self.key_to_view.get(&key).copied()
    }

    pub fn key_for_view(&self, handle: ViewHandle) -> Option<KeyId> {
        self.view_to_key.get(&handle).copied()
    }

    pub fn view(&self, handle: ViewHandle) -> Option<&KeyView> {
        self.pool.view(handle)
    }

    /// Bound keys and their views, in key order.
    pub fn bindings(&self) -> impl Iterator<Item = (KeyId, ViewHandle)> + '_ {
        self.key_to_view.iter().map(|(k, v)| (*k, *v))
    }

    /// Unclamped popup frame relative to the view's origin.
    pub fn frame_for_popup(&self, handle: ViewHandle, direction: Direction) -> Option<Frame> {
        let view = self.pool.view(handle)?;
        Some(self.engine.frame_for_popup(&view.frame, direction))
    }

    /// Places the popup for `handle` inside the surface and records the
    /// placement on the view.
    pub fn will_show_popup(
        &mut self,
        handle: ViewHandle,
        direction: Direction,
    ) -> Option<PopupPlacement> {
        let bounds = self.surface.bounds();
        let mut batch = self.batch();
        let this = &mut *batch;

        let view = this.pool.view_mut(handle)?;
        let placement = this.engine.place_popup(&view.frame, &bounds, direction);
        view.popup = Some(placement);
        Some(placement)
    }

    pub fn will_hide_popup(&mut self, handle: ViewHandle) {
        let mut batch = self.batch();
        if let Some(view) = batch.pool.view_mut(handle) {
            view.popup = None;
        }
    }

    /// Key whose view is closest to `point`, for touches that land in a gap.
    /// Points outside the surface hit nothing.
    pub fn nearest_key(&self, point: Point) -> Option<KeyId> {
        if !self.surface.bounds().contains(point) {
            return None;
        }

        self.key_to_view
            .iter()
            .filter_map(|(&key, &handle)| {
                let view = self.pool.view(handle)?;
                view.visible.then(|| (key, view.frame.distance_to(point)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| key)
    }
}
