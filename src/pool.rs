use crate::appearance::{KeyAppearance, LabelStyle};
use crate::engine::PopupPlacement;
use crate::geometry::{Frame, PixelSize};
use crate::shapes::Shape;
use crate::surface::Surface;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Stable index of a view in the pool arena. Handles are never invalidated;
/// views are recycled, not freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ViewHandle(usize);

impl ViewHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Renderable state of one key view.
#[derive(Debug, Clone, Default)]
pub struct KeyView {
    pub frame: Frame,
    pub visible: bool,
    pub highlighted: bool,
    pub enabled: bool,
    pub text: String,
    pub label: LabelStyle,
    pub shape: Option<Rc<Shape>>,
    pub appearance: KeyAppearance,
    pub popup: Option<PopupPlacement>,
}

impl KeyView {
    fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

/// Arena of key views plus the free lists, bucketed by pixel size so a view
/// that already has the right size can be reused without a resize.
#[derive(Debug)]
pub struct KeyViewPool {
    scale: f64,
    views: Vec<KeyView>,
    buckets: BTreeMap<PixelSize, Vec<ViewHandle>>,
}

impl KeyViewPool {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            views: Vec::new(),
            buckets: BTreeMap::new(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Takes a pooled view whose current size is exactly `size`.
    pub fn acquire_matching(&mut self, size: PixelSize) -> Option<ViewHandle> {
        let bucket = self.buckets.get_mut(&size)?;
        let handle = bucket.pop();
        if bucket.is_empty() {
            self.buckets.remove(&size);
        }
        handle
    }

    /// Takes any pooled view, smallest size first, or allocates a new one and
    /// registers it with `surface` when the pool is drained.
    pub fn acquire_any<S: Surface>(&mut self, surface: &mut S) -> ViewHandle {
        if let Some(size) = self.buckets.keys().next().copied() {
            if let Some(handle) = self.acquire_matching(size) {
                return handle;
            }
        }

        let handle = ViewHandle(self.views.len());
        self.views.push(KeyView::new());
        surface.add_view(handle);
        debug!("Allocated {} ({} views total)", handle, self.views.len());
        handle
    }

    /// Returns every view to the pool, bucketed by its current size, and
    /// hides it.
    pub fn reset_pool(&mut self) {
        self.buckets.clear();
        for (i, view) in self.views.iter_mut().enumerate() {
            let size = view.frame.pixel_size(self.scale);
            self.buckets.entry(size).or_default().push(ViewHandle(i));
            view.visible = false;
        }
    }

    pub fn view(&self, handle: ViewHandle) -> Option<&KeyView> {
        self.views.get(handle.0)
    }

    pub fn view_mut(&mut self, handle: ViewHandle) -> Option<&mut KeyView> {
        self.views.get_mut(handle.0)
    }

    /// Number of views ever allocated.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Number of views currently waiting in a bucket.
    pub fn pooled_len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_pooled(&self, handle: ViewHandle) -> bool {
        self.buckets.values().any(|b| b.contains(&handle))
    }

    pub fn handles(&self) -> impl Iterator<Item = ViewHandle> {
        (0..self.views.len()).map(ViewHandle)
    }
}
