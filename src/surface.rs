use crate::config::DeviceProfile;
use crate::geometry::Frame;
use crate::pool::{KeyView, ViewHandle};
use std::collections::BTreeMap;

/// The host that displays key views. The coordinator only talks to the
/// screen through this trait.
pub trait Surface {
    /// Layout bounds in points.
    fn bounds(&self) -> Frame;

    fn device(&self) -> DeviceProfile;

    /// A view was allocated and must be attached to the surface.
    fn add_view(&mut self, handle: ViewHandle);

    /// Publishes the current state of a view.
    fn commit_view(&mut self, handle: ViewHandle, view: &KeyView);

    /// Opens a presentation batch. Batches nest; only the outermost
    /// `end_batch` makes changes visible.
    fn begin_batch(&mut self);

    fn end_batch(&mut self);
}

/// In-memory surface for tests and the CLI. Records what a real surface
/// would have been asked to do.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    bounds: Frame,
    device: DeviceProfile,
    depth: usize,
    max_depth: usize,
    batches: usize,
    view_count: usize,
    unbatched_writes: usize,
    committed: BTreeMap<ViewHandle, KeyView>,
}

impl HeadlessSurface {
    pub fn new(bounds: Frame) -> Self {
        Self::with_device(bounds, DeviceProfile::default())
    }

    pub fn with_device(bounds: Frame, device: DeviceProfile) -> Self {
        Self {
            bounds,
            device,
            depth: 0,
            max_depth: 0,
            batches: 0,
            view_count: 0,
            unbatched_writes: 0,
            committed: BTreeMap::new(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Frame) {
        self.bounds = bounds;
    }

    pub fn batch_depth(&self) -> usize {
        self.depth
    }

    /// Deepest nesting seen so far.
    pub fn max_batch_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of outermost batches that have been closed.
    pub fn completed_batches(&self) -> usize {
        self.batches
    }

    pub fn view_count(&self) -> usize {
        self.view_count
    }

    pub fn unbatched_writes(&self) -> usize {
        self.unbatched_writes
    }

    /// Last committed snapshot of a view.
    pub fn committed(&self, handle: ViewHandle) -> Option<&KeyView> {
        self.committed.get(&handle)
    }

    pub fn committed_views(&self) -> impl Iterator<Item = (ViewHandle, &KeyView)> {
        self.committed.iter().map(|(h, v)| (*h, v))
    }
}

impl Surface for HeadlessSurface {
    fn bounds(&self) -> Frame {
        self.bounds
    }

    fn device(&self) -> DeviceProfile {
        self.device
    }

    fn add_view(&mut self, _handle: ViewHandle) {
        self.view_count += 1;
    }

    fn commit_view(&mut self, handle: ViewHandle, view: &KeyView) {
        if self.depth == 0 {
            self.unbatched_writes += 1;
        }
        self.committed.insert(handle, view.clone());
    }

    fn begin_batch(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn end_batch(&mut self) {
        debug_assert!(self.depth > 0, "end_batch without begin_batch");
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.batches += 1;
        }
    }
}
