use crate::geometry::Frame;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ShapeKind {
    Shift,
    Backspace,
    Globe,
}

/// A key glyph. One instance per kind is shared by every view that shows it,
/// so state set here (the shift lock) is visible on all of them.
#[derive(Debug)]
pub struct Shape {
    kind: ShapeKind,
    frame: Cell<Frame>,
    with_lock: Cell<bool>,
}

impl Shape {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            frame: Cell::new(Frame::ZERO),
            with_lock: Cell::new(false),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn frame(&self) -> Frame {
        self.frame.get()
    }

    pub fn set_frame(&self, frame: Frame) {
        self.frame.set(frame);
    }

    /// Only meaningful for the shift glyph: draws the caps-lock bar.
    pub fn with_lock(&self) -> bool {
        self.with_lock.get()
    }

    pub fn set_with_lock(&self, locked: bool) {
        self.with_lock.set(locked);
    }
}

#[derive(Debug, Default)]
pub struct ShapeCache {
    shapes: HashMap<ShapeKind, Rc<Shape>>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_shape(&mut self, kind: ShapeKind) -> Rc<Shape> {
        self.shapes
            .entry(kind)
            .or_insert_with(|| Rc::new(Shape::new(kind)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
