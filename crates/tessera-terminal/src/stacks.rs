//! The nested stacks every primitive consults.
//!
//! Bounding boxes give each primitive its origin, culling rects clip what
//! reaches the grid, id namespaces qualify focusable ids and layers set the
//! priority of `put` calls that don't name one. Every stack has a root or
//! starts empty at the beginning of a frame and must be back there at the end.

use crate::error::UiError;
use tessera_core::Rect;

/// Identifies one stack, for depth snapshots and scoped truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// Nested coordinate frames
    BoundingBox,
    /// Clip regions
    CullingRect,
    /// Focus-id namespaces
    Id,
    /// Implicit `put` layer
    Layer,
    /// Values pushed for the context token with this id
    Context(u64),
}

impl StackKind {
    /// Name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BoundingBox => "bounding box",
            Self::CullingRect => "culling rect",
            Self::Id => "id",
            Self::Layer => "layer",
            Self::Context(_) => "context",
        }
    }
}

/// Bounding-box, culling-rect, id and layer stacks.
#[derive(Debug, Clone)]
pub struct LayoutStacks {
    /// Absolute boxes; index 0 is the root.
    bounds: Vec<Rect>,
    /// Absolute clip rects.
    culling: Vec<Rect>,
    ids: Vec<String>,
    /// Index 0 is the root layer.
    layers: Vec<i32>,
}

impl LayoutStacks {
    /// Stacks rooted at a `width` x `height` grid.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            bounds: vec![Rect::sized(i32::from(width), i32::from(height))],
            culling: Vec::new(),
            ids: Vec::new(),
            layers: vec![0],
        }
    }

    /// Drop everything above the roots and re-root at the grid extent.
    pub fn reset(&mut self, width: u16, height: u16) {
        self.bounds.clear();
        self.bounds.push(Rect::sized(i32::from(width), i32::from(height)));
        self.culling.clear();
        self.ids.clear();
        self.layers.truncate(1);
    }

    /// Current bounding box in absolute coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.last().copied().unwrap_or_default()
    }

    /// Current culling rect, if any.
    #[must_use]
    pub fn culling(&self) -> Option<Rect> {
        self.culling.last().copied()
    }

    /// Current implicit layer.
    #[must_use]
    pub fn layer(&self) -> i32 {
        self.layers.last().copied().unwrap_or(0)
    }

    /// Current namespaces, outermost first.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Push a box relative to the current one. Returns the absolute box.
    pub fn push_bounding_box(&mut self, x: i32, y: i32, width: i32, height: i32) -> Rect {
        let rect = self.bounds().child(Rect::new(x, y, width, height));
        self.bounds.push(rect);
        rect
    }

    /// Pop the current box. The root never pops.
    pub fn pop_bounding_box(&mut self) -> Result<Rect, UiError> {
        if self.bounds.len() <= 1 {
            return Err(underflow(StackKind::BoundingBox));
        }
        self.bounds.pop().ok_or_else(|| underflow(StackKind::BoundingBox))
    }

    /// Push a clip rect given relative to the current box.
    pub fn push_culling_rect(&mut self, x: i32, y: i32, width: i32, height: i32) -> Rect {
        let rect = self.bounds().child(Rect::new(x, y, width, height));
        self.culling.push(rect);
        rect
    }

    /// Pop the current clip rect.
    pub fn pop_culling_rect(&mut self) -> Result<Rect, UiError> {
        self.culling.pop().ok_or_else(|| underflow(StackKind::CullingRect))
    }

    /// Enter an id namespace.
    pub fn push_id(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    /// Leave the innermost id namespace.
    pub fn pop_id(&mut self) -> Result<String, UiError> {
        self.ids.pop().ok_or_else(|| underflow(StackKind::Id))
    }

    /// `id` prefixed with every namespace, joined by `/`.
    #[must_use]
    pub fn qualified_id(&self, id: &str) -> String {
        let mut qualified = String::new();
        for namespace in &self.ids {
            qualified.push_str(namespace);
            qualified.push('/');
        }
        qualified.push_str(id);
        qualified
    }

    /// Make `layer` the implicit layer.
    pub fn push_layer(&mut self, layer: i32) {
        self.layers.push(layer);
    }

    /// Restore the previous implicit layer. The root layer never pops.
    pub fn pop_layer(&mut self) -> Result<i32, UiError> {
        if self.layers.len() <= 1 {
            return Err(underflow(StackKind::Layer));
        }
        self.layers.pop().ok_or_else(|| underflow(StackKind::Layer))
    }

    /// Number of entries on a stack, roots included.
    ///
    /// Context stacks live elsewhere and report 0 here.
    #[must_use]
    pub fn depth(&self, kind: StackKind) -> usize {
        match kind {
            StackKind::BoundingBox => self.bounds.len(),
            StackKind::CullingRect => self.culling.len(),
            StackKind::Id => self.ids.len(),
            StackKind::Layer => self.layers.len(),
            StackKind::Context(_) => 0,
        }
    }

    /// Drop entries above `depth`. Roots are kept.
    pub fn truncate(&mut self, kind: StackKind, depth: usize) {
        match kind {
            StackKind::BoundingBox => self.bounds.truncate(depth.max(1)),
            StackKind::CullingRect => self.culling.truncate(depth),
            StackKind::Id => self.ids.truncate(depth),
            StackKind::Layer => self.layers.truncate(depth.max(1)),
            StackKind::Context(_) => {}
        }
    }

    /// Fail if any stack holds entries above its root.
    pub fn check_balanced(&self) -> Result<(), UiError> {
        let above_root = [
            (StackKind::BoundingBox, self.bounds.len().saturating_sub(1)),
            (StackKind::CullingRect, self.culling.len()),
            (StackKind::Id, self.ids.len()),
            (StackKind::Layer, self.layers.len().saturating_sub(1)),
        ];
        match above_root.into_iter().find(|(_, depth)| *depth > 0) {
            Some((kind, depth)) => Err(UiError::UnbalancedStack {
                stack: kind.name(),
                depth,
            }),
            None => Ok(()),
        }
    }
}

const fn underflow(kind: StackKind) -> UiError {
    UiError::StackUnderflow { stack: kind.name() }
}
