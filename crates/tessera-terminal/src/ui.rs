//! The immediate-mode engine.
//!
//! A [`Ui`] owns the grid pair, the layout stacks, input state and focus.
//! Each call to [`Ui::frame`] resets the per-frame state, runs the render
//! closure, and on success forwards the diff to a [`Renderer`].
//!
//! Pushes come in two flavours: explicit `push_*` / `pop_*` pairs, and
//! guard-returning variants ([`Ui::bounding_box`], [`Ui::culling_rect`],
//! [`Ui::id_scope`], [`Ui::layer`], [`Ui::provide`]) whose [`Scope`] pops on
//! drop, including on early return through `?`.

use crate::config::UiConfig;
use crate::direct::DoubleBuffer;
use crate::error::{TuiError, UiError};
use crate::renderer::Renderer;
use crate::stacks::{LayoutStacks, StackKind};
use std::ops::{Deref, DerefMut};
use tessera_core::{
    ContextStacks, ContextToken, Event, FocusController, FocusableState, Glyph, InputState, Key,
    KeyModifiers, Rect, Style,
};

/// What a committed frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Cells reported to the renderer
    pub changed_cells: usize,
    /// Focusable controls registered
    pub focusables: usize,
}

/// Immediate-mode engine for one character grid.
#[derive(Debug)]
pub struct Ui {
    config: UiConfig,
    buffer: DoubleBuffer,
    stacks: LayoutStacks,
    contexts: ContextStacks,
    input: InputState,
    focus: FocusController,
    render_requested: bool,
    frames: u64,
}

impl Ui {
    /// Engine with a `config.width` x `config.height` grid.
    ///
    /// A render is requested up front so the first frame always draws.
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        let (width, height) = (config.width, config.height);
        Self {
            config,
            buffer: DoubleBuffer::new(width, height),
            stacks: LayoutStacks::new(width, height),
            contexts: ContextStacks::new(),
            input: InputState::new(),
            focus: FocusController::new(),
            render_requested: true,
            frames: 0,
        }
    }

    /// Grid width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Grid height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The grid pair.
    #[must_use]
    pub const fn buffer(&self) -> &DoubleBuffer {
        &self.buffer
    }

    /// Pointer and keyboard state.
    #[must_use]
    pub const fn input(&self) -> &InputState {
        &self.input
    }

    /// Frames run so far, aborted ones included.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    // ---- drawing ----

    /// Write a glyph at `(x, y)` relative to the current bounding box, on
    /// the current layer.
    pub fn put(&mut self, x: i32, y: i32, glyph: impl Into<Glyph>, style: Style) {
        let layer = self.stacks.layer();
        self.put_on_layer(x, y, glyph, style, layer);
    }

    /// Like [`Ui::put`] with an explicit layer.
    ///
    /// Points outside the current culling rect are dropped; points outside
    /// the grid, including offsets past the `i32` range, are ignored.
    pub fn put_on_layer(
        &mut self,
        x: i32,
        y: i32,
        glyph: impl Into<Glyph>,
        style: Style,
        layer: i32,
    ) {
        let origin = self.stacks.bounds();
        let (Some(x), Some(y)) = (origin.x.checked_add(x), origin.y.checked_add(y)) else {
            return;
        };

        if let Some(clip) = self.stacks.culling() {
            if !clip.contains(x, y) {
                return;
            }
        }

        self.buffer
            .put(x, y, Some(glyph.into()), style.fg, style.bg, layer);
    }

    // ---- stacks ----

    /// Current bounding box, absolute.
    #[must_use]
    pub fn current_box(&self) -> Rect {
        self.stacks.bounds()
    }

    /// Current culling rect, absolute.
    #[must_use]
    pub fn current_culling(&self) -> Option<Rect> {
        self.stacks.culling()
    }

    /// Current implicit layer.
    #[must_use]
    pub fn current_layer(&self) -> i32 {
        self.stacks.layer()
    }

    /// Push a bounding box relative to the current one.
    pub fn push_bounding_box(&mut self, x: i32, y: i32, width: i32, height: i32) -> Rect {
        self.stacks.push_bounding_box(x, y, width, height)
    }

    /// Pop the current bounding box.
    pub fn pop_bounding_box(&mut self) -> Result<Rect, UiError> {
        self.stacks.pop_bounding_box()
    }

    /// Push a culling rect relative to the current bounding box.
    pub fn push_culling_rect(&mut self, x: i32, y: i32, width: i32, height: i32) -> Rect {
        self.stacks.push_culling_rect(x, y, width, height)
    }

    /// Pop the current culling rect.
    pub fn pop_culling_rect(&mut self) -> Result<Rect, UiError> {
        self.stacks.pop_culling_rect()
    }

    /// Enter an id namespace.
    pub fn push_id(&mut self, id: impl Into<String>) {
        self.stacks.push_id(id);
    }

    /// Leave the innermost id namespace.
    pub fn pop_id(&mut self) -> Result<String, UiError> {
        self.stacks.pop_id()
    }

    /// `id` qualified by the current namespaces.
    #[must_use]
    pub fn qualified_id(&self, id: &str) -> String {
        self.stacks.qualified_id(id)
    }

    /// Set the implicit layer.
    pub fn push_layer(&mut self, layer: i32) {
        self.stacks.push_layer(layer);
    }

    /// Restore the previous implicit layer.
    pub fn pop_layer(&mut self) -> Result<i32, UiError> {
        self.stacks.pop_layer()
    }

    /// Push a value for `token`.
    pub fn push_context<T: 'static>(&mut self, token: &ContextToken<T>, value: T) {
        self.contexts.push(token, value);
    }

    /// Pop the top value for `token`.
    pub fn pop_context<T: 'static>(&mut self, token: &ContextToken<T>) -> Result<T, UiError> {
        self.contexts.pop(token).ok_or(UiError::StackUnderflow {
            stack: token.name(),
        })
    }

    /// Top value for `token`, or its default.
    pub fn context<'a, T: 'static>(&'a self, token: &'a ContextToken<T>) -> Result<&'a T, UiError> {
        self.contexts
            .get(token)
            .ok_or(UiError::MissingContext {
                token: token.name(),
            })
    }

    /// Scoped [`Ui::push_bounding_box`].
    pub fn bounding_box(&mut self, x: i32, y: i32, width: i32, height: i32) -> Scope<'_> {
        let depth = self.stacks.depth(StackKind::BoundingBox);
        self.stacks.push_bounding_box(x, y, width, height);
        Scope::new(self, StackKind::BoundingBox, depth)
    }

    /// Scoped [`Ui::push_culling_rect`].
    pub fn culling_rect(&mut self, x: i32, y: i32, width: i32, height: i32) -> Scope<'_> {
        let depth = self.stacks.depth(StackKind::CullingRect);
        self.stacks.push_culling_rect(x, y, width, height);
        Scope::new(self, StackKind::CullingRect, depth)
    }

    /// Scoped [`Ui::push_id`].
    pub fn id_scope(&mut self, id: impl Into<String>) -> Scope<'_> {
        let depth = self.stacks.depth(StackKind::Id);
        self.stacks.push_id(id);
        Scope::new(self, StackKind::Id, depth)
    }

    /// Scoped [`Ui::push_layer`].
    pub fn layer(&mut self, layer: i32) -> Scope<'_> {
        let depth = self.stacks.depth(StackKind::Layer);
        self.stacks.push_layer(layer);
        Scope::new(self, StackKind::Layer, depth)
    }

    /// Scoped [`Ui::push_context`].
    pub fn provide<T: 'static>(&mut self, token: &ContextToken<T>, value: T) -> Scope<'_> {
        let kind = StackKind::Context(token.id());
        let depth = self.contexts.depth(token);
        self.contexts.push(token, value);
        Scope::new(self, kind, depth)
    }

    fn truncate_stack(&mut self, kind: StackKind, depth: usize) {
        match kind {
            StackKind::Context(id) => self.contexts.truncate(id, depth),
            _ => self.stacks.truncate(kind, depth),
        }
    }

    fn reset_stacks(&mut self) {
        self.stacks.reset(self.width(), self.height());
        self.contexts.clear();
    }

    fn check_balanced(&self) -> Result<(), UiError> {
        self.stacks.check_balanced()?;
        match self.contexts.unbalanced() {
            Some((stack, depth)) => Err(UiError::UnbalancedStack { stack, depth }),
            None => Ok(()),
        }
    }

    // ---- focus ----

    /// Register a focusable control covering the current bounding box and
    /// run the focus rules for it.
    pub fn push_focusable_control(&mut self, id: &str) -> Result<FocusableState, UiError> {
        if id.is_empty() {
            return Err(UiError::MissingId);
        }
        let id = self.stacks.qualified_id(id);
        self.focus.register(&id);

        let bounds = self.stacks.bounds();
        let over = self.is_mouse_over(Rect::sized(bounds.width, bounds.height));
        Ok(self
            .focus
            .evaluate(&id, over, &self.input, self.config.activation_key))
    }

    /// Move focus forward through last frame's controls.
    pub fn focus_next_control(&mut self) {
        self.focus.focus_next();
    }

    /// Move focus backward through last frame's controls.
    pub fn focus_previous_control(&mut self) {
        self.focus.focus_previous();
    }

    /// Whether the pointer is inside `rect`, given relative to the current
    /// bounding box, and not clipped away by the current culling rect.
    #[must_use]
    pub fn is_mouse_over(&self, rect: Rect) -> bool {
        let pointer = self.input.mouse.position();
        let area = self.stacks.bounds().child(rect);
        area.contains_point(pointer)
            && self
                .stacks
                .culling()
                .map_or(true, |clip| clip.contains_point(pointer))
    }

    /// Focused control id.
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus.focus()
    }

    /// Hovered control id.
    #[must_use]
    pub fn hover(&self) -> Option<&str> {
        self.focus.hover()
    }

    /// Active control id.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.focus.active()
    }

    /// Set or clear the focused control.
    pub fn set_focus(&mut self, id: Option<String>) {
        self.focus.set_focus(id);
    }

    /// Set or clear the hovered control.
    pub fn set_hover(&mut self, id: Option<String>) {
        self.focus.set_hover(id);
    }

    /// Set or clear the active control.
    pub fn set_active(&mut self, id: Option<String>) {
        self.focus.set_active(id);
    }

    /// Ids registered by the last committed frame, in call order.
    #[must_use]
    pub fn focusables(&self) -> &[String] {
        self.focus.completed()
    }

    // ---- frame loop ----

    /// Ask for a frame. Repeated requests before the next frame coalesce.
    pub fn enqueue_render(&mut self) {
        self.render_requested = true;
    }

    /// Whether a frame has been requested.
    #[must_use]
    pub const fn needs_render(&self) -> bool {
        self.render_requested
    }

    /// Merge an input event. Returns whether it requested a render.
    ///
    /// Tab and Shift+Tab move focus and are not recorded as key presses.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let requested = match *event {
            Event::KeyDown {
                key: Key::Tab,
                modifiers,
            } => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.focus_previous_control();
                } else {
                    self.focus_next_control();
                }
                true
            }
            Event::KeyUp { key: Key::Tab } => true,
            Event::Resize { width, height } => {
                self.resize(width, height);
                true
            }
            _ => self.input.apply(event),
        };

        if requested {
            self.enqueue_render();
        }
        requested
    }

    /// Reallocate the grid. Both buffers are cleared.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.config.width = width;
        self.config.height = height;
        self.buffer.resize(width, height);
        self.stacks.reset(width, height);
        self.enqueue_render();
    }

    /// Repaint every cell on the next frame.
    pub fn invalidate(&mut self) {
        self.buffer.invalidate();
        self.enqueue_render();
    }

    /// Run one frame.
    ///
    /// On success the diff goes to `renderer` and the focus registry is
    /// committed. If `render` fails or leaves a stack unbalanced, the
    /// partial frame is thrown away and the committed grid stays as it was.
    /// Input edges are reset either way.
    ///
    /// A frame that writes no cell at all also keeps the committed grid, so
    /// whatever is on screen stays there. To blank the screen, call
    /// [`Ui::invalidate`] before the empty frame.
    pub fn frame<R, F>(&mut self, renderer: &mut R, render: F) -> Result<FrameStats, TuiError>
    where
        R: Renderer + ?Sized,
        F: FnOnce(&mut Self) -> Result<(), UiError>,
    {
        self.render_requested = false;
        self.frames += 1;
        self.focus.begin_frame();
        self.reset_stacks();

        let result = render(self).and_then(|()| self.check_balanced());

        let outcome = match result {
            Ok(()) => {
                let metrics = self.config.metrics;
                let changed_cells = self
                    .buffer
                    .refresh(|change| renderer.draw(change, &metrics));
                let focusables = self.focus.commit();
                renderer
                    .present()
                    .map(|()| FrameStats {
                        changed_cells,
                        focusables,
                    })
            }
            Err(e) => {
                log::debug!("frame {} discarded: {e}", self.frames);
                self.buffer.discard();
                self.reset_stacks();
                Err(e.into())
            }
        };

        self.input.reset();
        outcome
    }
}

/// Guard for one stack push.
///
/// Derefs to the [`Ui`] it borrows. On drop the stack is truncated to the
/// depth it had before the push, which also removes anything pushed above
/// it and never popped.
#[derive(Debug)]
pub struct Scope<'a> {
    ui: &'a mut Ui,
    kind: StackKind,
    depth: usize,
}

impl<'a> Scope<'a> {
    fn new(ui: &'a mut Ui, kind: StackKind, depth: usize) -> Self {
        Self { ui, kind, depth }
    }

    /// The stack this guard restores.
    #[must_use]
    pub const fn kind(&self) -> StackKind {
        self.kind
    }
}

impl Deref for Scope<'_> {
    type Target = Ui;

    fn deref(&self) -> &Ui {
        self.ui
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Ui {
        self.ui
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.ui.truncate_stack(self.kind, self.depth);
    }
}
