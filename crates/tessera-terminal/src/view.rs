//! Stacked screens.
//!
//! A [`ViewStack`] holds whole-screen [`View`]s. Every frame renders them
//! bottom to top, so a dialog pushed over a list draws last and wins on
//! shared cells. Messages travel the other way: top to bottom, stopping at
//! the first view that consumes them.
//!
//! Views never touch the stack directly. They queue transitions on the
//! [`ViewCommands`] they are handed, and the stack applies them once the
//! current pass is over.

use crate::error::UiError;
use crate::ui::Ui;
use std::fmt;
use tessera_core::Event;

/// One screen of an application.
pub trait View<M = Event> {
    /// Called once the view is on the stack.
    fn enter(&mut self, _ui: &mut Ui) {}

    /// Called once the view has left the stack.
    fn exit(&mut self, _ui: &mut Ui) {}

    /// Handle a message. Returning `true` keeps it from reaching the views
    /// beneath.
    fn update(&mut self, _message: &M, _views: &mut ViewCommands<M>) -> bool {
        false
    }

    /// Draw into the current frame.
    fn render(&mut self, ui: &mut Ui, views: &mut ViewCommands<M>) -> Result<(), UiError>;
}

enum ViewCommand<M> {
    Push(Box<dyn View<M>>),
    Pop,
    Replace(Box<dyn View<M>>),
}

/// Stack transitions queued during a render or dispatch pass.
pub struct ViewCommands<M = Event> {
    queue: Vec<ViewCommand<M>>,
}

impl<M> ViewCommands<M> {
    fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Put `view` on top.
    pub fn push(&mut self, view: impl View<M> + 'static) {
        self.queue.push(ViewCommand::Push(Box::new(view)));
    }

    /// Remove the top view.
    pub fn pop(&mut self) {
        self.queue.push(ViewCommand::Pop);
    }

    /// Swap the top view for `view`.
    pub fn replace(&mut self, view: impl View<M> + 'static) {
        self.queue.push(ViewCommand::Replace(Box::new(view)));
    }

    /// Number of transitions waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<M> fmt::Debug for ViewCommands<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewCommands")
            .field("queued", &self.queue.len())
            .finish()
    }
}

/// Views ordered bottom to top.
pub struct ViewStack<M = Event> {
    views: Vec<Box<dyn View<M>>>,
}

impl<M> Default for ViewStack<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for ViewStack<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStack")
            .field("depth", &self.views.len())
            .finish()
    }
}

impl<M> ViewStack<M> {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    /// Views on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// True when no view is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Put `view` on top, enter it, and request a frame.
    pub fn push(&mut self, ui: &mut Ui, view: impl View<M> + 'static) {
        self.push_boxed(ui, Box::new(view));
    }

    fn push_boxed(&mut self, ui: &mut Ui, mut view: Box<dyn View<M>>) {
        view.enter(ui);
        self.views.push(view);
        ui.enqueue_render();
    }

    /// Take the top view off and exit it. Requests a frame when a view was
    /// removed.
    pub fn pop(&mut self, ui: &mut Ui) -> Option<Box<dyn View<M>>> {
        let mut view = self.views.pop()?;
        view.exit(ui);
        ui.enqueue_render();
        Some(view)
    }

    /// Pop the top view, then push `view`.
    pub fn replace(
        &mut self,
        ui: &mut Ui,
        view: impl View<M> + 'static,
    ) -> Option<Box<dyn View<M>>> {
        let old = self.pop(ui);
        self.push(ui, view);
        old
    }

    /// Offer `message` to each view from the top down until one consumes
    /// it, then apply any queued transitions. Always requests a frame.
    ///
    /// Returns whether a view consumed the message.
    pub fn dispatch(&mut self, ui: &mut Ui, message: &M) -> bool {
        let mut commands = ViewCommands::new();
        let consumed = self
            .views
            .iter_mut()
            .rev()
            .any(|view| view.update(message, &mut commands));
        self.apply(ui, commands);
        ui.enqueue_render();
        consumed
    }

    /// Render every view from the bottom up, then apply any queued
    /// transitions. Transitions queued before a failing view are dropped
    /// along with the frame.
    pub fn render(&mut self, ui: &mut Ui) -> Result<(), UiError> {
        let mut commands = ViewCommands::new();
        for view in &mut self.views {
            view.render(ui, &mut commands)?;
        }
        self.apply(ui, commands);
        Ok(())
    }

    fn apply(&mut self, ui: &mut Ui, commands: ViewCommands<M>) {
        for command in commands.queue {
            match command {
                ViewCommand::Push(view) => self.push_boxed(ui, view),
                ViewCommand::Pop => {
                    self.pop(ui);
                }
                ViewCommand::Replace(view) => {
                    self.pop(ui);
                    self.push_boxed(ui, view);
                }
            }
        }
    }
}
