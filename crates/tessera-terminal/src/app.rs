//! TUI application runner.
//!
//! [`TuiApp`] owns a [`Ui`] and drives it against a [`Terminal`]: poll input
//! with the configured tick rate, merge events, and run a frame whenever one
//! was requested. Frames come from a render closure or a [`ViewStack`].
//! The terminal's session modes are restored on every way out of a run,
//! errors and panics included.
//!
//! ```text
//! TuiApp ─frame→ GenericTerminal (AnsiRenderer into memory)
//!                      │ write_flush, set_mode
//!                      ▼
//!            CrosstermBackend | TestableBackend
//! ```

use crate::color::ColorMode;
use crate::config::UiConfig;
use crate::direct::{AnsiRenderer, CellChange};
use crate::error::{TuiError, UiError};
use crate::input::{InputAdapter, KeyBinding};
use crate::renderer::{GlyphMetrics, Renderer};
use crate::ui::Ui;
use crate::view::ViewStack;
use crossterm::cursor;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};
use tessera_core::{Event, Key, KeyModifiers};

/// A terminal setting held for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalMode {
    /// Unbuffered, unechoed input
    Raw,
    /// Separate screen, restored on exit
    AlternateScreen,
    /// No visible text cursor
    HiddenCursor,
    /// Mouse reporting
    MouseCapture,
}

impl TerminalMode {
    /// Switched on at startup in this order, off in reverse.
    pub const SESSION: [Self; 3] = [Self::Raw, Self::AlternateScreen, Self::HiddenCursor];
}

/// Emit the escape sequence for a screen mode. Raw mode is a tty setting
/// and writes nothing.
fn write_mode<W: Write>(out: &mut W, mode: TerminalMode, on: bool) -> io::Result<()> {
    match (mode, on) {
        (TerminalMode::Raw, _) => Ok(()),
        (TerminalMode::AlternateScreen, true) => execute!(out, EnterAlternateScreen),
        (TerminalMode::AlternateScreen, false) => execute!(out, LeaveAlternateScreen),
        (TerminalMode::HiddenCursor, true) => execute!(out, cursor::Hide),
        (TerminalMode::HiddenCursor, false) => execute!(out, cursor::Show),
        (TerminalMode::MouseCapture, true) => execute!(out, EnableMouseCapture),
        (TerminalMode::MouseCapture, false) => execute!(out, DisableMouseCapture),
    }
}

/// What the application loop needs from a terminal.
///
/// A terminal is also the [`Renderer`] frames are drawn into.
pub trait Terminal: Renderer {
    /// Switch on the session modes.
    fn enter(&mut self) -> Result<(), TuiError>;
    /// Restore the session modes. Every mode is attempted; the first
    /// failure is returned.
    fn leave(&mut self) -> Result<(), TuiError>;
    /// Size in cells (width, height).
    fn size(&self) -> Result<(u16, u16), TuiError>;
    /// Wait up to `timeout` for input.
    fn poll(&self, timeout: Duration) -> Result<bool, TuiError>;
    /// Next input event. Only call after `poll` returned true.
    fn read_event(&self) -> Result<CrosstermEvent, TuiError>;
    /// Turn mouse reporting on or off.
    fn set_mouse_capture(&mut self, on: bool) -> Result<(), TuiError>;
    /// Forget cached cursor and color state after the screen changed.
    fn reset(&mut self);
}

/// Raw terminal access beneath [`GenericTerminal`].
pub trait TerminalBackend {
    /// Switch a mode on or off.
    fn set_mode(&mut self, mode: TerminalMode, on: bool) -> Result<(), TuiError>;
    /// Size in cells.
    fn size(&self) -> Result<(u16, u16), TuiError>;
    /// Wait up to `timeout` for input.
    fn poll(&self, timeout: Duration) -> Result<bool, TuiError>;
    /// Next input event.
    fn read_event(&self) -> Result<CrosstermEvent, TuiError>;
    /// Write one frame of output and flush it.
    fn write_flush(&mut self, bytes: &[u8]) -> Result<(), TuiError>;
}

/// Backend on the process's stdout.
#[derive(Debug)]
pub struct CrosstermBackend {
    stdout: Stdout,
}

impl CrosstermBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBackend for CrosstermBackend {
    fn set_mode(&mut self, mode: TerminalMode, on: bool) -> Result<(), TuiError> {
        match (mode, on) {
            (TerminalMode::Raw, true) => terminal::enable_raw_mode()?,
            (TerminalMode::Raw, false) => terminal::disable_raw_mode()?,
            _ => write_mode(&mut self.stdout, mode, on)?,
        }
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16), TuiError> {
        Ok(terminal::size()?)
    }

    fn poll(&self, timeout: Duration) -> Result<bool, TuiError> {
        Ok(event::poll(timeout)?)
    }

    fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
        Ok(event::read()?)
    }

    fn write_flush(&mut self, bytes: &[u8]) -> Result<(), TuiError> {
        let mut lock = self.stdout.lock();
        lock.write_all(bytes)?;
        lock.flush()?;
        Ok(())
    }
}

/// In-memory backend with a scripted event queue.
///
/// Output, including mode escape sequences, goes to `writer`; `poll`
/// succeeds while scripted events remain.
#[derive(Debug)]
pub struct TestableBackend<W: Write> {
    writer: W,
    size: (u16, u16),
    active: Vec<TerminalMode>,
    script: RefCell<VecDeque<CrosstermEvent>>,
}

impl<W: Write> TestableBackend<W> {
    /// Backend reporting `width` x `height` cells.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            writer,
            size: (width, height),
            active: Vec::new(),
            script: RefCell::new(VecDeque::new()),
        }
    }

    /// Append events for `read_event` to return in order.
    #[must_use]
    pub fn with_events(self, events: Vec<CrosstermEvent>) -> Self {
        self.script.borrow_mut().extend(events);
        self
    }

    /// Whether `mode` is currently switched on.
    pub fn is_active(&self, mode: TerminalMode) -> bool {
        self.active.contains(&mode)
    }

    /// Bytes written so far.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Unwrap the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalBackend for TestableBackend<W> {
    fn set_mode(&mut self, mode: TerminalMode, on: bool) -> Result<(), TuiError> {
        self.active.retain(|m| *m != mode);
        if on {
            self.active.push(mode);
        }
        write_mode(&mut self.writer, mode, on)?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16), TuiError> {
        Ok(self.size)
    }

    fn poll(&self, _timeout: Duration) -> Result<bool, TuiError> {
        Ok(!self.script.borrow().is_empty())
    }

    fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
        self.script.borrow_mut().pop_front().ok_or_else(|| {
            TuiError::Io(io::Error::new(io::ErrorKind::WouldBlock, "event script exhausted"))
        })
    }

    fn write_flush(&mut self, bytes: &[u8]) -> Result<(), TuiError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// A [`Terminal`] over any [`TerminalBackend`].
///
/// Frames are encoded by an [`AnsiRenderer`] into memory and handed to the
/// backend in one write per frame.
#[derive(Debug)]
pub struct GenericTerminal<B: TerminalBackend> {
    backend: B,
    renderer: AnsiRenderer<Vec<u8>>,
}

impl<B: TerminalBackend> GenericTerminal<B> {
    /// Wrap `backend`, encoding colors for `color_mode`.
    pub fn new(backend: B, color_mode: ColorMode) -> Self {
        Self {
            backend,
            renderer: AnsiRenderer::with_color_mode(Vec::new(), color_mode),
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Unwrap the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: TerminalBackend> Renderer for GenericTerminal<B> {
    fn draw(&mut self, change: &CellChange, metrics: &GlyphMetrics) {
        self.renderer.draw(change, metrics);
    }

    fn present(&mut self) -> Result<(), TuiError> {
        self.renderer.present()?;
        let bytes = std::mem::take(self.renderer.get_mut());
        if !bytes.is_empty() {
            self.backend.write_flush(&bytes)?;
        }
        Ok(())
    }
}

impl<B: TerminalBackend> Terminal for GenericTerminal<B> {
    fn enter(&mut self) -> Result<(), TuiError> {
        for mode in TerminalMode::SESSION {
            self.backend.set_mode(mode, true)?;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TuiError> {
        let mut outcome = Ok(());
        for mode in TerminalMode::SESSION.into_iter().rev() {
            if let Err(e) = self.backend.set_mode(mode, false) {
                log::warn!("could not restore {mode:?}: {e}");
                outcome = outcome.and(Err(e));
            }
        }
        outcome
    }

    fn size(&self) -> Result<(u16, u16), TuiError> {
        self.backend.size()
    }

    fn poll(&self, timeout: Duration) -> Result<bool, TuiError> {
        self.backend.poll(timeout)
    }

    fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
        self.backend.read_event()
    }

    fn set_mouse_capture(&mut self, on: bool) -> Result<(), TuiError> {
        self.backend.set_mode(TerminalMode::MouseCapture, on)
    }

    fn reset(&mut self) {
        self.renderer.reset();
    }
}

/// Terminal on stdout.
pub type CrosstermTerminal = GenericTerminal<CrosstermBackend>;

/// Session modes held on a terminal for one run.
///
/// Restored by [`Session::finish`], or on drop when a run unwinds.
struct Session<'t, T: Terminal> {
    terminal: &'t mut T,
    mouse: bool,
    active: bool,
}

impl<'t, T: Terminal> Session<'t, T> {
    fn start(terminal: &'t mut T, mouse: bool) -> Result<Self, TuiError> {
        let mut session = Self {
            terminal,
            mouse,
            active: true,
        };
        session.terminal.enter()?;
        if mouse {
            session.terminal.set_mouse_capture(true)?;
        }
        Ok(session)
    }

    /// Attempt every restore step; the first failure is returned.
    fn restore(&mut self) -> Result<(), TuiError> {
        self.active = false;
        let mut outcome = Ok(());
        if self.mouse {
            if let Err(e) = self.terminal.set_mouse_capture(false) {
                log::warn!("could not release mouse capture: {e}");
                outcome = Err(e);
            }
        }
        outcome.and(self.terminal.leave())
    }

    fn finish(mut self) -> Result<(), TuiError> {
        self.restore()
    }
}

impl<T: Terminal> Drop for Session<'_, T> {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.restore() {
                log::error!("terminal left in a modified state: {e}");
            }
        }
    }
}

/// What the loop draws and feeds events to.
trait Scene {
    fn draw(&mut self, ui: &mut Ui) -> Result<(), UiError>;

    fn deliver(&mut self, _ui: &mut Ui, _event: &Event) {}

    fn finished(&self) -> bool {
        false
    }
}

struct RenderFn<F>(F);

impl<F> Scene for RenderFn<F>
where
    F: FnMut(&mut Ui) -> Result<(), UiError>,
{
    fn draw(&mut self, ui: &mut Ui) -> Result<(), UiError> {
        (self.0)(ui)
    }
}

impl Scene for ViewStack {
    fn draw(&mut self, ui: &mut Ui) -> Result<(), UiError> {
        self.render(ui)
    }

    fn deliver(&mut self, ui: &mut Ui, event: &Event) {
        self.dispatch(ui, event);
    }

    fn finished(&self) -> bool {
        self.is_empty()
    }
}

/// Frame counters and timing.
#[derive(Debug, Clone, Default)]
pub struct FrameMetrics {
    /// Frames committed.
    pub frame_count: u64,
    /// Frames discarded after a programming error.
    pub aborted_frames: u64,
    /// Cells changed by the last committed frame.
    pub changed_cells: usize,
    /// Time spent in the last frame.
    pub frame_time: Duration,
}

/// Runs a render function against a terminal until a quit key arrives.
#[derive(Debug)]
pub struct TuiApp {
    ui: Ui,
    adapter: InputAdapter,
    quit_keys: Vec<KeyBinding>,
    metrics: FrameMetrics,
    should_quit: bool,
}

impl TuiApp {
    /// App with the given configuration. Ctrl+C quits.
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        Self {
            ui: Ui::new(config),
            adapter: InputAdapter::new(),
            quit_keys: vec![KeyBinding::new(Key::Char('c'), KeyModifiers::CONTROL)],
            metrics: FrameMetrics::default(),
            should_quit: false,
        }
    }

    /// Add another key that ends the run loop.
    #[must_use]
    pub fn with_quit_key(mut self, binding: KeyBinding) -> Self {
        self.quit_keys.push(binding);
        self
    }

    /// Replace the input adapter.
    #[must_use]
    pub fn with_input_adapter(mut self, adapter: InputAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    /// The engine.
    #[must_use]
    pub const fn ui(&self) -> &Ui {
        &self.ui
    }

    /// The engine, mutably.
    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// Counters for the frames run so far.
    #[must_use]
    pub const fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    /// Stop the loop before the next poll.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Run the application on stdout (blocking).
    pub fn run<F>(&mut self, render: F) -> Result<(), TuiError>
    where
        F: FnMut(&mut Ui) -> Result<(), UiError>,
    {
        let terminal = self.stdout_terminal();
        self.run_with_terminal(terminal, render).map(|_| ())
    }

    /// Run `views` on stdout until a quit key arrives or the last view
    /// leaves the stack (blocking).
    pub fn run_views(&mut self, views: &mut ViewStack) -> Result<(), TuiError> {
        let terminal = self.stdout_terminal();
        self.run_views_with_terminal(terminal, views).map(|_| ())
    }

    /// Run against `terminal`, handing it back once the session modes are
    /// restored.
    pub fn run_with_terminal<T, F>(&mut self, terminal: T, render: F) -> Result<T, TuiError>
    where
        T: Terminal,
        F: FnMut(&mut Ui) -> Result<(), UiError>,
    {
        self.drive(terminal, &mut RenderFn(render))
    }

    /// [`TuiApp::run_views`] against `terminal`.
    ///
    /// Every input event reaches the engine first, then the views from the
    /// top down.
    pub fn run_views_with_terminal<T>(
        &mut self,
        terminal: T,
        views: &mut ViewStack,
    ) -> Result<T, TuiError>
    where
        T: Terminal,
    {
        self.drive(terminal, views)
    }

    fn stdout_terminal(&self) -> CrosstermTerminal {
        let color_mode = self.ui.config().color_mode.unwrap_or_else(ColorMode::detect);
        GenericTerminal::new(CrosstermBackend::new(), color_mode)
    }

    fn drive<T, S>(&mut self, mut terminal: T, scene: &mut S) -> Result<T, TuiError>
    where
        T: Terminal,
        S: Scene,
    {
        let mut session = Session::start(&mut terminal, self.ui.config().enable_mouse)?;
        let result = self.run_loop(&mut *session.terminal, scene);
        let restored = session.finish();
        result.and(restored).map(|()| terminal)
    }

    fn run_loop<T, S>(&mut self, terminal: &mut T, scene: &mut S) -> Result<(), TuiError>
    where
        T: Terminal,
        S: Scene,
    {
        let tick = Duration::from_millis(self.ui.config().tick_rate_ms);

        let (width, height) = terminal.size()?;
        if (width, height) != (self.ui.width(), self.ui.height()) {
            self.ui.resize(width, height);
        }
        self.ui.invalidate();

        loop {
            if self.ui.needs_render() {
                self.render_frame(terminal, scene)?;
                for release in self.adapter.release_held() {
                    self.deliver(scene, &release);
                }
            }

            // A frame requested before the quit has already run
            if self.should_quit || scene.finished() {
                break;
            }

            if !terminal.poll(tick)? {
                continue;
            }
            let Some(event) = self.adapter.convert(terminal.read_event()?) else {
                continue;
            };

            if self.quit_keys.iter().any(|binding| binding.matches(&event)) {
                self.should_quit = true;
            } else if let Event::Resize { .. } = event {
                terminal.reset();
                self.deliver(scene, &event);
                self.ui.invalidate();
            } else {
                self.deliver(scene, &event);
            }
        }

        Ok(())
    }

    fn deliver<S: Scene>(&mut self, scene: &mut S, event: &Event) {
        self.ui.handle_event(event);
        scene.deliver(&mut self.ui, event);
    }

    fn render_frame<T, S>(&mut self, terminal: &mut T, scene: &mut S) -> Result<(), TuiError>
    where
        T: Terminal,
        S: Scene,
    {
        let start = Instant::now();
        let result = self.ui.frame(terminal, |ui| scene.draw(ui));
        self.metrics.frame_time = start.elapsed();

        match result {
            Ok(stats) => {
                self.metrics.frame_count += 1;
                self.metrics.changed_cells = stats.changed_cells;
                Ok(())
            }
            Err(TuiError::Ui(e)) if !self.ui.config().halt_on_error => {
                self.metrics.aborted_frames += 1;
                log::error!("frame {} aborted: {e}", self.ui.frame_count());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Text;
    use crate::view::{View, ViewCommands};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers as CtModifiers};
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;
    use tessera_core::Style;

    fn ctrl_c() -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('c'), CtModifiers::CONTROL))
    }

    fn terminal(events: Vec<CrosstermEvent>) -> GenericTerminal<TestableBackend<Vec<u8>>> {
        let backend = TestableBackend::new(Vec::new(), 20, 5).with_events(events);
        GenericTerminal::new(backend, ColorMode::Mono)
    }

    fn output(terminal: GenericTerminal<TestableBackend<Vec<u8>>>) -> String {
        String::from_utf8_lossy(&terminal.into_backend().into_writer()).into_owned()
    }

    #[test]
    fn test_config_presets_reach_app() {
        let app = TuiApp::new(UiConfig::high_performance());
        assert_eq!(app.ui().config().tick_rate_ms, 16);
        assert_eq!(app.metrics().frame_count, 0);
    }

    #[test]
    fn test_run_draws_first_frame_and_quits() {
        let mut app = TuiApp::new(UiConfig::default());
        let term = app
            .run_with_terminal(terminal(vec![ctrl_c()]), |ui| {
                Text::new("hello").draw(ui);
                Ok(())
            })
            .unwrap();

        let backend = term.backend();
        for mode in TerminalMode::SESSION {
            assert!(!backend.is_active(mode));
        }
        assert_eq!(app.metrics().frame_count, 1);
        assert_eq!((app.ui().width(), app.ui().height()), (20, 5));
        assert!(output(term).contains("hello"));
    }

    #[test]
    fn test_first_frame_repaints_whole_screen() {
        let mut app = TuiApp::new(UiConfig::default());
        app.run_with_terminal(terminal(vec![ctrl_c()]), |_| Ok(()))
            .unwrap();
        assert_eq!(app.metrics().changed_cells, 20 * 5);
    }

    #[test]
    fn test_custom_quit_key() {
        let mut app = TuiApp::new(UiConfig::default())
            .with_quit_key(KeyBinding::simple(Key::Char('q')));
        let q = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('q'), CtModifiers::NONE));
        let result = app.run_with_terminal(terminal(vec![q]), |_| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_events_trigger_frames() {
        let mut app = TuiApp::new(UiConfig::default());
        let a = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('a'), CtModifiers::NONE));
        let mut seen_pressing = 0;
        app.run_with_terminal(terminal(vec![a, ctrl_c()]), |ui| {
            if ui.input().keyboard.is_pressing(Key::Char('a')) {
                seen_pressing += 1;
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(seen_pressing, 1);
        // Initial frame, the press, then the synthesized release, which
        // still runs although Ctrl+C is already queued behind it
        assert_eq!(app.metrics().frame_count, 3);
    }

    #[test_log::test]
    fn test_aborted_frame_is_logged_and_loop_continues() {
        let mut app = TuiApp::new(UiConfig::default());
        app.run_with_terminal(terminal(vec![ctrl_c()]), |ui| {
            ui.pop_id()?;
            Ok(())
        })
        .unwrap();
        assert_eq!(app.metrics().aborted_frames, 1);
        assert_eq!(app.metrics().frame_count, 0);
    }

    #[test]
    fn test_halt_on_error_returns_frame_error() {
        let mut app = TuiApp::new(UiConfig::default().with_halt_on_error(true));
        let result = app.run_with_terminal(terminal(vec![ctrl_c()]), |ui| {
            ui.push_layer(1);
            ui.put(0, 0, 'x', Style::NONE);
            Ok(())
        });
        assert!(matches!(
            result,
            Err(TuiError::Ui(UiError::UnbalancedStack { stack: "layer", .. }))
        ));
    }

    #[test]
    fn test_mouse_capture_toggled() {
        let mut app = TuiApp::new(UiConfig::default());
        let term = app
            .run_with_terminal(terminal(vec![ctrl_c()]), |_| Ok(()))
            .unwrap();
        assert!(!term.backend().is_active(TerminalMode::MouseCapture));
        assert!(output(term).contains("\x1b[?1000h"));
    }

    #[test]
    fn test_resize_event_resizes_ui() {
        let mut app = TuiApp::new(UiConfig::default());
        app.run_with_terminal(
            terminal(vec![CrosstermEvent::Resize(30, 8), ctrl_c()]),
            |_| Ok(()),
        )
        .unwrap();
        assert_eq!((app.ui().width(), app.ui().height()), (30, 8));
        assert_eq!(app.metrics().changed_cells, 30 * 8);
    }

    type Calls = Rc<RefCell<Vec<(TerminalMode, bool)>>>;

    /// Backend that logs mode switches and can refuse one of them.
    struct LoggedBackend {
        calls: Calls,
        refuse: Option<(TerminalMode, bool)>,
        script: RefCell<VecDeque<CrosstermEvent>>,
    }

    impl LoggedBackend {
        fn new(calls: &Calls, events: Vec<CrosstermEvent>) -> Self {
            Self {
                calls: Rc::clone(calls),
                refuse: None,
                script: RefCell::new(events.into()),
            }
        }

        fn refusing(mut self, mode: TerminalMode, on: bool) -> Self {
            self.refuse = Some((mode, on));
            self
        }
    }

    impl TerminalBackend for LoggedBackend {
        fn set_mode(&mut self, mode: TerminalMode, on: bool) -> Result<(), TuiError> {
            self.calls.borrow_mut().push((mode, on));
            if self.refuse == Some((mode, on)) {
                return Err(io::Error::new(io::ErrorKind::Other, "refused").into());
            }
            Ok(())
        }

        fn size(&self) -> Result<(u16, u16), TuiError> {
            Ok((8, 2))
        }

        fn poll(&self, _timeout: Duration) -> Result<bool, TuiError> {
            Ok(!self.script.borrow().is_empty())
        }

        fn read_event(&self) -> Result<CrosstermEvent, TuiError> {
            self.script
                .borrow_mut()
                .pop_front()
                .ok_or(TuiError::TerminalNotAvailable)
        }

        fn write_flush(&mut self, _bytes: &[u8]) -> Result<(), TuiError> {
            Ok(())
        }
    }

    /// Every mode's last switch was off.
    fn session_restored(calls: &Calls) -> bool {
        let calls = calls.borrow();
        let last = |mode: TerminalMode, on: bool| calls.iter().rposition(|&c| c == (mode, on));
        TerminalMode::SESSION
            .into_iter()
            .chain([TerminalMode::MouseCapture])
            .all(|mode| last(mode, false) > last(mode, true))
    }

    #[test]
    fn test_failed_mouse_release_still_leaves_session() {
        let calls = Calls::default();
        let backend = LoggedBackend::new(&calls, vec![ctrl_c()])
            .refusing(TerminalMode::MouseCapture, false);
        let mut app = TuiApp::new(UiConfig::default());

        let result =
            app.run_with_terminal(GenericTerminal::new(backend, ColorMode::Mono), |_| Ok(()));

        assert!(matches!(result, Err(TuiError::Io(_))));
        let calls = calls.borrow();
        let release = calls
            .iter()
            .position(|&c| c == (TerminalMode::MouseCapture, false))
            .unwrap();
        assert_eq!(
            calls[release + 1..],
            [
                (TerminalMode::HiddenCursor, false),
                (TerminalMode::AlternateScreen, false),
                (TerminalMode::Raw, false),
            ]
        );
    }

    #[test]
    fn test_failed_enter_restores_what_was_switched_on() {
        let calls = Calls::default();
        let backend = LoggedBackend::new(&calls, vec![ctrl_c()])
            .refusing(TerminalMode::HiddenCursor, true);
        let mut app = TuiApp::new(UiConfig::default());

        let result =
            app.run_with_terminal(GenericTerminal::new(backend, ColorMode::Mono), |_| Ok(()));

        assert!(result.is_err());
        assert_eq!(app.metrics().frame_count, 0);
        assert!(calls.borrow().contains(&(TerminalMode::Raw, false)));
        assert!(calls.borrow().contains(&(TerminalMode::AlternateScreen, false)));
    }

    #[test]
    fn test_panicking_render_restores_session() {
        let calls = Calls::default();
        let backend = LoggedBackend::new(&calls, vec![ctrl_c()]);
        let mut app = TuiApp::new(UiConfig::default());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            app.run_with_terminal(GenericTerminal::new(backend, ColorMode::Mono), |_| {
                panic!("render failed")
            })
        }));

        assert!(outcome.is_err());
        assert!(session_restored(&calls));
    }

    #[test]
    fn test_clean_run_restores_session() {
        let calls = Calls::default();
        let backend = LoggedBackend::new(&calls, vec![ctrl_c()]);
        let mut app = TuiApp::new(UiConfig::default());
        app.run_with_terminal(GenericTerminal::new(backend, ColorMode::Mono), |_| Ok(()))
            .unwrap();
        assert!(session_restored(&calls));
    }

    /// Keeps letters to itself while open; Escape closes it.
    struct Dialog {
        typed: Rc<RefCell<String>>,
    }

    impl View for Dialog {
        fn update(&mut self, event: &Event, views: &mut ViewCommands) -> bool {
            match *event {
                Event::KeyDown { key: Key::Char(c), .. } => {
                    self.typed.borrow_mut().push(c);
                    true
                }
                Event::KeyDown { key: Key::Escape, .. } => {
                    views.pop();
                    true
                }
                _ => false,
            }
        }

        fn render(&mut self, ui: &mut Ui, _views: &mut ViewCommands) -> Result<(), UiError> {
            Text::new("dialog").draw(ui);
            Ok(())
        }
    }

    /// Counts letters that reach it; Escape closes it.
    struct Home {
        letters: Rc<RefCell<u32>>,
    }

    impl View for Home {
        fn update(&mut self, event: &Event, views: &mut ViewCommands) -> bool {
            match *event {
                Event::KeyDown { key: Key::Char(_), .. } => {
                    *self.letters.borrow_mut() += 1;
                    false
                }
                Event::KeyDown { key: Key::Escape, .. } => {
                    views.pop();
                    true
                }
                _ => false,
            }
        }

        fn render(&mut self, ui: &mut Ui, _views: &mut ViewCommands) -> Result<(), UiError> {
            Text::new("home").draw(ui);
            Ok(())
        }
    }

    #[test]
    fn test_views_take_events_top_down_and_run_ends_with_last_view() {
        let typed = Rc::new(RefCell::new(String::new()));
        let letters = Rc::new(RefCell::new(0));
        let mut app = TuiApp::new(UiConfig::default());
        let mut views: ViewStack = ViewStack::new();
        views.push(
            app.ui_mut(),
            Home {
                letters: Rc::clone(&letters),
            },
        );
        views.push(
            app.ui_mut(),
            Dialog {
                typed: Rc::clone(&typed),
            },
        );

        let press = |code| CrosstermEvent::Key(KeyEvent::new(code, CtModifiers::NONE));
        let events = vec![
            press(KeyCode::Char('h')),
            press(KeyCode::Char('i')),
            press(KeyCode::Esc),
            press(KeyCode::Char('z')),
            press(KeyCode::Esc),
        ];
        let term = app.run_views_with_terminal(terminal(events), &mut views).unwrap();

        assert_eq!(*typed.borrow(), "hi");
        assert_eq!(*letters.borrow(), 1);
        assert!(views.is_empty());
        let text = output(term);
        assert!(text.contains("dialog"));
        assert!(text.contains("home"));
    }
}
