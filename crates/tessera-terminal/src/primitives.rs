//! Layout primitives built on [`Ui`].
//!
//! Each primitive is a small builder. `draw` pushes whatever boxes, clips
//! and namespaces it needs through scoped guards, runs the caller's render
//! closure inside them, and leaves every stack as it found it.
//!
//! Areas are relative to the current bounding box; an unset area covers
//! the whole current box.

use crate::error::UiError;
use crate::ui::Ui;
use tessera_core::{Color, FocusableState, Glyph, Point, Rect, Style};
use tessera_layout::{aligned_bounds, hard_wrap, soft_wrap, Flex, FlexAlign, FlexItem};

fn resolve(ui: &Ui, area: Option<Rect>) -> Rect {
    area.unwrap_or_else(|| {
        let current = ui.current_box();
        Rect::sized(current.width, current.height)
    })
}

// ============================================================================
// Group
// ============================================================================

/// Bounding box plus an optional id namespace.
#[derive(Debug, Clone, Default)]
pub struct Group {
    id: Option<String>,
    area: Option<Rect>,
}

impl Group {
    /// Group covering the current box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualify focusable ids drawn inside with `id`.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the area.
    #[must_use]
    pub const fn at(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Run `render` inside the group.
    pub fn draw<R>(
        self,
        ui: &mut Ui,
        render: impl FnOnce(&mut Ui) -> Result<R, UiError>,
    ) -> Result<R, UiError> {
        let area = resolve(ui, self.area);
        match self.id {
            Some(id) => {
                let mut ns = ui.id_scope(id);
                let mut scope = ns.bounding_box(area.x, area.y, area.width, area.height);
                render(&mut scope)
            }
            None => {
                let mut scope = ui.bounding_box(area.x, area.y, area.width, area.height);
                render(&mut scope)
            }
        }
    }
}

// ============================================================================
// Panel
// ============================================================================

/// A filled rectangle whose inner, padded box becomes the current one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panel {
    area: Option<Rect>,
    padding: [i32; 4],
    justify_self: Option<FlexAlign>,
    align_self: Option<FlexAlign>,
    bg: Option<Color>,
}

impl Panel {
    /// Panel covering the current box, no padding, no background.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the area.
    #[must_use]
    pub const fn at(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Same padding on every edge.
    #[must_use]
    pub const fn padding(mut self, padding: i32) -> Self {
        self.padding = [padding; 4];
        self
    }

    /// Padding per edge: left, top, right, bottom.
    #[must_use]
    pub const fn padding_edges(mut self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        self.padding = [left, top, right, bottom];
        self
    }

    /// Vertical placement inside the parent.
    #[must_use]
    pub const fn justify_self(mut self, justify: FlexAlign) -> Self {
        self.justify_self = Some(justify);
        self
    }

    /// Horizontal placement inside the parent.
    #[must_use]
    pub const fn align_self(mut self, align: FlexAlign) -> Self {
        self.align_self = Some(align);
        self
    }

    /// Background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Fill the panel, then run `render` inside its padding.
    pub fn draw<R>(
        self,
        ui: &mut Ui,
        render: impl FnOnce(&mut Ui) -> Result<R, UiError>,
    ) -> Result<R, UiError> {
        let child = resolve(ui, self.area);
        let parent = ui.current_box();
        let bounds = aligned_bounds(parent, child, self.justify_self, self.align_self);

        let mut outer = ui.bounding_box(bounds.x, bounds.y, bounds.width, bounds.height);
        let style = Style {
            fg: None,
            bg: self.bg,
        };
        for y in 0..bounds.height {
            for x in 0..bounds.width {
                outer.put(x, y, ' ', style);
            }
        }

        let [left, top, right, bottom] = self.padding;
        let inner = Rect::sized(bounds.width, bounds.height).inset(left, top, right, bottom);
        let mut scope = outer.bounding_box(inner.x, inner.y, inner.width, inner.height);
        render(&mut scope)
    }
}

// ============================================================================
// Frame
// ============================================================================

/// Glyph set for a frame's edges and corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// Single line: ┌─┐│└─┘
    #[default]
    Single,
    /// Double line: ╔═╗║╚═╝
    Double,
    /// Rounded corners: ╭─╮│╰─╯
    Rounded,
    /// ASCII only: +-+|+-+
    Ascii,
    /// Box-drawing slots of a 16x16 code-page atlas
    Atlas,
}

impl BorderStyle {
    /// Glyphs as `[top_left, top, top_right, left, right, bottom_left,
    /// bottom, bottom_right]`.
    #[must_use]
    pub fn glyphs(self) -> [Glyph; 8] {
        let chars = match self {
            Self::Single => ['┌', '─', '┐', '│', '│', '└', '─', '┘'],
            Self::Double => ['╔', '═', '╗', '║', '║', '╚', '═', '╝'],
            Self::Rounded => ['╭', '─', '╮', '│', '│', '╰', '─', '╯'],
            Self::Ascii => ['+', '-', '+', '|', '|', '+', '-', '+'],
            Self::Atlas => {
                return [134, 133, 131, 138, 138, 140, 133, 137].map(Glyph);
            }
        };
        chars.map(Glyph::from)
    }
}

/// A border whose interior becomes the current box.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    area: Option<Rect>,
    border: BorderStyle,
    style: Style,
    title: Option<String>,
}

impl Frame {
    /// Single-line frame around the current box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the area.
    #[must_use]
    pub const fn at(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Set the border glyphs.
    #[must_use]
    pub const fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    /// Set the border colors.
    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Title drawn into the top edge.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Draw the border, then run `render` inside it.
    pub fn draw<R>(
        self,
        ui: &mut Ui,
        render: impl FnOnce(&mut Ui) -> Result<R, UiError>,
    ) -> Result<R, UiError> {
        let area = resolve(ui, self.area);
        let mut outer = ui.bounding_box(area.x, area.y, area.width, area.height);

        let [tl, top, tr, left, right, bl, bottom, br] = self.border.glyphs();
        let (x1, y1) = (area.width - 1, area.height - 1);
        let style = self.style;

        outer.put(0, 0, tl, style);
        outer.put(x1, 0, tr, style);
        outer.put(0, y1, bl, style);
        outer.put(x1, y1, br, style);

        for x in 1..x1 {
            outer.put(x, 0, top, style);
            outer.put(x, y1, bottom, style);
        }
        for y in 1..y1 {
            outer.put(0, y, left, style);
            outer.put(x1, y, right, style);
        }

        if let Some(title) = &self.title {
            let room = usize::try_from(area.width - 4).unwrap_or(0);
            for (x, c) in (2..).zip(title.chars().take(room)) {
                outer.put(x, 0, c, style);
            }
        }

        let mut scope = outer.bounding_box(1, 1, area.width - 2, area.height - 2);
        render(&mut scope)
    }
}

// ============================================================================
// Text
// ============================================================================

/// A single line of text.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    text: &'a str,
    origin: Point,
    width: Option<i32>,
    style: Style,
}

impl<'a> Text<'a> {
    /// Text at the origin of the current box.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            origin: Point::ORIGIN,
            width: None,
            style: Style::NONE,
        }
    }

    /// Position of the first character.
    #[must_use]
    pub const fn at(mut self, x: i32, y: i32) -> Self {
        self.origin = Point::new(x, y);
        self
    }

    /// Cut the text after `width` characters.
    #[must_use]
    pub const fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the colors.
    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Draw the text.
    pub fn draw(&self, ui: &mut Ui) {
        let limit = self
            .width
            .map_or(usize::MAX, |w| usize::try_from(w).unwrap_or(0));
        for (x, c) in (self.origin.x..).zip(self.text.chars().take(limit)) {
            ui.put(x, self.origin.y, c, self.style);
        }
    }
}

// ============================================================================
// WrappedText
// ============================================================================

/// How [`WrappedText`] breaks lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Continue overlong lines on the next row
    #[default]
    Soft,
    /// Cut overlong lines at the edge
    Hard,
}

/// Multi-line text confined to an area.
#[derive(Debug, Clone)]
pub struct WrappedText<'a> {
    text: &'a str,
    area: Option<Rect>,
    mode: WrapMode,
    style: Style,
}

impl<'a> WrappedText<'a> {
    /// Soft-wrapped text filling the current box.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            area: None,
            mode: WrapMode::Soft,
            style: Style::NONE,
        }
    }

    /// Set the area.
    #[must_use]
    pub const fn at(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Set the wrap mode.
    #[must_use]
    pub const fn mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the colors.
    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Draw as many lines as fit. Returns the number of wrapped lines,
    /// including those that did not fit.
    pub fn draw(&self, ui: &mut Ui) -> usize {
        let area = resolve(ui, self.area);
        let width = usize::try_from(area.width).unwrap_or(0);
        let lines = match self.mode {
            WrapMode::Soft => soft_wrap(self.text, width),
            WrapMode::Hard => hard_wrap(self.text, width),
        };

        let mut scope = ui.bounding_box(area.x, area.y, area.width, area.height);
        for (y, line) in (0..area.height).zip(&lines) {
            for (x, c) in (0..).zip(line.chars()) {
                scope.put(x, y, c, self.style);
            }
        }
        lines.len()
    }
}

// ============================================================================
// FlexBox
// ============================================================================

type ChildRender<'a> = Box<dyn FnOnce(&mut Ui) -> Result<(), UiError> + 'a>;

/// Container that lays its children out with [`Flex`] and renders each
/// inside its computed box.
pub struct FlexBox<'a> {
    area: Option<Rect>,
    settings: Flex,
    children: Vec<(FlexItem, ChildRender<'a>)>,
}

impl std::fmt::Debug for FlexBox<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlexBox")
            .field("area", &self.area)
            .field("settings", &self.settings)
            .field("children", &self.children.len())
            .finish()
    }
}

impl<'a> FlexBox<'a> {
    /// Empty container with the given layout settings.
    #[must_use]
    pub fn new(settings: Flex) -> Self {
        Self {
            area: None,
            settings,
            children: Vec::new(),
        }
    }

    /// Set the area.
    #[must_use]
    pub const fn at(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(
        mut self,
        item: FlexItem,
        render: impl FnOnce(&mut Ui) -> Result<(), UiError> + 'a,
    ) -> Self {
        self.children.push((item, Box::new(render)));
        self
    }

    /// Lay out and render every child in order. Returns the child boxes,
    /// relative to the container.
    pub fn draw(self, ui: &mut Ui) -> Result<Vec<Rect>, UiError> {
        let area = resolve(ui, self.area);
        let (items, renders): (Vec<_>, Vec<_>) = self.children.into_iter().unzip();
        let rects = self.settings.layout(area.width, area.height, &items);

        let mut container = ui.bounding_box(area.x, area.y, area.width, area.height);
        for (rect, render) in rects.iter().zip(renders) {
            let mut scope = container.bounding_box(rect.x, rect.y, rect.width, rect.height);
            render(&mut scope)?;
        }
        Ok(rects)
    }
}

// ============================================================================
// Focusable
// ============================================================================

/// A region that takes part in hover, focus and activation.
#[derive(Debug, Clone)]
pub struct Focusable<'a> {
    id: &'a str,
    area: Option<Rect>,
}

impl<'a> Focusable<'a> {
    /// Focusable region covering the current box.
    #[must_use]
    pub const fn new(id: &'a str) -> Self {
        Self { id, area: None }
    }

    /// Set the area.
    #[must_use]
    pub const fn at(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Register the control and run `render` inside its box with the
    /// interaction state of this frame.
    pub fn draw<R>(
        self,
        ui: &mut Ui,
        render: impl FnOnce(&mut Ui, &FocusableState) -> Result<R, UiError>,
    ) -> Result<R, UiError> {
        if self.id.is_empty() {
            return Err(UiError::MissingId);
        }
        let area = resolve(ui, self.area);
        let mut scope = ui.bounding_box(area.x, area.y, area.width, area.height);
        let state = scope.push_focusable_control(self.id)?;
        render(&mut scope, &state)
    }
}

// ============================================================================
// ScrollRegion
// ============================================================================

/// A clipped viewport onto content larger than itself.
///
/// The caller owns the scroll offset and feeds back what `draw` returns.
#[derive(Debug, Clone, Copy)]
pub struct ScrollRegion {
    area: Option<Rect>,
    content: (i32, i32),
    offset: Point,
    scroll_x: bool,
    scroll_y: bool,
}

impl ScrollRegion {
    /// Viewport onto `content_width` x `content_height` cells of content.
    #[must_use]
    pub const fn new(content_width: i32, content_height: i32) -> Self {
        Self {
            area: None,
            content: (content_width, content_height),
            offset: Point::ORIGIN,
            scroll_x: true,
            scroll_y: true,
        }
    }

    /// Set the area.
    #[must_use]
    pub const fn at(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    /// Current scroll offset (content cells hidden above and to the left).
    #[must_use]
    pub const fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Allow or forbid horizontal scrolling.
    #[must_use]
    pub const fn scroll_x(mut self, enabled: bool) -> Self {
        self.scroll_x = enabled;
        self
    }

    /// Allow or forbid vertical scrolling.
    #[must_use]
    pub const fn scroll_y(mut self, enabled: bool) -> Self {
        self.scroll_y = enabled;
        self
    }

    /// Apply wheel input, then run `render` against the content box.
    /// Returns the new offset.
    pub fn draw(
        self,
        ui: &mut Ui,
        render: impl FnOnce(&mut Ui) -> Result<(), UiError>,
    ) -> Result<Point, UiError> {
        let area = resolve(ui, self.area);
        let (content_w, content_h) = self.content;
        let mut offset = self.offset;

        if ui.is_mouse_over(area) {
            let (wheel_x, wheel_y, _) = ui.input().mouse.wheel();
            if wheel_x.abs() > wheel_y.abs() {
                offset.x += wheel_x.round() as i32;
            } else {
                offset.y += wheel_y.round() as i32;
            }
        }

        offset.x = if self.scroll_x && area.width < content_w {
            offset.x.clamp(0, content_w - area.width)
        } else {
            0
        };
        offset.y = if self.scroll_y && area.height < content_h {
            offset.y.clamp(0, content_h - area.height)
        } else {
            0
        };

        let mut clip = ui.culling_rect(area.x, area.y, area.width, area.height);
        let mut scope = clip.bounding_box(
            area.x - offset.x,
            area.y - offset.y,
            content_w,
            content_h,
        );
        render(&mut scope)?;
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::error::TuiError;
    use crate::renderer::RecordingRenderer;
    use tessera_core::{Event, Key, KeyModifiers, MouseButton};
    use tessera_layout::FlexJustify;

    fn run(ui: &mut Ui, render: impl FnOnce(&mut Ui) -> Result<(), UiError>) -> Vec<String> {
        ui.frame(&mut RecordingRenderer::new(), render).unwrap();
        let front = ui.buffer().front();
        (0..i32::from(ui.height())).map(|y| front.row_text(y)).collect()
    }

    fn ui(width: u16, height: u16) -> Ui {
        Ui::new(UiConfig::sized(width, height))
    }

    #[test]
    fn test_group_namespaces_focusables() {
        let mut ui = ui(10, 4);
        run(&mut ui, |ui| {
            Group::new().id("menu").at(Rect::new(2, 1, 5, 2)).draw(ui, |ui| {
                assert_eq!(ui.current_box(), Rect::new(2, 1, 5, 2));
                Focusable::new("open").draw(ui, |_, _| Ok(()))
            })
        });
        assert_eq!(ui.focusables(), ["menu/open".to_string()]);
    }

    #[test]
    fn test_frame_draws_border_and_insets() {
        let mut ui = ui(6, 4);
        let rows = run(&mut ui, |ui| {
            Frame::new().border(BorderStyle::Ascii).draw(ui, |ui| {
                assert_eq!(ui.current_box(), Rect::new(1, 1, 4, 2));
                Text::new("hi").draw(ui);
                Ok(())
            })
        });
        assert_eq!(rows, vec!["+----+", "|hi  |", "|    |", "+----+"]);
    }

    #[test]
    fn test_frame_title_is_clipped_to_edge() {
        let mut ui = ui(8, 3);
        let rows = run(&mut ui, |ui| {
            Frame::new()
                .border(BorderStyle::Ascii)
                .title("settings")
                .draw(ui, |_| Ok(()))
        });
        assert_eq!(rows[0], "+-sett-+");
    }

    #[test]
    fn test_atlas_border_glyphs() {
        let glyphs = BorderStyle::Atlas.glyphs();
        assert_eq!(glyphs[0], Glyph(134));
        assert_eq!(glyphs[7], Glyph(137));
        assert_eq!(BorderStyle::Single.glyphs()[1], Glyph::from('─'));
    }

    #[test]
    fn test_panel_fills_background_and_pads() {
        let mut ui = ui(6, 4);
        run(&mut ui, |ui| {
            Panel::new()
                .at(Rect::new(0, 0, 4, 3))
                .padding(1)
                .bg(Color::BLUE)
                .draw(ui, |ui| {
                    assert_eq!(ui.current_box(), Rect::new(1, 1, 2, 1));
                    ui.put(0, 0, 'x', Style::NONE);
                    Ok(())
                })
        });
        let front = ui.buffer().front();
        assert_eq!(front.get(3, 2).unwrap().bg, Some(Color::BLUE));
        assert_eq!(front.get(4, 0).unwrap().bg, None);
        let inner = front.get(1, 1).unwrap();
        assert_eq!(inner.glyph, Some(Glyph::from('x')));
        assert_eq!(inner.bg, Some(Color::BLUE));
    }

    #[test]
    fn test_panel_self_alignment() {
        let mut ui = ui(10, 6);
        run(&mut ui, |ui| {
            Panel::new()
                .at(Rect::sized(4, 2))
                .align_self(FlexAlign::Center)
                .justify_self(FlexAlign::End)
                .draw(ui, |ui| {
                    assert_eq!(ui.current_box(), Rect::new(3, 4, 4, 2));
                    Ok(())
                })
        });
    }

    #[test]
    fn test_text_width_truncates() {
        let mut ui = ui(8, 1);
        let rows = run(&mut ui, |ui| {
            Text::new("abcdef").at(1, 0).width(3).draw(ui);
            Ok(())
        });
        assert_eq!(rows, vec![" abc    "]);
    }

    #[test]
    fn test_wrapped_text_modes() {
        let mut ui = ui(4, 3);
        let rows = run(&mut ui, |ui| {
            let lines = WrappedText::new("abcdefghij").draw(ui);
            assert_eq!(lines, 3);
            Ok(())
        });
        assert_eq!(rows, vec!["abcd", "efgh", "ij  "]);

        let rows = run(&mut ui, |ui| {
            WrappedText::new("abcdef\ngh").mode(WrapMode::Hard).draw(ui);
            Ok(())
        });
        assert_eq!(rows, vec!["abcd", "gh  ", "    "]);
    }

    #[test]
    fn test_wrapped_text_stops_at_area_height() {
        let mut ui = ui(2, 3);
        let rows = run(&mut ui, |ui| {
            WrappedText::new("aabbccdd").at(Rect::sized(2, 2)).draw(ui);
            Ok(())
        });
        assert_eq!(rows, vec!["aa", "bb", "  "]);
    }

    #[test]
    fn test_flex_box_renders_children_in_boxes() {
        let mut ui = ui(9, 1);
        let mut boxes = Vec::new();
        let rows = run(&mut ui, |ui| {
            boxes = FlexBox::new(Flex::new().justify(FlexJustify::Stretch))
                .child(FlexItem::new(), |ui| {
                    Text::new("a").draw(ui);
                    Ok(())
                })
                .child(FlexItem::new(), |ui| {
                    Text::new("b").draw(ui);
                    Ok(())
                })
                .child(FlexItem::new(), |ui| {
                    Text::new("c").draw(ui);
                    Ok(())
                })
                .draw(ui)?;
            Ok(())
        });
        assert_eq!(rows, vec!["a  b  c  "]);
        assert_eq!(boxes[1], Rect::new(3, 0, 3, 1));
    }

    #[test]
    fn test_flex_box_child_error_unwinds() {
        let mut ui = ui(4, 1);
        let result = ui.frame(&mut RecordingRenderer::new(), |ui| {
            FlexBox::new(Flex::new())
                .child(FlexItem::new(), |ui| {
                    ui.push_id("never popped");
                    ui.pop_layer()?;
                    Ok(())
                })
                .draw(ui)?;
            Ok(())
        });
        assert!(matches!(
            result,
            Err(TuiError::Ui(UiError::StackUnderflow { stack: "layer" }))
        ));
        assert_eq!(ui.current_box(), Rect::new(0, 0, 4, 1));
    }

    #[test]
    fn test_focusable_state_follows_input() {
        let mut ui = ui(10, 3);
        ui.handle_event(&Event::MouseDown {
            position: Point::new(5, 1),
            button: MouseButton::Left,
        });
        let mut observed = None;
        run(&mut ui, |ui| {
            Focusable::new("ok")
                .at(Rect::new(4, 1, 3, 1))
                .draw(ui, |ui, state| {
                    observed = Some(state.clone());
                    let style = Style::fg(if state.active { Color::RED } else { Color::WHITE });
                    Text::new("ok").style(style).draw(ui);
                    Ok(())
                })
        });
        let state = observed.unwrap();
        assert!(state.hover && state.focus && state.active);
        assert_eq!(ui.buffer().front().get(4, 1).unwrap().fg, Some(Color::RED));

        ui.handle_event(&Event::MouseUp {
            position: Point::new(5, 1),
            button: MouseButton::Left,
        });
        run(&mut ui, |ui| {
            Focusable::new("ok")
                .at(Rect::new(4, 1, 3, 1))
                .draw(ui, |_, state| {
                    assert!(state.focus && !state.active);
                    Ok(())
                })
        });
    }

    #[test]
    fn test_focusable_missing_id() {
        let mut ui = ui(4, 4);
        let result = ui.frame(&mut RecordingRenderer::new(), |ui| {
            Focusable::new("").draw(ui, |_, _| Ok(()))
        });
        assert!(matches!(result, Err(TuiError::Ui(UiError::MissingId))));
    }

    #[test]
    fn test_focusable_keyboard_activation() {
        let mut ui = ui(4, 4);
        ui.set_focus(Some("go".to_string()));
        ui.handle_event(&Event::KeyDown {
            key: Key::Enter,
            modifiers: KeyModifiers::NONE,
        });
        run(&mut ui, |ui| {
            Focusable::new("go").draw(ui, |_, state| {
                assert!(state.active);
                Ok(())
            })
        });
        assert_eq!(ui.active(), Some("go"));
    }

    #[test]
    fn test_scroll_region_clips_and_offsets() {
        let mut ui = ui(6, 2);
        let rows = run(&mut ui, |ui| {
            let offset = ScrollRegion::new(10, 3)
                .at(Rect::new(1, 0, 4, 2))
                .offset(Point::new(2, 1))
                .draw(ui, |ui| {
                    for (y, line) in ["0123456789", "abcdefghij", "ABCDEFGHIJ"].iter().enumerate() {
                        Text::new(line).at(0, y as i32).draw(ui);
                    }
                    Ok(())
                })?;
            assert_eq!(offset, Point::new(2, 1));
            Ok(())
        });
        assert_eq!(rows, vec![" cdef ", " CDEF "]);
    }

    #[test]
    fn test_scroll_region_wheel_and_clamp() {
        let mut ui = ui(4, 2);
        ui.handle_event(&Event::MouseMove {
            position: Point::new(1, 1),
        });
        ui.handle_event(&Event::Scroll {
            delta_x: 0.0,
            delta_y: 5.0,
            delta_z: 0.0,
        });
        let mut offset = Point::ORIGIN;
        run(&mut ui, |ui| {
            offset = ScrollRegion::new(4, 4).draw(ui, |_| Ok(()))?;
            Ok(())
        });
        assert_eq!(offset, Point::new(0, 2));
    }

    #[test]
    fn test_scroll_region_disabled_axis_resets() {
        let mut ui = ui(4, 2);
        let mut offset = Point::ORIGIN;
        run(&mut ui, |ui| {
            offset = ScrollRegion::new(8, 8)
                .offset(Point::new(3, 3))
                .scroll_x(false)
                .draw(ui, |_| Ok(()))?;
            Ok(())
        });
        assert_eq!(offset, Point::new(0, 3));
    }
}
