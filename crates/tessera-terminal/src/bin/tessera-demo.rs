//! tessera-demo: interactive tour of the Tessera primitives
//!
//! Run: cargo run -p tessera-terminal --features demo --bin tessera-demo

use std::io;

use clap::{Parser, ValueEnum};
use log::info;

use tessera_terminal::{
    AnsiRenderer, BorderStyle, Color, ColorMode, ContextToken, Flex, FlexAlign, FlexBox,
    FlexDirection, FlexItem, FlexJustify, Focusable, Frame, Key, KeyBinding, MouseButton, Panel,
    Point, Rect, ScrollRegion, Style, Text, TuiApp, TuiError, Ui, UiConfig, UiError, WrappedText,
};

/// Tessera demo - immediate-mode widgets on a character grid
#[derive(Parser)]
#[command(name = "tessera-demo", version, about, long_about = None)]
struct Cli {
    /// Input poll interval in milliseconds
    #[arg(short, long, default_value = "100")]
    tick_rate: u64,

    /// Color mode (auto-detected if not given)
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,

    /// Stop at the first frame that fails instead of logging it
    #[arg(long)]
    halt_on_error: bool,

    /// Render once to stdout and exit
    #[arg(long)]
    render_once: bool,

    /// Grid width for render-once mode
    #[arg(long, default_value = "80")]
    width: u16,

    /// Grid height for render-once mode
    #[arg(long, default_value = "24")]
    height: u16,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Truecolor,
    Ansi256,
    Ansi16,
    Mono,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Truecolor => Self::TrueColor,
            ColorArg::Ansi256 => Self::Color256,
            ColorArg::Ansi16 => Self::Color16,
            ColorArg::Mono => Self::Mono,
        }
    }
}

const ABOUT: &str = "Tessera redraws the whole interface every frame and sends only the \
cells that changed to the terminal. Use Tab and Shift+Tab to move focus, Enter or the mouse \
to press buttons, the wheel to scroll the log, and q or Ctrl+C to quit.";

/// Demo state carried between frames.
struct Demo {
    clicks: u32,
    accent: usize,
    scroll: Point,
    log: Vec<String>,
}

const LOG_CAPACITY: usize = 200;

const ACCENTS: [Color; 3] = [Color::ORANGE, Color::GREEN, Color::BLUE];

impl Demo {
    fn new() -> Self {
        Self {
            clicks: 0,
            accent: 0,
            scroll: Point::ORIGIN,
            log: vec!["demo started".to_string()],
        }
    }

    fn render(&mut self, ui: &mut Ui, accent_token: &ContextToken<Color>) -> Result<(), UiError> {
        let accent = ACCENTS[self.accent % ACCENTS.len()];
        let mut themed = ui.provide(accent_token, accent);

        let mut clicked = false;
        let mut cycled = false;
        let body = Flex::new()
            .direction(FlexDirection::Column)
            .justify(FlexJustify::Stretch);
        FlexBox::new(body)
            .child(FlexItem::new().height(3), |ui| {
                Frame::new()
                    .title("tessera")
                    .style(Style::fg(accent))
                    .draw(ui, |ui| {
                        let status = format!("clicks: {}", self.clicks);
                        Text::new(&status).at(1, 0).draw(ui);
                        Ok(())
                    })
            })
            .child(FlexItem::new(), |ui| {
                let columns = Flex::new().justify(FlexJustify::Stretch);
                FlexBox::new(columns)
                    .child(FlexItem::new(), |ui| {
                        Frame::new()
                            .border(BorderStyle::Rounded)
                            .title("about")
                            .draw(ui, |ui| {
                                WrappedText::new(ABOUT)
                                    .at(Rect::new(1, 0, ui.current_box().width - 2, 10))
                                    .draw(ui);
                                let buttons = Flex::new()
                                    .justify(FlexJustify::SpaceAround)
                                    .align(FlexAlign::End);
                                let area = ui.current_box();
                                FlexBox::new(buttons)
                                    .at(Rect::sized(area.width, area.height))
                                    .child(FlexItem::sized(10, 1), |ui| {
                                        clicked = button(ui, "click", " click me ", accent_token)?;
                                        Ok(())
                                    })
                                    .child(FlexItem::sized(10, 1), |ui| {
                                        cycled = button(ui, "accent", "  accent  ", accent_token)?;
                                        Ok(())
                                    })
                                    .draw(ui)?;
                                Ok(())
                            })
                    })
                    .child(FlexItem::new(), |ui| {
                        Frame::new()
                            .border(BorderStyle::Rounded)
                            .title("log")
                            .draw(ui, |ui| {
                                let lines = i32::try_from(self.log.len()).unwrap_or(i32::MAX);
                                self.scroll = ScrollRegion::new(ui.current_box().width, lines)
                                    .offset(self.scroll)
                                    .draw(ui, |ui| {
                                        for (y, line) in (0..).zip(&self.log) {
                                            Text::new(line).at(0, y).draw(ui);
                                        }
                                        Ok(())
                                    })?;
                                Ok(())
                            })
                    })
                    .draw(ui)?;
                Ok(())
            })
            .draw(&mut themed)?;

        if clicked {
            self.clicks += 1;
            self.record("click me");
        }
        if cycled {
            self.accent += 1;
            self.record("accent");
        }
        Ok(())
    }

    fn record(&mut self, button: &str) {
        info!("pressed {button}");
        if self.log.len() == LOG_CAPACITY {
            self.log.remove(0);
        }
        self.log.push(format!("pressed {button}"));
    }
}

/// A one-line push button. Returns true on the frame it is released.
fn button(
    ui: &mut Ui,
    id: &str,
    label: &str,
    accent_token: &ContextToken<Color>,
) -> Result<bool, UiError> {
    let accent = *ui.context(accent_token)?;
    Focusable::new(id).draw(ui, |ui, state| {
        let style = Style::new(Color::WHITE, Color::GREY)
            .merge_if(state.hover, Style::bg(accent))
            .merge_if(state.focus, Style::fg(Color::YELLOW))
            .merge_if(state.active, Style::new(Color::BLACK, Color::WHITE));
        Panel::new().bg(style.bg.unwrap_or(Color::GREY)).draw(ui, |ui| {
            Text::new(label).style(style).draw(ui);
            Ok(())
        })?;

        let activation = ui.config().activation_key;
        let input = ui.input();
        Ok((state.hover && input.mouse.is_releasing(MouseButton::PRIMARY))
            || (state.focus && input.keyboard.is_releasing(activation)))
    })
}

fn main() -> Result<(), TuiError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();

    let mut config = UiConfig {
        width: cli.width,
        height: cli.height,
        tick_rate_ms: cli.tick_rate,
        enable_mouse: !cli.no_mouse,
        halt_on_error: cli.halt_on_error,
        color_mode: cli.color.map(ColorMode::from),
        ..UiConfig::default()
    };
    if cli.dump_config {
        let json = serde_json::to_string_pretty(&config).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    let accent = ContextToken::new("accent", Color::ORANGE);
    let mut demo = Demo::new();

    if cli.render_once {
        config.enable_mouse = false;
        let mode = config.color_mode.unwrap_or_else(ColorMode::detect);
        let mut ui = Ui::new(config);
        let mut renderer = AnsiRenderer::with_color_mode(io::stdout(), mode);
        let stats = ui.frame(&mut renderer, |ui| demo.render(ui, &accent))?;
        println!();
        info!("rendered {} cells", stats.changed_cells);
        return Ok(());
    }

    info!("starting tessera-demo");
    let mut app = TuiApp::new(config).with_quit_key(KeyBinding::simple(Key::Char('q')));
    app.run(|ui| demo.render(ui, &accent))?;
    info!(
        "exiting after {} frames ({} aborted)",
        app.metrics().frame_count,
        app.metrics().aborted_frames
    );
    Ok(())
}
