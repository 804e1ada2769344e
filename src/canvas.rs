//! Drawing primitives and the recorded draw plan.
//!
//! The renderers never rasterize anything themselves. They build a
//! [`DrawPlan`], a deterministic list of [`DrawCommand`]s in the vocabulary of
//! a small TFT graphics library, and replay it onto any [`Canvas`].
//! [`GraphicsCanvas`] adapts an `embedded-graphics` draw target.

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

/// Palette shared by the graph and the side panel.
pub mod palette {
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::RgbColor;

    pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
    pub const AXIS: Rgb565 = Rgb565::WHITE;
    /// Dim grey (0x4208)
    pub const GRID: Rgb565 = Rgb565::new(8, 16, 8);
    pub const TEMPERATURE: Rgb565 = Rgb565::RED;
    pub const WIND: Rgb565 = Rgb565::CYAN;
    pub const PRECIPITATION: Rgb565 = Rgb565::YELLOW;
    pub const MARKER: Rgb565 = Rgb565::MAGENTA;
    pub const TEXT: Rgb565 = Rgb565::WHITE;
    pub const CLOCK: Rgb565 = Rgb565::CYAN;
}

/// Drawing-primitive provider addressed in absolute pixel coordinates.
///
/// Text follows a cursor model: set cursor, size and color, then print.
pub trait Canvas {
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565);
    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: Rgb565);
    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565);
    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565);
    fn set_cursor(&mut self, x: i32, y: i32);
    fn set_text_size(&mut self, size: u8);
    fn set_text_color(&mut self, color: Rgb565);
    fn print(&mut self, text: &str);
}

/// One recorded primitive call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect { x: i32, y: i32, w: i32, h: i32, color: Rgb565 },
    DrawRect { x: i32, y: i32, w: i32, h: i32, color: Rgb565 },
    Line { x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565 },
    FillCircle { x: i32, y: i32, r: i32, color: Rgb565 },
    HLine { x: i32, y: i32, w: i32, color: Rgb565 },
    VLine { x: i32, y: i32, h: i32, color: Rgb565 },
    Cursor { x: i32, y: i32 },
    TextSize(u8),
    TextColor(Rgb565),
    Print(String),
}

/// An ordered list of primitive calls; itself a [`Canvas`] that records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawPlan {
    commands: Vec<DrawCommand>,
}

impl DrawPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All printed strings, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Print(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Print a string at a position with the given size and color.
    pub fn text_at(&mut self, x: i32, y: i32, size: u8, color: Rgb565, text: &str) {
        self.set_text_size(size);
        self.set_text_color(color);
        self.set_cursor(x, y);
        self.print(text);
    }

    /// Replay every command onto `canvas`.
    pub fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for command in &self.commands {
            match command {
                DrawCommand::FillRect { x, y, w, h, color } => {
                    canvas.fill_rect(*x, *y, *w, *h, *color)
                }
                DrawCommand::DrawRect { x, y, w, h, color } => {
                    canvas.draw_rect(*x, *y, *w, *h, *color)
                }
                DrawCommand::Line { x0, y0, x1, y1, color } => {
                    canvas.draw_line(*x0, *y0, *x1, *y1, *color)
                }
                DrawCommand::FillCircle { x, y, r, color } => {
                    canvas.fill_circle(*x, *y, *r, *color)
                }
                DrawCommand::HLine { x, y, w, color } => canvas.draw_hline(*x, *y, *w, *color),
                DrawCommand::VLine { x, y, h, color } => canvas.draw_vline(*x, *y, *h, *color),
                DrawCommand::Cursor { x, y } => canvas.set_cursor(*x, *y),
                DrawCommand::TextSize(size) => canvas.set_text_size(*size),
                DrawCommand::TextColor(color) => canvas.set_text_color(*color),
                DrawCommand::Print(text) => canvas.print(text),
            }
        }
    }
}

impl Canvas for DrawPlan {
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        self.commands.push(DrawCommand::DrawRect { x, y, w, h, color });
    }
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        self.commands.push(DrawCommand::Line { x0, y0, x1, y1, color });
    }
    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: Rgb565) {
        self.commands.push(DrawCommand::FillCircle { x, y, r, color });
    }
    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.commands.push(DrawCommand::HLine { x, y, w, color });
    }
    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.commands.push(DrawCommand::VLine { x, y, h, color });
    }
    fn set_cursor(&mut self, x: i32, y: i32) {
        self.commands.push(DrawCommand::Cursor { x, y });
    }
    fn set_text_size(&mut self, size: u8) {
        self.commands.push(DrawCommand::TextSize(size));
    }
    fn set_text_color(&mut self, color: Rgb565) {
        self.commands.push(DrawCommand::TextColor(color));
    }
    fn print(&mut self, text: &str) {
        self.commands.push(DrawCommand::Print(text.to_string()));
    }
}

/// [`Canvas`] over any `embedded-graphics` RGB565 draw target.
///
/// Text size 1 uses a 6x10 font, anything larger a 10x20 font. Draw errors
/// are dropped, matching the fire-and-forget primitive contract.
pub struct GraphicsCanvas<'a, D> {
    target: &'a mut D,
    cursor: Point,
    text_size: u8,
    text_color: Rgb565,
}

impl<'a, D> GraphicsCanvas<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self {
            target,
            cursor: Point::zero(),
            text_size: 1,
            text_color: palette::TEXT,
        }
    }

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Option<Rectangle> {
        if w <= 0 || h <= 0 {
            return None;
        }
        Some(Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32)))
    }
}

impl<D> Canvas for GraphicsCanvas<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        if let Some(rect) = Self::rect(x, y, w, h) {
            rect.into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut *self.target)
                .ok();
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        if let Some(rect) = Self::rect(x, y, w, h) {
            rect.into_styled(PrimitiveStyle::with_stroke(color, 1))
                .draw(&mut *self.target)
                .ok();
        }
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut *self.target)
            .ok();
    }

    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: Rgb565) {
        if r < 0 {
            return;
        }
        Circle::with_center(Point::new(x, y), (2 * r + 1) as u32)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut *self.target)
            .ok();
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.fill_rect(x, y, w, 1, color);
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.fill_rect(x, y, 1, h, color);
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size.max(1);
    }

    fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
    }

    fn print(&mut self, text: &str) {
        let style = if self.text_size > 1 {
            MonoTextStyle::new(&FONT_10X20, self.text_color)
        } else {
            MonoTextStyle::new(&FONT_6X10, self.text_color)
        };
        // Text draws from the cursor's top-left and advances it, like a TFT print
        if let Ok(next) =
            Text::with_baseline(text, self.cursor, style, Baseline::Top).draw(&mut *self.target)
        {
            self.cursor = Point::new(next.x, self.cursor.y);
        }
    }
}
