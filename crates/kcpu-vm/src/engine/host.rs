//! Host collaborators: value input, text output and the display.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use kcpu_bytecode::format_value;

/// Failures reported by a [`Host`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("end of input")]
    EndOfInput,

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<io::Error> for HostError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Borrowed view of VRAM handed to the display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame<'a> {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` cells.
    pub cells: &'a [f64],
}

/// Shades from empty to full.
const RAMP: &[u8] = b" .:-=+*#%@";

impl Frame<'_> {
    /// Render as a bordered block of ASCII shades, one character per cell.
    ///
    /// Cell values are clamped to `0.0..=1.0`; NaN renders as `?`.
    pub fn render_text(&self) -> String {
        let border = format!("+{}+\n", "-".repeat(self.width));
        let mut out = border.clone();
        if self.width > 0 {
            for row in self.cells.chunks(self.width).take(self.height) {
                out.push('|');
                out.extend(row.iter().map(|&v| shade(v)));
                out.push_str("|\n");
            }
        }
        out.push_str(&border);
        out
    }
}

fn shade(value: f64) -> char {
    if value.is_nan() {
        return '?';
    }
    let top = (RAMP.len() - 1) as f64;
    let i = (value.clamp(0.0, 1.0) * top).round() as usize;
    char::from(RAMP[i])
}

/// The machine's view of the outside world.
///
/// `read_value` and `write_text` are required; the rest default to
/// formatting helpers or no-ops.
pub trait Host {
    /// Block until the next input value is available.
    fn read_value(&mut self) -> Result<f64, HostError>;

    fn write_text(&mut self, text: &str) -> Result<(), HostError>;

    /// Write a value in `%g` form followed by a single space.
    fn write_value(&mut self, value: f64) -> Result<(), HostError> {
        let mut text = format_value(value);
        text.push(' ');
        self.write_text(&text)
    }

    fn write_newline(&mut self) -> Result<(), HostError> {
        self.write_text("\n")
    }

    /// Called by `g_init` after VRAM has been resized.
    fn graphics_init(&mut self, _width: usize, _height: usize) -> Result<(), HostError> {
        Ok(())
    }

    /// Called by `g_draw` and after every step while drawing is on.
    fn graphics_draw(&mut self, _frame: Frame<'_>) -> Result<(), HostError> {
        Ok(())
    }
}

impl<H: Host + ?Sized> Host for &mut H {
    fn read_value(&mut self) -> Result<f64, HostError> {
        (**self).read_value()
    }

    fn write_text(&mut self, text: &str) -> Result<(), HostError> {
        (**self).write_text(text)
    }

    fn write_value(&mut self, value: f64) -> Result<(), HostError> {
        (**self).write_value(value)
    }

    fn write_newline(&mut self) -> Result<(), HostError> {
        (**self).write_newline()
    }

    fn graphics_init(&mut self, width: usize, height: usize) -> Result<(), HostError> {
        (**self).graphics_init(width, height)
    }

    fn graphics_draw(&mut self, frame: Frame<'_>) -> Result<(), HostError> {
        (**self).graphics_draw(frame)
    }
}

/// Host over a reader and a writer.
///
/// Input is split into whitespace-delimited tokens, each parsed as one
/// value. Frames are rendered as text blocks into the writer.
pub struct StdHost<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> StdHost<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    pub fn flush(&mut self) -> Result<(), HostError> {
        Ok(self.output.flush()?)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn next_token(&mut self) -> Result<String, HostError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(HostError::EndOfInput);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

impl<R: BufRead, W: Write> Host for StdHost<R, W> {
    fn read_value(&mut self) -> Result<f64, HostError> {
        // Prompts written before `in` must be visible while we block.
        self.flush()?;
        let token = self.next_token()?;
        token
            .parse::<f64>()
            .map_err(|_| HostError::InvalidNumber(token))
    }

    fn write_text(&mut self, text: &str) -> Result<(), HostError> {
        Ok(self.output.write_all(text.as_bytes())?)
    }

    fn graphics_draw(&mut self, frame: Frame<'_>) -> Result<(), HostError> {
        self.write_text(&frame.render_text())
    }
}

/// In-memory host: queued input, captured output and recorded frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BufferHost {
    input: VecDeque<f64>,
    output: String,
    screens: Vec<(usize, usize)>,
    frames: Vec<Vec<f64>>,
}

impl BufferHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            input: values.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn push_input(&mut self, value: f64) {
        self.input.push_back(value);
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Screen sizes announced by `g_init`, in order.
    pub fn screens(&self) -> &[(usize, usize)] {
        &self.screens
    }

    /// VRAM contents of every drawn frame, in order.
    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }
}

impl Host for BufferHost {
    fn read_value(&mut self) -> Result<f64, HostError> {
        self.input.pop_front().ok_or(HostError::EndOfInput)
    }

    fn write_text(&mut self, text: &str) -> Result<(), HostError> {
        self.output.push_str(text);
        Ok(())
    }

    fn graphics_init(&mut self, width: usize, height: usize) -> Result<(), HostError> {
        self.screens.push((width, height));
        Ok(())
    }

    fn graphics_draw(&mut self, frame: Frame<'_>) -> Result<(), HostError> {
        self.frames.push(frame.cells.to_vec());
        Ok(())
    }
}
