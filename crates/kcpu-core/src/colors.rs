//! Terminal palette for program dumps, machine dumps and traces.
//!
//! Each field names the role a piece of output plays rather than a hue, so
//! renderers ask for `section` or `fault` and the palette decides how that
//! looks. With colors off every role is the empty string and output is
//! plain text.

use std::fmt;

/// ANSI escape per output role. Standard 16-color codes only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    /// `[header]`, `[code]`, `[stack]` and the other dump sections.
    pub section: &'static str,
    /// Instruction names in trace lines.
    pub mnemonic: &'static str,
    /// Jump labels and the halted state.
    pub label: &'static str,
    /// Faults and undecodable bytes.
    pub fault: &'static str,
    /// Offsets, stack indices and stack listings.
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        section: "\x1b[34m",
        mnemonic: "\x1b[34m",
        label: "\x1b[32m",
        fault: "\x1b[31m",
        muted: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        section: "",
        mnemonic: "",
        label: "",
        fault: "",
        muted: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    /// Wrap `text` in `role` and a reset.
    ///
    /// Width, fill and zero-padding flags apply to `text`, inside the
    /// escapes, so aligned columns stay aligned with colors on.
    pub fn paint<T: fmt::Display>(&self, role: &'static str, text: T) -> Painted<T> {
        Painted {
            role,
            text,
            reset: self.reset,
        }
    }
}

/// Text wrapped in a color role; see [`Colors::paint`].
pub struct Painted<T> {
    role: &'static str,
    text: T,
    reset: &'static str,
}

impl<T: fmt::Display> fmt::Display for Painted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role)?;
        self.text.fmt(f)?;
        f.write_str(self.reset)
    }
}
