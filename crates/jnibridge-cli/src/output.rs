//! Colored status output.
//!
//! The reference token owns stdout, so everything styled here goes to stderr.
//! Respects the `NO_COLOR` environment variable and the `--color` flag.

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    color_choice(std::env::var_os("NO_COLOR").is_some(), flag)
}

fn color_choice(no_color: bool, flag: Option<&str>) -> ColorChoice {
    if no_color {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled writer for stderr.
pub struct StyledOutput {
    stderr: StandardStream,
}

impl StyledOutput {
    /// Create a new styled output with the given color choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stderr: StandardStream::stderr(choice),
        }
    }

    /// `found: <name>` in green or `not found: <name>` in yellow.
    pub fn lookup_status(&mut self, class_name: &str, found: bool) {
        let _ = write_status(&mut self.stderr, class_name, found);
    }
}

fn write_status<W: WriteColor>(out: &mut W, class_name: &str, found: bool) -> io::Result<()> {
    let (label, color) = if found {
        ("found", Color::Green)
    } else {
        ("not found", Color::Yellow)
    };
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(true);
    out.set_color(&spec)?;
    write!(out, "{}", label)?;
    out.reset()?;
    writeln!(out, ": {}", class_name)?;
    out.flush()
}
