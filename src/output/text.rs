//! Plain-text report of duplicate groups.
//!
//! ```text
//! Duplicates found:
//! ---
//! With hash 5d41402abc4b2a76b9719d911017c592
//! docs/a.txt
//! docs/old/a.txt
//! ```
//!
//! An empty result prints the single line `Duplicates not found!`.

use std::io::{self, Write};

use yansi::{Paint, Style};

use crate::duplicates::DuplicateGroup;

const HEADER_STYLE: Style = Style::new().bold();
const SEPARATOR_STYLE: Style = Style::new().dim();
const HASH_STYLE: Style = Style::new().yellow();

/// Text renderer for scan results.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOutput {
    color: bool,
}

impl TextOutput {
    /// Create a renderer. With `color` off the output is byte-exact plain text.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    /// Write the report for `groups`.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W, groups: &[DuplicateGroup]) -> io::Result<()> {
        if groups.is_empty() {
            return writeln!(writer, "Duplicates not found!");
        }

        writeln!(writer, "{}", self.paint("Duplicates found:", HEADER_STYLE))?;
        for group in groups {
            writeln!(writer, "{}", self.paint("---", SEPARATOR_STYLE))?;
            writeln!(
                writer,
                "With hash {}",
                self.paint(group.fingerprint.as_str(), HASH_STYLE)
            )?;
            for file in &group.files {
                writeln!(writer, "{}", file.path.display())?;
            }
        }
        Ok(())
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self, groups: &[DuplicateGroup]) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf, groups);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
