//! Text buffer — an ordered list of rows with their rendered form.
//!
//! Each [`Row`] stores its bytes exactly as loaded (`chars`) next to the
//! bytes that get drawn (`render`). The two differ only in tabs: a tab in
//! `chars` becomes one or more spaces in `render`, ending on the next
//! multiple of the tab stop. The render form is built with the row, so the
//! renderer never sees a raw tab.
//!
//! # Design choices
//!
//! - **Bytes, not chars.** Columns are byte offsets. Unicode width is not
//!   handled; a file is shown byte for byte.
//!
//! - **Append-only.** Rows are added at load time and never change, so
//!   `chars` and `render` can't drift apart.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of text, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    /// Build a row from `chars`, rendering tabs to `tab_stop` columns.
    #[must_use]
    pub fn new(chars: &[u8], tab_stop: usize) -> Self {
        let mut row = Self {
            chars: chars.to_vec(),
            render: Vec::new(),
        };
        row.update_render(tab_stop);
        row
    }

    /// Stored bytes.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Length of the stored bytes. Cursor columns range over `0..=len()`.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Bytes as drawn on screen, tabs expanded.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Rebuild `render` from `chars`.
    ///
    /// A tab emits one space, then more until the output column is a
    /// multiple of `tab_stop`. Every other byte is copied unchanged.
    fn update_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();

        self.render.clear();
        self.render
            .reserve(self.chars.len().saturating_add(tabs.saturating_mul(tab_stop - 1)));

        for &byte in &self.chars {
            if byte == b'\t' {
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(byte);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// The rows of the open file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    rows: Vec<Row>,
    tab_stop: usize,
}

impl TextBuffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer (no rows).
    #[must_use]
    pub const fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            tab_stop,
        }
    }

    /// Load `path` read-only, one row per line.
    ///
    /// # Errors
    ///
    /// [`Error::Open`] if the file can't be opened, [`Error::Load`] if a
    /// read fails part-way.
    pub fn open(path: &Path, tab_stop: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut buffer = Self::new(tab_stop);
        buffer
            .load_from(BufReader::new(file))
            .map_err(|source| Error::Load {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("loaded {} ({} rows)", path.display(), buffer.num_rows());
        Ok(buffer)
    }

    /// Append every line from `reader` as a row.
    ///
    /// Trailing `\n` and `\r` bytes are stripped from each line. A final
    /// line without a newline still becomes a row. Returns the number of
    /// rows added.
    ///
    /// # Errors
    ///
    /// Propagates the reader's I/O errors.
    pub fn load_from(&mut self, mut reader: impl BufRead) -> io::Result<usize> {
        let mut line = Vec::new();
        let mut added = 0;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            self.append_row(&line);
            added += 1;
        }

        Ok(added)
    }

    // -- Access -------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`, if there is one.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Length of row `index`, or 0 past the last row.
    #[inline]
    #[must_use]
    pub fn row_len(&self, index: usize) -> usize {
        self.row(index).map_or(0, Row::len)
    }

    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    // -- Editing ------------------------------------------------------------

    /// Copy `chars` into a new row at the end of the buffer.
    ///
    /// The caller strips the line terminator.
    pub fn append_row(&mut self, chars: &[u8]) {
        self.rows.push(Row::new(chars, self.tab_stop));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
