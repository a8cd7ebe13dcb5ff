//! Editor — the top-level loop tying input, state, and output together.
//!
//! ```text
//! Running ──refresh──▶ read_key ──dispatch──┐
//!    ▲                                      │
//!    └──────────────────────────────────────┘
//!    │ quit key
//!    ▼
//! Exiting
//! ```
//!
//! The editor owns the buffer, cursor, viewport, and options. It does not
//! own the terminal: raw mode is held by the caller for the duration of
//! [`Editor::run`], and input/output come in as a [`ByteSource`] and a
//! `Write` so the whole loop runs against scripted bytes in tests.

use std::io::{self, Write};

use kilo_term::ansi;
use kilo_term::input::{self, ByteSource, Key};
use kilo_term::terminal::Size;

use crate::buffer::TextBuffer;
use crate::cursor::{Cursor, Direction};
use crate::error::Result;
use crate::options::Options;
use crate::render;
use crate::view::Viewport;

/// Lifecycle of the editor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Exiting,
}

pub struct Editor {
    buffer: TextBuffer,
    cursor: Cursor,
    view: Viewport,
    options: Options,
    state: State,
}

impl Editor {
    /// An editor over `buffer` for a terminal of `size`, cursor at the origin.
    #[must_use]
    pub const fn new(buffer: TextBuffer, size: Size, options: Options) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            view: Viewport::from_size(size),
            options,
            state: State::Running,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.view
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    // -- Loop ---------------------------------------------------------------

    /// Run until the quit key is pressed.
    ///
    /// On quit the screen is cleared and the cursor homed before returning
    /// `Ok(())`.
    ///
    /// # Errors
    ///
    /// Any terminal read or write failure ends the loop immediately.
    pub fn run<S, W>(&mut self, input: &mut S, out: &mut W) -> Result<()>
    where
        S: ByteSource + ?Sized,
        W: Write,
    {
        while self.state == State::Running {
            self.refresh(out)?;
            let key = input::read_key(input)?;
            self.process_key(key, out)?;
        }
        Ok(())
    }

    /// Scroll the viewport to the cursor and draw one frame.
    ///
    /// # Errors
    ///
    /// [`kilo_term::Error::Write`] if the frame can't be written.
    pub fn refresh(&mut self, out: &mut impl Write) -> Result<()> {
        self.view.scroll(&self.cursor);
        render::draw_frame(out, &self.buffer, &self.cursor, &self.view)?;
        Ok(())
    }

    /// Apply one key to the editor state.
    ///
    /// Keys with no binding (Delete, Escape, plain characters) are ignored;
    /// the buffer is read-only.
    ///
    /// # Errors
    ///
    /// [`kilo_term::Error::Write`] if clearing the screen on quit fails.
    pub fn process_key(&mut self, key: Key, out: &mut impl Write) -> Result<()> {
        let buffer = &self.buffer;

        match key {
            Key::Char(b) if b == self.options.quit_key => {
                clear_screen(out)?;
                self.state = State::Exiting;
                log::info!("quit requested");
            }
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(buffer),
            Key::PageUp => self
                .cursor
                .repeat(Direction::Up, self.view.screen_rows(), buffer),
            Key::PageDown => self
                .cursor
                .repeat(Direction::Down, self.view.screen_rows(), buffer),
            Key::ArrowUp => self.cursor.step(Direction::Up, buffer),
            Key::ArrowDown => self.cursor.step(Direction::Down, buffer),
            Key::ArrowLeft => self.cursor.step(Direction::Left, buffer),
            Key::ArrowRight => self.cursor.step(Direction::Right, buffer),
            Key::Char(_) | Key::Delete | Key::Escape => {}
        }

        Ok(())
    }
}

/// Erase the screen and home the cursor, written straight to `out`.
///
/// Used on quit and on the fatal error path so nothing is left behind
/// mid-screen.
///
/// # Errors
///
/// [`kilo_term::Error::Write`] if the write fails.
pub fn clear_screen(out: &mut impl Write) -> kilo_term::Result<()> {
    fn emit(out: &mut impl Write) -> io::Result<()> {
        ansi::clear_screen(out)?;
        ansi::cursor_home(out)?;
        out.flush()
    }
    emit(out).map_err(kilo_term::Error::Write)
}
