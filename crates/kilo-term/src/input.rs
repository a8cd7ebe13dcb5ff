// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Key decoding.
//
// Turns the raw byte stream from the terminal into logical keys, one key
// per call. Plain bytes are keys as-is. An ESC byte is ambiguous: it may
// be the Escape key or the first byte of a sequence such as `ESC [ A`.
// We resolve it the way terminals expect, with the read timeout: if the
// next byte doesn't arrive in time, it was a lone Escape.
//
// Sequences recognised:
//
//   ESC [ A/B/C/D       arrows
//   ESC [ H / ESC [ F   Home / End
//   ESC O H / ESC O F   Home / End (SS3 variant)
//   ESC [ n ~           1,7 Home · 2,4,8 End · 3 Delete · 5 PageUp · 6 PageDown
//
// Anything else that starts with ESC decodes to Escape.

use std::io;

use crate::error::{Error, Result};

/// The escape byte.
pub const ESC: u8 = 0x1B;

/// The byte produced by holding Ctrl with `key` (strips bits 5 and 6).
#[inline]
#[must_use]
pub const fn ctrl(key: u8) -> u8 {
    key & 0x1F
}

// ─── Key ────────────────────────────────────────────────────────────────────

/// A logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single byte that did not start an escape sequence, including
    /// control bytes such as Ctrl-Q (0x11).
    Char(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    /// A lone ESC, or an escape sequence we don't recognise.
    Escape,
}

// ─── Byte sources ───────────────────────────────────────────────────────────

/// Where the decoder gets its bytes.
///
/// `Ok(None)` means the read timed out with no data. That is the normal
/// outcome while the user isn't typing and is never an error.
pub trait ByteSource {
    /// Read one byte, waiting at most the source's timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] on a real I/O failure.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// Reads single bytes from the stdin file descriptor.
///
/// The timeout comes from the termios `VMIN`/`VTIME` settings applied by
/// [`RawMode`](crate::terminal::RawMode): with `VMIN = 0` a read returns
/// zero bytes once `VTIME` expires.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl StdinSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // Some platforms report the VTIME expiry as EAGAIN.
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(Error::Read(err)),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(err) => Err(Error::Read(err)),
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Block until one logical key is available.
///
/// Timeouts before the first byte are retried. Timeouts inside an escape
/// sequence end the sequence and yield [`Key::Escape`].
///
/// # Errors
///
/// Returns [`Error::Read`] if the source fails at any point.
pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> Result<Key> {
    let byte = loop {
        if let Some(b) = source.read_byte()? {
            break b;
        }
    };

    if byte == ESC {
        decode_escape(source)
    } else {
        Ok(Key::Char(byte))
    }
}

/// Decode the rest of a sequence after its leading ESC.
fn decode_escape<S: ByteSource + ?Sized>(source: &mut S) -> Result<Key> {
    let Some(first) = source.read_byte()? else {
        return Ok(Key::Escape);
    };
    let Some(second) = source.read_byte()? else {
        return Ok(Key::Escape);
    };

    let key = match (first, second) {
        (b'[', digit @ b'0'..=b'9') => match source.read_byte()? {
            Some(b'~') => tilde_key(digit),
            _ => Key::Escape,
        },
        (b'[', final_byte) => csi_key(final_byte),
        (b'O', final_byte) => ss3_key(final_byte),
        _ => Key::Escape,
    };
    Ok(key)
}

/// `ESC [ n ~` editing keys.
const fn tilde_key(digit: u8) -> Key {
    match digit {
        b'1' | b'7' => Key::Home,
        b'2' | b'4' | b'8' => Key::End,
        b'3' => Key::Delete,
        b'5' => Key::PageUp,
        b'6' => Key::PageDown,
        _ => Key::Escape,
    }
}

/// `ESC [ X` with a letter final byte.
const fn csi_key(final_byte: u8) -> Key {
    match final_byte {
        b'A' => Key::ArrowUp,
        b'B' => Key::ArrowDown,
        b'C' => Key::ArrowRight,
        b'D' => Key::ArrowLeft,
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    }
}

/// `ESC O X` (SS3), sent by some terminals for Home/End.
const fn ss3_key(final_byte: u8) -> Key {
    match final_byte {
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    }
}

// ─── Scripted source ────────────────────────────────────────────────────────
//
// Built for this crate's tests and, through the `testing` feature, for
// downstream crates' tests. Never part of a release build.

/// One step of a [`ScriptedSource`].
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub enum Step {
    Byte(u8),
    Timeout,
    Fail(io::ErrorKind),
}

/// A byte source that replays a fixed script, for driving the decoder
/// and the editor loop without a terminal.
///
/// Once the script runs out every read fails with `UnexpectedEof`, so a
/// loop that never quits ends with an error instead of spinning forever.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct ScriptedSource {
    steps: std::collections::VecDeque<Step>,
}

#[cfg(any(test, feature = "testing"))]
impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that yields `bytes` in order, with no timeouts.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut source = Self::new();
        source.push_bytes(bytes);
        source
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.steps.extend(bytes.iter().copied().map(Step::Byte));
        self
    }

    pub fn push_timeout(&mut self) -> &mut Self {
        self.steps.push_back(Step::Timeout);
        self
    }

    pub fn push_failure(&mut self, kind: io::ErrorKind) -> &mut Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    /// Steps not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(any(test, feature = "testing"))]
impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.steps.pop_front() {
            Some(Step::Byte(b)) => Ok(Some(b)),
            Some(Step::Timeout) => Ok(None),
            Some(Step::Fail(kind)) => Err(Error::Read(io::Error::from(kind))),
            None => Err(Error::Read(io::Error::from(io::ErrorKind::UnexpectedEof))),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
