// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Frame output.
//
// A frame is a few dozen escape sequences plus the visible slice of every
// row. Written piecemeal, the terminal would paint it piecemeal and the
// cursor would visibly flicker across the screen. `AppendBuffer` collects
// the whole frame in memory and hands it to the terminal in one write.
//
// The write has to reach the terminal in one piece, too. `io::Stdout` is
// line-buffered: it passes everything up to the last newline through and
// holds the tail until flush, so a CRLF-separated frame leaves as two
// syscalls. `FdWriter` has no buffer: each `write` is one `write(2)`.

use std::io::{self, Write};

/// Default capacity: enough for an 80×24 frame of plain text plus the
/// per-row erase sequences without reallocating.
const DEFAULT_CAPACITY: usize = 4096;

// ─── Append buffer ──────────────────────────────────────────────────────────

/// A growable byte accumulator scoped to one render pass.
///
/// Build it with `Write` (or [`append`](Self::append)), then consume it
/// with [`flush_to`](Self::flush_to). Consuming on flush makes "written
/// once, then released" a property of the type rather than a convention.
#[derive(Debug)]
pub struct AppendBuffer {
    buf: Vec<u8>,
}

impl AppendBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Append raw bytes.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write the whole frame to `w` in a single `write_all` and release it.
    ///
    /// Over an [`FdWriter`] that is one `write(2)` unless the kernel
    /// accepts a short count.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        w.write_all(&self.buf)?;
        w.flush()
    }
}

impl Write for AppendBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing happens in flush_to().
        Ok(())
    }
}

impl Default for AppendBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unbuffered fd writer ───────────────────────────────────────────────────

/// An unbuffered writer over a raw file descriptor.
///
/// Every [`write`](Write::write) is exactly one `write(2)`; `write_all`
/// loops on short counts and `EINTR`. `flush` has nothing to do. The
/// descriptor is borrowed, never closed.
#[derive(Debug, Clone, Copy)]
pub struct FdWriter {
    #[cfg(unix)]
    fd: libc::c_int,
}

impl FdWriter {
    /// The process's standard output, fd 1.
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            #[cfg(unix)]
            fd: libc::STDOUT_FILENO,
        }
    }

    /// Wrap an already-open descriptor, such as a pipe in tests. The
    /// caller keeps ownership.
    #[cfg(all(unix, test))]
    #[must_use]
    const fn from_raw_fd(fd: libc::c_int) -> Self {
        Self { fd }
    }
}

#[cfg(unix)]
impl Write for FdWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        loop {
            let n = unsafe { libc::write(self.fd, buf.as_ptr().cast(), buf.len()) };
            if n >= 0 {
                return Ok(n.unsigned_abs());
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(not(unix))]
impl Write for FdWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut stdout = io::stdout();
        stdout.write_all(buf)?;
        stdout.flush()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
