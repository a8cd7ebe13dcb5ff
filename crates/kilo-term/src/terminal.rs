// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode with guaranteed restore, and size discovery.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and ioctl (TIOCGWINSZ). These are the standard POSIX
// interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode is a scoped acquisition: `RawMode::enter` returns a guard, and
// the original attributes come back when the guard is released — through
// `leave()`, through `Drop` on an early `?` return, or through the panic
// hook if something panics while the screen is ours. The hook reads a
// global backup of the original termios since it can't reach the guard.

use std::io::Write;
use std::sync::{Mutex, Once};
use std::time::Duration;

use crate::ansi;
use crate::error::{Error, Result};
use crate::input::ByteSource;
use crate::output::FdWriter;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

// ─── Raw mode attributes ────────────────────────────────────────────────────

/// Convert a read timeout to termios `VTIME` units (tenths of a second).
///
/// Clamped to `1..=255`: zero would make reads return immediately and
/// spin the loop, and `VTIME` is a single byte.
#[must_use]
pub fn timeout_deciseconds(timeout: Duration) -> u8 {
    let tenths = timeout.as_millis().div_ceil(100);
    u8::try_from(tenths).unwrap_or(u8::MAX).max(1)
}

/// Derive raw-mode attributes from the terminal's original ones.
///
/// Turns off echo, canonical input, signal keys (Ctrl-C / Ctrl-Z),
/// extended input processing (Ctrl-V), software flow control (Ctrl-S /
/// Ctrl-Q), CR→NL input translation, parity checking, 8th-bit stripping,
/// break-to-SIGINT and output post-processing, and forces 8-bit
/// characters. `VMIN = 0` with `VTIME` from `timeout` makes every read
/// return after at most the timeout, with zero bytes if nothing arrived.
#[cfg(unix)]
#[must_use]
pub fn make_raw(original: &libc::termios, timeout: Duration) -> libc::termios {
    let mut raw = *original;
    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = timeout_deciseconds(timeout);
    raw
}

// ─── Panic-safe restore ─────────────────────────────────────────────────────

/// Original termios for the panic hook, which can't reach the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Emitted by the panic hook before the panic message is printed.
const PANIC_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Install (once per process) a panic hook that restores the terminal
/// before the default hook prints the panic message.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            restore_from_backup();

            // Straight to fd 1: the stdout lock may be held by the
            // panicking thread, and its buffer may hold half a frame.
            let _ = FdWriter::stdout().write_all(PANIC_RESTORE);

            original(info);
        }));
    });
}

/// Best-effort restore from the global backup. Errors are ignored: we're
/// already panicking.
#[cfg(unix)]
fn restore_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

// ─── RawMode guard ──────────────────────────────────────────────────────────

/// Raw terminal mode, held for as long as this guard lives.
///
/// ```no_run
/// use std::time::Duration;
/// use kilo_term::terminal::RawMode;
///
/// let raw = RawMode::enter(Duration::from_millis(100))?;
/// // ... read keys, draw frames ...
/// raw.leave()?;
/// # Ok::<(), kilo_term::Error>(())
/// ```
pub struct RawMode {
    /// Attributes to put back. `None` once restored.
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Save the current terminal attributes and switch to raw mode.
    ///
    /// Applied with `TCSAFLUSH`: pending output is written and unread
    /// input is discarded first.
    ///
    /// # Errors
    ///
    /// [`Error::GetAttributes`] if stdin is not a terminal or the query
    /// fails, [`Error::SetAttributes`] if raw mode can't be applied.
    #[cfg(unix)]
    pub fn enter(timeout: Duration) -> Result<Self> {
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut original) } != 0 {
            return Err(Error::GetAttributes(std::io::Error::last_os_error()));
        }

        install_panic_hook();
        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = Some(original);
        }

        let attrs = make_raw(&original, timeout);
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const attrs) } != 0 {
            return Err(Error::SetAttributes(std::io::Error::last_os_error()));
        }

        log::debug!(
            "raw mode entered (VTIME={} deciseconds)",
            attrs.c_cc[libc::VTIME]
        );
        Ok(Self {
            original: Some(original),
        })
    }

    #[cfg(not(unix))]
    pub fn enter(_timeout: Duration) -> Result<Self> {
        install_panic_hook();
        Ok(Self {})
    }

    /// Restore the original attributes and release the guard.
    ///
    /// # Errors
    ///
    /// [`Error::SetAttributes`] if the original attributes can't be applied.
    pub fn leave(mut self) -> Result<()> {
        self.restore()
    }

    #[cfg(unix)]
    fn restore(&mut self) -> Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0 {
            return Err(Error::SetAttributes(std::io::Error::last_os_error()));
        }

        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = None;
        }
        log::debug!("raw mode left, terminal restored");
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    fn restore(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::warn!("failed to restore terminal on drop: {err}");
        }
    }
}

// ─── Size discovery ─────────────────────────────────────────────────────────

/// Query the window size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if the query fails or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Longest cursor position report we accept, excluding the final `R`.
const MAX_REPORT_LEN: usize = 31;

/// Determine the window size: ioctl first, cursor probe as fallback.
///
/// # Errors
///
/// [`Error::WindowSize`] if both methods fail, or [`Error::Read`] /
/// [`Error::Write`] if the probe's terminal I/O fails.
pub fn window_size<S, W>(source: &mut S, out: &mut W) -> Result<Size>
where
    S: ByteSource + ?Sized,
    W: Write,
{
    if let Some(size) = get_size() {
        log::debug!("window size {}x{} from ioctl", size.cols, size.rows);
        return Ok(size);
    }
    let size = probe_size(source, out)?;
    log::debug!("window size {}x{} from cursor probe", size.cols, size.rows);
    Ok(size)
}

/// Find the window size by pushing the cursor to the bottom-right corner
/// and asking the terminal where it ended up.
///
/// Relies on the terminal clamping `CUF`/`CUD` at the screen edge. A
/// terminal that doesn't answer, or answers with garbage, is reported as
/// an error rather than retried.
///
/// # Errors
///
/// [`Error::WindowSize`] if no well-formed report arrives.
pub fn probe_size<S, W>(source: &mut S, out: &mut W) -> Result<Size>
where
    S: ByteSource + ?Sized,
    W: Write,
{
    send_probe(out).map_err(Error::Write)?;

    let mut reply = Vec::with_capacity(MAX_REPORT_LEN + 1);
    while reply.len() < MAX_REPORT_LEN {
        match source.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }

    parse_cursor_report(&reply).ok_or_else(|| {
        Error::WindowSize(format!(
            "unexpected cursor position report {:?}",
            String::from_utf8_lossy(&reply)
        ))
    })
}

fn send_probe(out: &mut impl Write) -> std::io::Result<()> {
    ansi::cursor_forward(out, 999)?;
    ansi::cursor_down(out, 999)?;
    ansi::request_cursor_position(out)?;
    out.flush()
}

/// Parse a cursor position report `ESC [ rows ; cols` (final `R` removed).
///
/// Both numbers must be positive and fit in a `u16`.
#[must_use]
pub fn parse_cursor_report(report: &[u8]) -> Option<Size> {
    let body = report.strip_prefix(b"\x1b[")?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;
    (rows > 0 && cols > 0).then_some(Size { cols, rows })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
