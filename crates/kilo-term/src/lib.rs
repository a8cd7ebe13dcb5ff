// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal layer for kilo.
//
// Everything that touches the terminal device lives here: raw mode via
// termios with a restoring guard, a byte-level key decoder that resolves
// escape sequences under a read timeout, window-size discovery, the ANSI
// sequences we emit, and the append buffer that coalesces a whole frame
// into one write on an unbuffered descriptor.
//
// No TUI frameworks. The decoder reads through the `ByteSource` trait and
// every writer takes `impl Write`, so the editor crate can be tested
// against scripted input and in-memory output.

pub mod ansi;
pub mod error;
pub mod input;
pub mod output;
pub mod terminal;

pub use error::{Error, Result};
