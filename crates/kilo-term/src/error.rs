// SPDX-License-Identifier: MIT
//
// Terminal error taxonomy.
//
// Every variant renders as `<operation>: <system error>` so the fatal path
// in the binary can print it as-is after the screen has been cleared.

use std::io;

use thiserror::Error;

/// Failures from terminal control and terminal I/O.
///
/// A read that times out is not an error — byte sources report it as
/// `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("tcgetattr: {0}")]
    GetAttributes(#[source] io::Error),

    #[error("tcsetattr: {0}")]
    SetAttributes(#[source] io::Error),

    #[error("read: {0}")]
    Read(#[source] io::Error),

    #[error("write: {0}")]
    Write(#[source] io::Error),

    #[error("getWindowSize: {0}")]
    WindowSize(String),
}

pub type Result<T> = std::result::Result<T, Error>;
