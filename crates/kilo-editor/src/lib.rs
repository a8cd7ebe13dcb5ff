//! # kilo-editor — Editor core for kilo
//!
//! - **[`buffer`]** — `TextBuffer` of `Row`s, each with its tab-expanded render form
//! - **[`cursor`]** — `Cursor` position in buffer coordinates and its movement rules
//! - **[`view`]** — `Viewport` scroll offsets kept around the cursor
//! - **[`render`]** — one frame of output assembled into a single write
//! - **[`editor`]** — `Editor`, the render → read key → dispatch loop
//! - **[`options`]** — tunables with defaults and environment overrides
//! - **[`error`]** — the fatal error type surfaced to the binary

pub mod buffer;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod options;
pub mod render;
pub mod view;

pub use error::{Error, Result};
