//! Screen renderer — one frame, one write.
//!
//! A frame is assembled in an [`AppendBuffer`] and written in a single
//! call so the terminal never shows half a frame:
//!
//! ```text
//! hide cursor, cursor home
//! for each screen row:
//!     visible slice of the buffer row   (or "~", or the welcome banner)
//!     erase to end of line
//!     "\r\n"                           (not after the last row)
//! cursor to (cy - row_offset, cx - col_offset)
//! show cursor
//! ```
//!
//! Rows are erased individually instead of clearing the whole screen up
//! front, which would blank the display for a moment on every keypress.

use std::io::{self, Write};

use kilo_term::ansi;
use kilo_term::output::AppendBuffer;

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;
use crate::view::Viewport;

/// Version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Draw one frame to `out`.
///
/// The viewport must already be scrolled to contain the cursor.
///
/// # Errors
///
/// [`kilo_term::Error::Write`] if writing the frame fails.
pub fn draw_frame(
    out: &mut impl Write,
    buffer: &TextBuffer,
    cursor: &Cursor,
    view: &Viewport,
) -> kilo_term::Result<()> {
    build_frame(buffer, cursor, view)
        .and_then(|frame| frame.flush_to(out))
        .map_err(kilo_term::Error::Write)
}

fn build_frame(buffer: &TextBuffer, cursor: &Cursor, view: &Viewport) -> io::Result<AppendBuffer> {
    let mut frame = AppendBuffer::new();

    ansi::cursor_hide(&mut frame)?;
    ansi::cursor_home(&mut frame)?;

    draw_rows(&mut frame, buffer, view)?;

    ansi::cursor_to(
        &mut frame,
        cursor.cx().saturating_sub(view.col_offset()),
        cursor.cy().saturating_sub(view.row_offset()),
    )?;
    ansi::cursor_show(&mut frame)?;

    Ok(frame)
}

fn draw_rows(frame: &mut AppendBuffer, buffer: &TextBuffer, view: &Viewport) -> io::Result<()> {
    let rows = view.screen_rows();
    let cols = view.screen_cols();

    for y in 0..rows {
        let file_row = y + view.row_offset();

        if let Some(row) = buffer.row(file_row) {
            let render = row.render();
            let start = view.col_offset().min(render.len());
            let len = (render.len() - start).min(cols);
            frame.append(&render[start..start + len]);
        } else if buffer.is_empty() && y == rows / 3 {
            frame.append(&welcome_line(cols));
        } else {
            frame.append(b"~");
        }

        ansi::erase_line(frame)?;
        if y + 1 < rows {
            frame.append(b"\r\n");
        }
    }

    Ok(())
}

/// The welcome banner, centred in `cols` columns.
///
/// The message is cut to fit; the left padding starts with the `~` that
/// marks an empty line.
#[must_use]
pub fn welcome_line(cols: usize) -> Vec<u8> {
    let message = format!("Kilo editor -- version {VERSION}");
    let message = &message.as_bytes()[..message.len().min(cols)];

    let mut line = Vec::with_capacity(cols);
    let mut padding = (cols - message.len()) / 2;
    if padding > 0 {
        line.push(b'~');
        padding -= 1;
    }
    line.resize(line.len() + padding, b' ');
    line.extend_from_slice(message);
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(lines: &[&str]) -> TextBuffer {
        let mut buf = TextBuffer::new(8);
        for line in lines {
            buf.append_row(line.as_bytes());
        }
        buf
    }

    fn render(buffer: &TextBuffer, cursor: Cursor, view: Viewport) -> String {
        let mut view = view;
        view.scroll(&cursor);
        let mut out = Vec::new();
        draw_frame(&mut out, buffer, &cursor, &view).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// The visible text of each screen row, escapes stripped.
    fn screen_lines(frame: &str) -> Vec<String> {
        let body = frame
            .strip_prefix("\x1b[?25l\x1b[H")
            .expect("frame starts with hide + home");
        let end = body.rfind("\x1b[?25h").unwrap();
        let body = &body[..end];
        let rows_end = body.rfind("\x1b[K").unwrap() + 3;
        body[..rows_end]
            .split("\r\n")
            .map(|row| row.strip_suffix("\x1b[K").unwrap().to_string())
            .collect()
    }

    // -- Frame structure ----------------------------------------------------

    #[test]
    fn frame_is_wrapped_in_hide_and_show() {
        let frame = render(&buffer(&["hi"]), Cursor::new(), Viewport::new(3, 10));
        assert!(frame.starts_with("\x1b[?25l\x1b[H"));
        assert!(frame.ends_with("\x1b[1;1H\x1b[?25h"));
    }

    #[test]
    fn exact_frame_for_small_buffer() {
        let frame = render(&buffer(&["ab", "c"]), Cursor::at(1, 1), Viewport::new(3, 10));
        assert_eq!(
            frame,
            "\x1b[?25l\x1b[H\
             ab\x1b[K\r\n\
             c\x1b[K\r\n\
             ~\x1b[K\
             \x1b[2;2H\x1b[?25h"
        );
    }

    #[test]
    fn every_row_is_erased_and_last_has_no_newline() {
        let frame = render(&buffer(&["x"]), Cursor::new(), Viewport::new(5, 10));
        assert_eq!(frame.matches("\x1b[K").count(), 5);
        assert_eq!(frame.matches("\r\n").count(), 4);
    }

    #[test]
    fn rows_past_end_are_tildes() {
        let frame = render(&buffer(&["one"]), Cursor::new(), Viewport::new(4, 10));
        assert_eq!(screen_lines(&frame), vec!["one", "~", "~", "~"]);
    }

    // -- Clipping -----------------------------------------------------------

    #[test]
    fn long_rows_are_clipped_to_width() {
        let frame = render(&buffer(&["0123456789abcdef"]), Cursor::new(), Viewport::new(1, 10));
        assert_eq!(screen_lines(&frame), vec!["0123456789"]);
    }

    #[test]
    fn col_offset_shifts_visible_slice() {
        let buf = buffer(&["0123456789abcdef", "short"]);
        // Cursor at column 12 with 10 columns → col_offset 3.
        let frame = render(&buf, Cursor::at(12, 0), Viewport::new(2, 10));
        assert_eq!(screen_lines(&frame), vec!["3456789abc", "rt"]);
        assert!(frame.ends_with("\x1b[1;10H\x1b[?25h"));
    }

    #[test]
    fn row_offset_shifts_visible_rows() {
        let lines: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let frame = render(&buffer(&refs), Cursor::at(0, 7), Viewport::new(3, 20));
        assert_eq!(screen_lines(&frame), vec!["line 5", "line 6", "line 7"]);
        assert!(frame.ends_with("\x1b[3;1H\x1b[?25h"));
    }

    #[test]
    fn tabs_are_drawn_expanded() {
        let frame = render(&buffer(&["\tx"]), Cursor::new(), Viewport::new(1, 20));
        assert_eq!(screen_lines(&frame), vec!["        x"]);
        assert!(!frame.contains('\t'));
    }

    // -- Welcome banner -----------------------------------------------------

    #[test]
    fn empty_buffer_shows_banner_a_third_down() {
        let frame = render(&buffer(&[]), Cursor::new(), Viewport::new(9, 80));
        let lines = screen_lines(&frame);
        assert_eq!(lines.len(), 9);
        for (y, line) in lines.iter().enumerate() {
            if y == 3 {
                assert!(line.contains("Kilo editor -- version"));
                assert!(line.starts_with('~'));
            } else {
                assert_eq!(line, "~");
            }
        }
    }

    #[test]
    fn non_empty_buffer_has_no_banner() {
        let frame = render(&buffer(&["text"]), Cursor::new(), Viewport::new(9, 80));
        assert!(!frame.contains("Kilo editor"));
    }

    #[test]
    fn welcome_is_centred() {
        let line = welcome_line(80);
        let message = format!("Kilo editor -- version {VERSION}");
        let padding = (80 - message.len()) / 2;
        assert_eq!(line.len(), padding + message.len());
        assert_eq!(line[0], b'~');
        assert!(line[1..padding].iter().all(|&b| b == b' '));
        assert_eq!(&line[padding..], message.as_bytes());
    }

    #[test]
    fn welcome_is_truncated_on_narrow_screens() {
        let line = welcome_line(10);
        assert_eq!(line, b"Kilo edito");
    }

    #[test]
    fn welcome_on_zero_width() {
        assert!(welcome_line(0).is_empty());
    }
}
