//! Cursor — a position in buffer coordinates and its movement rules.
//!
//! `cx` is a byte column into the row's stored content (not its render
//! form), `cy` a row index. `cy` may equal `num_rows()`: the line just past
//! the end of the file, where the only valid column is 0.
//!
//! Horizontal moves wrap across line boundaries. Vertical moves keep the
//! column where possible and clamp it to the new row's length.

use crate::buffer::TextBuffer;

/// A single-step movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A cursor in a text buffer.
///
/// Plain value type; the buffer is passed to each movement method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    cx: usize,
    cy: usize,
}

impl Cursor {
    /// Cursor at the top-left of the buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0 }
    }

    /// Cursor at column `cx` of row `cy`, not validated against a buffer.
    #[must_use]
    pub const fn at(cx: usize, cy: usize) -> Self {
        Self { cx, cy }
    }

    #[inline]
    #[must_use]
    pub const fn cx(&self) -> usize {
        self.cx
    }

    #[inline]
    #[must_use]
    pub const fn cy(&self) -> usize {
        self.cy
    }

    // -- Movement -----------------------------------------------------------

    /// Move one step in `dir`.
    ///
    /// - Left at column 0 goes to the end of the previous row, if any.
    /// - Right at the end of a row goes to column 0 of the next row.
    /// - Up stops at row 0, Down at `num_rows()`.
    ///
    /// Afterwards the column is clamped to the current row's length.
    pub fn step(&mut self, dir: Direction, buffer: &TextBuffer) {
        let num_rows = buffer.num_rows();

        match dir {
            Direction::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = buffer.row_len(self.cy);
                }
            }
            Direction::Right => {
                if let Some(row) = buffer.row(self.cy) {
                    if self.cx < row.len() {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            Direction::Up => self.cy = self.cy.saturating_sub(1),
            Direction::Down => {
                if self.cy < num_rows {
                    self.cy += 1;
                }
            }
        }

        self.clamp_to_row(buffer);
    }

    /// Repeat [`step`](Self::step) `count` times.
    ///
    /// Paging is `count = screen_rows` vertical steps, so it clamps exactly
    /// like holding the arrow key would.
    pub fn repeat(&mut self, dir: Direction, count: usize, buffer: &TextBuffer) {
        for _ in 0..count {
            self.step(dir, buffer);
        }
    }

    /// Column 0.
    pub const fn home(&mut self) {
        self.cx = 0;
    }

    /// End of the current row. Past the last row there is nothing to move
    /// to and the column stays at 0.
    pub fn end(&mut self, buffer: &TextBuffer) {
        self.cx = buffer.row_len(self.cy);
    }

    fn clamp_to_row(&mut self, buffer: &TextBuffer) {
        self.cx = self.cx.min(buffer.row_len(self.cy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buffer(lines: &[&str]) -> TextBuffer {
        let mut buf = TextBuffer::new(8);
        for line in lines {
            buf.append_row(line.as_bytes());
        }
        buf
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn right_moves_within_row() {
        let buf = buffer(&["abc"]);
        let mut c = Cursor::new();
        c.step(Direction::Right, &buf);
        assert_eq!(c, Cursor::at(1, 0));
    }

    #[test]
    fn right_at_end_wraps_to_next_row() {
        let buf = buffer(&["ab", "cd"]);
        let mut c = Cursor::at(2, 0);
        c.step(Direction::Right, &buf);
        assert_eq!(c, Cursor::at(0, 1));
    }

    #[test]
    fn right_at_end_of_last_row_goes_past_end() {
        let buf = buffer(&["ab"]);
        let mut c = Cursor::at(2, 0);
        c.step(Direction::Right, &buf);
        assert_eq!(c, Cursor::at(0, 1));
        // Nothing further right of the past-the-end line.
        c.step(Direction::Right, &buf);
        assert_eq!(c, Cursor::at(0, 1));
    }

    #[test]
    fn left_moves_within_row() {
        let buf = buffer(&["abc"]);
        let mut c = Cursor::at(2, 0);
        c.step(Direction::Left, &buf);
        assert_eq!(c, Cursor::at(1, 0));
    }

    #[test]
    fn left_at_start_wraps_to_previous_end() {
        let buf = buffer(&["hello", "x"]);
        let mut c = Cursor::at(0, 1);
        c.step(Direction::Left, &buf);
        assert_eq!(c, Cursor::at(5, 0));
    }

    #[test]
    fn left_at_origin_stays() {
        let buf = buffer(&["abc"]);
        let mut c = Cursor::new();
        c.step(Direction::Left, &buf);
        assert_eq!(c, Cursor::new());
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn down_clamps_column_to_shorter_row() {
        let buf = buffer(&["a long line", "ab"]);
        let mut c = Cursor::at(8, 0);
        c.step(Direction::Down, &buf);
        assert_eq!(c, Cursor::at(2, 1));
    }

    #[test]
    fn up_clamps_column_to_shorter_row() {
        let buf = buffer(&["ab", "a long line"]);
        let mut c = Cursor::at(8, 1);
        c.step(Direction::Up, &buf);
        assert_eq!(c, Cursor::at(2, 0));
    }

    #[test]
    fn down_stops_one_past_last_row() {
        let buf = buffer(&["a", "b"]);
        let mut c = Cursor::at(1, 1);
        c.step(Direction::Down, &buf);
        assert_eq!(c, Cursor::at(0, 2));
        c.step(Direction::Down, &buf);
        assert_eq!(c, Cursor::at(0, 2));
    }

    #[test]
    fn up_stops_at_top() {
        let buf = buffer(&["a"]);
        let mut c = Cursor::new();
        c.step(Direction::Up, &buf);
        assert_eq!(c, Cursor::new());
    }

    #[test]
    fn empty_buffer_pins_cursor() {
        let buf = buffer(&[]);
        let mut c = Cursor::new();
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            c.step(dir, &buf);
            assert_eq!(c, Cursor::new());
        }
    }

    // -- Home / End / repeat ------------------------------------------------

    #[test]
    fn home_and_end() {
        let buf = buffer(&["twelve chars"]);
        let mut c = Cursor::at(3, 0);
        c.end(&buf);
        assert_eq!(c.cx(), 12);
        c.home();
        assert_eq!(c.cx(), 0);
    }

    #[test]
    fn end_past_last_row_stays_at_zero() {
        let buf = buffer(&["abc"]);
        let mut c = Cursor::at(0, 1);
        c.end(&buf);
        assert_eq!(c, Cursor::at(0, 1));
    }

    #[test]
    fn repeat_down_clamps_at_end() {
        let buf = buffer(&["a", "b", "c"]);
        let mut c = Cursor::new();
        c.repeat(Direction::Down, 24, &buf);
        assert_eq!(c.cy(), 3);
    }

    // -- Properties ---------------------------------------------------------

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn moves_keep_cursor_in_bounds(
            lens in proptest::collection::vec(0usize..40, 0..20),
            moves in proptest::collection::vec(direction(), 0..200),
        ) {
            let mut buf = TextBuffer::new(8);
            for len in &lens {
                buf.append_row(&vec![b'x'; *len]);
            }
            let mut c = Cursor::new();
            for dir in moves {
                c.step(dir, &buf);
                prop_assert!(c.cy() <= buf.num_rows());
                prop_assert!(c.cx() <= buf.row_len(c.cy()));
            }
        }
    }
}
