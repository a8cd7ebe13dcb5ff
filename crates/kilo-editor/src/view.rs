//! Viewport — which slice of the buffer is on screen.
//!
//! The viewport is the window `[row_offset, row_offset + screen_rows)` ×
//! `[col_offset, col_offset + screen_cols)` over buffer coordinates.
//! [`scroll`](Viewport::scroll) runs once per frame, before drawing, and
//! moves the window the minimum distance needed to contain the cursor.

use kilo_term::terminal::Size;

use crate::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    row_offset: usize,
    col_offset: usize,
    screen_rows: usize,
    screen_cols: usize,
}

impl Viewport {
    /// A viewport of the given size, scrolled to the top-left.
    #[must_use]
    pub const fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            screen_rows,
            screen_cols,
        }
    }

    /// A viewport covering the whole terminal.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(size.rows as usize, size.cols as usize)
    }

    // -- Accessors ----------------------------------------------------------

    /// First visible buffer row.
    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First visible column of the rendered rows.
    #[inline]
    #[must_use]
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    // -- Scrolling ----------------------------------------------------------

    /// Adjust the offsets so the cursor is inside the window.
    ///
    /// Idempotent for an unchanged cursor.
    pub const fn scroll(&mut self, cursor: &Cursor) {
        let (cx, cy) = (cursor.cx(), cursor.cy());

        if cy < self.row_offset {
            self.row_offset = cy;
        }
        if cy >= self.row_offset + self.screen_rows {
            self.row_offset = cy + 1 - self.screen_rows;
        }
        if cx < self.col_offset {
            self.col_offset = cx;
        }
        if cx >= self.col_offset + self.screen_cols {
            self.col_offset = cx + 1 - self.screen_cols;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scrolled(view: Viewport, cx: usize, cy: usize) -> Viewport {
        let mut view = view;
        view.scroll(&Cursor::at(cx, cy));
        view
    }

    #[test]
    fn from_size_uses_rows_and_cols() {
        let view = Viewport::from_size(Size { cols: 80, rows: 24 });
        assert_eq!(view.screen_rows(), 24);
        assert_eq!(view.screen_cols(), 80);
    }

    #[test]
    fn cursor_on_screen_leaves_offsets() {
        let view = scrolled(Viewport::new(24, 80), 10, 10);
        assert_eq!((view.row_offset(), view.col_offset()), (0, 0));
    }

    #[test]
    fn cursor_below_screen_scrolls_down_minimally() {
        let view = scrolled(Viewport::new(24, 80), 0, 24);
        assert_eq!(view.row_offset(), 1);
        let view = scrolled(Viewport::new(24, 80), 0, 100);
        assert_eq!(view.row_offset(), 77);
    }

    #[test]
    fn cursor_above_screen_scrolls_up_to_it() {
        let view = scrolled(scrolled(Viewport::new(24, 80), 0, 100), 0, 40);
        assert_eq!(view.row_offset(), 40);
    }

    #[test]
    fn cursor_right_of_screen_scrolls_right() {
        let view = scrolled(Viewport::new(24, 80), 85, 0);
        assert_eq!(view.col_offset(), 6);
    }

    #[test]
    fn cursor_left_of_screen_scrolls_left() {
        let view = scrolled(scrolled(Viewport::new(24, 80), 85, 0), 3, 0);
        assert_eq!(view.col_offset(), 3);
    }

    #[test]
    fn scroll_is_idempotent() {
        let once = scrolled(Viewport::new(24, 80), 90, 50);
        let twice = scrolled(once, 90, 50);
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn window_contains_cursor(
            rows in 1usize..100,
            cols in 1usize..200,
            start_cx in 0usize..1000,
            start_cy in 0usize..1000,
            cx in 0usize..1000,
            cy in 0usize..1000,
        ) {
            let view = scrolled(scrolled(Viewport::new(rows, cols), start_cx, start_cy), cx, cy);
            prop_assert!(view.row_offset() <= cy && cy < view.row_offset() + rows);
            prop_assert!(view.col_offset() <= cx && cx < view.col_offset() + cols);
        }
    }
}
