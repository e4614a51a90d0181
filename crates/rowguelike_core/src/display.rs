//! # Display Sink
//!
//! The render pass writes through a [`DrawContext`]: a plain character
//! buffer with one row per screen line, plus an optional [`DisplaySink`]
//! supplied by the host (terminal emulator, character LCD driver).
//!
//! Two modes:
//!
//! - **Buffered** (default): text lands in the buffer. Rows touched since the
//!   last [`DrawContext::present`] are pushed to the sink with `draw_text`.
//! - **Direct**: the render pass skips the buffer and hands every clipped
//!   text run straight to the sink, for controllers that must be driven
//!   glyph by glyph.
//!
//! The engine calls the sink; the sink never calls the engine.

use std::borrow::Cow;
use std::fmt;

use rowguelike_shared::Glyph;

use crate::ecs::TextRow;

/// Output device driven by the engine.
pub trait DisplaySink {
    /// Blanks the whole device.
    fn clear_all(&mut self);

    /// Uploads a custom character into glyph slot `index`.
    fn define_glyph(&mut self, index: u8, glyph: Glyph);

    /// Draws custom glyph `glyph` at cell (`x`, `y`).
    ///
    /// The cell is always on screen.
    fn draw_glyph(&mut self, x: i16, y: i16, glyph: u8);

    /// Draws a run of characters starting at cell (`x`, `y`).
    ///
    /// The run is already clipped to the screen.
    fn draw_text(&mut self, x: i16, y: i16, text: &[u8]);

    /// Number of custom glyph slots the device offers.
    fn glyph_slots(&self) -> u8 {
        0
    }
}

/// A clipped write: `len` bytes of the source starting at `skip` land at
/// (`col`, `row`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    row: usize,
    col: usize,
    skip: usize,
    len: usize,
}

/// Screen buffer plus optional host sink.
pub struct DrawContext {
    width: usize,
    height: usize,
    move_outside_screen: bool,
    /// `height` rows of `width` bytes.
    buffer: Box<[u8]>,
    /// Rows written since the last present.
    dirty: Box<[bool]>,
    /// Staging row for fills sent to the sink.
    line: Box<[u8]>,
    sink: Option<Box<dyn DisplaySink>>,
    direct_draw: bool,
}

impl DrawContext {
    /// Blank cell value.
    pub const BLANK: u8 = b' ';

    /// Creates a blank buffer of `width` x `height` cells.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: u8, height: u8, move_outside_screen: bool) -> Self {
        assert!(width > 0 && height > 0, "Screen must be at least 1x1");

        let width = usize::from(width);
        let height = usize::from(height);
        let mut ctx = Self {
            width,
            height,
            move_outside_screen,
            buffer: vec![Self::BLANK; width * height].into_boxed_slice(),
            dirty: vec![true; height].into_boxed_slice(),
            line: vec![Self::BLANK; width].into_boxed_slice(),
            sink: None,
            direct_draw: false,
        };
        ctx.clear_all();
        ctx
    }

    /// Screen width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Screen height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    // =========================================================================
    // Sink management
    // =========================================================================

    /// Attaches a host sink, returning the previous one.
    ///
    /// Every row is marked dirty so the next present repaints the device.
    pub fn attach_sink(&mut self, sink: Box<dyn DisplaySink>) -> Option<Box<dyn DisplaySink>> {
        self.dirty.fill(true);
        self.sink.replace(sink)
    }

    /// Detaches and returns the host sink.
    pub fn detach_sink(&mut self) -> Option<Box<dyn DisplaySink>> {
        self.sink.take()
    }

    /// True if a host sink is attached.
    #[inline]
    #[must_use]
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Enables or disables direct draw mode.
    pub fn set_direct_draw(&mut self, enabled: bool) {
        self.direct_draw = enabled;
    }

    /// True if render writes bypass the buffer.
    #[inline]
    #[must_use]
    pub const fn direct_draw(&self) -> bool {
        self.direct_draw
    }

    // =========================================================================
    // Buffer
    // =========================================================================

    /// Blanks the buffer and the attached device.
    pub fn clear_all(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.clear_all();
        }
        self.buffer.fill(Self::BLANK);
        self.dirty.fill(true);
    }

    /// Writes `text` into the buffer at (`x`, `y`).
    ///
    /// Coordinates are clamped onto the screen unless off-screen movement is
    /// enabled, in which case the write is clipped instead. Text past the
    /// row end is dropped.
    pub fn add_text(&mut self, x: i16, y: i16, text: &str) {
        self.add_bytes(x, y, text.as_bytes());
    }

    /// Writes raw character codes into the buffer. Same clipping as
    /// [`DrawContext::add_text`].
    pub fn add_bytes(&mut self, x: i16, y: i16, bytes: &[u8]) {
        let Some(span) = self.clip(x, y, bytes.len()) else {
            return;
        };
        let start = span.row * self.width + span.col;
        self.buffer[start..start + span.len]
            .copy_from_slice(&bytes[span.skip..span.skip + span.len]);
        self.dirty[span.row] = true;
    }

    /// Fills from (`x`, `y`) to the row end with `byte`.
    pub fn add_fill(&mut self, x: i16, y: i16, byte: u8) {
        let Some(span) = self.clip(x, y, self.width) else {
            return;
        };
        let start = span.row * self.width + span.col;
        self.buffer[start..start + span.len].fill(byte);
        self.dirty[span.row] = true;
    }

    /// One buffer row, `None` past the last row.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        Some(&self.buffer[y * self.width..(y + 1) * self.width])
    }

    /// One buffer row as text. Non-UTF-8 glyph codes are replaced.
    #[must_use]
    pub fn row_text(&self, y: usize) -> Option<Cow<'_, str>> {
        self.row(y).map(String::from_utf8_lossy)
    }

    // =========================================================================
    // Peer callbacks
    // =========================================================================

    /// Uploads a custom glyph to the sink.
    ///
    /// Returns `false` without a sink or if `index` is past the sink's
    /// glyph slots.
    pub fn define_glyph(&mut self, index: u8, glyph: Glyph) -> bool {
        match self.sink.as_mut() {
            Some(sink) if index < sink.glyph_slots() => {
                sink.define_glyph(index, glyph);
                true
            }
            _ => false,
        }
    }

    /// Draws a custom glyph on the sink.
    ///
    /// No-op without a sink or if (`x`, `y`) is off screen; glyphs are never
    /// clamped.
    pub fn draw_glyph(&mut self, x: i16, y: i16, glyph: u8) {
        let on_screen = usize::try_from(x).is_ok_and(|col| col < self.width)
            && usize::try_from(y).is_ok_and(|row| row < self.height);
        if !on_screen {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.draw_glyph(x, y, glyph);
        }
    }

    /// Render-pass entry point for one text row.
    pub(crate) fn draw_row(&mut self, x: i16, y: i16, content: &TextRow) {
        if !(self.direct_draw && self.sink.is_some()) {
            match content {
                TextRow::Str(text) => self.add_text(x, y, text),
                TextRow::Shared(text) => self.add_text(x, y, text),
                TextRow::Fill(byte) => self.add_fill(x, y, *byte),
            }
            return;
        }

        let len = content.as_str().map_or(self.width, str::len);
        let Some(span) = self.clip(x, y, len) else {
            return;
        };
        let (col, row) = (span.col as i16, span.row as i16);
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let TextRow::Fill(byte) = *content {
            self.line[..span.len].fill(byte);
            sink.draw_text(col, row, &self.line[..span.len]);
        } else if let Some(text) = content.as_str() {
            sink.draw_text(col, row, &text.as_bytes()[span.skip..span.skip + span.len]);
        }
    }

    /// Pushes dirty buffer rows to the sink.
    ///
    /// No-op without a sink or in direct mode.
    pub fn present(&mut self) {
        if self.direct_draw {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        for (y, dirty) in self.dirty.iter_mut().enumerate() {
            if *dirty {
                let row = &self.buffer[y * self.width..(y + 1) * self.width];
                sink.draw_text(0, y as i16, row);
                *dirty = false;
            }
        }
    }

    fn clip(&self, x: i16, y: i16, len: usize) -> Option<Span> {
        let last_col = self.width as i16 - 1;
        let last_row = self.height as i16 - 1;

        let (x, y, skip) = if self.move_outside_screen {
            if y < 0 || y > last_row || x > last_col {
                return None;
            }
            let skip = if x < 0 { usize::from(x.unsigned_abs()) } else { 0 };
            (x.max(0), y, skip)
        } else {
            (x.clamp(0, last_col), y.clamp(0, last_row), 0)
        };

        let col = x as usize;
        let len = len.saturating_sub(skip).min(self.width - col);
        if len == 0 {
            return None;
        }
        Some(Span {
            row: y as usize,
            col,
            skip,
            len,
        })
    }
}

impl fmt::Debug for DrawContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("direct_draw", &self.direct_draw)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Clear,
        Define(u8),
        Glyph(i16, i16, u8),
        Text(i16, i16, Vec<u8>),
    }

    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl DisplaySink for Recorder {
        fn clear_all(&mut self) {
            self.0.borrow_mut().push(Call::Clear);
        }
        fn define_glyph(&mut self, index: u8, _glyph: Glyph) {
            self.0.borrow_mut().push(Call::Define(index));
        }
        fn draw_glyph(&mut self, x: i16, y: i16, glyph: u8) {
            self.0.borrow_mut().push(Call::Glyph(x, y, glyph));
        }
        fn draw_text(&mut self, x: i16, y: i16, text: &[u8]) {
            self.0.borrow_mut().push(Call::Text(x, y, text.to_vec()));
        }
        fn glyph_slots(&self) -> u8 {
            rowguelike_shared::constants::HD44780_GLYPH_SLOTS
        }
    }

    fn recorded() -> (DrawContext, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = DrawContext::new(16, 2, false);
        ctx.attach_sink(Box::new(Recorder(Rc::clone(&calls))));
        (ctx, calls)
    }

    #[test]
    fn test_new_buffer_is_blank() {
        let ctx = DrawContext::new(16, 2, false);
        assert_eq!(ctx.row(0), Some(&[b' '; 16][..]));
        assert_eq!(ctx.row(1), Some(&[b' '; 16][..]));
        assert_eq!(ctx.row(2), None);
    }

    #[test]
    fn test_text_truncated_at_row_end() {
        let mut ctx = DrawContext::new(16, 2, false);
        ctx.add_text(14, 0, "ABCD");
        assert_eq!(ctx.row_text(0).unwrap(), "              AB");
    }

    #[test]
    fn test_coordinates_clamped() {
        let mut ctx = DrawContext::new(16, 2, false);
        ctx.add_text(-3, 5, "x");
        ctx.add_text(40, 0, "yz");
        assert_eq!(ctx.row(1).unwrap()[0], b'x');
        assert_eq!(ctx.row(0).unwrap()[15], b'y');
    }

    #[test]
    fn test_offscreen_writes_clipped() {
        let mut ctx = DrawContext::new(8, 2, true);
        ctx.add_text(-2, 0, "abcd");
        ctx.add_text(0, 2, "never");
        ctx.add_text(8, 1, "never");
        ctx.add_text(-9, 1, "short");
        assert_eq!(ctx.row_text(0).unwrap(), "cd      ");
        assert_eq!(ctx.row_text(1).unwrap(), "        ");
    }

    #[test]
    fn test_fill_to_row_end() {
        let mut ctx = DrawContext::new(6, 1, false);
        ctx.add_fill(2, 0, b'#');
        assert_eq!(ctx.row_text(0).unwrap(), "  ####");
    }

    #[test]
    fn test_present_sends_dirty_rows_once() {
        let (mut ctx, calls) = recorded();
        calls.borrow_mut().clear();

        ctx.add_text(0, 1, "hi");
        ctx.present();
        ctx.present();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], Call::Text(0, 0, vec![b' '; 16]));
        let mut row = vec![b' '; 16];
        row[..2].copy_from_slice(b"hi");
        assert_eq!(calls[1], Call::Text(0, 1, row));
    }

    #[test]
    fn test_direct_draw_bypasses_buffer() {
        let (mut ctx, calls) = recorded();
        ctx.set_direct_draw(true);
        calls.borrow_mut().clear();

        ctx.draw_row(14, 0, &TextRow::Str("ABCD"));
        ctx.draw_row(10, 1, &TextRow::Fill(b'='));
        ctx.present();

        assert_eq!(ctx.row_text(0).unwrap(), " ".repeat(16));
        assert_eq!(
            *calls.borrow(),
            vec![
                Call::Text(14, 0, b"AB".to_vec()),
                Call::Text(10, 1, b"======".to_vec()),
            ]
        );
    }

    #[test]
    fn test_glyph_slots_respected() {
        let (mut ctx, calls) = recorded();
        calls.borrow_mut().clear();

        assert!(ctx.define_glyph(7, Glyph::default()));
        assert!(!ctx.define_glyph(8, Glyph::default()));
        ctx.draw_glyph(3, 1, 7);

        assert_eq!(*calls.borrow(), vec![Call::Define(7), Call::Glyph(3, 1, 7)]);
    }

    #[test]
    fn test_offscreen_glyphs_dropped() {
        let (mut ctx, calls) = recorded();
        calls.borrow_mut().clear();

        ctx.draw_glyph(-1, 0, 1);
        ctx.draw_glyph(16, 0, 1);
        ctx.draw_glyph(0, 2, 1);
        ctx.draw_glyph(0, -1, 1);
        ctx.draw_glyph(15, 1, 2);

        assert_eq!(*calls.borrow(), vec![Call::Glyph(15, 1, 2)]);
    }

    #[test]
    fn test_shared_row_drawn_direct() {
        let (mut ctx, calls) = recorded();
        ctx.set_direct_draw(true);
        calls.borrow_mut().clear();

        let lives = 3;
        ctx.draw_row(0, 1, &TextRow::from(format!("lives {lives}")));

        assert_eq!(*calls.borrow(), vec![Call::Text(0, 1, b"lives 3".to_vec())]);
    }

    #[test]
    fn test_peer_calls_without_sink_are_noops() {
        let mut ctx = DrawContext::new(4, 1, false);
        assert!(!ctx.define_glyph(0, Glyph::default()));
        ctx.draw_glyph(0, 0, 0);
        ctx.present();
        assert!(!ctx.has_sink());
    }

    #[test]
    fn test_clear_all_reaches_sink() {
        let (mut ctx, calls) = recorded();
        ctx.add_text(0, 0, "junk");
        ctx.clear_all();
        assert_eq!(ctx.row_text(0).unwrap(), " ".repeat(16));
        assert!(calls.borrow().contains(&Call::Clear));
    }
}
