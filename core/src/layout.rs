//! Keyboard layout parsing and coordinate lookup.
//!
//! A [`KeyboardLayout`] is an immutable rectangular grid of characters built
//! once per configuration change. Rows come from a whitespace-delimited
//! layout string; shorter rows are padded with empty cells on the right so
//! every row has the same width. Characters listed in the ignored set, and
//! the reserved root sentinel `#`, always map to empty cells.
//!
//! Lookups are deliberately forgiving: an unrecognized character resolves to
//! the cell at the middle of the flattened grid, so even a key that is not on
//! the board still yields a well-defined search origin.

/// Reserved sentinel used as the trie root id; never a usable key.
pub const ROOT_SENTINEL: char = '#';

/// A parsed keyboard grid with character/coordinate lookups in both
/// directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardLayout {
    /// Flattened grid, row-major, `width * height` cells. `None` marks an
    /// excluded or padding cell.
    characters: Vec<Option<char>>,
    width: usize,
    height: usize,
    /// The raw layout string as typed by the user, kept for multi-layout
    /// language recognition and settings round-trips.
    original: String,
}

impl KeyboardLayout {
    /// Parse a layout specification into a grid.
    ///
    /// `spec` is split on whitespace into rows; `ignored` lists characters
    /// that become empty cells. Everything is lowercased. An empty spec
    /// produces a zero-sized grid without error.
    ///
    /// # Example
    /// ```
    /// use jumplabel_core::KeyboardLayout;
    ///
    /// let layout = KeyboardLayout::parse("ab\ncd", "");
    /// assert_eq!(layout.width(), 2);
    /// assert_eq!(layout.height(), 2);
    /// assert_eq!(layout.from(1, 0), Some('b'));
    /// ```
    pub fn parse(spec: &str, ignored: &str) -> Self {
        let lowered = spec.to_lowercase();
        let ignored: Vec<char> = ignored.to_lowercase().chars().collect();

        let rows: Vec<Vec<char>> = lowered
            .split_whitespace()
            .map(|row| row.chars().collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();

        let mut characters = Vec::with_capacity(width * height);
        for row in &rows {
            for x in 0..width {
                let cell = row.get(x).copied().filter(|ch| {
                    *ch != ROOT_SENTINEL && !ignored.contains(ch)
                });
                characters.push(cell);
            }
        }

        Self {
            characters,
            width,
            height,
            original: spec.to_string(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw layout string this grid was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Whether the grid has no usable cells at all.
    pub fn is_empty(&self) -> bool {
        self.characters.iter().all(Option::is_none)
    }

    /// Whether `ch` occupies a cell of this layout. Used for multi-layout
    /// recognition (exact membership scan).
    pub fn contains(&self, ch: char) -> bool {
        let ch = lower_char(ch);
        self.characters.contains(&Some(ch))
    }

    /// Grid coordinate of `ch`.
    ///
    /// A character that is not on the grid resolves to the cell at the
    /// middle of the flattened array, centering the search origin on the
    /// keyboard.
    pub fn coord(&self, ch: char) -> (i32, i32) {
        if self.width == 0 {
            return (0, 0);
        }
        let ch = lower_char(ch);
        let index = self
            .characters
            .iter()
            .position(|cell| *cell == Some(ch))
            .unwrap_or(self.characters.len() / 2);
        let y = index / self.width;
        let x = index - self.width * y;
        (x as i32, y as i32)
    }

    /// Bounds-checked reverse lookup; `None` outside the grid or on an
    /// empty cell.
    pub fn from(&self, x: i32, y: i32) -> Option<char> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.characters[x as usize + self.width * y as usize]
    }

    /// The character at (or nearest to) the grid's geometric center.
    ///
    /// Line-mode callers use this as a synthetic "typed character" when no
    /// real first keystroke exists. Scans outward from the center cell for
    /// the nearest non-empty one.
    pub fn mid_char(&self) -> Option<char> {
        if self.characters.is_empty() {
            return None;
        }
        let center = self.characters.len() / 2;
        if let Some(ch) = self.characters[center] {
            return Some(ch);
        }
        for step in 1..self.characters.len() {
            if let Some(ch) = center.checked_add(step).and_then(|i| {
                self.characters.get(i).copied().flatten()
            }) {
                return Some(ch);
            }
            if let Some(ch) = center.checked_sub(step).and_then(|i| {
                self.characters.get(i).copied().flatten()
            }) {
                return Some(ch);
            }
        }
        None
    }
}

pub(crate) fn lower_char(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}
