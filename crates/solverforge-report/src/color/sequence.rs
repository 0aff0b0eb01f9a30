//! Stateful color allocation keyed by series.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;
use tracing::trace;

use super::{sequence_color, HexStyle, Palette, RgbColor, TANGO_DARK, TANGO_LIGHT};

/// Assigns each distinct key the next color of the sequence, once.
///
/// A key's color depends only on the order in which keys were first seen,
/// never on the key itself. Assignments are never evicted; a sequence is
/// meant to live for one report, after which it is dropped or [`reset`].
///
/// Keys are compared by value (`Eq + Hash`).
///
/// [`reset`]: ColorSequence::reset
#[derive(Debug, Clone)]
pub struct ColorSequence<K = String> {
    light: Palette,
    dark: Palette,
    hex_style: HexStyle,
    assignments: IndexMap<K, RgbColor>,
}

impl<K: Hash + Eq> ColorSequence<K> {
    /// Creates an empty sequence over the Tango palettes.
    pub fn new() -> Self {
        Self::with_palettes(TANGO_LIGHT, TANGO_DARK)
    }

    /// Creates an empty sequence over custom palettes.
    ///
    /// `light` is handed out first; `dark` second and then as the blend floor.
    pub fn with_palettes(light: Palette, dark: Palette) -> Self {
        Self {
            light,
            dark,
            hex_style: HexStyle::default(),
            assignments: IndexMap::new(),
        }
    }

    /// Sets how [`color_for`](Self::color_for) renders hex strings.
    pub fn with_hex_style(mut self, hex_style: HexStyle) -> Self {
        self.hex_style = hex_style;
        self
    }

    pub fn hex_style(&self) -> HexStyle {
        self.hex_style
    }

    /// Returns the color string for `key`, allocating one on first sight.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::ColorSequence;
    ///
    /// let mut colors = ColorSequence::<String>::new();
    /// let first = colors.color_for("a");
    /// colors.color_for("b");
    /// assert_eq!(colors.color_for("a"), first);
    /// assert_eq!(colors.assignment_count(), 2);
    /// ```
    pub fn color_for<Q>(&mut self, key: &Q) -> String
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.rgb_for(key).to_hex(self.hex_style)
    }

    /// Same as [`color_for`](Self::color_for) but returns the packed color.
    pub fn rgb_for<Q>(&mut self, key: &Q) -> RgbColor
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(color) = self.assignments.get(key) {
            return *color;
        }
        let index = self.assignments.len();
        let color = self.color_at(index);
        self.assignments.insert(key.to_owned(), color);
        trace!(
            event = "color_assigned",
            index = index as u64,
            color = %color.to_hex(self.hex_style),
        );
        color
    }

    /// Returns the color already assigned to `key`, without allocating.
    pub fn get<Q>(&self, key: &Q) -> Option<RgbColor>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.assignments.get(key).copied()
    }

    /// Returns the color the sequence hands out at position `index`.
    pub fn color_at(&self, index: usize) -> RgbColor {
        sequence_color(&self.light, &self.dark, index)
    }

    /// Number of colors allocated so far.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates assignments in the order keys were first seen.
    pub fn assignments(&self) -> impl Iterator<Item = (&K, RgbColor)> + '_ {
        self.assignments.iter().map(|(k, c)| (k, *c))
    }

    /// Iterates assignments as rendered hex strings, in first-seen order.
    pub fn hex_assignments(&self) -> impl Iterator<Item = (&K, String)> + '_ {
        let style = self.hex_style;
        self.assignments.iter().map(move |(k, c)| (k, c.to_hex(style)))
    }

    /// Forgets every assignment; the next key gets the first color again.
    pub fn reset(&mut self) {
        self.assignments.clear();
    }
}

impl<K: Hash + Eq> Default for ColorSequence<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`ColorSequence`] that can be shared between threads.
///
/// Lookup and insertion happen under one lock, so two callers racing on the
/// same new key still receive the same color.
#[derive(Debug)]
pub struct SharedColorSequence<K = String> {
    inner: Mutex<ColorSequence<K>>,
}

impl<K: Hash + Eq> SharedColorSequence<K> {
    pub fn new(sequence: ColorSequence<K>) -> Self {
        Self {
            inner: Mutex::new(sequence),
        }
    }

    /// See [`ColorSequence::color_for`].
    pub fn color_for<Q>(&self, key: &Q) -> String
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .color_for(key)
    }

    pub fn assignment_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .assignment_count()
    }

    pub fn reset(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
    }

    /// Unwraps the inner sequence.
    pub fn into_inner(self) -> ColorSequence<K> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Hash + Eq> Default for SharedColorSequence<K> {
    fn default() -> Self {
        Self::new(ColorSequence::new())
    }
}
