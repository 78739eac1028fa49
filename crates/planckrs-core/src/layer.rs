// Planckrs Layers
// Layer identifiers and the layer-activation bitmask

use std::fmt;

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

/// Layer identifiers.
///
/// The discriminant is both the index into the keymap table and the bit
/// position in a [`LayerState`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    EnumCountMacro,
)]
#[repr(u8)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Layer {
    Qwerty = 0,
    Lower = 1,
    Raise = 2,
    Bepo = 3,
    BpLower = 4,
    BpRaise = 5,
    Adjust = 6,
}

/// Number of layers in the keymap
pub const LAYER_COUNT: usize = Layer::COUNT;

/// Errors that can occur when resolving layers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error("no layer at index {0}")]
    IndexOutOfRange(u8),

    #[error("unknown layer: {0}")]
    UnknownName(String),
}

impl Layer {
    /// Array index / bit position of this layer
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask for this layer
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Layer for an index or bit position
    pub fn from_index(index: u8) -> Result<Self, LayerError> {
        Layer::iter()
            .find(|layer| *layer as u8 == index)
            .ok_or(LayerError::IndexOutOfRange(index))
    }

    /// Parse a layer name, reporting unknown names
    pub fn from_name(name: &str) -> Result<Self, LayerError> {
        name.trim()
            .parse()
            .map_err(|_| LayerError::UnknownName(name.to_string()))
    }

    /// Base alphabet layers, the only valid persistent defaults
    pub const fn is_base(self) -> bool {
        matches!(self, Layer::Qwerty | Layer::Bepo)
    }
}

/// Bitmask of active layers, one bit per [`Layer`].
///
/// Owned by the host runtime; callbacks receive it by value and return the
/// adjusted mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct LayerState(u32);

impl LayerState {
    /// No layers active
    pub const EMPTY: LayerState = LayerState(0);

    /// Wrap a raw bitmask
    pub const fn from_bits(bits: u32) -> Self {
        LayerState(bits)
    }

    /// Raw bitmask
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask with exactly one layer set
    pub const fn only(layer: Layer) -> Self {
        LayerState(layer.bit())
    }

    /// Check if a layer bit is set
    pub const fn is_on(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    /// Copy with a layer bit set
    #[must_use]
    pub const fn with(self, layer: Layer) -> Self {
        LayerState(self.0 | layer.bit())
    }

    /// Copy with a layer bit cleared
    #[must_use]
    pub const fn without(self, layer: Layer) -> Self {
        LayerState(self.0 & !layer.bit())
    }

    /// Set a layer bit in place
    pub fn set(&mut self, layer: Layer) {
        *self = self.with(layer);
    }

    /// Clear a layer bit in place
    pub fn clear(&mut self, layer: Layer) {
        *self = self.without(layer);
    }

    /// Check if no layer bit is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Index of the highest set bit, 0 for an empty mask.
    pub const fn highest_bit(self) -> u8 {
        if self.0 == 0 {
            0
        } else {
            (31 - self.0.leading_zeros()) as u8
        }
    }

    /// Topmost active layer, if any bit maps to a known layer
    pub fn highest(self) -> Option<Layer> {
        if self.is_empty() {
            return None;
        }
        Layer::from_index(self.highest_bit()).ok()
    }

    /// Active layers, topmost first
    pub fn iter_active(self) -> impl Iterator<Item = Layer> {
        Layer::iter().rev().filter(move |layer| self.is_on(*layer))
    }

    /// Tri-layer composition: `third` is on iff both `first` and `second` are on.
    ///
    /// The bits of `first` and `second` are left untouched.
    #[must_use]
    pub const fn update_tri_layer(self, first: Layer, second: Layer, third: Layer) -> Self {
        if self.is_on(first) && self.is_on(second) {
            self.with(third)
        } else {
            self.without(third)
        }
    }
}

impl From<Layer> for LayerState {
    fn from(layer: Layer) -> Self {
        LayerState::only(layer)
    }
}

impl FromIterator<Layer> for LayerState {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        iter.into_iter().fold(LayerState::EMPTY, LayerState::with)
    }
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[]");
        }
        let names: Vec<String> = Layer::iter()
            .filter(|layer| self.is_on(*layer))
            .map(|layer| layer.to_string())
            .collect();
        write!(f, "[{}]", names.join(", "))
    }
}
