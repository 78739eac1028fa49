// Planckrs Keymap
// Layer tables for the Planck 4x12 matrix and the layer-stack lookup

use crate::action::KeyPos;
use crate::bepo::*;
use crate::callbacks::{BEPO, QWERTY};
use crate::keycode::*;
use crate::layer::{Layer, LayerState, LAYER_COUNT};

pub const MATRIX_ROWS: usize = 4;
pub const MATRIX_COLS: usize = 12;

/// One layer: rows of per-column keycodes.
pub type LayerGrid = [[Keycode; MATRIX_COLS]; MATRIX_ROWS];

/// Momentary modifier layers of the QWERTY base
pub const LOWER: Keycode = mo(Layer::Lower);
pub const RAISE: Keycode = mo(Layer::Raise);

/// Momentary modifier layers of the BÉPO base
pub const BP_LOWER: Keycode = mo(Layer::BpLower);
pub const BP_RAISE: Keycode = mo(Layer::BpRaise);

const _______: Keycode = KC_TRNS;

/// The layer tables, indexed by [`Layer::index`].
#[rustfmt::skip]
pub static KEYMAPS: [LayerGrid; LAYER_COUNT] = [
    /* Qwerty
     * ,-----------------------------------------------------------------------------------.
     * | Esc  |   Q  |   W  |   E  |   R  |   T  |   Y  |   U  |   I  |   O  |   P  | Bksp |
     * |------+------+------+------+------+-------------+------+------+------+------+------|
     * | Tab  |   A  |   S  |   D  |   F  |   G  |   H  |   J  |   K  |   L  |   ;  |Enter |
     * |------+------+------+------+------+------|------+------+------+------+------+------|
     * | Shift|   Z  |   X  |   C  |   V  |   B  |   N  |   M  |   ,  |   .  |   /  |  "   |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * | Ctrl | Ctrl | Alt  | GUI  |Lower | Bksp |Space |Raise | Left | Down | Ctrl |Right |
     * `-----------------------------------------------------------------------------------'
     */
    [
        [KC_ESC,  KC_Q,    KC_W,    KC_E,    KC_R,    KC_T,    KC_Y,    KC_U,    KC_I,    KC_O,    KC_P,    KC_BSPC],
        [KC_TAB,  KC_A,    KC_S,    KC_D,    KC_F,    KC_G,    KC_H,    KC_J,    KC_K,    KC_L,    KC_SCLN, KC_ENT ],
        [KC_LSFT, KC_Z,    KC_X,    KC_C,    KC_V,    KC_B,    KC_N,    KC_M,    KC_COMM, KC_DOT,  KC_SLSH, KC_QUOT],
        [KC_LCTL, KC_LCTL, KC_LALT, KC_LGUI, LOWER,   KC_BSPC, KC_SPC,  RAISE,   KC_LEFT, KC_DOWN, KC_LCTL, KC_RGHT],
    ],

    /* Lower
     * ,-----------------------------------------------------------------------------------.
     * |   ~  |   !  |   @  |   #  |   $  |   %  |   ^  |   &  |   *  |   (  |   )  | Bksp |
     * |------+------+------+------+------+-------------+------+------+------+------+------|
     * | Del  |  F1  |  F2  |  F3  |  F4  |  F5  |  F6  |   _  |   +  |   {  |   }  |  |   |
     * |------+------+------+------+------+------|------+------+------+------+------+------|
     * |      |  F7  |  F8  |  F9  |  F10 |  F11 |  F12 |ISO ~ |ISO | | Home | End  |      |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * |      |      |      |      |      |             |      | Next | Vol- | Vol+ | Play |
     * `-----------------------------------------------------------------------------------'
     */
    [
        [KC_TILD, KC_EXLM, KC_AT,   KC_HASH, KC_DLR,  KC_PERC, KC_CIRC, KC_AMPR,        KC_ASTR,        KC_LPRN, KC_RPRN, KC_BSPC],
        [KC_DEL,  KC_F1,   KC_F2,   KC_F3,   KC_F4,   KC_F5,   KC_F6,   KC_UNDS,        KC_PLUS,        KC_LCBR, KC_RCBR, KC_PIPE],
        [_______, KC_F7,   KC_F8,   KC_F9,   KC_F10,  KC_F11,  KC_F12,  shift(KC_NUHS), shift(KC_NUBS), KC_HOME, KC_END,  _______],
        [_______, _______, _______, _______, _______, _______, _______, _______,        KC_MNXT,        KC_VOLD, KC_VOLU, KC_MPLY],
    ],

    /* Raise
     * ,-----------------------------------------------------------------------------------.
     * |   `  |   1  |   2  |   3  |   4  |   5  |   6  |   7  |   8  |   9  |   0  | Bksp |
     * |------+------+------+------+------+-------------+------+------+------+------+------|
     * | Del  |  F1  |  F2  |  F3  |  F4  |  F5  |  F6  |   -  |   =  |   [  |   ]  |  \   |
     * |------+------+------+------+------+------|------+------+------+------+------+------|
     * |      |  F7  |  F8  |  F9  |  F10 |  F11 |  F12 |ISO # |ISO / |Pg Up |Pg Dn |      |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * |      |      |      |      |      |             |      | Next | Vol- | Vol+ | Play |
     * `-----------------------------------------------------------------------------------'
     */
    [
        [KC_GRV,  KC_1,    KC_2,    KC_3,    KC_4,    KC_5,    KC_6,    KC_7,    KC_8,    KC_9,    KC_0,    KC_BSPC],
        [KC_DEL,  KC_F1,   KC_F2,   KC_F3,   KC_F4,   KC_F5,   KC_F6,   KC_MINS, KC_EQL,  KC_LBRC, KC_RBRC, KC_BSLS],
        [_______, KC_F7,   KC_F8,   KC_F9,   KC_F10,  KC_F11,  KC_F12,  KC_NUHS, KC_NUBS, KC_PGUP, KC_PGDN, _______],
        [_______, _______, _______, _______, _______, _______, _______, _______, KC_MNXT, KC_VOLD, KC_VOLU, KC_MPLY],
    ],

    /* Bépo
     * ,-----------------------------------------------------------------------------------.
     * |   W  |   B  |   É  |   P  |   O  |   È  |   !  |   V  |   D  |   L  |   J  |  Z   |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * |  Esc |   A  |   U  |   I  |   E  |   ;  |   C  |   T  |   S  |   R  |   N  |  M   |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * |Shift |   À  |   Y  |   X  |   .  |   K  |   ?  |   Q  |   G  |   H  |   F  |Shift |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * | Ctrl |   $  | Alt  | GUI  |Lower | Bksp |Space |Raise |AltGr | Bksp |   %  |Enter |
     * `-----------------------------------------------------------------------------------'
     */
    [
        [BP_W,    BP_B,      BP_ECUT, BP_P,    BP_O,     BP_EGRV, BP_EXLM, BP_V,     BP_D,    BP_L,    BP_J,    BP_Z   ],
        [KC_ESC,  BP_A,      BP_U,    BP_I,    BP_E,     BP_SCLN, BP_C,    BP_T,     BP_S,    BP_R,    BP_N,    BP_M   ],
        [KC_LSFT, BP_AGRV,   BP_Y,    BP_X,    BP_DOT,   BP_K,    BP_QEST, BP_Q,     BP_G,    BP_H,    BP_F,    KC_LSFT],
        [KC_LCTL, BP_DOLLAR, KC_LALT, KC_LGUI, BP_LOWER, KC_BSPC, KC_SPC,  BP_RAISE, KC_RALT, KC_BSPC, BP_PERC, KC_ENT ],
    ],

    /* Bépo lower
     * ,-----------------------------------------------------------------------------------.
     * |   $  |   "  |   «  |   »  |  (   |  )   |   -  |   +  |   @  |   *  |   =  |   %  |
     * |------+------+------+------+------+-------------+------+------+------+------+------|
     * | Del  |      |      |      |      |      | Left | Down |  Up  |Right |      |      |
     * |------+------+------+------+------+------|------+------+------+------+------+------|
     * |      |      |      |      |      |      |      |      |      |      |      |      |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * |      |      |      |      |      | Del  |      |      |      |      |      |      |
     * `-----------------------------------------------------------------------------------'
     */
    [
        [BP_DLR,  BP_DQOT, BP_LGIL, BP_RGIL, BP_LPRN, BP_RPRN, BP_MINUS, BP_PLUS, BP_AT,   BP_ASTR, BP_EQL,  BP_PERC],
        [KC_DEL,  _______, _______, _______, _______, _______, KC_LEFT,  KC_DOWN, KC_UP,   KC_RGHT, _______, _______],
        [_______, _______, _______, _______, _______, _______, _______,  _______, _______, _______, _______, _______],
        [_______, _______, _______, _______, _______, KC_DEL,  _______,  _______, _______, _______, _______, _______],
    ],

    /* Bépo raise
     * ,-----------------------------------------------------------------------------------.
     * |   #  |   1  |   2  |   3  |   4  |   5  |   6  |   7  |   8  |   9  |   0  |  `   |
     * |------+------+------+------+------+-------------+------+------+------+------+------|
     * | Del  |   |  |      |   &  |   Œ  |      | Left | Down |  Up  |Right |   {  |  }   |
     * |------+------+------+------+------+------|------+------+------+------+------+------|
     * |      |   /  |  \   |   {  |   }  |      |      |      |      |      | End  |      |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * |      |      |      |      |      | Del  |      |      |      |      |      |      |
     * `-----------------------------------------------------------------------------------'
     */
    [
        [BP_HASH, BP_1,    BP_2,    BP_3,    BP_4,    BP_5,    BP_6,    BP_7,    BP_8,    BP_9,    BP_0,    BP_GRVB],
        [KC_DEL,  BP_PIPE, _______, BP_AMPR, BP_OE,   _______, KC_LEFT, KC_DOWN, KC_UP,   KC_RGHT, BP_LCBR, BP_RCBR],
        [_______, BP_SLSH, BP_BSLS, BP_LCBR, BP_RCBR, _______, _______, _______, _______, _______, KC_END,  _______],
        [_______, _______, _______, _______, _______, KC_DEL,  _______, _______, _______, _______, _______, _______],
    ],

    /* Adjust (Lower + Raise)
     * ,-----------------------------------------------------------------------------------.
     * |      | Reset|Debug |RGBtog|RGBmod| Hue+ | Hue- | Sat+ | Sat- |Brgth+|Brgth-| Del  |
     * |------+------+------+------+------+-------------+------+------+------+------+------|
     * |      |      |MusMod|Aud on|Audoff|AGnorm|AGswap|      |      |      |Qwerty| Bepo |
     * |------+------+------+------+------+------|------+------+------+------+------+------|
     * |      |Voice-|Voice+|Mus on|Musoff|MIDIon|MIDIof|TermOn|TermOf|      |      |      |
     * |------+------+------+------+------+------+------+------+------+------+------+------|
     * |      |      |      |      |      |             |      |      |      |      |      |
     * `-----------------------------------------------------------------------------------'
     */
    [
        [_______, RESET,   DEBUG,   RGB_TOG, RGB_MOD, RGB_HUI, RGB_HUD, RGB_SAI, RGB_SAD,  RGB_VAI, RGB_VAD, KC_DEL ],
        [_______, _______, MU_MOD,  AU_ON,   AU_OFF,  AG_NORM, AG_SWAP, _______, _______,  _______, QWERTY,  BEPO   ],
        [_______, MUV_DE,  MUV_IN,  MU_ON,   MU_OFF,  MI_ON,   MI_OFF,  TERM_ON, TERM_OFF, _______, _______, _______],
        [_______, _______, _______, _______, _______, _______, _______, _______, _______,  _______, _______, _______],
    ],
];

/// Result of a layer-stack lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Layer the keycode was taken from
    pub layer: Layer,
    pub keycode: Keycode,
}

/// Read-only view over a set of layer tables.
#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    layers: &'static [LayerGrid; LAYER_COUNT],
}

impl Default for Keymap {
    fn default() -> Self {
        Self::planck()
    }
}

impl Keymap {
    /// The compiled-in Planck keymap
    pub fn planck() -> Self {
        Self { layers: &KEYMAPS }
    }

    /// Wrap another set of tables
    pub fn new(layers: &'static [LayerGrid; LAYER_COUNT]) -> Self {
        Self { layers }
    }

    /// Table of a single layer
    pub fn layer(&self, layer: Layer) -> &'static LayerGrid {
        let layers: &'static [LayerGrid; LAYER_COUNT] = self.layers;
        &layers[layer.index()]
    }

    /// Keycode stored at a position on one layer.
    ///
    /// Positions outside the matrix read as `KC_NO`.
    pub fn keycode_at(&self, layer: Layer, pos: KeyPos) -> Keycode {
        self.layer(layer)
            .get(pos.row as usize)
            .and_then(|row| row.get(pos.col as usize))
            .copied()
            .unwrap_or(KC_NO)
    }

    /// Layer-stack lookup.
    ///
    /// Walks the layers active in `state` or `default_state` from the top;
    /// the first non-transparent keycode wins. With every candidate
    /// transparent the bottom layer's entry is returned as-is.
    pub fn resolve(&self, state: LayerState, default_state: LayerState, pos: KeyPos) -> Resolved {
        let combined = LayerState::from_bits(state.bits() | default_state.bits());
        for layer in combined.iter_active() {
            let keycode = self.keycode_at(layer, pos);
            if !keycode.is_transparent() {
                log::trace!("{} resolved on {} to {}", pos, layer, keycode);
                return Resolved { layer, keycode };
            }
        }
        Resolved {
            layer: Layer::Qwerty,
            keycode: self.keycode_at(Layer::Qwerty, pos),
        }
    }

    /// Every (layer, position) holding `keycode`
    pub fn positions_of(&self, keycode: Keycode) -> Vec<(Layer, KeyPos)> {
        let mut found = Vec::new();
        for layer in <Layer as strum::IntoEnumIterator>::iter() {
            for (row, keys) in self.layer(layer).iter().enumerate() {
                for (col, kc) in keys.iter().enumerate() {
                    if *kc == keycode {
                        found.push((layer, KeyPos::new(row as u8, col as u8)));
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_layer_is_4_by_12() {
        let keymap = Keymap::planck();
        for layer in Layer::iter() {
            let grid = keymap.layer(layer);
            assert_eq!(grid.len(), 4, "{} rows", layer);
            for row in grid {
                assert_eq!(row.len(), 12, "{} cols", layer);
            }
        }
    }

    #[test]
    fn test_layers_do_not_alias() {
        let keymap = Keymap::planck();
        let layers: Vec<Layer> = Layer::iter().collect();
        for (i, a) in layers.iter().enumerate() {
            for b in &layers[i + 1..] {
                assert!(!std::ptr::eq(keymap.layer(*a), keymap.layer(*b)));
                assert_ne!(keymap.layer(*a), keymap.layer(*b), "{} == {}", a, b);
            }
        }
    }

    #[test]
    fn test_base_layer_landmarks() {
        let keymap = Keymap::planck();
        assert_eq!(keymap.keycode_at(Layer::Qwerty, KeyPos::new(0, 0)), KC_ESC);
        assert_eq!(keymap.keycode_at(Layer::Qwerty, KeyPos::new(3, 4)), LOWER);
        assert_eq!(keymap.keycode_at(Layer::Qwerty, KeyPos::new(3, 7)), RAISE);
        assert_eq!(keymap.keycode_at(Layer::Bepo, KeyPos::new(0, 0)), BP_W);
        assert_eq!(keymap.keycode_at(Layer::Bepo, KeyPos::new(3, 4)), BP_LOWER);
        assert_eq!(keymap.keycode_at(Layer::Bepo, KeyPos::new(3, 7)), BP_RAISE);
        assert_eq!(keymap.keycode_at(Layer::Adjust, KeyPos::new(1, 10)), QWERTY);
        assert_eq!(keymap.keycode_at(Layer::Adjust, KeyPos::new(1, 11)), BEPO);
    }

    #[test]
    fn test_bepo_modifier_tables_are_not_swapped() {
        let keymap = Keymap::planck();
        assert_eq!(keymap.keycode_at(Layer::BpLower, KeyPos::new(0, 0)), BP_DLR);
        assert_eq!(keymap.keycode_at(Layer::BpRaise, KeyPos::new(0, 0)), BP_HASH);
    }

    #[test]
    fn test_keycode_at_out_of_matrix() {
        let keymap = Keymap::planck();
        assert_eq!(keymap.keycode_at(Layer::Qwerty, KeyPos::new(4, 0)), KC_NO);
        assert_eq!(keymap.keycode_at(Layer::Qwerty, KeyPos::new(0, 12)), KC_NO);
    }

    #[test]
    fn test_resolve_falls_through_transparent() {
        let keymap = Keymap::planck();
        let default = LayerState::only(Layer::Qwerty);
        let state = LayerState::only(Layer::Lower);

        // Lower row 3 col 0 is transparent, Qwerty has Ctrl there
        let resolved = keymap.resolve(state, default, KeyPos::new(3, 0));
        assert_eq!(resolved, Resolved { layer: Layer::Qwerty, keycode: KC_LCTL });

        let resolved = keymap.resolve(state, default, KeyPos::new(0, 0));
        assert_eq!(resolved, Resolved { layer: Layer::Lower, keycode: KC_TILD });
    }

    #[test]
    fn test_resolve_topmost_wins() {
        let keymap = Keymap::planck();
        let state: LayerState = [Layer::Lower, Layer::Raise, Layer::Adjust].into_iter().collect();
        let resolved = keymap.resolve(state, LayerState::only(Layer::Qwerty), KeyPos::new(0, 1));
        assert_eq!(resolved.layer, Layer::Adjust);
        assert_eq!(resolved.keycode, RESET);

        // Adjust is transparent at 0,0, Raise sits above Lower
        let resolved = keymap.resolve(state, LayerState::only(Layer::Qwerty), KeyPos::new(0, 0));
        assert_eq!(resolved.layer, Layer::Raise);
        assert_eq!(resolved.keycode, KC_GRV);
    }

    #[test]
    fn test_positions_of() {
        let keymap = Keymap::planck();
        assert_eq!(keymap.positions_of(QWERTY), vec![(Layer::Adjust, KeyPos::new(1, 10))]);
        assert_eq!(keymap.positions_of(LOWER), vec![(Layer::Qwerty, KeyPos::new(3, 4))]);
        assert_eq!(keymap.positions_of(RAISE), vec![(Layer::Qwerty, KeyPos::new(3, 7))]);
    }
}
