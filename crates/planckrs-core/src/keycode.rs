// Planckrs Keycode Type
// 16-bit firmware keycodes: HID usages, modifier wraps, layer actions, quantum functions

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::callbacks::{BEPO, QWERTY};
use crate::Layer;

/// A 16-bit firmware keycode.
///
/// The low byte of a basic keycode is its HID usage id; the high byte
/// carries modifier wrapping, layer actions and quantum functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Keycode(pub u16);

impl From<u16> for Keycode {
    fn from(code: u16) -> Self {
        Keycode(code)
    }
}

impl From<Keycode> for u16 {
    fn from(keycode: Keycode) -> Self {
        keycode.0
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&keycode_name(*self))
    }
}

impl FromStr for Keycode {
    type Err = KeycodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        keycode_from_name(s).ok_or_else(|| KeycodeError::Unknown(s.to_string()))
    }
}

/// Errors that can occur when naming keycodes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeycodeError {
    #[error("unknown keycode: {0}")]
    Unknown(String),
}

// Basic keycodes (HID keyboard page usages)
pub const KC_NO: Keycode = Keycode(0x00);
/// Defers to the next active layer below.
pub const KC_TRNS: Keycode = Keycode(0x01);

pub const KC_A: Keycode = Keycode(0x04);
pub const KC_B: Keycode = Keycode(0x05);
pub const KC_C: Keycode = Keycode(0x06);
pub const KC_D: Keycode = Keycode(0x07);
pub const KC_E: Keycode = Keycode(0x08);
pub const KC_F: Keycode = Keycode(0x09);
pub const KC_G: Keycode = Keycode(0x0A);
pub const KC_H: Keycode = Keycode(0x0B);
pub const KC_I: Keycode = Keycode(0x0C);
pub const KC_J: Keycode = Keycode(0x0D);
pub const KC_K: Keycode = Keycode(0x0E);
pub const KC_L: Keycode = Keycode(0x0F);
pub const KC_M: Keycode = Keycode(0x10);
pub const KC_N: Keycode = Keycode(0x11);
pub const KC_O: Keycode = Keycode(0x12);
pub const KC_P: Keycode = Keycode(0x13);
pub const KC_Q: Keycode = Keycode(0x14);
pub const KC_R: Keycode = Keycode(0x15);
pub const KC_S: Keycode = Keycode(0x16);
pub const KC_T: Keycode = Keycode(0x17);
pub const KC_U: Keycode = Keycode(0x18);
pub const KC_V: Keycode = Keycode(0x19);
pub const KC_W: Keycode = Keycode(0x1A);
pub const KC_X: Keycode = Keycode(0x1B);
pub const KC_Y: Keycode = Keycode(0x1C);
pub const KC_Z: Keycode = Keycode(0x1D);
pub const KC_1: Keycode = Keycode(0x1E);
pub const KC_2: Keycode = Keycode(0x1F);
pub const KC_3: Keycode = Keycode(0x20);
pub const KC_4: Keycode = Keycode(0x21);
pub const KC_5: Keycode = Keycode(0x22);
pub const KC_6: Keycode = Keycode(0x23);
pub const KC_7: Keycode = Keycode(0x24);
pub const KC_8: Keycode = Keycode(0x25);
pub const KC_9: Keycode = Keycode(0x26);
pub const KC_0: Keycode = Keycode(0x27);
pub const KC_ENT: Keycode = Keycode(0x28);
pub const KC_ESC: Keycode = Keycode(0x29);
pub const KC_BSPC: Keycode = Keycode(0x2A);
pub const KC_TAB: Keycode = Keycode(0x2B);
pub const KC_SPC: Keycode = Keycode(0x2C);
pub const KC_MINS: Keycode = Keycode(0x2D);
pub const KC_EQL: Keycode = Keycode(0x2E);
pub const KC_LBRC: Keycode = Keycode(0x2F);
pub const KC_RBRC: Keycode = Keycode(0x30);
pub const KC_BSLS: Keycode = Keycode(0x31);
pub const KC_NUHS: Keycode = Keycode(0x32);
pub const KC_SCLN: Keycode = Keycode(0x33);
pub const KC_QUOT: Keycode = Keycode(0x34);
pub const KC_GRV: Keycode = Keycode(0x35);
pub const KC_COMM: Keycode = Keycode(0x36);
pub const KC_DOT: Keycode = Keycode(0x37);
pub const KC_SLSH: Keycode = Keycode(0x38);
pub const KC_F1: Keycode = Keycode(0x3A);
pub const KC_F2: Keycode = Keycode(0x3B);
pub const KC_F3: Keycode = Keycode(0x3C);
pub const KC_F4: Keycode = Keycode(0x3D);
pub const KC_F5: Keycode = Keycode(0x3E);
pub const KC_F6: Keycode = Keycode(0x3F);
pub const KC_F7: Keycode = Keycode(0x40);
pub const KC_F8: Keycode = Keycode(0x41);
pub const KC_F9: Keycode = Keycode(0x42);
pub const KC_F10: Keycode = Keycode(0x43);
pub const KC_F11: Keycode = Keycode(0x44);
pub const KC_F12: Keycode = Keycode(0x45);
pub const KC_HOME: Keycode = Keycode(0x4A);
pub const KC_PGUP: Keycode = Keycode(0x4B);
pub const KC_DEL: Keycode = Keycode(0x4C);
pub const KC_END: Keycode = Keycode(0x4D);
pub const KC_PGDN: Keycode = Keycode(0x4E);
pub const KC_RGHT: Keycode = Keycode(0x4F);
pub const KC_LEFT: Keycode = Keycode(0x50);
pub const KC_DOWN: Keycode = Keycode(0x51);
pub const KC_UP: Keycode = Keycode(0x52);
pub const KC_NUBS: Keycode = Keycode(0x64);

// Media keys
pub const KC_MUTE: Keycode = Keycode(0xA8);
pub const KC_VOLU: Keycode = Keycode(0xA9);
pub const KC_VOLD: Keycode = Keycode(0xAA);
pub const KC_MNXT: Keycode = Keycode(0xAB);
pub const KC_MPRV: Keycode = Keycode(0xAC);
pub const KC_MSTP: Keycode = Keycode(0xAD);
pub const KC_MPLY: Keycode = Keycode(0xAE);

// Modifiers
pub const KC_LCTL: Keycode = Keycode(0xE0);
pub const KC_LSFT: Keycode = Keycode(0xE1);
pub const KC_LALT: Keycode = Keycode(0xE2);
pub const KC_LGUI: Keycode = Keycode(0xE3);
pub const KC_RCTL: Keycode = Keycode(0xE4);
pub const KC_RSFT: Keycode = Keycode(0xE5);
pub const KC_RALT: Keycode = Keycode(0xE6);
pub const KC_RGUI: Keycode = Keycode(0xE7);

/// Highest basic keycode; everything above is a wrapped or special code.
pub const BASIC_MAX: u16 = 0xFF;

// Modifier wrap bits
pub const QK_LSFT: u16 = 0x0200;
pub const QK_RALT: u16 = 0x1400;
const QK_MODS_MASK: u16 = 0x1F00;
const QK_MODS_MAX: u16 = 0x1FFF;

/// Momentary layer action range: `MO(n)` is `QK_MOMENTARY | n`.
pub const QK_MOMENTARY: u16 = 0x5100;
const QK_MOMENTARY_MAX: u16 = 0x51FF;

/// Wrap a basic keycode with left shift.
pub const fn shift(kc: Keycode) -> Keycode {
    Keycode(QK_LSFT | kc.0)
}

/// Wrap a basic keycode with right alt (AltGr).
pub const fn algr(kc: Keycode) -> Keycode {
    Keycode(QK_RALT | kc.0)
}

/// Momentarily activate `layer` while the key is held.
pub const fn mo(layer: Layer) -> Keycode {
    Keycode(QK_MOMENTARY | layer as u16)
}

// Shifted US symbols
pub const KC_TILD: Keycode = shift(KC_GRV);
pub const KC_EXLM: Keycode = shift(KC_1);
pub const KC_AT: Keycode = shift(KC_2);
pub const KC_HASH: Keycode = shift(KC_3);
pub const KC_DLR: Keycode = shift(KC_4);
pub const KC_PERC: Keycode = shift(KC_5);
pub const KC_CIRC: Keycode = shift(KC_6);
pub const KC_AMPR: Keycode = shift(KC_7);
pub const KC_ASTR: Keycode = shift(KC_8);
pub const KC_LPRN: Keycode = shift(KC_9);
pub const KC_RPRN: Keycode = shift(KC_0);
pub const KC_UNDS: Keycode = shift(KC_MINS);
pub const KC_PLUS: Keycode = shift(KC_EQL);
pub const KC_LCBR: Keycode = shift(KC_LBRC);
pub const KC_RCBR: Keycode = shift(KC_RBRC);
pub const KC_PIPE: Keycode = shift(KC_BSLS);

// Quantum functions. Opaque here; the host firmware owns their subsystems.
pub const QK_QUANTUM: u16 = 0x5C00;
pub const RESET: Keycode = Keycode(QK_QUANTUM);
pub const DEBUG: Keycode = Keycode(QK_QUANTUM + 0x01);
pub const AG_SWAP: Keycode = Keycode(QK_QUANTUM + 0x02);
pub const AG_NORM: Keycode = Keycode(QK_QUANTUM + 0x03);
pub const AU_ON: Keycode = Keycode(QK_QUANTUM + 0x10);
pub const AU_OFF: Keycode = Keycode(QK_QUANTUM + 0x11);
pub const MU_ON: Keycode = Keycode(QK_QUANTUM + 0x14);
pub const MU_OFF: Keycode = Keycode(QK_QUANTUM + 0x15);
pub const MU_TOG: Keycode = Keycode(QK_QUANTUM + 0x16);
pub const MU_MOD: Keycode = Keycode(QK_QUANTUM + 0x17);
pub const MUV_IN: Keycode = Keycode(QK_QUANTUM + 0x18);
pub const MUV_DE: Keycode = Keycode(QK_QUANTUM + 0x19);
pub const MI_ON: Keycode = Keycode(QK_QUANTUM + 0x20);
pub const MI_OFF: Keycode = Keycode(QK_QUANTUM + 0x21);
pub const TERM_ON: Keycode = Keycode(QK_QUANTUM + 0x30);
pub const TERM_OFF: Keycode = Keycode(QK_QUANTUM + 0x31);
pub const RGB_TOG: Keycode = Keycode(QK_QUANTUM + 0x40);
pub const RGB_MOD: Keycode = Keycode(QK_QUANTUM + 0x41);
pub const RGB_HUI: Keycode = Keycode(QK_QUANTUM + 0x42);
pub const RGB_HUD: Keycode = Keycode(QK_QUANTUM + 0x43);
pub const RGB_SAI: Keycode = Keycode(QK_QUANTUM + 0x44);
pub const RGB_SAD: Keycode = Keycode(QK_QUANTUM + 0x45);
pub const RGB_VAI: Keycode = Keycode(QK_QUANTUM + 0x46);
pub const RGB_VAD: Keycode = Keycode(QK_QUANTUM + 0x47);
const QK_QUANTUM_MAX: u16 = 0x5CFF;

/// First keycode available to keymap-defined custom codes.
pub const SAFE_RANGE: u16 = 0x5D00;

impl Keycode {
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Display name, as used by the keymap tables
    pub fn name(self) -> String {
        keycode_name(self)
    }

    /// True for the transparent sentinel.
    pub const fn is_transparent(self) -> bool {
        self.0 == KC_TRNS.0
    }

    /// True for a plain HID usage, without modifier wrapping.
    pub const fn is_basic(self) -> bool {
        self.0 > KC_TRNS.0 && self.0 <= BASIC_MAX
    }

    /// Modifier bits carried by a wrapped code (`S()`, `ALGR()`, ...).
    pub const fn wrapped_mods(self) -> u16 {
        if self.0 > BASIC_MAX && self.0 <= QK_MODS_MAX {
            self.0 & QK_MODS_MASK
        } else {
            0
        }
    }

    /// The HID usage a basic or modifier-wrapped code reports.
    pub const fn base(self) -> Option<Keycode> {
        if self.0 <= QK_MODS_MAX && self.0 > KC_TRNS.0 {
            Some(Keycode(self.0 & BASIC_MAX))
        } else {
            None
        }
    }

    /// Target layer index of a momentary layer code.
    pub const fn momentary_layer(self) -> Option<u8> {
        if self.0 >= QK_MOMENTARY && self.0 <= QK_MOMENTARY_MAX {
            Some((self.0 & 0xFF) as u8)
        } else {
            None
        }
    }

    /// True for quantum maintenance functions (reset, audio, RGB, ...).
    pub const fn is_quantum(self) -> bool {
        self.0 >= QK_QUANTUM && self.0 <= QK_QUANTUM_MAX
    }

    /// True for codes allocated by the keymap itself.
    pub const fn is_custom(self) -> bool {
        self.0 >= SAFE_RANGE
    }
}

/// Named keycodes, first name wins when displaying.
fn named_keycodes() -> &'static [(&'static str, Keycode)] {
    static NAMES: OnceLock<Vec<(&'static str, Keycode)>> = OnceLock::new();
    NAMES.get_or_init(|| {
        vec![
            ("KC_NO", KC_NO),
            ("KC_TRNS", KC_TRNS),
            ("_______", KC_TRNS),
            ("KC_A", KC_A),
            ("KC_B", KC_B),
            ("KC_C", KC_C),
            ("KC_D", KC_D),
            ("KC_E", KC_E),
            ("KC_F", KC_F),
            ("KC_G", KC_G),
            ("KC_H", KC_H),
            ("KC_I", KC_I),
            ("KC_J", KC_J),
            ("KC_K", KC_K),
            ("KC_L", KC_L),
            ("KC_M", KC_M),
            ("KC_N", KC_N),
            ("KC_O", KC_O),
            ("KC_P", KC_P),
            ("KC_Q", KC_Q),
            ("KC_R", KC_R),
            ("KC_S", KC_S),
            ("KC_T", KC_T),
            ("KC_U", KC_U),
            ("KC_V", KC_V),
            ("KC_W", KC_W),
            ("KC_X", KC_X),
            ("KC_Y", KC_Y),
            ("KC_Z", KC_Z),
            ("KC_1", KC_1),
            ("KC_2", KC_2),
            ("KC_3", KC_3),
            ("KC_4", KC_4),
            ("KC_5", KC_5),
            ("KC_6", KC_6),
            ("KC_7", KC_7),
            ("KC_8", KC_8),
            ("KC_9", KC_9),
            ("KC_0", KC_0),
            ("KC_ENT", KC_ENT),
            ("KC_ENTER", KC_ENT),
            ("KC_ESC", KC_ESC),
            ("KC_ESCAPE", KC_ESC),
            ("KC_BSPC", KC_BSPC),
            ("KC_TAB", KC_TAB),
            ("KC_SPC", KC_SPC),
            ("KC_SPACE", KC_SPC),
            ("KC_MINS", KC_MINS),
            ("KC_EQL", KC_EQL),
            ("KC_LBRC", KC_LBRC),
            ("KC_RBRC", KC_RBRC),
            ("KC_BSLS", KC_BSLS),
            ("KC_NUHS", KC_NUHS),
            ("KC_SCLN", KC_SCLN),
            ("KC_QUOT", KC_QUOT),
            ("KC_GRV", KC_GRV),
            ("KC_COMM", KC_COMM),
            ("KC_DOT", KC_DOT),
            ("KC_SLSH", KC_SLSH),
            ("KC_F1", KC_F1),
            ("KC_F2", KC_F2),
            ("KC_F3", KC_F3),
            ("KC_F4", KC_F4),
            ("KC_F5", KC_F5),
            ("KC_F6", KC_F6),
            ("KC_F7", KC_F7),
            ("KC_F8", KC_F8),
            ("KC_F9", KC_F9),
            ("KC_F10", KC_F10),
            ("KC_F11", KC_F11),
            ("KC_F12", KC_F12),
            ("KC_HOME", KC_HOME),
            ("KC_PGUP", KC_PGUP),
            ("KC_DEL", KC_DEL),
            ("KC_END", KC_END),
            ("KC_PGDN", KC_PGDN),
            ("KC_RGHT", KC_RGHT),
            ("KC_LEFT", KC_LEFT),
            ("KC_DOWN", KC_DOWN),
            ("KC_UP", KC_UP),
            ("KC_NUBS", KC_NUBS),
            ("KC_MUTE", KC_MUTE),
            ("KC_VOLU", KC_VOLU),
            ("KC_VOLD", KC_VOLD),
            ("KC_MNXT", KC_MNXT),
            ("KC_MPRV", KC_MPRV),
            ("KC_MSTP", KC_MSTP),
            ("KC_MPLY", KC_MPLY),
            ("KC_LCTL", KC_LCTL),
            ("KC_LSFT", KC_LSFT),
            ("KC_LALT", KC_LALT),
            ("KC_LGUI", KC_LGUI),
            ("KC_RCTL", KC_RCTL),
            ("KC_RSFT", KC_RSFT),
            ("KC_RALT", KC_RALT),
            ("KC_RGUI", KC_RGUI),
            ("KC_TILD", KC_TILD),
            ("KC_EXLM", KC_EXLM),
            ("KC_AT", KC_AT),
            ("KC_HASH", KC_HASH),
            ("KC_DLR", KC_DLR),
            ("KC_PERC", KC_PERC),
            ("KC_CIRC", KC_CIRC),
            ("KC_AMPR", KC_AMPR),
            ("KC_ASTR", KC_ASTR),
            ("KC_LPRN", KC_LPRN),
            ("KC_RPRN", KC_RPRN),
            ("KC_UNDS", KC_UNDS),
            ("KC_PLUS", KC_PLUS),
            ("KC_LCBR", KC_LCBR),
            ("KC_RCBR", KC_RCBR),
            ("KC_PIPE", KC_PIPE),
            ("RESET", RESET),
            ("DEBUG", DEBUG),
            ("AG_SWAP", AG_SWAP),
            ("AG_NORM", AG_NORM),
            ("AU_ON", AU_ON),
            ("AU_OFF", AU_OFF),
            ("MU_ON", MU_ON),
            ("MU_OFF", MU_OFF),
            ("MU_TOG", MU_TOG),
            ("MU_MOD", MU_MOD),
            ("MUV_IN", MUV_IN),
            ("MUV_DE", MUV_DE),
            ("MI_ON", MI_ON),
            ("MI_OFF", MI_OFF),
            ("TERM_ON", TERM_ON),
            ("TERM_OFF", TERM_OFF),
            ("RGB_TOG", RGB_TOG),
            ("RGB_MOD", RGB_MOD),
            ("RGB_HUI", RGB_HUI),
            ("RGB_HUD", RGB_HUD),
            ("RGB_SAI", RGB_SAI),
            ("RGB_SAD", RGB_SAD),
            ("RGB_VAI", RGB_VAI),
            ("RGB_VAD", RGB_VAD),
            ("QWERTY", QWERTY),
            ("BEPO", BEPO),
        ]
    })
}

/// Display name for a keycode
pub fn keycode_name(kc: Keycode) -> String {
    if let Some((name, _)) = named_keycodes().iter().find(|(_, code)| *code == kc) {
        return (*name).to_string();
    }
    if let Some(index) = kc.momentary_layer() {
        return match Layer::from_index(index) {
            Ok(layer) => format!("MO({})", layer),
            Err(_) => format!("MO({})", index),
        };
    }
    let mods = kc.wrapped_mods();
    if let Some(base) = kc.base().filter(|_| mods != 0) {
        let base_name = keycode_name(base);
        return match mods {
            QK_LSFT => format!("S({})", base_name),
            QK_RALT => format!("ALGR({})", base_name),
            _ => format!("MODS(0x{:02X}, {})", mods >> 8, base_name),
        };
    }
    if kc.is_custom() {
        return format!("USER({})", kc.0 - SAFE_RANGE);
    }
    format!("0x{:04X}", kc.0)
}

/// Try to parse a keycode name
///
/// Accepts the `KC_*` and quantum names, the `BP_*` aliases, and the
/// `S(..)`, `ALGR(..)` and `MO(..)` wrappers.
pub fn keycode_from_name(name: &str) -> Option<Keycode> {
    let name = name.trim();
    let upper = name.to_uppercase();

    if let Some(inner) = strip_call(&upper, "S") {
        return keycode_from_name(inner).filter(|kc| kc.is_basic()).map(shift);
    }
    if let Some(inner) = strip_call(&upper, "ALGR") {
        return keycode_from_name(inner).filter(|kc| kc.is_basic()).map(algr);
    }
    if let Some(inner) = strip_call(&upper, "MO") {
        return inner.parse::<Layer>().ok().map(mo);
    }

    if let Some((_, kc)) = named_keycodes().iter().find(|(n, _)| *n == upper) {
        return Some(*kc);
    }
    if let Some(kc) = crate::bepo::bepo_from_name(&upper) {
        return Some(kc);
    }
    // Bare key names without the KC_ prefix
    let prefixed = format!("KC_{}", upper);
    named_keycodes()
        .iter()
        .find(|(n, _)| *n == prefixed)
        .map(|(_, kc)| *kc)
}

fn strip_call<'a>(s: &'a str, func: &str) -> Option<&'a str> {
    s.strip_prefix(func)?.strip_prefix('(')?.strip_suffix(')')
}
