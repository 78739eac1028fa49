// Planckrs BÉPO aliases
// Keycodes as seen by a host configured with the French BÉPO layout

use std::sync::OnceLock;

use crate::keycode::*;

// Number row
pub const BP_DOLLAR: Keycode = KC_GRV;
pub const BP_DLR: Keycode = BP_DOLLAR;
pub const BP_DQOT: Keycode = KC_1;
pub const BP_LGIL: Keycode = KC_2;
pub const BP_RGIL: Keycode = KC_3;
pub const BP_LPRN: Keycode = KC_4;
pub const BP_RPRN: Keycode = KC_5;
pub const BP_AT: Keycode = KC_6;
pub const BP_PLUS: Keycode = KC_7;
pub const BP_MINUS: Keycode = KC_8;
pub const BP_SLSH: Keycode = KC_9;
pub const BP_ASTR: Keycode = KC_0;
pub const BP_EQL: Keycode = KC_MINS;
pub const BP_PERC: Keycode = KC_EQL;

// Top row
pub const BP_B: Keycode = KC_Q;
pub const BP_ECUT: Keycode = KC_W;
pub const BP_P: Keycode = KC_E;
pub const BP_O: Keycode = KC_R;
pub const BP_EGRV: Keycode = KC_T;
pub const BP_DCRC: Keycode = KC_Y;
pub const BP_V: Keycode = KC_U;
pub const BP_D: Keycode = KC_I;
pub const BP_L: Keycode = KC_O;
pub const BP_J: Keycode = KC_P;
pub const BP_Z: Keycode = KC_LBRC;
pub const BP_W: Keycode = KC_RBRC;

// Home row
pub const BP_A: Keycode = KC_A;
pub const BP_U: Keycode = KC_S;
pub const BP_I: Keycode = KC_D;
pub const BP_E: Keycode = KC_F;
pub const BP_COMM: Keycode = KC_G;
pub const BP_C: Keycode = KC_H;
pub const BP_T: Keycode = KC_J;
pub const BP_S: Keycode = KC_K;
pub const BP_R: Keycode = KC_L;
pub const BP_N: Keycode = KC_SCLN;
pub const BP_M: Keycode = KC_QUOT;
pub const BP_CCED: Keycode = KC_BSLS;

// Bottom row
pub const BP_ECRC: Keycode = KC_NUBS;
pub const BP_AGRV: Keycode = KC_Z;
pub const BP_Y: Keycode = KC_X;
pub const BP_X: Keycode = KC_C;
pub const BP_DOT: Keycode = KC_V;
pub const BP_K: Keycode = KC_B;
pub const BP_APOS: Keycode = KC_N;
pub const BP_Q: Keycode = KC_M;
pub const BP_G: Keycode = KC_COMM;
pub const BP_H: Keycode = KC_DOT;
pub const BP_F: Keycode = KC_SLSH;

// Shifted
pub const BP_HASH: Keycode = shift(BP_DOLLAR);
pub const BP_1: Keycode = shift(BP_DQOT);
pub const BP_2: Keycode = shift(BP_LGIL);
pub const BP_3: Keycode = shift(BP_RGIL);
pub const BP_4: Keycode = shift(BP_LPRN);
pub const BP_5: Keycode = shift(BP_RPRN);
pub const BP_6: Keycode = shift(BP_AT);
pub const BP_7: Keycode = shift(BP_PLUS);
pub const BP_8: Keycode = shift(BP_MINUS);
pub const BP_9: Keycode = shift(BP_SLSH);
pub const BP_0: Keycode = shift(BP_ASTR);
pub const BP_EXLM: Keycode = shift(BP_DCRC);
pub const BP_SCLN: Keycode = shift(BP_COMM);
pub const BP_COLN: Keycode = shift(BP_DOT);
pub const BP_QEST: Keycode = shift(BP_APOS);

// AltGr
pub const BP_PIPE: Keycode = algr(BP_B);
pub const BP_AMPR: Keycode = algr(BP_P);
pub const BP_OE: Keycode = algr(BP_O);
pub const BP_GRVB: Keycode = algr(BP_EGRV);
pub const BP_BSLS: Keycode = algr(BP_AGRV);
pub const BP_LCBR: Keycode = algr(BP_Y);
pub const BP_RCBR: Keycode = algr(BP_X);

fn bepo_names() -> &'static [(&'static str, Keycode)] {
    static NAMES: OnceLock<Vec<(&'static str, Keycode)>> = OnceLock::new();
    NAMES.get_or_init(|| {
        vec![
            ("BP_DOLLAR", BP_DOLLAR),
            ("BP_DLR", BP_DLR),
            ("BP_DQOT", BP_DQOT),
            ("BP_LGIL", BP_LGIL),
            ("BP_RGIL", BP_RGIL),
            ("BP_LPRN", BP_LPRN),
            ("BP_RPRN", BP_RPRN),
            ("BP_AT", BP_AT),
            ("BP_PLUS", BP_PLUS),
            ("BP_MINUS", BP_MINUS),
            ("BP_SLSH", BP_SLSH),
            ("BP_ASTR", BP_ASTR),
            ("BP_EQL", BP_EQL),
            ("BP_PERC", BP_PERC),
            ("BP_B", BP_B),
            ("BP_ECUT", BP_ECUT),
            ("BP_P", BP_P),
            ("BP_O", BP_O),
            ("BP_EGRV", BP_EGRV),
            ("BP_DCRC", BP_DCRC),
            ("BP_V", BP_V),
            ("BP_D", BP_D),
            ("BP_L", BP_L),
            ("BP_J", BP_J),
            ("BP_Z", BP_Z),
            ("BP_W", BP_W),
            ("BP_A", BP_A),
            ("BP_U", BP_U),
            ("BP_I", BP_I),
            ("BP_E", BP_E),
            ("BP_COMM", BP_COMM),
            ("BP_C", BP_C),
            ("BP_T", BP_T),
            ("BP_S", BP_S),
            ("BP_R", BP_R),
            ("BP_N", BP_N),
            ("BP_M", BP_M),
            ("BP_CCED", BP_CCED),
            ("BP_ECRC", BP_ECRC),
            ("BP_AGRV", BP_AGRV),
            ("BP_Y", BP_Y),
            ("BP_X", BP_X),
            ("BP_DOT", BP_DOT),
            ("BP_K", BP_K),
            ("BP_APOS", BP_APOS),
            ("BP_Q", BP_Q),
            ("BP_G", BP_G),
            ("BP_H", BP_H),
            ("BP_F", BP_F),
            ("BP_HASH", BP_HASH),
            ("BP_1", BP_1),
            ("BP_2", BP_2),
            ("BP_3", BP_3),
            ("BP_4", BP_4),
            ("BP_5", BP_5),
            ("BP_6", BP_6),
            ("BP_7", BP_7),
            ("BP_8", BP_8),
            ("BP_9", BP_9),
            ("BP_0", BP_0),
            ("BP_EXLM", BP_EXLM),
            ("BP_SCLN", BP_SCLN),
            ("BP_COLN", BP_COLN),
            ("BP_QEST", BP_QEST),
            ("BP_PIPE", BP_PIPE),
            ("BP_AMPR", BP_AMPR),
            ("BP_OE", BP_OE),
            ("BP_GRVB", BP_GRVB),
            ("BP_BSLS", BP_BSLS),
            ("BP_LCBR", BP_LCBR),
            ("BP_RCBR", BP_RCBR),
        ]
    })
}

/// BÉPO alias for a keycode, if it has one
pub fn bepo_name(kc: Keycode) -> Option<&'static str> {
    bepo_names()
        .iter()
        .find(|(_, code)| *code == kc)
        .map(|(name, _)| *name)
}

/// Keycode for a `BP_*` alias (expects an upper-case name)
pub fn bepo_from_name(name: &str) -> Option<Keycode> {
    bepo_names()
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, kc)| *kc)
}
