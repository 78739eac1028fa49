// Planckrs Keymap Validation
// Lints the layer tables for mistakes the type system cannot catch

use strum::IntoEnumIterator;

use crate::action::KeyPos;
use crate::callbacks::{BEPO, QWERTY};
use crate::keycode::Keycode;
use crate::keymap::Keymap;
use crate::layer::{Layer, LAYER_COUNT};

/// Problems found in a keymap
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeymapError {
    #[error("transparent key on base layer {layer} at {pos}")]
    TransparentOnBase { layer: Layer, pos: KeyPos },

    #[error("{keycode} on {layer} at {pos} targets layer {target}, only {count} exist", count = LAYER_COUNT)]
    UnknownLayerTarget {
        layer: Layer,
        pos: KeyPos,
        keycode: Keycode,
        target: u8,
    },

    #[error("layer {0} has no momentary key on a base layer")]
    UnreachableLayer(Layer),

    #[error("layout switch {0} is missing from {adjust}", adjust = Layer::Adjust)]
    MissingLayoutSwitch(Keycode),

    #[error("custom keycode {keycode} on {layer} at {pos} has no handler")]
    UnhandledCustom {
        layer: Layer,
        pos: KeyPos,
        keycode: Keycode,
    },
}

/// Check a keymap, returning every finding.
///
/// Row and column counts are fixed by the table type and need no check.
pub fn validate(keymap: &Keymap) -> Vec<KeymapError> {
    let mut errors = Vec::new();

    for layer in Layer::iter() {
        for (row, keys) in keymap.layer(layer).iter().enumerate() {
            for (col, &keycode) in keys.iter().enumerate() {
                let pos = KeyPos::new(row as u8, col as u8);

                if layer.is_base() && keycode.is_transparent() {
                    errors.push(KeymapError::TransparentOnBase { layer, pos });
                }

                if let Some(target) = keycode.momentary_layer() {
                    if Layer::from_index(target).is_err() {
                        errors.push(KeymapError::UnknownLayerTarget {
                            layer,
                            pos,
                            keycode,
                            target,
                        });
                    }
                }

                if keycode.is_custom() && keycode != QWERTY && keycode != BEPO {
                    errors.push(KeymapError::UnhandledCustom { layer, pos, keycode });
                }
            }
        }
    }

    // ADJUST is composed, never held directly
    for layer in Layer::iter().filter(|l| !l.is_base() && *l != Layer::Adjust) {
        let reachable = Layer::iter().filter(|l| l.is_base()).any(|base| {
            keymap
                .layer(base)
                .iter()
                .flatten()
                .any(|kc| kc.momentary_layer() == Some(layer as u8))
        });
        if !reachable {
            errors.push(KeymapError::UnreachableLayer(layer));
        }
    }

    for switch in [QWERTY, BEPO] {
        if !keymap.layer(Layer::Adjust).iter().flatten().any(|kc| *kc == switch) {
            errors.push(KeymapError::MissingLayoutSwitch(switch));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::{mo, KC_A, KC_TRNS, SAFE_RANGE};
    use crate::keymap::{LayerGrid, KEYMAPS};

    fn leaked(layers: [LayerGrid; LAYER_COUNT]) -> Keymap {
        Keymap::new(Box::leak(Box::new(layers)))
    }

    #[test]
    fn test_planck_keymap_is_clean() {
        assert_eq!(validate(&Keymap::planck()), vec![]);
    }

    #[test]
    fn test_transparent_on_base() {
        let mut layers = KEYMAPS;
        layers[Layer::Bepo.index()][2][5] = KC_TRNS;
        assert_eq!(
            validate(&leaked(layers)),
            vec![KeymapError::TransparentOnBase {
                layer: Layer::Bepo,
                pos: KeyPos::new(2, 5)
            }]
        );
    }

    #[test]
    fn test_unreachable_layer_and_missing_switch() {
        let mut layers = KEYMAPS;
        layers[Layer::Qwerty.index()][3][7] = KC_A;
        layers[Layer::Adjust.index()][1][11] = KC_TRNS;
        let errors = validate(&leaked(layers));
        assert_eq!(
            errors,
            vec![
                KeymapError::UnreachableLayer(Layer::Raise),
                KeymapError::MissingLayoutSwitch(BEPO),
            ]
        );
    }

    #[test]
    fn test_bad_target_and_custom_code() {
        let mut layers = KEYMAPS;
        let bogus = Keycode(mo(Layer::Qwerty).code() + 9);
        layers[Layer::Lower.index()][3][0] = bogus;
        layers[Layer::Raise.index()][3][0] = Keycode(SAFE_RANGE + 5);
        let errors = validate(&leaked(layers));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&KeymapError::UnknownLayerTarget {
            layer: Layer::Lower,
            pos: KeyPos::new(3, 0),
            keycode: bogus,
            target: 9,
        }));
        assert!(matches!(errors[1], KeymapError::UnhandledCustom { layer: Layer::Raise, .. }));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            KeymapError::MissingLayoutSwitch(QWERTY).to_string(),
            "layout switch QWERTY is missing from ADJUST"
        );
        assert_eq!(
            KeymapError::UnreachableLayer(Layer::BpLower).to_string(),
            "layer BP_LOWER has no momentary key on a base layer"
        );
    }
}
