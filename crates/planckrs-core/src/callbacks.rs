// Planckrs Callbacks
// Hooks the host runtime invokes on layer changes, key events and music mode

use std::fmt;

use crate::action::KeyRecord;
use crate::host::Host;
use crate::keycode::{Keycode, SAFE_RANGE};
use crate::keymap::{LOWER, RAISE};
use crate::layer::{Layer, LayerState};

/// Switch the persistent default layer to QWERTY
pub const QWERTY: Keycode = Keycode(SAFE_RANGE);
/// Switch the persistent default layer to BÉPO
pub const BEPO: Keycode = Keycode(SAFE_RANGE + 1);

/// What the runtime should do with a key event after the key-event hook ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Fully handled; suppress default processing
    Handled,
    /// Not handled; continue with default processing
    Continue,
}

impl Dispatch {
    /// The runtime's boolean convention: true means keep processing
    pub fn continue_default(self) -> bool {
        matches!(self, Dispatch::Continue)
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Handled => write!(f, "handled"),
            Dispatch::Continue => write!(f, "continue"),
        }
    }
}

/// Layer-state hook.
///
/// Picks the modifier pair that composes into ADJUST from the topmost
/// requested layer. Only BP_LOWER or BP_RAISE on top select the BÉPO pair;
/// everything else, BEPO itself included, selects LOWER/RAISE.
pub fn layer_state_set_user(state: LayerState) -> LayerState {
    let (first, second) = match state.highest() {
        Some(Layer::BpLower) | Some(Layer::BpRaise) => (Layer::BpLower, Layer::BpRaise),
        _ => (Layer::Raise, Layer::Lower),
    };
    let updated = state.update_tri_layer(first, second, Layer::Adjust);
    if updated.is_on(Layer::Adjust) != state.is_on(Layer::Adjust) {
        log::debug!(
            "{} via {}+{}: {} -> {}",
            Layer::Adjust,
            first,
            second,
            state,
            updated
        );
    }
    updated
}

/// Key-event hook.
///
/// Intercepts the QWERTY and BEPO layout switches. The press edge drops the
/// other alphabet's modifier layers and persists the new default; both
/// edges are swallowed.
pub fn process_record_user<H: Host + ?Sized>(
    host: &mut H,
    keycode: Keycode,
    record: &KeyRecord,
) -> Dispatch {
    match keycode {
        QWERTY => {
            if record.pressed() {
                host.layer_off(Layer::BpRaise);
                host.layer_off(Layer::BpLower);
                host.set_single_persistent_default_layer(Layer::Qwerty);
                log::debug!("default layer set to {}", Layer::Qwerty);
            }
            Dispatch::Handled
        }
        BEPO => {
            if record.pressed() {
                host.layer_off(Layer::Raise);
                host.layer_off(Layer::Lower);
                host.set_single_persistent_default_layer(Layer::Bepo);
                log::debug!("default layer set to {}", Layer::Bepo);
            }
            Dispatch::Handled
        }
        _ => Dispatch::Continue,
    }
}

/// Music-mode filter: false keeps a keycode from triggering a note.
pub fn music_mask_user(keycode: Keycode) -> bool {
    !matches!(keycode, RAISE | LOWER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::*;
    use crate::bepo::BP_W;
    use crate::keymap::{BP_LOWER, BP_RAISE};

    /// Records every call the hooks make into the runtime
    #[derive(Debug, Default)]
    struct RecordingHost {
        state: LayerState,
        default_layer: Option<Layer>,
        calls: Vec<String>,
    }

    impl Host for RecordingHost {
        fn layer_state(&self) -> LayerState {
            self.state
        }

        fn layer_on(&mut self, layer: Layer) {
            self.calls.push(format!("on {}", layer));
            self.state.set(layer);
        }

        fn layer_off(&mut self, layer: Layer) {
            self.calls.push(format!("off {}", layer));
            self.state.clear(layer);
        }

        fn set_single_persistent_default_layer(&mut self, layer: Layer) {
            self.calls.push(format!("default {}", layer));
            self.default_layer = Some(layer);
        }
    }

    fn state(layers: &[Layer]) -> LayerState {
        layers.iter().copied().collect()
    }

    #[test]
    fn test_custom_codes_live_in_safe_range() {
        assert!(QWERTY.code() >= SAFE_RANGE);
        assert!(BEPO.code() >= SAFE_RANGE);
        assert_ne!(QWERTY, BEPO);
    }

    #[test]
    fn test_qwerty_press() {
        let mut host = RecordingHost {
            state: state(&[Layer::BpLower, Layer::BpRaise, Layer::Adjust]),
            ..Default::default()
        };
        let dispatch = process_record_user(&mut host, QWERTY, &KeyRecord::press(1, 10));

        assert_eq!(dispatch, Dispatch::Handled);
        assert!(!dispatch.continue_default());
        assert_eq!(host.calls, vec!["off BP_RAISE", "off BP_LOWER", "default QWERTY"]);
        assert_eq!(host.default_layer, Some(Layer::Qwerty));
        assert!(!host.state.is_on(Layer::BpLower));
        assert!(!host.state.is_on(Layer::BpRaise));
    }

    #[test]
    fn test_bepo_press() {
        let mut host = RecordingHost {
            state: state(&[Layer::Lower, Layer::Raise, Layer::Adjust]),
            ..Default::default()
        };
        let dispatch = process_record_user(&mut host, BEPO, &KeyRecord::press(1, 11));

        assert_eq!(dispatch, Dispatch::Handled);
        assert_eq!(host.calls, vec!["off RAISE", "off LOWER", "default BEPO"]);
        assert_eq!(host.default_layer, Some(Layer::Bepo));
        assert!(!host.state.is_on(Layer::Lower));
        assert!(!host.state.is_on(Layer::Raise));
    }

    #[test]
    fn test_release_is_swallowed_without_mutation() {
        for keycode in [QWERTY, BEPO] {
            let mut host = RecordingHost {
                state: state(&[Layer::Lower, Layer::BpRaise]),
                ..Default::default()
            };
            let dispatch = process_record_user(&mut host, keycode, &KeyRecord::release(1, 10));

            assert_eq!(dispatch, Dispatch::Handled);
            assert!(host.calls.is_empty());
            assert_eq!(host.state, state(&[Layer::Lower, Layer::BpRaise]));
            assert_eq!(host.default_layer, None);
        }
    }

    #[test]
    fn test_other_keycodes_continue() {
        let mut host = RecordingHost::default();
        for keycode in [KC_A, KC_ESC, LOWER, RESET, BP_W, Keycode(SAFE_RANGE + 2)] {
            for record in [KeyRecord::press(0, 0), KeyRecord::release(0, 0)] {
                let dispatch = process_record_user(&mut host, keycode, &record);
                assert_eq!(dispatch, Dispatch::Continue, "{}", keycode);
                assert!(dispatch.continue_default());
            }
        }
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_repeated_press_is_idempotent() {
        let mut host = RecordingHost::default();
        process_record_user(&mut host, BEPO, &KeyRecord::press(1, 11));
        let first = host.default_layer;
        process_record_user(&mut host, BEPO, &KeyRecord::press(1, 11));
        assert_eq!(host.default_layer, first);
        assert_eq!(host.default_layer, Some(Layer::Bepo));
    }

    #[test]
    fn test_bepo_pair_selected_when_bepo_modifier_on_top() {
        let both = state(&[Layer::Bepo, Layer::BpLower, Layer::BpRaise]);
        assert!(layer_state_set_user(both).is_on(Layer::Adjust));

        let lower_on_top = state(&[Layer::Qwerty, Layer::Raise, Layer::BpLower]);
        assert!(!layer_state_set_user(lower_on_top).is_on(Layer::Adjust));
    }

    #[test]
    fn test_qwerty_pair_selected_otherwise() {
        let both = state(&[Layer::Lower, Layer::Raise]);
        let updated = layer_state_set_user(both);
        assert!(updated.is_on(Layer::Adjust));
        assert!(updated.is_on(Layer::Lower));
        assert!(updated.is_on(Layer::Raise));

        // Raise on top with Lower cleared drops ADJUST
        let raise_only = state(&[Layer::Raise, Layer::Adjust]);
        assert_eq!(layer_state_set_user(raise_only), state(&[Layer::Raise]));
    }

    #[test]
    fn test_adjust_on_top_keeps_qwerty_pair() {
        let held = state(&[Layer::Lower, Layer::Raise, Layer::Adjust]);
        assert_eq!(layer_state_set_user(held), held);

        // With the BÉPO pair held, ADJUST on top selects the QWERTY pair and clears it
        let bepo_held = state(&[Layer::BpLower, Layer::BpRaise, Layer::Adjust]);
        assert_eq!(
            layer_state_set_user(bepo_held),
            state(&[Layer::BpLower, Layer::BpRaise])
        );
    }

    #[test]
    fn test_bepo_on_top_uses_default_branch() {
        let bepo = state(&[Layer::Lower, Layer::Raise, Layer::Bepo]);
        assert!(layer_state_set_user(bepo).is_on(Layer::Adjust));

        let bepo_only = state(&[Layer::Bepo, Layer::Adjust]);
        assert_eq!(layer_state_set_user(bepo_only), state(&[Layer::Bepo]));
    }

    #[test]
    fn test_empty_state() {
        assert_eq!(layer_state_set_user(LayerState::EMPTY), LayerState::EMPTY);
    }

    #[test]
    fn test_music_mask() {
        assert!(!music_mask_user(LOWER));
        assert!(!music_mask_user(RAISE));
        for keycode in [KC_A, KC_Q, KC_Z, KC_ESC, KC_SPC, QWERTY, BEPO, BP_LOWER, BP_RAISE, RESET] {
            assert!(music_mask_user(keycode), "{}", keycode);
        }
    }
}
