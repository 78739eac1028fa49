// Planckrs Host Runtime
//
// The runtime interface the hooks are written against, plus an in-memory
// runtime that drives the keymap end to end.

use std::collections::HashMap;
use std::fmt;

use smallvec::SmallVec;

use crate::action::{KeyPos, KeyRecord};
use crate::callbacks::{layer_state_set_user, music_mask_user, process_record_user, Dispatch};
use crate::keycode::{Keycode, KC_NO, MU_OFF, MU_ON, MU_TOG};
use crate::keymap::{Keymap, Resolved};
use crate::layer::{Layer, LayerState};

/// Maximum simultaneous non-modifier keys in a boot-protocol report
pub const REPORT_KEYS: usize = 6;

/// Layer-state services the host firmware provides to the hooks.
///
/// Implementations own the layer bitmask and the persisted default layer;
/// hooks only go through these calls and never cache the results.
pub trait Host {
    /// Currently active (non-default) layers
    fn layer_state(&self) -> LayerState;

    /// Activate a layer
    fn layer_on(&mut self, layer: Layer);

    /// Deactivate a layer
    fn layer_off(&mut self, layer: Layer);

    /// Make `layer` the only default layer and persist it across reboots
    fn set_single_persistent_default_layer(&mut self, layer: Layer);
}

/// Errors raised while simulating key events
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid event '{0}', expected p:ROW,COL or r:ROW,COL")]
    BadEvent(String),

    #[error("position {0} is outside the 4x12 matrix")]
    OutOfMatrix(KeyPos),
}

/// What the runtime did with one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Consumed by the key-event hook
    Swallowed,
    /// Momentary layer switched on
    LayerOn(Layer),
    /// Momentary layer switched off
    LayerOff(Layer),
    /// Music mode played a note for this keycode
    Note(Keycode),
    /// Music mode switched on or off
    MusicMode(bool),
    /// Quantum or custom keycode, handled outside the report
    Quantum(Keycode),
    /// Keycode added to the report
    KeyDown(Keycode),
    /// Keycode removed from the report
    KeyUp(Keycode),
    /// Nothing to do (no-op keycode, full report, unknown layer)
    Ignored,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Swallowed => write!(f, "swallowed"),
            Effect::LayerOn(layer) => write!(f, "layer on {}", layer),
            Effect::LayerOff(layer) => write!(f, "layer off {}", layer),
            Effect::Note(kc) => write!(f, "note {}", kc),
            Effect::MusicMode(true) => write!(f, "music on"),
            Effect::MusicMode(false) => write!(f, "music off"),
            Effect::Quantum(kc) => write!(f, "quantum {}", kc),
            Effect::KeyDown(kc) => write!(f, "down {}", kc),
            Effect::KeyUp(kc) => write!(f, "up {}", kc),
            Effect::Ignored => write!(f, "ignored"),
        }
    }
}

/// Result of feeding one event through [`SimulatedHost::process`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub record: KeyRecord,
    pub resolved: Resolved,
    pub dispatch: Dispatch,
    pub effect: Effect,
}

/// In-memory host runtime.
///
/// Resolves positions through the layer stack, runs the hooks in firmware
/// order (key-event hook, music mode, default handling) and keeps a
/// six-key report. The "persisted" default layer only lives as long as the
/// value; [`SimulatedHost::reboot`] restores it like a power cycle would.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    keymap: Keymap,
    layer_state: LayerState,
    default_layer_state: LayerState,
    persisted_default: Layer,
    /// Layer each held key was resolved on, so releases match their press
    source_layers: HashMap<KeyPos, Layer>,
    report: SmallVec<[Keycode; REPORT_KEYS]>,
    music_mode: bool,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new(Keymap::planck(), Layer::Qwerty)
    }
}

impl SimulatedHost {
    /// Boot with `default_layer` as the persisted default
    pub fn new(keymap: Keymap, default_layer: Layer) -> Self {
        Self {
            keymap,
            layer_state: LayerState::EMPTY,
            default_layer_state: LayerState::only(default_layer),
            persisted_default: default_layer,
            source_layers: HashMap::new(),
            report: SmallVec::new(),
            music_mode: false,
        }
    }

    /// Boot from loaded settings
    #[cfg(feature = "settings")]
    pub fn from_settings(settings: &crate::settings::Settings) -> Self {
        let mut host = Self::new(Keymap::planck(), settings.default_layer());
        host.set_music_mode(settings.music_enabled());
        host
    }

    /// Enable or disable music mode
    pub fn set_music_mode(&mut self, enabled: bool) {
        self.music_mode = enabled;
    }

    pub fn music_mode(&self) -> bool {
        self.music_mode
    }

    /// Default layer bitmask
    pub fn default_layer_state(&self) -> LayerState {
        self.default_layer_state
    }

    /// Default layer as it would be restored at boot
    pub fn persisted_default(&self) -> Layer {
        self.persisted_default
    }

    /// Keycodes currently held in the report
    pub fn report(&self) -> &[Keycode] {
        &self.report
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Drop all transient state and restore the persisted default layer
    pub fn reboot(&mut self) {
        self.layer_state = LayerState::EMPTY;
        self.default_layer_state = LayerState::only(self.persisted_default);
        self.source_layers.clear();
        self.report.clear();
        log::debug!("rebooted with default layer {}", self.persisted_default);
    }

    /// Apply a new layer bitmask through the layer-state hook
    fn layer_state_set(&mut self, requested: LayerState) {
        self.layer_state = layer_state_set_user(requested);
    }

    /// Run one key event through the runtime
    pub fn process(&mut self, record: KeyRecord) -> Result<Outcome, SimulationError> {
        if !record.pos.in_matrix() {
            return Err(SimulationError::OutOfMatrix(record.pos));
        }

        let resolved = self.resolve(&record);
        let keycode = resolved.keycode;
        log::trace!("{} -> {} on {}", record, keycode, resolved.layer);

        let dispatch = process_record_user(self, keycode, &record);
        let effect = if dispatch.continue_default() {
            self.default_handling(keycode, &record)
        } else {
            Effect::Swallowed
        };

        Ok(Outcome {
            record,
            resolved,
            dispatch,
            effect,
        })
    }

    /// Run a sequence of events, stopping at the first error
    pub fn process_all<I>(&mut self, records: I) -> Result<Vec<Outcome>, SimulationError>
    where
        I: IntoIterator<Item = KeyRecord>,
    {
        records.into_iter().map(|record| self.process(record)).collect()
    }

    fn resolve(&mut self, record: &KeyRecord) -> Resolved {
        if record.pressed() {
            let resolved = self
                .keymap
                .resolve(self.layer_state, self.default_layer_state, record.pos);
            self.source_layers.insert(record.pos, resolved.layer);
            return resolved;
        }

        match self.source_layers.remove(&record.pos) {
            Some(layer) => Resolved {
                layer,
                keycode: self.keymap.keycode_at(layer, record.pos),
            },
            None => self
                .keymap
                .resolve(self.layer_state, self.default_layer_state, record.pos),
        }
    }

    fn default_handling(&mut self, keycode: Keycode, record: &KeyRecord) -> Effect {
        let music_switch = match keycode {
            MU_ON => Some(true),
            MU_OFF => Some(false),
            MU_TOG => Some(!self.music_mode),
            _ => None,
        };
        if let Some(enabled) = music_switch {
            if !record.pressed() {
                return Effect::Swallowed;
            }
            self.set_music_mode(enabled);
            log::debug!("music mode {}", if enabled { "on" } else { "off" });
            return Effect::MusicMode(enabled);
        }

        if self.music_mode && music_mask_user(keycode) {
            return if record.pressed() {
                Effect::Note(keycode)
            } else {
                Effect::Swallowed
            };
        }

        if let Some(index) = keycode.momentary_layer() {
            let layer = match Layer::from_index(index) {
                Ok(layer) => layer,
                Err(e) => {
                    log::warn!("ignoring {}: {}", keycode, e);
                    return Effect::Ignored;
                }
            };
            return if record.pressed() {
                self.layer_on(layer);
                Effect::LayerOn(layer)
            } else {
                self.layer_off(layer);
                Effect::LayerOff(layer)
            };
        }

        if keycode.is_transparent() || keycode == KC_NO {
            return Effect::Ignored;
        }

        // Not HID usages; never reported
        if keycode.is_quantum() || keycode.is_custom() {
            return if record.pressed() {
                log::debug!("quantum keycode {}", keycode);
                Effect::Quantum(keycode)
            } else {
                Effect::Ignored
            };
        }

        if record.pressed() {
            if self.report.contains(&keycode) {
                return Effect::Ignored;
            }
            if self.report.len() >= REPORT_KEYS {
                log::warn!("report full, dropping {}", keycode);
                return Effect::Ignored;
            }
            self.report.push(keycode);
            Effect::KeyDown(keycode)
        } else {
            match self.report.iter().position(|held| *held == keycode) {
                Some(index) => {
                    self.report.remove(index);
                    Effect::KeyUp(keycode)
                }
                None => Effect::Ignored,
            }
        }
    }
}

impl Host for SimulatedHost {
    fn layer_state(&self) -> LayerState {
        self.layer_state
    }

    fn layer_on(&mut self, layer: Layer) {
        self.layer_state_set(self.layer_state.with(layer));
    }

    fn layer_off(&mut self, layer: Layer) {
        self.layer_state_set(self.layer_state.without(layer));
    }

    fn set_single_persistent_default_layer(&mut self, layer: Layer) {
        self.persisted_default = layer;
        self.default_layer_state = LayerState::only(layer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::*;

    #[test]
    fn test_boot_state() {
        let host = SimulatedHost::default();
        assert_eq!(host.layer_state(), LayerState::EMPTY);
        assert_eq!(host.default_layer_state(), LayerState::only(Layer::Qwerty));
        assert_eq!(host.persisted_default(), Layer::Qwerty);
        assert!(host.report().is_empty());
    }

    #[test]
    fn test_plain_key_round_trip() {
        let mut host = SimulatedHost::default();
        let down = host.process(KeyRecord::press(0, 1)).unwrap();
        assert_eq!(down.effect, Effect::KeyDown(KC_Q));
        assert_eq!(down.dispatch, Dispatch::Continue);
        assert_eq!(host.report(), &[KC_Q]);

        let up = host.process(KeyRecord::release(0, 1)).unwrap();
        assert_eq!(up.effect, Effect::KeyUp(KC_Q));
        assert!(host.report().is_empty());
    }

    #[test]
    fn test_host_layer_calls_run_the_hook() {
        let mut host = SimulatedHost::default();
        host.layer_on(Layer::Lower);
        host.layer_on(Layer::Raise);
        assert!(host.layer_state().is_on(Layer::Adjust));
        host.layer_off(Layer::Lower);
        assert_eq!(host.layer_state(), LayerState::only(Layer::Raise));
    }

    #[test]
    fn test_release_uses_press_layer() {
        let mut host = SimulatedHost::default();
        host.process(KeyRecord::press(3, 4)).unwrap(); // hold Lower
        let down = host.process(KeyRecord::press(0, 1)).unwrap();
        assert_eq!(down.effect, Effect::KeyDown(KC_EXLM));

        host.process(KeyRecord::release(3, 4)).unwrap();
        let up = host.process(KeyRecord::release(0, 1)).unwrap();
        assert_eq!(up.resolved.layer, Layer::Lower);
        assert_eq!(up.effect, Effect::KeyUp(KC_EXLM));
        assert!(host.report().is_empty());
    }

    #[test]
    fn test_report_holds_six_keys() {
        let mut host = SimulatedHost::default();
        for col in 1..=6 {
            let outcome = host.process(KeyRecord::press(0, col)).unwrap();
            assert!(matches!(outcome.effect, Effect::KeyDown(_)));
        }
        let seventh = host.process(KeyRecord::press(0, 7)).unwrap();
        assert_eq!(seventh.effect, Effect::Ignored);
        assert_eq!(host.report().len(), REPORT_KEYS);
    }

    #[test]
    fn test_out_of_matrix() {
        let mut host = SimulatedHost::default();
        assert_eq!(
            host.process(KeyRecord::press(4, 0)),
            Err(SimulationError::OutOfMatrix(KeyPos::new(4, 0)))
        );
    }

    #[test]
    fn test_music_mode_skips_layer_keys() {
        let mut host = SimulatedHost::default();
        host.set_music_mode(true);

        let note = host.process(KeyRecord::press(0, 1)).unwrap();
        assert_eq!(note.effect, Effect::Note(KC_Q));
        assert!(host.report().is_empty());

        let lower = host.process(KeyRecord::press(3, 4)).unwrap();
        assert_eq!(lower.effect, Effect::LayerOn(Layer::Lower));
    }

    #[test]
    fn test_reboot_restores_persisted_default() {
        let mut host = SimulatedHost::default();
        host.layer_on(Layer::Raise);
        host.set_single_persistent_default_layer(Layer::Bepo);
        host.reboot();
        assert_eq!(host.layer_state(), LayerState::EMPTY);
        assert_eq!(host.default_layer_state(), LayerState::only(Layer::Bepo));
    }
}
