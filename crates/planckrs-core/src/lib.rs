// Planckrs Core Library
// Planck QWERTY/BÉPO keymap: layer tables and runtime hooks

pub mod action;
pub mod bepo;
pub mod callbacks;
pub mod host;
pub mod keycode;
pub mod keymap;
pub mod layer;
pub mod validate;

#[cfg(feature = "settings")]
pub mod settings;

pub use action::{Action, KeyPos, KeyRecord};
pub use callbacks::{layer_state_set_user, music_mask_user, process_record_user, Dispatch, BEPO, QWERTY};
pub use host::{Effect, Host, Outcome, SimulatedHost, SimulationError};
pub use keycode::{Keycode, KeycodeError};
pub use keymap::{Keymap, LayerGrid, Resolved, KEYMAPS, MATRIX_COLS, MATRIX_ROWS};
pub use layer::{Layer, LayerError, LayerState, LAYER_COUNT};
pub use validate::{validate, KeymapError};

#[cfg(feature = "settings")]
pub use settings::{Settings, SettingsError};
