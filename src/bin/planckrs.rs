// Planckrs CLI
// Inspect, lint and simulate the Planck QWERTY/BÉPO keymap

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;

use planckrs_core::bepo::bepo_name;
use planckrs_core::settings::{default_settings_content, Settings};
use planckrs_core::{
    music_mask_user, validate, Effect, Host, KeyRecord, Keycode, Keymap, Layer, SimulatedHost,
};

/// Planck keymap inspector and simulator
#[derive(Parser, Debug)]
#[command(name = "planckrs")]
#[command(author = "planckrs contributors")]
#[command(version)]
#[command(about = "Planck QWERTY/BEPO keymap inspector and simulator", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print layer tables
    Show {
        /// Only print this layer
        #[arg(short, long, value_name = "LAYER")]
        layer: Option<String>,
    },

    /// Lint the keymap and exit non-zero on findings
    Check,

    /// Look up a keycode by name
    Keycode {
        /// Keycode name, e.g. KC_ESC, BP_W, MO(RAISE), S(KC_NUBS)
        name: String,
    },

    /// Feed key events through the simulated firmware
    Simulate {
        /// Settings file (defaults to ~/.config/planckrs/settings.toml)
        #[arg(short, long, value_name = "SETTINGS")]
        settings: Option<PathBuf>,

        /// Override the boot default layer
        #[arg(short, long, value_name = "LAYER")]
        default: Option<String>,

        /// Start with music mode on
        #[arg(short, long)]
        music: bool,

        /// Events: p:ROW,COL (press) or r:ROW,COL (release)
        #[arg(required = true, value_name = "EVENT")]
        events: Vec<String>,
    },

    /// Write the settings template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,

        /// Destination (defaults to ~/.config/planckrs/settings.toml)
        path: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Name a keycode the way the layer it sits on reads it
fn display_name(layer: Layer, keycode: Keycode) -> String {
    let bepo_layer = matches!(layer, Layer::Bepo | Layer::BpLower | Layer::BpRaise);
    if bepo_layer {
        if let Some(name) = bepo_name(keycode) {
            return name.to_string();
        }
    }
    if keycode.is_transparent() {
        return "_______".to_string();
    }
    keycode.name()
}

fn render_layer(keymap: &Keymap, layer: Layer) -> String {
    let rows: Vec<Vec<String>> = keymap
        .layer(layer)
        .iter()
        .map(|row| row.iter().map(|kc| display_name(layer, *kc)).collect())
        .collect();
    let width = rows.iter().flatten().map(String::len).max().unwrap_or(0);

    let mut out = format!("[{}]\n", layer);
    for row in &rows {
        let cells: Vec<String> = row.iter().map(|cell| format!("{:<width$}", cell)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

fn show(layer: Option<String>) -> Result<()> {
    let keymap = Keymap::planck();
    let layers: Vec<Layer> = match layer {
        Some(name) => vec![Layer::from_name(&name)?],
        None => Layer::iter().collect(),
    };
    for layer in layers {
        println!("{}", render_layer(&keymap, layer));
    }
    Ok(())
}

fn check() -> Result<()> {
    let errors = validate(&Keymap::planck());
    if errors.is_empty() {
        println!("Keymap is valid");
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {}", error);
    }
    bail!("{} problem(s) found", errors.len())
}

fn keycode(name: &str) -> Result<()> {
    let keycode: Keycode = name.parse()?;
    let keymap = Keymap::planck();

    println!("{} = 0x{:04X}", keycode, keycode.code());
    println!("  plays in music mode: {}", music_mask_user(keycode));
    let positions = keymap.positions_of(keycode);
    if positions.is_empty() {
        println!("  not on any layer");
    }
    for (layer, pos) in positions {
        println!("  {} at {}", layer, pos);
    }
    Ok(())
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(&path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::load_default()?),
    }
}

fn simulate(
    settings: Option<PathBuf>,
    default: Option<String>,
    music: bool,
    events: &[String],
) -> Result<()> {
    let settings = load_settings(settings)?;
    let mut host = SimulatedHost::from_settings(&settings);
    if let Some(name) = default {
        let layer = Layer::from_name(&name)?;
        if !layer.is_base() {
            bail!("default layer must be QWERTY or BEPO, got {}", layer);
        }
        host.set_single_persistent_default_layer(layer);
    }
    if music {
        host.set_music_mode(true);
    }

    let records = events
        .iter()
        .map(|event| event.parse::<KeyRecord>())
        .collect::<Result<Vec<_>, _>>()?;

    for record in records {
        let outcome = host.process(record)?;
        if settings.log_keys() && matches!(outcome.effect, Effect::KeyDown(_) | Effect::KeyUp(_)) {
            log::info!("report {:?}", host.report());
        }
        println!(
            "{:<8} {:<10} {:<14} {:<18} layers={} default={}",
            outcome.record.to_string(),
            outcome.resolved.layer.to_string(),
            display_name(outcome.resolved.layer, outcome.resolved.keycode),
            outcome.effect.to_string(),
            host.layer_state(),
            host.default_layer_state(),
        );
    }

    let held: Vec<String> = host.report().iter().map(|kc| kc.to_string()).collect();
    println!("held: [{}]", held.join(", "));
    println!("persisted default: {}", host.persisted_default());
    Ok(())
}

fn init(force: bool, path: Option<PathBuf>) -> Result<()> {
    let path = match path.or_else(Settings::default_path) {
        Some(path) => path,
        None => bail!("no config directory, pass a path"),
    };
    if path.exists() && !force {
        bail!("{} already exists, use --force to overwrite", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, default_settings_content())
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Show { layer } => show(layer),
        Command::Check => check(),
        Command::Keycode { name } => keycode(&name),
        Command::Simulate {
            settings,
            default,
            music,
            events,
        } => simulate(settings, default, music, &events),
        Command::Init { force, path } => init(force, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planckrs_core::keycode::{KC_ESC, KC_TRNS};

    #[test]
    fn test_args_show() {
        let args = Args::parse_from(["planckrs", "show", "--layer", "bepo"]);
        assert!(!args.verbose);
        match args.command {
            Command::Show { layer } => assert_eq!(layer.as_deref(), Some("bepo")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_simulate() {
        let args = Args::parse_from([
            "planckrs",
            "--verbose",
            "simulate",
            "--default",
            "bepo",
            "p:3,4",
            "r:3,4",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Simulate {
                settings,
                default,
                music,
                events,
            } => {
                assert_eq!(settings, None);
                assert_eq!(default.as_deref(), Some("bepo"));
                assert!(!music);
                assert_eq!(events, vec!["p:3,4", "r:3,4"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_simulate_requires_events() {
        assert!(Args::try_parse_from(["planckrs", "simulate"]).is_err());
    }

    #[test]
    fn test_display_name_prefers_bepo_aliases() {
        assert_eq!(display_name(Layer::Bepo, Keycode(0x30)), "BP_W");
        assert_eq!(display_name(Layer::Qwerty, Keycode(0x30)), "KC_RBRC");
        assert_eq!(display_name(Layer::Qwerty, KC_ESC), "KC_ESC");
        assert_eq!(display_name(Layer::Lower, KC_TRNS), "_______");
    }

    #[test]
    fn test_render_layer_shape() {
        let rendered = render_layer(&Keymap::planck(), Layer::Qwerty);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "[QWERTY]");
        assert_eq!(lines.len(), 5);
        assert!(lines[4].contains("MO(LOWER)"));
        assert_eq!(lines[1].matches(" | ").count(), 11);
    }
}
