//! regpack CLI: typed control-register packing from a `regpack.toml` manifest.

mod commands;
mod manifest;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use manifest::{RegpackManifest, MANIFEST_FILE};

#[derive(Parser)]
#[command(name = "regpack", version, about = "Typed control-register serialization and bit packing")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new register map project
    Init {
        /// Project name
        name: String,
    },
    /// Allocate fields to registers and print a report
    Map {
        /// Path to regpack.toml (default: search upward from cwd)
        #[arg(long)]
        manifest: Option<String>,
        /// Packing strategy (first_fit, best_fit, type_clustering)
        #[arg(long)]
        strategy: Option<String>,
        /// Output format (table, markdown, json, bars)
        #[arg(long)]
        format: Option<String>,
    },
    /// Compare all packing strategies
    Compare {
        /// Path to regpack.toml (default: search upward from cwd)
        #[arg(long)]
        manifest: Option<String>,
    },
    /// Print register words built from field defaults
    Image {
        /// Path to regpack.toml (default: search upward from cwd)
        #[arg(long)]
        manifest: Option<String>,
        /// Packing strategy (first_fit, best_fit, type_clustering)
        #[arg(long)]
        strategy: Option<String>,
    },
    /// List the value-type catalog
    Types {
        /// Output format (table, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Convert between engineering units and raw values
    Convert {
        #[command(subcommand)]
        action: ConvertAction,
    },
    /// List clock presets
    Platforms,
}

#[derive(Subcommand)]
enum ConvertAction {
    /// Millivolts to a raw code
    Voltage {
        /// Voltage type identifier
        value_type: String,
        /// Value in millivolts
        #[arg(allow_hyphen_values = true)]
        millivolts: i64,
    },
    /// Raw code to millivolts
    Raw {
        /// Voltage type identifier
        value_type: String,
        /// Raw signed or unsigned code
        #[arg(allow_hyphen_values = true)]
        raw: i64,
    },
    /// Duration to clock cycles
    Time {
        /// Duration value
        value: u64,
        /// Time unit (ns, us, ms, s)
        unit: String,
        /// Clock preset (e.g., moku_go)
        #[arg(long)]
        platform: Option<String>,
        /// Clock period in picoseconds
        #[arg(long)]
        period_ps: Option<u64>,
        /// Rounding policy (exact, up, down)
        #[arg(long)]
        rounding: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Map {
            manifest,
            strategy,
            format,
        } => {
            let manifest = load_manifest(manifest.as_deref())?;
            commands::map::run(&manifest, strategy.as_deref(), format.as_deref())
        }

        Commands::Compare { manifest } => {
            let manifest = load_manifest(manifest.as_deref())?;
            commands::compare::run(&manifest)
        }

        Commands::Image { manifest, strategy } => {
            let manifest = load_manifest(manifest.as_deref())?;
            commands::image::run(&manifest, strategy.as_deref())
        }

        Commands::Types { format } => commands::types::run(format.as_deref()),

        Commands::Convert { action } => match action {
            ConvertAction::Voltage {
                value_type,
                millivolts,
            } => commands::convert::voltage(&value_type, millivolts),
            ConvertAction::Raw { value_type, raw } => commands::convert::raw(&value_type, raw),
            ConvertAction::Time {
                value,
                unit,
                platform,
                period_ps,
                rounding,
            } => commands::convert::time(
                value,
                &unit,
                platform.as_deref(),
                period_ps,
                rounding.as_deref(),
            ),
        },

        Commands::Platforms => commands::platforms::run(),
    }
}

/// Load the manifest at `path`, or search upward from cwd.
fn load_manifest(path: Option<&str>) -> anyhow::Result<RegpackManifest> {
    match path {
        Some(p) => RegpackManifest::load(Path::new(p)),
        None => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            match RegpackManifest::find_and_load(&cwd)? {
                Some((manifest, dir)) => {
                    log::info!("using {}", dir.join(MANIFEST_FILE).display());
                    Ok(manifest)
                }
                None => anyhow::bail!("no {MANIFEST_FILE} found (run `regpack init` first)"),
            }
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use regpack_alloc::{allocate, RegisterImage, Strategy};
    use regpack_report::{compare_strategies, AllocationRecord, AllocationReport};

    const PULSE_DRIVER: &str = r#"
[package]
name = "pulse_driver"
version = "1.2.0"

[allocation]
strategy = "best_fit"
platform = "moku_lab"

[[fields]]
name = "arm_probe"
type = "boolean"
default = true

[[fields]]
name = "force_fire"
type = "boolean"

[[fields]]
name = "reset_fsm"
type = "boolean"

[[fields]]
name = "intensity"
type = "voltage_output_05v_s16"
default = 2400

[[fields]]
name = "trigger_threshold"
type = "voltage_input_20v_s16"
default = -950

[[fields]]
name = "arm_timeout"
type = "pulse_duration_ms_u16"
default = 250

[[fields]]
name = "firing_duration"
type = "pulse_duration_ns_u8"
default = 40

[[fields]]
name = "cooling_duration"
type = "pulse_duration_ns_u8"
default = 200
"#;

    /// Full workflow: init → load → map → image → persist → reload.
    #[test]
    fn init_map_image_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("workflow");

        commands::init::create_project(&project, "workflow").unwrap();
        let path = project.join(MANIFEST_FILE);
        let manifest = load_manifest(path.to_str()).unwrap();
        assert_eq!(manifest.package.name, "workflow");

        let table = commands::map::render_map(&manifest, None, None).unwrap();
        assert!(table.contains("Registers used: 2/12"));

        let image = commands::image::build(&manifest, Some("first_fit")).unwrap();
        assert_eq!(image.words().len(), 2);
    }

    /// The eight-field pulse driver packs into CR6..CR8 and its image decodes back.
    #[test]
    fn pulse_driver_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, PULSE_DRIVER).unwrap();

        let manifest = load_manifest(path.to_str()).unwrap();
        let fields = manifest.fields().unwrap();
        let allocation = allocate(&fields, manifest.strategy()).unwrap();
        let report = AllocationReport::new(&allocation);
        assert_eq!(report.registers_used(), 3);
        assert!(report.packing_efficiency() > 0.6);

        let image = RegisterImage::build(&allocation, &fields).unwrap();
        for field in &fields {
            let decoded = image.read(&allocation, &field.name).unwrap();
            assert_eq!(decoded, field.default_value(), "{}", field.name);
        }

        let json_path = dir.path().join("pulse_driver.json");
        std::fs::write(&json_path, report.to_json().unwrap()).unwrap();
        let restored = AllocationRecord::from_json(&std::fs::read_to_string(&json_path).unwrap())
            .unwrap()
            .into_allocation(Strategy::BestFit)
            .unwrap();
        assert_eq!(restored, allocation);
    }

    #[test]
    fn compare_over_manifest() {
        let manifest = RegpackManifest::parse(PULSE_DRIVER).unwrap();
        let results = compare_strategies(&manifest.fields().unwrap()).unwrap();
        assert!(results.iter().all(|c| c.summary.bits_used == 67));
    }

    #[test]
    fn overflowing_manifest_fails_with_context() {
        let mut toml = String::from("[package]\nname = \"big\"\n");
        for i in 0..30 {
            toml.push_str(&format!(
                "[[fields]]\nname = \"v{i}\"\ntype = \"voltage_output_05v_s16\"\n"
            ));
        }
        let manifest = RegpackManifest::parse(&toml).unwrap();
        let err = commands::map::render_map(&manifest, None, None).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("allocating 'big'"));
        assert!(message.contains("96 bits over"));
    }

    #[test]
    fn missing_manifest_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(MANIFEST_FILE);
        assert!(load_manifest(missing.to_str()).is_err());
    }
}
