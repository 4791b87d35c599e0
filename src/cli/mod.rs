//! CLI argument definitions and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Overrides;
use crate::model::{DisplayGroup, EffectKind, Rgb};

/// DotStar control panel - drive a networked LED controller from the terminal.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "dotstar", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "DOTSTAR_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print the request that would be sent instead of sending it
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    /// Controller base address
    #[arg(long, global = true, env = "DOTSTAR_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds (0 = transport default)
    #[arg(long, global = true, env = "DOTSTAR_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Path of the LED range store
    #[arg(long, global = true, env = "DOTSTAR_RANGES")]
    pub ranges: Option<PathBuf>,

    /// Path of the TOML config file
    #[arg(long, global = true, env = "DOTSTAR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }

    /// Configuration values given as flags or environment variables.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            base_url: self.url.clone(),
            timeout_secs: self.timeout,
            ranges_path: self.ranges.clone(),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Solid Color ===
    /// Set a solid color on the selected groups
    Color(ColorArgs),

    // === Effects ===
    /// Start an effect on the selected groups
    Effect(EffectArgs),

    // === Power ===
    /// Turn off effects and colors on the selected groups
    Off(OffArgs),

    /// Turn off every group on the controller
    OffAll,

    // === Favorites ===
    /// Manage favorite colors stored on the controller
    #[command(subcommand, visible_alias = "fav")]
    Favorites(FavoritesCommand),

    // === Group Ranges ===
    /// Show, edit and push LED index ranges
    #[command(subcommand)]
    Range(RangeCommand),

    // === Catalogs ===
    /// List display groups and their controller ids
    Groups,

    /// List effects and their parameters
    Effects,

    // === Interactive ===
    /// Interactive control panel
    Shell,

    // === Utilities ===
    /// Show resolved configuration
    Config,

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Groups to target; repeat the flag for several.
#[derive(Args, Debug, Clone)]
pub struct GroupArgs {
    /// Group label, controller id or alias (top, left, right, ring)
    #[arg(long = "group", short = 'g', value_name = "GROUP", required = true)]
    pub groups: Vec<DisplayGroup>,
}

#[derive(Parser, Debug)]
pub struct ColorArgs {
    /// Color in hex format (e.g., "ff9329" or "#ff9329")
    pub color: Rgb,

    #[command(flatten)]
    pub target: GroupArgs,
}

/// Arguments for starting an effect.
///
/// Parameters that the chosen effect does not use are ignored.
///
/// # Examples
///
/// ```bash
/// dotstar effect pulsate -g top -g left --speed 0.2 --pulsate-min 50
/// dotstar effect candle_gradient -g ring --intensity 1.4 --base-color ff9329
/// ```
#[derive(Parser, Debug)]
pub struct EffectArgs {
    /// Effect name (see `dotstar effects`)
    pub effect: EffectKind,

    #[command(flatten)]
    pub target: GroupArgs,

    /// Seconds per step, 0.10 to 1.00 (lower = faster)
    #[arg(long)]
    pub speed: Option<f64>,

    /// color_cycle: vibrancy 0-255
    #[arg(long)]
    pub vibrancy: Option<u8>,

    /// pulsate: minimum brightness 0-255
    #[arg(long)]
    pub pulsate_min: Option<u8>,

    /// pulsate: maximum brightness 0-255
    #[arg(long)]
    pub pulsate_max: Option<u8>,

    /// candle effects: flicker intensity 0.70-2.00
    #[arg(long)]
    pub intensity: Option<f64>,

    /// candle effects: base color in hex
    #[arg(long)]
    pub base_color: Option<Rgb>,

    /// candle_gradient: gradient amplitude 0.00-1.00
    #[arg(long)]
    pub gradient_amplitude: Option<f64>,

    /// candle_gradient: gradient speed 0.00-1.00
    #[arg(long)]
    pub gradient_speed: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct OffArgs {
    #[command(flatten)]
    pub target: GroupArgs,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesCommand {
    /// List favorites stored on the controller
    List,
    /// Add a color to the favorites
    Add {
        /// Color in hex format
        color: Rgb,
    },
    /// Remove the favorite at an index
    #[command(visible_alias = "rm")]
    Remove {
        /// 0-based position as shown by `favorites list`
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum RangeCommand {
    /// Show stored ranges
    Show,
    /// Edit a stored range (saved locally, not sent)
    Set {
        /// Shelf group
        group: DisplayGroup,
        /// First LED index (empty string clears it)
        #[arg(long)]
        from: Option<String>,
        /// Last LED index (empty string clears it)
        #[arg(long)]
        to: Option<String>,
    },
    /// Send a group's stored range to the controller
    Update {
        /// Shelf group
        group: DisplayGroup,
    },
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
