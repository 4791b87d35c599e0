//! DotStar control panel CLI - drive a networked LED controller.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::sync::Arc;

use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::debug;

use dotstar::cli::{
    Cli, ColorArgs, Commands, CompletionsArgs, EffectArgs, FavoritesCommand, GroupArgs, OffArgs,
    RangeCommand,
};
use dotstar::config::Settings;
use dotstar::error::{PanelError, Result};
use dotstar::logging;
use dotstar::model::{
    DisplayGroup, EffectKind, EffectSettings, Fraction, GroupSelection, Intensity, RangeField,
    Speed,
};
use dotstar::output::{Output, OutputMode, VersionInfo};
use dotstar::panel::{ControlPanel, RANGE_MISSING_MESSAGE, RequestId, Settled};
use dotstar::request::{self, Command, CommandPreview};
use dotstar::shell;
use dotstar::storage::RangeStore;
use dotstar::transport::HttpController;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

const NO_SELECTION: &str = "no group selected";

type Panel = ControlPanel<HttpController>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let output = OutputMode::from_cli(&cli).into_output();

    if let Err(e) = run(&cli, output.as_ref()).await {
        output.error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, output: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Color(args)) => cmd_color(cli, output, args).await,
        Some(Commands::Effect(args)) => cmd_effect(cli, output, args).await,
        Some(Commands::Off(args)) => cmd_off(cli, output, args).await,
        Some(Commands::OffAll) => cmd_off_all(cli, output).await,
        Some(Commands::Favorites(command)) => cmd_favorites(cli, output, command).await,
        Some(Commands::Range(command)) => cmd_range(cli, output, command).await,
        Some(Commands::Groups) => {
            output.groups(&DisplayGroup::ALL);
            Ok(())
        }
        Some(Commands::Effects) => {
            output.effects(&EffectKind::ALL);
            Ok(())
        }
        Some(Commands::Shell) => cmd_shell(cli, output).await,
        Some(Commands::Config) => cmd_config(cli, output),
        Some(Commands::Version) => {
            output.version_info(&version_info());
            Ok(())
        }
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: "dotstar",
        version: build_info::VERSION,
        description: "Control panel for a networked DotStar LED controller",
        groups: RobotGroups {
            list: "dotstar groups --robot",
            select: "-g <GROUP> (repeatable): label, controller id or alias",
            aliases: "top, left, right, ring",
        },
        lighting: RobotLighting {
            solid_color: "dotstar color <HEX> -g <GROUP>",
            start_effect: "dotstar effect <NAME> -g <GROUP> [--speed 0.20]",
            list_effects: "dotstar effects --robot",
            off: "dotstar off -g <GROUP>",
            off_all: "dotstar off-all",
        },
        favorites: RobotFavorites {
            list: "dotstar favorites list --robot",
            add: "dotstar favorites add <HEX>",
            remove: "dotstar favorites remove <INDEX>",
        },
        ranges: RobotRanges {
            show: "dotstar range show --robot",
            edit: "dotstar range set <GROUP> --from <N> --to <N>",
            send: "dotstar range update <GROUP>",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
        dry_run: "Add --dry-run to print requests instead of sending them",
        controller: "--url <URL> or DOTSTAR_URL",
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&help).expect("serialization failed")
    );
}

fn print_human_quick_start() {
    println!(
        "{} {} - DotStar control panel\n",
        style("dotstar").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();

    println!("  {}  Solid color", style("dotstar color ff9329 -g top -g left").green());
    println!("  {}  Start an effect", style("dotstar effect pulsate -g ring").green());
    println!("  {}  Turn a group off", style("dotstar off -g top").green());
    println!("  {}  Turn everything off", style("dotstar off-all").green());
    println!("  {}  Favorite colors", style("dotstar favorites list").green());
    println!("  {}  LED ranges", style("dotstar range show").green());
    println!("  {}  Interactive panel", style("dotstar shell").green());
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("dotstar --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("dotstar --robot").cyan());
    println!("  {}  Preview requests", style("dotstar --dry-run <command>").cyan());
    println!();

    println!("{}", style("GROUPS").bold().underlined());
    println!();
    for group in DisplayGroup::ALL {
        println!("  {:<12} {}", group.label(), group.backend_id());
    }
    println!();

    println!("Run {} for full help", style("dotstar --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    groups: RobotGroups,
    lighting: RobotLighting,
    favorites: RobotFavorites,
    ranges: RobotRanges,
    output_modes: OutputModes,
    dry_run: &'static str,
    controller: &'static str,
}

#[derive(Serialize)]
struct RobotGroups {
    list: &'static str,
    select: &'static str,
    aliases: &'static str,
}

#[derive(Serialize)]
struct RobotLighting {
    solid_color: &'static str,
    start_effect: &'static str,
    list_effects: &'static str,
    off: &'static str,
    off_all: &'static str,
}

#[derive(Serialize)]
struct RobotFavorites {
    list: &'static str,
    add: &'static str,
    remove: &'static str,
}

#[derive(Serialize)]
struct RobotRanges {
    show: &'static str,
    edit: &'static str,
    send: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

async fn cmd_color(cli: &Cli, output: &dyn Output, args: &ColorArgs) -> Result<()> {
    if cli.dry_run {
        let command = request::set_color(&selection(&args.target), args.color);
        preview(output, "set_color", command.as_ref());
        return Ok(());
    }

    let mut panel = open_panel(cli)?;
    select_groups(&mut panel, &args.target);
    panel.set_color(&args.color.to_hex())?;
    let id = panel.send_color();
    finish(&mut panel, output, "set_color", id).await
}

async fn cmd_effect(cli: &Cli, output: &dyn Output, args: &EffectArgs) -> Result<()> {
    let settings = effect_settings(args);
    if cli.dry_run {
        let command = request::start_effect(&selection(&args.target), &settings);
        preview(output, "start_effect", command.as_ref());
        return Ok(());
    }

    let mut panel = open_panel(cli)?;
    select_groups(&mut panel, &args.target);
    *panel.effect_settings_mut() = settings;
    let id = panel.start_effect();
    finish(&mut panel, output, "start_effect", id).await
}

async fn cmd_off(cli: &Cli, output: &dyn Output, args: &OffArgs) -> Result<()> {
    if cli.dry_run {
        let command = request::stop_selected(&selection(&args.target));
        preview(output, "stop_groups", command.as_ref());
        return Ok(());
    }

    let mut panel = open_panel(cli)?;
    select_groups(&mut panel, &args.target);
    let id = panel.stop_selected();
    finish(&mut panel, output, "stop_groups", id).await
}

async fn cmd_off_all(cli: &Cli, output: &dyn Output) -> Result<()> {
    if cli.dry_run {
        preview(output, "stop_all", Some(&request::stop_all()));
        return Ok(());
    }

    let mut panel = open_panel(cli)?;
    let id = panel.stop_all();
    finish(&mut panel, output, "stop_all", Some(id)).await
}

async fn cmd_favorites(cli: &Cli, output: &dyn Output, command: &FavoritesCommand) -> Result<()> {
    if cli.dry_run {
        // Add and remove push a list derived from the fetched one.
        preview(output, "fetch_favorites", Some(&Command::FetchFavorites));
        return Ok(());
    }

    let mut panel = open_panel(cli)?;
    panel.fetch_favorites();
    let fetched = panel.settle().await;
    check(&fetched)?;

    match command {
        FavoritesCommand::List => {}
        FavoritesCommand::Add { color } => {
            panel.set_color(&color.to_hex())?;
            panel.add_favorite()?;
            report(&mut panel, output).await?;
        }
        FavoritesCommand::Remove { index } => {
            panel.remove_favorite(*index)?;
            report(&mut panel, output).await?;
        }
    }
    output.favorites(panel.favorites());
    Ok(())
}

async fn cmd_range(cli: &Cli, output: &dyn Output, command: &RangeCommand) -> Result<()> {
    let mut panel = open_panel(cli)?;

    match command {
        RangeCommand::Show => output.ranges(panel.ranges()),
        RangeCommand::Set { group, from, to } => {
            if from.is_none() && to.is_none() {
                return Err(PanelError::Other(
                    "Nothing to change: pass --from and/or --to".to_string(),
                ));
            }
            if let Some(text) = from {
                panel.edit_range(*group, RangeField::From, text)?;
            }
            if let Some(text) = to {
                panel.edit_range(*group, RangeField::To, text)?;
            }
            let range = panel.range(*group).unwrap_or_default();
            output.success(&format!("{}: {range}", group.label()));
        }
        RangeCommand::Update { group } => {
            if cli.dry_run {
                return preview_range_update(&panel, output, *group);
            }
            if panel.update_range(*group)?.is_none() {
                let message = panel.range_message(*group).unwrap_or(RANGE_MISSING_MESSAGE);
                output.range_status(*group, message, false);
                return Err(missing_range_field(&panel, *group));
            }
            let settled = panel.settle().await;
            let message = panel.range_message(*group).unwrap_or_default();
            output.range_status(*group, message, settled.iter().all(|s| s.ok));
            check(&settled)?;
        }
    }
    Ok(())
}

fn preview_range_update(panel: &Panel, output: &dyn Output, group: DisplayGroup) -> Result<()> {
    if !group.is_range_configurable() {
        return Err(PanelError::NotRangeConfigurable {
            group: group.label().to_string(),
        });
    }
    let range = panel.range(group).unwrap_or_default();
    match range.bounds() {
        Ok((start, end)) => preview(output, "update_range", Some(&request::update_range(group, start, end))),
        Err(_) => output.not_sent("update_range", RANGE_MISSING_MESSAGE),
    }
    Ok(())
}

fn missing_range_field(panel: &Panel, group: DisplayGroup) -> PanelError {
    let field = panel
        .range(group)
        .and_then(|range| range.bounds().err())
        .unwrap_or("start");
    PanelError::MissingRangeField {
        group: group.label().to_string(),
        field,
    }
}

async fn cmd_shell(cli: &Cli, output: &dyn Output) -> Result<()> {
    let mut panel = open_panel(cli)?;
    if !cli.quiet && !cli.use_json() {
        output.info("Type 'help' for commands, 'quit' to leave");
    }
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell::run(&mut panel, output, stdin).await
}

fn cmd_config(cli: &Cli, output: &dyn Output) -> Result<()> {
    let settings = Settings::resolve(cli.overrides())?;
    output.settings(&settings);
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "dotstar", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn version_info() -> VersionInfo {
    VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty() == "true",
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    }
}

fn open_panel(cli: &Cli) -> Result<Panel> {
    let settings = Settings::resolve(cli.overrides())?;
    debug!(base_url = %settings.base_url, ranges = %settings.ranges_path.display(), "Opening panel");
    let transport = HttpController::new(&settings.base_url, settings.timeout())?;
    Ok(ControlPanel::new(
        Arc::new(transport),
        RangeStore::new(settings.ranges_path),
    ))
}

/// Selection as toggled by the group flags; naming a group twice deselects it.
fn selection(target: &GroupArgs) -> GroupSelection {
    let mut selection = GroupSelection::new();
    for group in &target.groups {
        selection.toggle(group.label());
    }
    selection
}

fn select_groups(panel: &mut Panel, target: &GroupArgs) {
    for group in &target.groups {
        panel.toggle_group(group.label());
    }
}

fn effect_settings(args: &EffectArgs) -> EffectSettings {
    let mut settings = EffectSettings {
        effect: args.effect,
        ..EffectSettings::default()
    };
    if let Some(speed) = args.speed {
        settings.speed = Speed::new(speed);
    }
    if let Some(vibrancy) = args.vibrancy {
        settings.vibrancy = vibrancy;
    }
    if let Some(min) = args.pulsate_min {
        settings.pulsate_min = min;
    }
    if let Some(max) = args.pulsate_max {
        settings.pulsate_max = max;
    }
    if let Some(intensity) = args.intensity {
        settings.intensity = Intensity::new(intensity);
    }
    if let Some(color) = args.base_color {
        settings.candle_base = color;
    }
    if let Some(amplitude) = args.gradient_amplitude {
        settings.gradient_amplitude = Fraction::new(amplitude);
    }
    if let Some(speed) = args.gradient_speed {
        settings.gradient_speed = Fraction::new(speed);
    }
    settings
}

fn preview(output: &dyn Output, action: &str, command: Option<&Command>) {
    match command {
        Some(command) => output.command_preview(&CommandPreview::from(command)),
        None => output.not_sent(action, NO_SELECTION),
    }
}

/// Wait for a dispatched request and report it; `None` means nothing was sent.
async fn finish(panel: &mut Panel, output: &dyn Output, action: &str, id: Option<RequestId>) -> Result<()> {
    if id.is_none() {
        output.not_sent(action, NO_SELECTION);
        return Ok(());
    }
    report(panel, output).await
}

async fn report(panel: &mut Panel, output: &dyn Output) -> Result<()> {
    let settled = panel.settle().await;
    output.request_results(&settled);
    check(&settled)
}

fn check(settled: &[Settled]) -> Result<()> {
    let failed = settled.iter().filter(|s| !s.ok).count();
    if failed == 0 {
        Ok(())
    } else {
        Err(PanelError::RequestsFailed {
            failed,
            total: settled.len(),
        })
    }
}
