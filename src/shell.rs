//! Interactive control panel.
//!
//! Reads one action per line and applies it to a [`ControlPanel`]. Requests
//! run in the background; their results are applied and reported as they
//! arrive, interleaved with further input.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::error::{PanelError, Result};
use crate::model::{DisplayGroup, EffectKind, RangeField, Rgb};
use crate::output::Output;
use crate::panel::{ControlPanel, RequestId, Section, Settled};
use crate::transport::Transport;

pub const HELP: &str = "\
select <group>                 toggle a group (top, left, right, ring)
color <hex>                    set the active color
send                           send the active color to the selected groups
effect <name>                  choose an effect
speed <secs>                   effect speed, 0.10-1.00
param <name> <value>           set an effect parameter
start                          start the effect on the selected groups
off                            turn off the selected groups
off-all                        turn off everything
fav list | add | rm <i> | use <i> | refresh
range <group> from|to <value>  edit a stored range (empty value clears)
range update <group>           send a stored range
toggle <section>               collapse/expand power, solid, effects, ranges
show                           show the panel
help                           this text
quit                           leave (waits for requests in flight)";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    Select(DisplayGroup),
    Color(Rgb),
    Send,
    Effect(EffectKind),
    Param(String, String),
    Start,
    Off,
    OffAll,
    FavList,
    FavAdd,
    FavRemove(usize),
    FavUse(usize),
    FavRefresh,
    RangeEdit(DisplayGroup, RangeField, String),
    RangeUpdate(DisplayGroup),
    Toggle(Section),
    Show,
    Help,
    Quit,
}

fn parse_index(text: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|_| PanelError::Other(format!("Expected an index, got '{text}'")))
}

/// Parse a line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellAction>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let action = match word.to_ascii_lowercase().as_str() {
        "select" | "toggle-group" => ShellAction::Select(rest.parse()?),
        "color" => ShellAction::Color(rest.parse()?),
        "send" => ShellAction::Send,
        "effect" => ShellAction::Effect(rest.parse()?),
        "speed" => ShellAction::Param("speed".to_string(), rest.to_string()),
        "param" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| PanelError::Other("Usage: param <name> <value>".to_string()))?;
            ShellAction::Param(name.to_string(), value.trim().to_string())
        }
        "start" => ShellAction::Start,
        "off" => ShellAction::Off,
        "off-all" | "offall" => ShellAction::OffAll,
        "fav" | "favorites" => {
            let (sub, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match sub {
                "" | "list" => ShellAction::FavList,
                "add" => ShellAction::FavAdd,
                "rm" | "remove" => ShellAction::FavRemove(parse_index(arg)?),
                "use" | "select" => ShellAction::FavUse(parse_index(arg)?),
                "refresh" => ShellAction::FavRefresh,
                other => return Err(PanelError::Other(format!("Unknown fav action: {other}"))),
            }
        }
        "range" => parse_range(rest)?,
        "toggle" => ShellAction::Toggle(rest.parse()?),
        "show" | "status" => ShellAction::Show,
        "help" | "?" => ShellAction::Help,
        "quit" | "exit" => ShellAction::Quit,
        other => return Err(PanelError::Other(format!("Unknown command: {other}"))),
    };
    Ok(Some(action))
}

fn parse_range(rest: &str) -> Result<ShellAction> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    if words.first().is_some_and(|w| w.eq_ignore_ascii_case("update")) {
        return Ok(ShellAction::RangeUpdate(words[1..].join(" ").parse()?));
    }
    let split = words
        .iter()
        .position(|w| w.parse::<RangeField>().is_ok())
        .ok_or_else(|| PanelError::Other("Usage: range <group> from|to <value>".to_string()))?;
    let group: DisplayGroup = words[..split].join(" ").parse()?;
    let field: RangeField = words[split].parse()?;
    Ok(ShellAction::RangeEdit(group, field, words[split + 1..].join(" ")))
}

/// Run the interactive loop until `quit` or end of input.
pub async fn run<T, R>(panel: &mut ControlPanel<T>, output: &dyn Output, input: R) -> Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    // Favorite edits push the whole list, so load it before taking input.
    panel.fetch_favorites();
    for settled in panel.settle().await {
        report(panel, output, &settled);
    }
    info!("Interactive panel started");

    loop {
        tokio::select! {
            Some(settled) = panel.next_completion(), if panel.in_flight() > 0 => {
                report(panel, output, &settled);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(Some(ShellAction::Quit)) => break,
                    Ok(Some(action)) => {
                        debug!(?action, "Shell action");
                        if let Err(e) = execute(panel, output, action) {
                            output.error(&e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => output.error(&e),
                }
            }
        }
    }

    for settled in panel.settle().await {
        report(panel, output, &settled);
    }
    info!("Interactive panel closed");
    Ok(())
}

fn report<T: Transport>(panel: &ControlPanel<T>, output: &dyn Output, settled: &Settled) {
    match settled.group {
        Some(group) => {
            let message = panel.range_message(group).unwrap_or_default();
            output.range_status(group, message, settled.ok);
        }
        None if settled.action == "fetch_favorites" && settled.ok => {
            output.favorites(panel.favorites());
        }
        None => output.request_results(std::slice::from_ref(settled)),
    }
}

fn sent_or_explain(output: &dyn Output, action: &str, id: Option<RequestId>) {
    if id.is_none() {
        output.not_sent(action, "no group selected");
    }
}

/// Apply one action to the panel.
pub fn execute<T: Transport>(
    panel: &mut ControlPanel<T>,
    output: &dyn Output,
    action: ShellAction,
) -> Result<()> {
    match action {
        ShellAction::Select(group) => {
            let selected = panel.toggle_group(group.label());
            let state = if selected { "selected" } else { "deselected" };
            output.info(&format!("{group} {state}"));
        }
        ShellAction::Color(color) => panel.set_color(&color.to_hex())?,
        ShellAction::Send => sent_or_explain(output, "set_color", panel.send_color()),
        ShellAction::Effect(effect) => panel.set_effect(effect),
        ShellAction::Param(name, value) => panel.effect_settings_mut().set_param(&name, &value)?,
        ShellAction::Start => sent_or_explain(output, "start_effect", panel.start_effect()),
        ShellAction::Off => sent_or_explain(output, "stop_groups", panel.stop_selected()),
        ShellAction::OffAll => {
            panel.stop_all();
        }
        ShellAction::FavList => output.favorites(panel.favorites()),
        ShellAction::FavAdd => {
            panel.add_favorite()?;
        }
        ShellAction::FavRemove(index) => {
            panel.remove_favorite(index)?;
        }
        ShellAction::FavUse(index) => {
            let color = panel.select_favorite(index)?;
            output.info(&format!("Color set to {color}"));
        }
        ShellAction::FavRefresh => {
            panel.fetch_favorites();
        }
        ShellAction::RangeEdit(group, field, value) => panel.edit_range(group, field, &value)?,
        ShellAction::RangeUpdate(group) => {
            if panel.update_range(group)?.is_none() {
                let message = panel.range_message(group).unwrap_or_default();
                output.range_status(group, message, false);
            }
        }
        ShellAction::Toggle(section) => {
            let visible = panel.toggle_section(section);
            let state = if visible { "expanded" } else { "collapsed" };
            output.info(&format!("{section} {state}"));
        }
        ShellAction::Show => output.panel_status(&panel.status()),
        ShellAction::Help => output.info(HELP),
        ShellAction::Quit => {}
    }
    Ok(())
}
