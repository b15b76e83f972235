//! Palette for verification output and clap help.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Passed steps, healthy services, converged property.
pub const SUCCESS: Style = fg(AnsiColor::Green);

/// Failed steps and unreachable services.
pub const ERROR: Style = fg(AnsiColor::Red);

/// Degraded results that do not fail the run.
pub const WARNING: Style = fg(AnsiColor::Yellow);

/// Poll attempt counters and pauses.
pub const PROGRESS: Style = fg(AnsiColor::Cyan);

pub const HEADER: Style = Style::new().effects(Effects::BOLD);

pub const LABEL: Style = Style::new().effects(Effects::BOLD);

/// Response bodies and other secondary detail.
pub const DIM: Style = Style::new().effects(Effects::DIMMED);

/// Help styling for both binaries.
pub fn clap_styles() -> clap::builder::Styles {
    let heading = fg(AnsiColor::Green).effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(fg(AnsiColor::Cyan))
        .placeholder(fg(AnsiColor::Cyan))
        .error(fg(AnsiColor::Red).effects(Effects::BOLD))
        .valid(fg(AnsiColor::Green))
        .invalid(fg(AnsiColor::Yellow))
}
