//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod input;
mod rooms;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};
use shello_app::{App, Theme};
use shello_core::Environment;

/// Theme colors resolved for ratatui.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Body text.
    pub text: Color,
    /// Background.
    pub background: Color,
    /// Borders.
    pub border: Color,
    /// Own messages.
    pub own_message: Color,
    /// Highlights and senders.
    pub highlight: Color,
    /// Info and system entries.
    pub system: Color,
}

impl Palette {
    /// Resolve theme strings. Unparseable colors fall back to the terminal
    /// default.
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            text: parse_color(&theme.text),
            background: parse_color(&theme.background),
            border: parse_color(&theme.border),
            own_message: parse_color(&theme.own_message),
            highlight: parse_color(&theme.highlight),
            system: parse_color(&theme.system),
        }
    }
}

fn parse_color(value: &str) -> Color {
    value.parse().unwrap_or(Color::Reset)
}

/// Render the entire UI.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let palette = Palette::from_theme(app.theme());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, &palette, *main_area);
    input::render(frame, app.input(), &palette, *input_area);
    status::render(frame, app, &palette, *status_area);
}

/// Render the main area (rooms sidebar + chat).
fn render_main_area<E: Environment>(frame: &mut Frame, app: &App<E>, palette: &Palette, area: Rect) {
    const ROOM_SIDEBAR_WIDTH: u16 = 20;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(ROOM_SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)])
        .split(area);

    let [rooms_area, chat_area] = chunks.as_ref() else {
        return;
    };

    rooms::render(frame, app.session(), palette, *rooms_area);
    chat::render(frame, app, palette, *chat_area);
}
