//! Status bar
//!
//! Displays connection status, identity and current room.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use shello_app::App;
use shello_core::{ConnectionState, Environment, SessionView};

use super::Palette;

/// Render the status bar.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, palette: &Palette, area: Rect) {
    let session = app.session();

    let connection_status = match session.connection_state() {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let room = session
        .current_room()
        .map_or_else(|| "no room".to_string(), |room| format!("#{} ({})", room.name, room.id));
    let details = format!(" | {} | {room}", session.identity().username);

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::styled(details, Style::default().fg(palette.text)),
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(palette.background));

    frame.render_widget(paragraph, area);
}
