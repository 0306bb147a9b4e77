//! Rooms sidebar
//!
//! Displays the cached room list with member counts, marking the current
//! room.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use shello_core::SessionView;

use super::Palette;

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";

/// Render the rooms sidebar.
pub fn render(frame: &mut Frame, session: &dyn SessionView, palette: &Palette, area: Rect) {
    let current = session.current_room().map(|room| room.id);

    let items: Vec<ListItem> = session
        .rooms()
        .iter()
        .map(|room| {
            let (prefix, style) = if current == Some(room.id) {
                (
                    ACTIVE_PREFIX,
                    Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD),
                )
            } else {
                (INACTIVE_PREFIX, Style::default().fg(palette.text))
            };

            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(format!("#{}", room.name), style),
                Span::styled(format!(" {}", room.member_count), Style::default().fg(palette.system)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" Rooms ");
    let list = List::new(items).block(block).style(Style::default().bg(palette.background));

    frame.render_widget(list, area);
}
