//! Chat area
//!
//! Displays the message log grouped by local calendar date.

use chrono::{Local, TimeZone};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use shello_app::App;
use shello_core::{Environment, Kind, Message, MessageLog, SessionView};

use super::Palette;

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, palette: &Palette, area: Rect) {
    let title = app
        .session()
        .current_room()
        .map_or_else(|| " No Room ".to_string(), |room| format!(" #{} ", room.name));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(title);

    let items: Vec<ListItem> = if app.log().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "Type `help` to list commands",
            Style::default().fg(palette.system),
        )))]
    } else {
        transcript(app.log(), &Local, palette).into_iter().map(ListItem::new).collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block).style(Style::default().bg(palette.background));

    frame.render_widget(list, area);
}

/// Lay out the log as lines: a header per date, then one line per entry.
pub fn transcript<Tz: TimeZone>(log: &MessageLog, tz: &Tz, palette: &Palette) -> Vec<Line<'static>>
where
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::with_capacity(log.len());

    for group in log.group_by_date(tz) {
        lines.push(Line::from(Span::styled(
            format!("-- {} --", group.date.format("%Y-%m-%d")),
            Style::default().fg(palette.border).add_modifier(Modifier::DIM),
        )));
        lines.extend(group.entries.into_iter().map(|entry| entry_line(entry, tz, palette)));
    }

    lines
}

fn entry_line<Tz: TimeZone>(entry: &Message, tz: &Tz, palette: &Palette) -> Line<'static>
where
    Tz::Offset: std::fmt::Display,
{
    let time = Span::styled(
        format!("{} ", entry.timestamp.with_timezone(tz).format("%H:%M")),
        Style::default().fg(palette.system),
    );

    let mut spans = vec![time];
    match entry.kind {
        Kind::Out | Kind::In => {
            let (sender_color, body_color) = if entry.kind == Kind::Out {
                (palette.own_message, palette.own_message)
            } else {
                (palette.highlight, palette.text)
            };
            spans.push(Span::styled(
                format!("<{}> ", entry.sender),
                Style::default().fg(sender_color).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(entry.text.clone(), Style::default().fg(body_color)));
            if let Some(count) = entry.read_by {
                spans.push(Span::styled(
                    format!(" (read by {count})"),
                    Style::default().fg(palette.system),
                ));
            }
        },
        Kind::Error => {
            spans.push(Span::styled(
                format!("! {}", entry.text),
                Style::default().fg(Color::Red),
            ));
        },
        Kind::Command => {
            spans.push(Span::styled(
                format!("> {}", entry.text),
                Style::default().fg(palette.highlight),
            ));
        },
        Kind::TempInfo => {
            spans.push(Span::styled(
                format!("* {}", entry.text),
                Style::default().fg(palette.system).add_modifier(Modifier::ITALIC),
            ));
        },
        // Control kinds never reach the log.
        Kind::Info | Kind::Clear | Kind::ClearAll => {
            spans.push(Span::styled(format!("* {}", entry.text), Style::default().fg(palette.system)));
        },
    }

    Line::from(spans)
}
