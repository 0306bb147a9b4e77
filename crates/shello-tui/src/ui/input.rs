//! Input line
//!
//! Displays the input buffer with cursor.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
};
use shello_app::InputState;

use super::Palette;

const PROMPT_WIDTH: u16 = 2; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const LEFT_BORDER: u16 = 1;
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render(frame: &mut Frame, input: &InputState, palette: &Palette, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(palette.border));

    let input_text = format!("> {}", input.buffer());
    let paragraph = Paragraph::new(input_text)
        .style(Style::default().fg(palette.text).bg(palette.background))
        .block(block);

    frame.render_widget(paragraph, area);

    let available_width = area.width.saturating_sub(LEFT_BORDER + PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = (input.cursor() as u16).min(available_width);

    let cursor_x = area.x.saturating_add(LEFT_BORDER + PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING + 1);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}
