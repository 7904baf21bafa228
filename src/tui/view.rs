// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::tui::tree;

/// Draws the flattened tree, one line per visible node, indented by a fixed
/// width per depth level. The selected line is bold and underlined. Reads
/// the tree only; the single piece of state it adjusts is the scroll offset,
/// so the selection stays on screen.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let flat = tree::flatten(&app.root);
    let selected_idx = flat
        .iter()
        .position(|entry| entry.node.full_path == app.selected_path)
        .unwrap_or(0);

    let height = area.height.max(1) as usize;
    if selected_idx < app.scroll_top {
        app.scroll_top = selected_idx;
    } else if selected_idx >= app.scroll_top + height {
        app.scroll_top = selected_idx + 1 - height;
    }

    let indent = app.indent_width() as usize;
    let lines: Vec<Line> = flat
        .iter()
        .map(|entry| {
            let style = if entry.node.is_selected {
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(" ".repeat(indent * entry.depth)),
                Span::styled(entry.node.name.clone(), style),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines)).scroll((app.scroll_top as u16, 0));
    frame.render_widget(paragraph, area);
}
