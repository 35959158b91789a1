use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    format_name, Component, ACCENT_GOLD, ACCENT_TEAL, BG_CARD, BG_HIGHLIGHT, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{AppState, EntryRef, ListView, CARD_HEIGHT, CARD_WIDTH, SKELETON_CARDS};

/// Props for EntryGrid - read-only view of state
pub struct EntryGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The card grid: skeleton placeholders, the no-match panel, or entry cards.
#[derive(Default)]
pub struct EntryGrid;

impl Component<Action> for EntryGrid {
    type Props<'a> = EntryGridProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        // Keys are routed by the surrounding display component.
        None::<Action>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match props.state.list_view() {
            ListView::Skeleton => render_skeleton(frame, area, props.state.tick),
            ListView::EmptySearch { query } => render_empty_search(frame, area, query),
            ListView::Populated(entries) => {
                render_cards(frame, area, entries, props.state, props.is_focused)
            }
        }
    }
}

fn card_rect(area: Rect, row: usize, col: usize) -> Option<Rect> {
    let x = area.x + (col as u16) * CARD_WIDTH;
    let y = area.y + (row as u16) * CARD_HEIGHT;
    let width = CARD_WIDTH.min(area.right().saturating_sub(x));
    let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
    if width < 6 || height < 3 {
        return None;
    }
    Some(Rect {
        x,
        y,
        width,
        height,
    })
}

fn grid_shape(area: Rect) -> (usize, usize) {
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let rows = (area.height / CARD_HEIGHT).max(1) as usize;
    (columns, rows)
}

fn render_cards(
    frame: &mut Frame,
    area: Rect,
    entries: &[EntryRef],
    state: &AppState,
    is_focused: bool,
) {
    if entries.is_empty() {
        // Past the end of the catalog a page is simply empty.
        let paragraph = Paragraph::new("Nothing here.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let (columns, visible_rows) = grid_shape(area);
    let selected = state.selected_index.min(entries.len() - 1);
    let selected_row = selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows.saturating_sub(1));

    for (position, entry) in entries
        .iter()
        .enumerate()
        .skip(first_row * columns)
        .take(columns * visible_rows)
    {
        let row = position / columns - first_row;
        let col = position % columns;
        let Some(card) = card_rect(area, row, col) else {
            continue;
        };
        render_card(frame, card, entry, position == selected, is_focused);
    }
}

fn render_card(frame: &mut Frame, area: Rect, entry: &EntryRef, selected: bool, is_focused: bool) {
    let border = if selected {
        if is_focused {
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(ACCENT_GOLD)
        }
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let bg = if selected { BG_HIGHLIGHT } else { BG_CARD };
    let number = entry
        .id()
        .map(|id| format!("#{id:03}"))
        .unwrap_or_else(|| "#---".to_string());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(bg).fg(TEXT_MAIN));
    let text = Text::from(vec![
        Line::from(Span::styled(
            format_name(&entry.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(number, Style::default().fg(TEXT_DIM))),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_skeleton(frame: &mut Frame, area: Rect, tick: u64) {
    let (columns, visible_rows) = grid_shape(area);
    for position in 0..SKELETON_CARDS.min(columns * visible_rows) {
        let Some(card) = card_rect(area, position / columns, position % columns) else {
            continue;
        };
        let pulse = (tick as usize + position) % 2 == 0;
        let fill = if pulse {
            Style::default().fg(TEXT_DIM)
        } else {
            Style::default().fg(TEXT_DIM).add_modifier(Modifier::DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(TEXT_DIM).add_modifier(Modifier::DIM))
            .style(Style::default().bg(BG_CARD));
        let text = Text::from(vec![
            Line::from(Span::styled("\u{2591}".repeat(10), fill)),
            Line::from(Span::styled("\u{2591}".repeat(5), fill)),
        ]);
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            card,
        );
    }
}

fn render_empty_search(frame: &mut Frame, area: Rect, query: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Wild Pokemon fled!",
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(" "),
        Line::from(format!("Nothing in the dex matches \"{query}\".")),
        Line::from("Check the spelling or try a type tab."),
        Line::from(" "),
        Line::from(vec![
            Span::styled(
                "c",
                Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" clear search"),
        ]),
    ];
    let top = area.height / 4;
    let rect = Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height: area.height.saturating_sub(top),
    };
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(TEXT_MAIN)),
        rect,
    );
}
