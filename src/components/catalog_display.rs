use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::{EventKind, HandlerResponse};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use super::{
    Component, EntryGrid, EntryGridProps, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_BASE, BG_PANEL,
    TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{AppState, BrowseMode, CARD_HEIGHT, PAGE_SIZE, TYPE_FILTERS};

/// Props for CatalogDisplay - read-only view of state
pub struct CatalogDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The main screen: header, type tabs, the entry grid and the status bar.
pub struct CatalogDisplay {
    grid: EntryGrid,
    status_bar: StatusBar,
}

impl CatalogDisplay {
    pub fn new() -> Self {
        Self {
            grid: EntryGrid,
            status_bar: StatusBar::new(),
        }
    }
}

impl Default for CatalogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for CatalogDisplay {
    type Props<'a> = CatalogDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let state = props.state;
        let columns = state.grid_columns() as i16;
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('q') => vec![Action::Quit],
                KeyCode::Char('/') => vec![Action::SearchStart],
                KeyCode::Char('[') => vec![Action::TypeTabPrev],
                KeyCode::Char(']') => vec![Action::TypeTabNext],
                KeyCode::Char('n') => vec![Action::PageNext],
                KeyCode::Char('p') => vec![Action::PagePrev],
                KeyCode::Char('c') | KeyCode::Esc => vec![Action::SearchClear],
                KeyCode::Enter => vec![Action::InspectOpen],
                KeyCode::Left | KeyCode::Char('h') => vec![Action::SelectionMove(-1)],
                KeyCode::Right | KeyCode::Char('l') => vec![Action::SelectionMove(1)],
                KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectionMove(-columns)],
                KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectionMove(columns)],
                _ => Vec::new(),
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove(*delta as i16 * columns)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let layout = Layout::vertical([
            Constraint::Length(4),           // Header with search line
            Constraint::Length(1),           // Type tabs
            Constraint::Min(CARD_HEIGHT),    // Entry grid
            Constraint::Length(3),           // Status bar
        ])
        .split(area);

        render_header(frame, layout[0], state);
        render_type_tabs(frame, layout[1], state);
        self.grid.render(
            frame,
            layout[2],
            EntryGridProps {
                state,
                is_focused: props.is_focused,
            },
        );
        render_status(frame, layout[3], state, &mut self.status_bar);
    }
}

/// Key handling while the search input is open; routed separately so the
/// input captures every character.
pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc => vec![Action::SearchCancel],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mode_label = match &state.mode {
        BrowseMode::Paged { offset } => format!("Page {}", offset / PAGE_SIZE + 1),
        BrowseMode::TypeFilter { type_name } => {
            format!("Type: {}", type_name.to_ascii_uppercase())
        }
        BrowseMode::Search { query, .. } => format!("Search: {query:?}"),
    };
    let search_line = if state.search.active {
        format!("/{}_", state.search.query)
    } else if state.search.query.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.search.query)
    };

    let mut second = vec![
        Span::raw("Search: "),
        Span::styled(search_line, Style::default().fg(ACCENT_TEAL)),
    ];
    if let Some(message) = state.message.clone() {
        second.push(Span::raw("  "));
        second.push(Span::styled(message, Style::default().fg(ACCENT_RED)));
    }

    let header_text = Text::from(vec![
        Line::from(vec![
            Span::styled(
                "POKEGRID",
                Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            Span::styled(mode_label, Style::default().fg(ACCENT_GOLD)),
        ]),
        Line::from(second),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("POKEDEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(
        Paragraph::new(header_text)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_type_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let tabs = Tabs::new(TYPE_FILTERS.to_vec())
        .select(state.current_type_tab())
        .style(Style::default().fg(TEXT_DIM).bg(BG_BASE))
        .highlight_style(Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD))
        .divider(" ");
    frame.render_widget(tabs, area);
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = if state.list_loading { "Loading..." } else { "" };
    let hints = status_hints(state);
    let status_span = Span::styled(status, Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search.active {
        return vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    let mut hints = vec![
        StatusBarHint::new("hjkl", "Move"),
        StatusBarHint::new("Enter", "Inspect"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("[ ]", "Type"),
    ];
    // Pagination is only offered while browsing pages.
    if matches!(state.mode, BrowseMode::Paged { .. }) {
        hints.push(StatusBarHint::new("n/p", "Page"));
    }
    if matches!(state.mode, BrowseMode::Search { .. }) {
        hints.push(StatusBarHint::new("c", "Clear"));
    }
    hints.push(StatusBarHint::new("q", "Quit"));
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn entries(count: usize) -> Vec<crate::state::EntryRef> {
        (1..=count as u32)
            .map(|id| crate::state::EntryRef {
                name: format!("entry-{id}"),
                url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            })
            .collect()
    }

    #[test]
    fn test_handle_event_next_page() {
        let mut component = CatalogDisplay::new();
        let state = AppState::default();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("n")),
                CatalogDisplayProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::PageNext);
    }

    #[test]
    fn test_handle_event_vertical_move_spans_a_row() {
        let mut component = CatalogDisplay::new();
        let state = AppState {
            terminal_size: (90, 30),
            entries: entries(20),
            ..Default::default()
        };
        let columns = state.grid_columns() as i16;

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("j")),
                CatalogDisplayProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::SelectionMove(columns));
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = CatalogDisplay::new();
        let state = AppState::default();
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("n")),
                CatalogDisplayProps {
                    state: &state,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_search_event_routing() {
        let state = AppState {
            search: crate::state::SearchState {
                active: true,
                query: "pika".into(),
            },
            ..Default::default()
        };
        let response = handle_search_event(&EventKind::Key(key("x")), &state);
        assert_eq!(response.actions, vec![Action::SearchInput('x')]);

        let enter = crossterm::event::KeyEvent::new(
            KeyCode::Enter,
            crossterm::event::KeyModifiers::NONE,
        );
        let response = handle_search_event(&EventKind::Key(enter), &state);
        assert_eq!(response.actions, vec![Action::SearchSubmit]);
    }
}
