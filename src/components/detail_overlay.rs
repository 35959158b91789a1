use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::{
    format_name, Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_BASE, BG_CARD, BG_PANEL,
    TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{EntryBundle, EntryDetail, InspectState, StatValue};

pub const OVERLAY_WIDTH: u16 = 72;
pub const OVERLAY_HEIGHT: u16 = 22;

const STAT_BAR_WIDTH: usize = 20;

/// Props for DetailOverlay - the open inspection
pub struct DetailOverlayProps<'a> {
    pub inspect: &'a InspectState,
    pub is_focused: bool,
    pub tick: u64,
}

/// Modal inspection view over the composed entry bundle.
pub struct DetailOverlay {
    modal: Modal,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self { modal: Modal::new() }
    }
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => vec![Action::InspectClose],
            KeyCode::Char('c') => vec![Action::PlayCry],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 40 || area.height < 14 {
            return;
        }
        let inspect = props.inspect;
        let tick = props.tick;
        let modal_area = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| match &inspect.view {
            DataResource::Loaded(bundle) => render_bundle(frame, content_area, bundle),
            DataResource::Failed(error) => render_failed(frame, content_area, inspect, error),
            _ => render_scanning(frame, content_area, tick),
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL),
                        padding: Padding::all(1),
                        border: None,
                        fg: Some(TEXT_MAIN),
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::InspectClose,
                render_content: &mut render_content,
            },
        );
    }
}

fn render_scanning(frame: &mut Frame, area: Rect, tick: u64) {
    let dots = ".".repeat((tick / 3 % 4) as usize);
    let paragraph = Paragraph::new(format!("Scanning Pokedex{dots}"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_DIM));
    let rect = Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: area.height.saturating_sub(area.height / 2),
    };
    frame.render_widget(paragraph, rect);
}

fn render_failed(frame: &mut Frame, area: Rect, inspect: &InspectState, error: &str) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{}  #{:03}", format_name(&inspect.name), inspect.id),
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        )),
        Line::from(" "),
        Line::from(Span::styled(
            "Could not load this entry.",
            Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(error.to_string()),
        Line::from(" "),
        Line::from(vec![
            Span::styled("Esc", Style::default().fg(ACCENT_TEAL)),
            Span::raw(" close"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_bundle(frame: &mut Frame, area: Rect, bundle: &EntryBundle) {
    let detail = &bundle.detail;
    let layout = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
    ])
    .split(area);

    render_bundle_header(frame, layout[0], detail);

    let columns =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(layout[1]);
    render_abilities(frame, columns[0], detail);
    render_stats(frame, columns[1], detail);

    render_evolution(frame, layout[2], bundle);
}

fn render_bundle_header(frame: &mut Frame, area: Rect, detail: &EntryDetail) {
    let mut type_spans = Vec::new();
    for name in &detail.types {
        if !type_spans.is_empty() {
            type_spans.push(Span::raw(" "));
        }
        type_spans.push(Span::styled(
            format!(" {} ", name.to_ascii_uppercase()),
            Style::default().bg(type_color(name)).fg(BG_BASE),
        ));
    }
    let hint = if detail.cry_url.is_some() {
        "c cry   Esc close"
    } else {
        "Esc close"
    };
    let lines = vec![
        Line::from(Span::styled(
            format!("{}  #{:03}", format_name(&detail.name), detail.id),
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        )),
        Line::from(type_spans),
        Line::from(Span::styled(hint, Style::default().fg(TEXT_DIM))),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        area,
    );
}

fn render_abilities(frame: &mut Frame, area: Rect, detail: &EntryDetail) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("ABILITIES")
        .style(Style::default().bg(BG_CARD).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let mut lines: Vec<Line> = detail
        .abilities
        .iter()
        .map(|ability| {
            let mut spans = vec![Span::raw("* "), Span::raw(format_name(&ability.name))];
            if ability.hidden {
                spans.push(Span::styled(" (hidden)", Style::default().fg(TEXT_DIM)));
            }
            Line::from(spans)
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No abilities.",
            Style::default().fg(TEXT_DIM),
        )));
    }
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_stats(frame: &mut Frame, area: Rect, detail: &EntryDetail) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("BASE STATS")
        .style(Style::default().bg(BG_CARD).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let lines: Vec<Line> = detail.stats.iter().map(stat_line).collect();
    let text = if lines.is_empty() {
        Text::from("No stats loaded.")
    } else {
        Text::from(lines)
    };
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Bars are clamped at 100 for display; the raw value is printed next to
/// the label.
fn stat_line(stat: &StatValue) -> Line<'static> {
    let label = shorten_stat(&stat.name);
    let filled = (stat.value.min(100) as usize * STAT_BAR_WIDTH) / 100;
    let bar = "#".repeat(filled.max(1));
    Line::from(vec![
        Span::raw(format!("{label:>4} {value:>3} ", value = stat.value)),
        Span::styled(bar, Style::default().fg(ACCENT_TEAL)),
    ])
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

fn render_evolution(frame: &mut Frame, area: Rect, bundle: &EntryBundle) {
    // A single-stage lineage carries no information worth a panel.
    if bundle.evolution.len() < 2 {
        return;
    }
    let current = bundle.detail.name.as_str();
    let mut spans = Vec::new();
    for (index, stage) in bundle.evolution.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" -> ", Style::default().fg(TEXT_DIM)));
        }
        let style = if stage.name == current {
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MAIN)
        };
        spans.push(Span::styled(format_name(&stage.name), style));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title("EVOLUTION")
        .style(Style::default().bg(BG_CARD).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(168, 167, 122),
        "fire" => Color::Rgb(238, 129, 48),
        "water" => Color::Rgb(99, 144, 240),
        "electric" => Color::Rgb(247, 208, 44),
        "grass" => Color::Rgb(122, 199, 76),
        "ice" => Color::Rgb(150, 217, 214),
        "fighting" => Color::Rgb(194, 46, 40),
        "poison" => Color::Rgb(163, 62, 161),
        "ground" => Color::Rgb(226, 191, 101),
        "flying" => Color::Rgb(169, 143, 243),
        "psychic" => Color::Rgb(249, 85, 135),
        "bug" => Color::Rgb(166, 185, 26),
        "rock" => Color::Rgb(182, 161, 54),
        "ghost" => Color::Rgb(115, 87, 151),
        "dragon" => Color::Rgb(111, 53, 252),
        "dark" => Color::Rgb(112, 87, 70),
        "steel" => Color::Rgb(183, 183, 206),
        "fairy" => Color::Rgb(214, 133, 173),
        _ => Color::Rgb(55, 65, 81),
    }
}
