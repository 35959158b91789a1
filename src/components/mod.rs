pub mod catalog_display;
pub mod detail_overlay;
pub mod entry_grid;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_display::{handle_search_event, CatalogDisplay, CatalogDisplayProps};
pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use entry_grid::{EntryGrid, EntryGridProps};

use ratatui::style::Color;

pub(crate) const BG_BASE: Color = Color::Rgb(14, 18, 28);
pub(crate) const BG_PANEL: Color = Color::Rgb(22, 32, 46);
pub(crate) const BG_CARD: Color = Color::Rgb(28, 40, 56);
pub(crate) const BG_HIGHLIGHT: Color = Color::Rgb(30, 94, 112);
pub(crate) const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(172, 192, 204);
pub(crate) const ACCENT_TEAL: Color = Color::Rgb(78, 204, 186);
pub(crate) const ACCENT_GOLD: Color = Color::Rgb(228, 178, 90);
pub(crate) const ACCENT_RED: Color = Color::Rgb(224, 104, 104);

pub(crate) fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
