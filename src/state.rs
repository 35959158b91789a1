//! Application state - single source of truth

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

/// Fixed page size of the paged listing endpoint.
pub const PAGE_SIZE: u32 = 20;

/// Placeholder cards shown while the list area loads.
pub const SKELETON_CARDS: usize = 20;

/// Sentinel tab meaning "no type filter, browse pages".
pub const ALL_TYPES: &str = "all";

/// Type tabs in display order, `all` first.
pub const TYPE_FILTERS: [&str; 19] = [
    "all", "normal", "fire", "water", "grass", "electric", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

pub const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Card footprint in cells, shared by grid rendering and key routing.
pub const CARD_WIDTH: u16 = 18;
pub const CARD_HEIGHT: u16 = 4;

/// Tick interval driving the skeleton and overlay spinners.
pub const LOADING_TICK_MS: u64 = 120;

/// Trailing numeric path segment of an API resource URL.
///
/// The contract with the remote API is that entry and species URLs end in
/// the numeric id. Returns `None` on any other shape; callers surface that
/// instead of assuming the parse succeeds.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Official artwork URL for an entry id.
pub fn artwork_url(id: u32) -> String {
    format!("{ARTWORK_BASE}/{id}.png")
}

/// One catalog entry as returned by list, search and type responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryRef {
    pub name: String,
    pub url: String,
}

impl EntryRef {
    /// Derived identifier; not stored by the API.
    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.url)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityRef {
    pub name: String,
    pub hidden: bool,
}

/// Full attributes of one entry, fetched fresh per inspection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub id: u32,
    pub name: String,
    /// Ordered; the first tag is the primary type.
    pub types: Vec<String>,
    pub stats: Vec<StatValue>,
    pub abilities: Vec<AbilityRef>,
    pub artwork_url: String,
    pub cry_url: Option<String>,
}

impl EntryDetail {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    pub id: u32,
    pub image_url: String,
}

/// Composite view model for the inspection overlay.
///
/// `evolution` always holds at least the entry's own stage; it is only
/// rendered when there is more than one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryBundle {
    pub detail: EntryDetail,
    pub evolution: Vec<EvolutionStage>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// Exactly one browse mode is active at a time; switching modes drops the
/// previous mode's result state with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BrowseMode {
    Paged {
        offset: u32,
    },
    TypeFilter {
        type_name: String,
    },
    /// `result` of `None` means the lookup has not resolved yet; an empty
    /// vec means it resolved to zero matches.
    Search {
        query: String,
        result: Option<Vec<EntryRef>>,
    },
}

impl BrowseMode {
    pub fn page_offset(&self) -> Option<u32> {
        match self {
            BrowseMode::Paged { offset } => Some(*offset),
            _ => None,
        }
    }

    pub fn type_filter(&self) -> Option<&str> {
        match self {
            BrowseMode::TypeFilter { type_name } => Some(type_name),
            _ => None,
        }
    }
}

impl Default for BrowseMode {
    fn default() -> Self {
        BrowseMode::Paged { offset: 0 }
    }
}

/// Inspection overlay lifecycle: Loading until the composed bundle (or a
/// terminal error) arrives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InspectState {
    pub id: u32,
    pub name: String,
    pub view: DataResource<EntryBundle>,
}

/// What the list area renders, by precedence.
#[derive(Debug, PartialEq)]
pub enum ListView<'a> {
    Skeleton,
    EmptySearch { query: &'a str },
    Populated(&'a [EntryRef]),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub mode: BrowseMode,
    /// Backing list for paged and type-filtered browsing. A search result
    /// lives inside the mode and shadows this without destroying it.
    pub entries: Vec<EntryRef>,
    pub list_loading: bool,
    pub selected_index: usize,
    pub search: SearchState,
    pub inspect: Option<InspectState>,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            mode: BrowseMode::default(),
            entries: Vec::new(),
            list_loading: false,
            selected_index: 0,
            search: SearchState::default(),
            inspect: None,
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn search_result(&self) -> Option<&[EntryRef]> {
        match &self.mode {
            BrowseMode::Search {
                result: Some(entries),
                ..
            } => Some(entries),
            _ => None,
        }
    }

    /// The list the grid renders: a resolved search result if present,
    /// else the paged or type-filtered list.
    pub fn active_entries(&self) -> &[EntryRef] {
        self.search_result().unwrap_or(&self.entries)
    }

    pub fn list_view(&self) -> ListView<'_> {
        let search_in_flight = matches!(&self.mode, BrowseMode::Search { result: None, .. });
        if self.list_loading && (search_in_flight || self.active_entries().is_empty()) {
            return ListView::Skeleton;
        }
        if let BrowseMode::Search {
            query,
            result: Some(result),
        } = &self.mode
        {
            if !self.list_loading && result.is_empty() {
                return ListView::EmptySearch { query };
            }
        }
        ListView::Populated(self.active_entries())
    }

    pub fn selected_entry(&self) -> Option<&EntryRef> {
        self.active_entries().get(self.selected_index)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        let len = self.active_entries().len();
        if len == 0 {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(len - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn clamp_selection(&mut self) {
        if self.selected_index >= self.active_entries().len() {
            self.selected_index = 0;
        }
    }

    /// Grid columns derived from the terminal width; the grid spans the
    /// full frame, so event handlers can share this with the renderer.
    pub fn grid_columns(&self) -> usize {
        (self.terminal_size.0 / CARD_WIDTH).max(1) as usize
    }

    pub fn current_type_tab(&self) -> usize {
        match &self.mode {
            BrowseMode::TypeFilter { type_name } => TYPE_FILTERS
                .iter()
                .position(|name| name == type_name)
                .unwrap_or(0),
            _ => 0,
        }
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let mode = match &self.mode {
            BrowseMode::Paged { offset } => format!("paged @{offset}"),
            BrowseMode::TypeFilter { type_name } => format!("type {type_name}"),
            BrowseMode::Search { query, result } => format!(
                "search {query:?} ({})",
                result
                    .as_ref()
                    .map(|entries| entries.len().to_string())
                    .unwrap_or_else(|| "pending".to_string())
            ),
        };
        vec![
            DebugSection::new("Catalog")
                .entry("mode", ron_string(&mode))
                .entry("entries", ron_string(&self.entries.len()))
                .entry("selected", ron_string(&self.selected_index)),
            DebugSection::new("Inspect").entry(
                "open",
                ron_string(&self.inspect.as_ref().map(|inspect| inspect.name.clone())),
            ),
            DebugSection::new("Status")
                .entry("list_loading", ron_string(&self.list_loading))
                .entry("search_active", ron_string(&self.search.active))
                .entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(count: usize) -> Vec<EntryRef> {
        (1..=count as u32)
            .map(|id| EntryRef {
                name: format!("entry-{id}"),
                url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            })
            .collect()
    }

    #[test]
    fn id_from_url_parses_trailing_numeric_segment() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25"), Some(25));
        assert_eq!(
            id_from_url("https://pokeapi.co/api/v2/pokemon-species/1/"),
            Some(1)
        );
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/pikachu/"), None);
        assert_eq!(id_from_url(""), None);
    }

    #[test]
    fn skeleton_shown_while_loading_with_no_content() {
        let mut state = AppState {
            list_loading: true,
            ..Default::default()
        };
        assert_eq!(state.list_view(), ListView::Skeleton);

        state.mode = BrowseMode::TypeFilter {
            type_name: "fire".into(),
        };
        assert_eq!(state.list_view(), ListView::Skeleton);
    }

    #[test]
    fn search_in_flight_shows_skeleton_despite_existing_list() {
        let state = AppState {
            entries: refs(3),
            list_loading: true,
            mode: BrowseMode::Search {
                query: "pikachu".into(),
                result: None,
            },
            ..Default::default()
        };
        assert_eq!(state.list_view(), ListView::Skeleton);
    }

    #[test]
    fn empty_search_result_has_its_own_view() {
        let state = AppState {
            entries: refs(3),
            mode: BrowseMode::Search {
                query: "missingno".into(),
                result: Some(Vec::new()),
            },
            ..Default::default()
        };
        assert_eq!(
            state.list_view(),
            ListView::EmptySearch { query: "missingno" }
        );
    }

    #[test]
    fn populated_prefers_search_result_over_backing_list() {
        let hit = refs(1);
        let state = AppState {
            entries: refs(3),
            mode: BrowseMode::Search {
                query: "bulbasaur".into(),
                result: Some(hit.clone()),
            },
            ..Default::default()
        };
        assert_eq!(state.list_view(), ListView::Populated(&hit));
    }

    #[test]
    fn pending_search_falls_back_to_backing_list_when_not_loading() {
        let entries = refs(3);
        let state = AppState {
            entries: entries.clone(),
            mode: BrowseMode::Search {
                query: "pikachu".into(),
                result: None,
            },
            ..Default::default()
        };
        assert_eq!(state.list_view(), ListView::Populated(&entries));
    }

    #[test]
    fn set_selected_index_clamps_to_list() {
        let mut state = AppState {
            entries: refs(5),
            ..Default::default()
        };
        assert!(state.set_selected_index(3));
        assert_eq!(state.selected_index, 3);
        assert!(state.set_selected_index(99));
        assert_eq!(state.selected_index, 4);
        assert!(!state.set_selected_index(4));

        state.entries.clear();
        assert!(!state.set_selected_index(1));
        assert_eq!(state.selected_index, 0);
    }
}
