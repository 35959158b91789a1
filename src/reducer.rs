//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, BrowseMode, InspectState, SearchState, ALL_TYPES, PAGE_SIZE, TYPE_FILTERS};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.list_loading = true;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadPage { offset: 0 })
        }

        // ===== Paged browsing =====
        Action::PageDidLoad { offset, entries } => {
            // A response for a mode the user has already left is dropped;
            // among same-mode duplicates the last writer wins.
            if !matches!(state.mode, BrowseMode::Paged { .. }) {
                return DispatchResult::unchanged();
            }
            state.mode = BrowseMode::Paged { offset };
            state.entries = entries;
            state.list_loading = false;
            state.selected_index = 0;
            DispatchResult::changed()
        }

        Action::PageDidError(error) => {
            state.list_loading = false;
            state.message = Some(format!("Load error: {error}"));
            DispatchResult::changed()
        }

        Action::PageNext => {
            let BrowseMode::Paged { offset } = state.mode else {
                return DispatchResult::unchanged();
            };
            state.list_loading = true;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadPage {
                offset: offset + PAGE_SIZE,
            })
        }

        Action::PagePrev => {
            let BrowseMode::Paged { offset } = state.mode else {
                return DispatchResult::unchanged();
            };
            if offset == 0 {
                return DispatchResult::unchanged();
            }
            state.list_loading = true;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadPage {
                offset: offset - PAGE_SIZE,
            })
        }

        // ===== Type filter tabs =====
        Action::TypeTabNext => cycle_type_tab(state, 1),
        Action::TypeTabPrev => cycle_type_tab(state, -1),

        Action::TypeEntriesDidLoad { type_name, entries } => {
            if state.mode.type_filter() != Some(type_name.as_str()) {
                return DispatchResult::unchanged();
            }
            state.entries = entries;
            state.list_loading = false;
            state.selected_index = 0;
            DispatchResult::changed()
        }

        Action::TypeEntriesDidError { type_name, error } => {
            if state.mode.type_filter() == Some(type_name.as_str()) {
                state.list_loading = false;
            }
            state.message = Some(format!("Type {type_name} error: {error}"));
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchStart => {
            if state.inspect.is_some() {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.query.pop();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            let query = state.search.query.trim().to_lowercase();
            if query.is_empty() {
                // An empty submit while viewing a result acts as a clear.
                if matches!(state.mode, BrowseMode::Search { .. }) {
                    return clear_search(state);
                }
                return DispatchResult::changed();
            }
            state.mode = BrowseMode::Search {
                query: query.clone(),
                result: None,
            };
            state.list_loading = true;
            state.message = None;
            state.selected_index = 0;
            DispatchResult::changed_with(Effect::LookupEntry { query })
        }

        Action::SearchClear => {
            if !matches!(state.mode, BrowseMode::Search { .. }) {
                return DispatchResult::unchanged();
            }
            clear_search(state)
        }

        Action::SearchDidLoad(entries) => {
            let BrowseMode::Search { result, .. } = &mut state.mode else {
                return DispatchResult::unchanged();
            };
            *result = Some(entries);
            state.list_loading = false;
            state.selected_index = 0;
            DispatchResult::changed()
        }

        Action::SearchDidNoMatch => {
            let BrowseMode::Search { result, .. } = &mut state.mode else {
                return DispatchResult::unchanged();
            };
            // Zero matches is its own view, not a banner.
            *result = Some(Vec::new());
            state.list_loading = false;
            state.selected_index = 0;
            DispatchResult::changed()
        }

        Action::SearchDidError(error) => {
            if !matches!(state.mode, BrowseMode::Search { .. }) {
                return DispatchResult::unchanged();
            }
            state.list_loading = false;
            state.message = Some(format!("Search error: {error}"));
            DispatchResult::changed()
        }

        // ===== Grid selection =====
        Action::SelectionMove(delta) => {
            if state.active_entries().is_empty() {
                return DispatchResult::unchanged();
            }
            let index = (state.selected_index as i32 + delta as i32).max(0);
            if !state.set_selected_index(index as usize) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        // ===== Inspection overlay =====
        Action::InspectOpen => {
            if state.inspect.is_some() {
                return DispatchResult::unchanged();
            }
            let Some(entry) = state.selected_entry().cloned() else {
                return DispatchResult::unchanged();
            };
            let Some(id) = entry.id() else {
                state.message = Some(format!("Unrecognized entry url: {}", entry.url));
                return DispatchResult::changed();
            };
            state.inspect = Some(InspectState {
                id,
                name: entry.name,
                view: DataResource::Loading,
            });
            DispatchResult::changed_with(Effect::ComposeDetail { id })
        }

        Action::InspectClose => {
            // The in-flight composition is not aborted; its completion is
            // discarded by the id guards below.
            if state.inspect.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::DetailDidLoad { id, bundle } => {
            let Some(inspect) = state.inspect.as_mut().filter(|inspect| inspect.id == id) else {
                return DispatchResult::unchanged();
            };
            inspect.view = DataResource::Loaded(bundle);
            DispatchResult::changed()
        }

        Action::DetailDidError { id, error } => {
            let Some(inspect) = state.inspect.as_mut().filter(|inspect| inspect.id == id) else {
                return DispatchResult::unchanged();
            };
            inspect.view = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::PlayCry => {
            let Some(inspect) = state.inspect.as_ref() else {
                return DispatchResult::unchanged();
            };
            let Some(bundle) = inspect.view.data() else {
                return DispatchResult::unchanged();
            };
            let Some(url) = bundle.detail.cry_url.clone() else {
                state.message = Some("No cry available.".to_string());
                return DispatchResult::changed();
            };
            DispatchResult::changed_with(Effect::PlayCry { url })
        }

        Action::CryDidError(error) => {
            state.message = Some(format!("Cry error: {error}"));
            DispatchResult::changed()
        }

        // ===== Global =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            let animating = state.list_loading
                || state
                    .inspect
                    .as_ref()
                    .is_some_and(|inspect| inspect.view.is_loading());
            if !animating {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn cycle_type_tab(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    let len = TYPE_FILTERS.len() as i16;
    let mut next = state.current_type_tab() as i16 + step;
    if next < 0 {
        next = len - 1;
    } else if next >= len {
        next = 0;
    }
    select_type_tab(state, TYPE_FILTERS[next as usize])
}

/// Entering a tab clears search state; the `all` sentinel goes back to
/// paged browsing at offset 0 and never reaches the type endpoint.
fn select_type_tab(state: &mut AppState, type_name: &str) -> DispatchResult<Effect> {
    state.search = SearchState::default();
    state.message = None;
    state.selected_index = 0;
    if type_name == ALL_TYPES {
        state.mode = BrowseMode::Paged { offset: 0 };
        state.entries.clear();
        state.list_loading = true;
        return DispatchResult::changed_with(Effect::LoadPage { offset: 0 });
    }
    state.mode = BrowseMode::TypeFilter {
        type_name: type_name.to_string(),
    };
    state.list_loading = true;
    DispatchResult::changed_with(Effect::LoadTypeEntries {
        type_name: type_name.to_string(),
    })
}

fn clear_search(state: &mut AppState) -> DispatchResult<Effect> {
    state.search = SearchState::default();
    state.mode = BrowseMode::Paged { offset: 0 };
    state.entries.clear();
    state.list_loading = true;
    state.message = None;
    state.selected_index = 0;
    DispatchResult::changed_with(Effect::LoadPage { offset: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EntryRef;

    fn page(count: usize) -> Vec<EntryRef> {
        (1..=count as u32)
            .map(|id| EntryRef {
                name: format!("entry-{id}"),
                url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            })
            .collect()
    }

    fn paged_state(offset: u32) -> AppState {
        AppState {
            mode: BrowseMode::Paged { offset },
            entries: page(20),
            ..Default::default()
        }
    }

    #[test]
    fn test_next_requests_following_page() {
        let mut state = paged_state(0);
        let result = reducer(&mut state, Action::PageNext);
        assert!(result.changed);
        assert!(state.list_loading);
        assert_eq!(result.effects, vec![Effect::LoadPage { offset: 20 }]);
    }

    #[test]
    fn test_next_has_no_upper_bound() {
        let mut state = paged_state(980);
        let result = reducer(&mut state, Action::PageNext);
        assert_eq!(result.effects, vec![Effect::LoadPage { offset: 1000 }]);
    }

    #[test]
    fn test_prev_is_noop_at_offset_zero() {
        let mut state = paged_state(0);
        let result = reducer(&mut state, Action::PagePrev);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert!(!state.list_loading);
    }

    #[test]
    fn test_prev_steps_back_one_page() {
        let mut state = paged_state(40);
        let result = reducer(&mut state, Action::PagePrev);
        assert_eq!(result.effects, vec![Effect::LoadPage { offset: 20 }]);
    }

    #[test]
    fn test_pagination_ignored_outside_paged_mode() {
        let mut state = AppState {
            mode: BrowseMode::TypeFilter {
                type_name: "fire".into(),
            },
            entries: page(20),
            ..Default::default()
        };
        assert!(!reducer(&mut state, Action::PageNext).changed);
        assert!(!reducer(&mut state, Action::PagePrev).changed);

        state.mode = BrowseMode::Search {
            query: "pikachu".into(),
            result: Some(page(1)),
        };
        assert!(!reducer(&mut state, Action::PageNext).changed);
    }

    #[test]
    fn test_page_offset_updates_when_response_lands() {
        let mut state = paged_state(0);
        reducer(&mut state, Action::PageNext);
        let result = reducer(
            &mut state,
            Action::PageDidLoad {
                offset: 20,
                entries: page(20),
            },
        );
        assert!(result.changed);
        assert_eq!(state.mode.page_offset(), Some(20));
        assert!(!state.list_loading);
    }

    #[test]
    fn test_stale_page_response_discarded_after_mode_change() {
        let mut state = AppState {
            mode: BrowseMode::TypeFilter {
                type_name: "fire".into(),
            },
            ..Default::default()
        };
        let result = reducer(
            &mut state,
            Action::PageDidLoad {
                offset: 20,
                entries: page(20),
            },
        );
        assert!(!result.changed);
        assert!(state.entries.is_empty());
    }
}
