//! Integrated flows using EffectStoreTestHarness
//!
//! Store, component and render testing combined: dispatch intent actions,
//! simulate async completions, assert on state and rendered output.

use pokegrid::{
    action::Action,
    components::{CatalogDisplay, CatalogDisplayProps, Component},
    effect::Effect,
    reducer::reducer,
    state::{artwork_url, AppState, BrowseMode, EntryBundle, EntryDetail, EntryRef, EvolutionStage,
        ListView},
};
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

fn entry(name: &str, id: u32) -> EntryRef {
    EntryRef {
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
    }
}

fn page(count: usize) -> Vec<EntryRef> {
    (1..=count as u32)
        .map(|id| entry(&format!("entry-{id}"), id))
        .collect()
}

fn mock_bundle() -> EntryBundle {
    EntryBundle {
        detail: EntryDetail {
            id: 1,
            name: "bulbasaur".into(),
            types: vec!["grass".into(), "poison".into()],
            stats: Vec::new(),
            abilities: Vec::new(),
            artwork_url: artwork_url(1),
            cry_url: None,
        },
        evolution: vec![
            EvolutionStage {
                name: "bulbasaur".into(),
                id: 1,
                image_url: artwork_url(1),
            },
            EvolutionStage {
                name: "ivysaur".into(),
                id: 2,
                image_url: artwork_url(2),
            },
        ],
    }
}

macro_rules! loaded_harness {
    () => {{
        let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
        harness.dispatch_collect(Action::Init);
        harness.drain_effects();
        harness.complete_action(Action::PageDidLoad {
            offset: 0,
            entries: page(20),
        });
        harness.process_emitted();
        harness
    }};
}

#[test]
fn test_initial_load_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.list_loading);
    harness.assert_state(|s| s.list_view() == ListView::Skeleton);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPage { offset: 0 }));

    harness.complete_action(Action::PageDidLoad {
        offset: 0,
        entries: page(20),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| !s.list_loading);
    harness.assert_state(|s| s.active_entries().len() == 20);
}

#[test]
fn test_search_flow_not_found() {
    let mut harness = loaded_harness!();

    harness.dispatch_collect(Action::SearchStart);
    for ch in "missingno".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchSubmit);

    let effects = harness.drain_effects();
    effects.effects_first_matches(
        |e| matches!(e, Effect::LookupEntry { query } if query == "missingno"),
    );

    // Search in flight with no prior result: skeleton even though a list
    // is loaded underneath.
    harness.assert_state(|s| s.list_view() == ListView::Skeleton);

    harness.complete_action(Action::SearchDidNoMatch);
    harness.process_emitted();

    harness.assert_state(|s| {
        s.list_view()
            == ListView::EmptySearch {
                query: "missingno",
            }
    });
}

#[test]
fn test_search_flow_hit() {
    let mut harness = loaded_harness!();

    harness.dispatch_collect(Action::SearchStart);
    for ch in "pikachu".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchSubmit);
    harness.drain_effects();

    harness.complete_action(Action::SearchDidLoad(vec![entry("pikachu", 25)]));
    harness.process_emitted();

    harness.assert_state(|s| s.active_entries().len() == 1);
    harness.assert_state(|s| s.active_entries()[0].name == "pikachu");
    harness.assert_state(|s| matches!(&s.mode, BrowseMode::Search { .. }));
}

#[test]
fn test_compose_flow_reaches_loaded_overlay() {
    let mut harness = loaded_harness!();

    harness.dispatch_collect(Action::InspectOpen);
    harness.assert_state(|s| s.inspect.as_ref().is_some_and(|i| i.view.is_loading()));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::ComposeDetail { id: 1 }));

    harness.complete_action(Action::DetailDidLoad {
        id: 1,
        bundle: mock_bundle(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.inspect.as_ref().is_some_and(|i| i.view.is_loaded()));
    harness.assert_state(|s| {
        s.inspect
            .as_ref()
            .and_then(|i| i.view.data())
            .is_some_and(|bundle| bundle.evolution.len() == 2)
    });
}

#[test]
fn test_compose_failure_is_terminal() {
    let mut harness = loaded_harness!();

    harness.dispatch_collect(Action::InspectOpen);
    harness.drain_effects();

    harness.complete_action(Action::DetailDidError {
        id: 1,
        error: "request failed: timeout".into(),
    });
    harness.process_emitted();

    // The overlay must not be stuck in a loading state forever.
    harness.assert_state(|s| s.inspect.as_ref().is_some_and(|i| i.view.is_failed()));
}

#[test]
fn test_keyboard_next_page_through_component() {
    let mut harness = loaded_harness!();
    let mut component = CatalogDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("n", |state, event| {
        let props = CatalogDisplayProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::PageNext);

    harness.dispatch_collect(Action::PageNext);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPage { offset: 20 }));
}

#[test]
fn test_keyboard_grid_navigation() {
    let mut harness = loaded_harness!();
    let mut component = CatalogDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("l l j", |state, event| {
        let props = CatalogDisplayProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    // Each key maps to one selection move.
    actions.assert_count(3);
    for action in actions {
        harness.dispatch_collect(action);
    }
    // Two steps right plus one row down.
    harness.assert_state(|s| s.selected_index == 2 + s.grid_columns());
}

#[test]
fn test_render_populated_grid_through_harness() {
    let mut harness = loaded_harness!();
    let mut component = CatalogDisplay::new();

    let output = harness.render_plain(80, 30, |frame, area, state| {
        let props = CatalogDisplayProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert!(
        output.contains("Entry 1"),
        "Grid should show the first card:\n{}",
        output
    );
    assert!(
        output.contains("Page 1"),
        "Header should show the page number:\n{}",
        output
    );
}

#[test]
fn test_effect_assertions() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    let effects = harness.drain_effects();
    effects.effects_empty();

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_not_empty();
    effects.effects_count(1);
    effects.effects_all_match(|e| matches!(e, Effect::LoadPage { .. }));
    effects.effects_none_match(|e| matches!(e, Effect::LookupEntry { .. }));
}

#[test]
fn test_multiple_async_completions() {
    let mut harness = loaded_harness!();

    harness.complete_action(Action::UiTerminalResize(100, 40));
    harness.complete_action(Action::PageDidError("boom".into()));

    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 2);
    assert_eq!(changed, 2);

    harness.assert_state(|s| s.terminal_size == (100, 40));
    harness.assert_state(|s| s.message.as_deref() == Some("Load error: boom"));
}
