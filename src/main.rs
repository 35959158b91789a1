//! Pokegrid - Pokedex grid browser TUI

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api::{self, ApiError};
use pokegrid::audio;
use pokegrid::components::{
    self, CatalogDisplay, CatalogDisplayProps, Component, DetailOverlay, DetailOverlayProps,
};
use pokegrid::components::detail_overlay::{OVERLAY_HEIGHT, OVERLAY_WIDTH};
use pokegrid::effect::Effect;
use pokegrid::reducer::reducer;
use pokegrid::state::{AppState, LOADING_TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "Browse, filter and inspect the Pokedex from the terminal")]
struct Args {
    /// Base URL of the catalog API
    #[arg(long, default_value = "https://pokeapi.co/api/v2")]
    api_base: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GridComponentId {
    Catalog,
    Search,
    Inspect,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum GridContext {
    Catalog,
    Search,
    Inspect,
}

impl EventRoutingState<GridComponentId, GridContext> for AppState {
    fn focused(&self) -> Option<GridComponentId> {
        if self.search.active {
            return Some(GridComponentId::Search);
        }
        if self.inspect.is_some() {
            return Some(GridComponentId::Inspect);
        }
        Some(GridComponentId::Catalog)
    }

    fn modal(&self) -> Option<GridComponentId> {
        if self.search.active {
            Some(GridComponentId::Search)
        } else if self.inspect.is_some() {
            Some(GridComponentId::Inspect)
        } else {
            None
        }
    }

    fn binding_context(&self, id: GridComponentId) -> GridContext {
        match id {
            GridComponentId::Catalog => GridContext::Catalog,
            GridComponentId::Search => GridContext::Search,
            GridComponentId::Inspect => GridContext::Inspect,
        }
    }

    fn default_context(&self) -> GridContext {
        GridContext::Catalog
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        debug: debug_args,
    } = Args::parse();
    api::set_base_url(api_base);

    let debug = DebugSession::new(debug_args);

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct PokegridUi {
    catalog: CatalogDisplay,
    overlay: DetailOverlay,
}

impl PokegridUi {
    fn new() -> Self {
        Self {
            catalog: CatalogDisplay::new(),
            overlay: DetailOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: ratatui::layout::Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<GridComponentId>,
    ) {
        event_ctx.set_component_area(GridComponentId::Catalog, area);
        if state.search.active {
            event_ctx.set_component_area(GridComponentId::Search, area);
        } else {
            event_ctx.component_areas.remove(&GridComponentId::Search);
        }

        let props = CatalogDisplayProps {
            state,
            is_focused: render_ctx.is_focused() && !state.search.active && state.inspect.is_none(),
        };
        self.catalog.render(frame, area, props);

        if let Some(inspect) = state.inspect.as_ref() {
            let modal_area = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area);
            event_ctx.set_component_area(GridComponentId::Inspect, modal_area);
            self.overlay.render(
                frame,
                area,
                DetailOverlayProps {
                    inspect,
                    is_focused: render_ctx.is_focused(),
                    tick: state.tick,
                },
            );
        } else {
            event_ctx.component_areas.remove(&GridComponentId::Inspect);
        }
    }

    fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.catalog.handle_event(event, props).into_iter().collect();
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

    fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(inspect) = state.inspect.as_ref() else {
            return HandlerResponse::ignored();
        };
        let props = DetailOverlayProps {
            inspect,
            is_focused: true,
            tick: state.tick,
        };
        let actions: Vec<_> = self.overlay.handle_event(event, props).into_iter().collect();
        // The overlay is modal: swallow everything while it is open.
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokegridUi::new()));
    let mut bus: EventBus<AppState, Action, GridComponentId, GridContext> = EventBus::new();
    let keybindings: Keybindings<GridContext> = Keybindings::new();

    let ui_catalog = Rc::clone(&ui);
    bus.register(GridComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    bus.register(GridComponentId::Search, |event, state| {
        components::handle_search_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(GridComponentId::Inspect, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadPage { offset } => {
            let key = format!("page_{offset}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_entry_page(offset).await {
                    Ok(entries) => Action::PageDidLoad { offset, entries },
                    Err(err) => Action::PageDidError(err.to_string()),
                }
            });
        }
        Effect::LoadTypeEntries { type_name } => {
            let key = format!("type_{type_name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_type_entries(&type_name).await {
                    Ok(entries) => Action::TypeEntriesDidLoad { type_name, entries },
                    Err(error) => Action::TypeEntriesDidError {
                        type_name,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LookupEntry { query } => {
            let key = format!("lookup_{query}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::lookup_entry(&query).await {
                    Ok(entry) => Action::SearchDidLoad(vec![entry]),
                    Err(ApiError::NotFound(_)) => Action::SearchDidNoMatch,
                    Err(error) => Action::SearchDidError(error.to_string()),
                }
            });
        }
        Effect::ComposeDetail { id } => {
            let key = format!("detail_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::compose_entry_bundle(id).await {
                    Ok(bundle) => Action::DetailDidLoad { id, bundle },
                    Err(error) => Action::DetailDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::PlayCry { url } => {
            ctx.tasks().spawn(TaskKey::new("cry"), async move {
                match api::fetch_bytes(&url).await {
                    Ok(bytes) => {
                        match tokio::task::spawn_blocking(move || audio::play_cue(bytes)).await {
                            Ok(Ok(())) => Action::Tick,
                            Ok(Err(error)) => Action::CryDidError(error),
                            Err(error) => Action::CryDidError(error.to_string()),
                        }
                    }
                    Err(error) => Action::CryDidError(error.to_string()),
                }
            });
        }
    }
}
