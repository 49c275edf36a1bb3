mod ui;

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{PokeApiClient, PokemonProvider, API_BASE};
use pokedex::debounce::DEBOUNCE_WINDOW;
use pokedex::effect::Effect;
use pokedex::favorites::{self, Favorites, JsonFileStorage};
use pokedex::paginator::{Paginator, DEFAULT_PAGE_SIZE};
use pokedex::reducer::reducer;
use pokedex::state::{AppState, Tab};
use pokedex::{logging, tasks};

const SEARCH_DEBOUNCE_KEY: &str = "search_debounce";

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse, search and favorite Pokemon from PokeAPI")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Entries per listing page (minimum 1)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE as u64, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: u64,

    /// Where favorites are persisted
    #[arg(long)]
    favorites_file: Option<PathBuf>,

    /// Write tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Debug-level logging for this crate
    #[arg(long, short)]
    verbose: bool,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    List,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    List,
    Search,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else {
            Some(DexComponentId::List)
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::List => DexContext::List,
            DexComponentId::Search => DexContext::Search,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        page_size,
        favorites_file,
        log_file,
        verbose,
        debug: debug_args,
    } = Args::parse();

    logging::init(log_file.as_deref(), verbose)?;

    let debug = DebugSession::new(debug_args);

    let favorites_path = favorites_file.unwrap_or_else(favorites::default_path);
    tracing::info!(api = %api_base, favorites = %favorites_path.display(), "starting");

    let state = debug
        .load_state_or_else_async(move || async move {
            let storage = Arc::new(JsonFileStorage::new(favorites_path));
            let favorites = Favorites::load(storage);
            Ok::<AppState, io::Error>(AppState::new(
                favorites,
                Paginator::new(page_size as usize),
            ))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let provider: Arc<dyn PokemonProvider> = Arc::new(PokeApiClient::new(api_base));

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, provider, replay_actions).await;

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

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    provider: Arc<dyn PokemonProvider>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ui::DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab => HandlerResponse::action(Action::TabNext),
            crossterm::event::KeyCode::Char('1') => {
                HandlerResponse::action(Action::TabSelect(Tab::All))
            }
            crossterm::event::KeyCode::Char('2') => {
                HandlerResponse::action(Action::TabSelect(Tab::Favorites))
            }
            crossterm::event::KeyCode::Char('/') => HandlerResponse::action(Action::SearchStart),
            crossterm::event::KeyCode::Char('r') => HandlerResponse::action(Action::Refresh),
            _ => HandlerResponse::ignored(),
        },
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
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(&provider, effect, ctx),
        )
        .await
}

fn handle_effect(
    provider: &Arc<dyn PokemonProvider>,
    effect: Effect,
    ctx: &mut EffectContext<Action>,
) {
    match effect {
        Effect::DebounceSearch { ticket } => {
            ctx.tasks()
                .debounce(SEARCH_DEBOUNCE_KEY, DEBOUNCE_WINDOW, async move {
                    Action::SearchDebounceElapsed(ticket)
                });
        }
        Effect::CancelSearchDebounce => {
            ctx.tasks().cancel(&TaskKey::new(SEARCH_DEBOUNCE_KEY));
        }
        Effect::SearchPokemon { query } => {
            let key = format!("search_{query}");
            let provider = Arc::clone(provider);
            ctx.tasks()
                .spawn(TaskKey::new(key), tasks::search(provider, query));
        }
        Effect::LoadPage { page, limit } => {
            let key = format!("page_{page}");
            let provider = Arc::clone(provider);
            ctx.tasks()
                .spawn(TaskKey::new(key), tasks::load_page(provider, page, limit));
        }
        Effect::LoadFavorites { names } => {
            let provider = Arc::clone(provider);
            ctx.tasks()
                .spawn(TaskKey::new("favorites"), tasks::load_favorites(provider, names));
        }
    }
}
