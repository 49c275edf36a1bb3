use std::time::Instant;

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::debounce::DebounceStep;
use crate::effect::Effect;
use crate::favorites::{Favorites, Mutation};
use crate::query::list_key;
use crate::state::{AppState, Tab};
use crate::view::ViewSource;

/// Rows from the end of the listing at which the next page is requested.
pub const PREFETCH_MARGIN: usize = 3;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            let mut effects = refresh_listing(state);
            effects.extend(sync_favorites(state));
            changed_with(effects)
        }

        Action::Refresh => {
            state.message = None;
            let mut effects = refresh_listing(state);
            effects.extend(sync_favorites(state));
            if state.search.has_searched() {
                let query = state.search.committed().to_string();
                effects.extend(commit_query(state, query));
            }
            changed_with(effects)
        }

        Action::TabNext => select_tab(state, state.tab.toggle()),

        Action::TabSelect(tab) => {
            if state.tab == tab {
                return DispatchResult::unchanged();
            }
            select_tab(state, tab)
        }

        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.input.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.input.clear();
            apply_input(state)
        }

        Action::SearchSubmit => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.input.push(ch);
            apply_input(state)
        }

        Action::SearchBackspace => {
            if state.search.input.pop().is_none() {
                return DispatchResult::unchanged();
            }
            apply_input(state)
        }

        Action::SearchClear => {
            if state.search.input.is_empty() && !state.search.has_searched() {
                return DispatchResult::unchanged();
            }
            state.search.input.clear();
            apply_input(state)
        }

        Action::SearchDebounceElapsed(ticket) => match state.search.debouncer.fire(ticket) {
            Some(query) => {
                tracing::debug!(%query, "search committed");
                changed_with(commit_query(state, query))
            }
            None => DispatchResult::unchanged(),
        },

        Action::SearchDidLoad { query, items } => {
            state
                .search
                .cache
                .insert(query.as_str(), items.clone(), Instant::now());
            if query != state.search.committed() {
                tracing::trace!(%query, "search result superseded");
                return DispatchResult::unchanged();
            }
            state.search.results = DataResource::Loaded(items);
            clamp_selection(state);
            DispatchResult::changed()
        }

        Action::SearchDidError { query, error } => {
            if query != state.search.committed() {
                return DispatchResult::unchanged();
            }
            tracing::warn!(%query, %error, "search failed");
            state.search.results = DataResource::Failed(error);
            clamp_selection(state);
            DispatchResult::changed()
        }

        Action::PageLoadNext => {
            let effects = load_next_page(state);
            if effects.is_empty() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::PageDidLoad { page, data } => {
            if !state.paginator.complete(page, Ok(data), Instant::now()) {
                return DispatchResult::unchanged();
            }
            clamp_selection(state);
            DispatchResult::changed()
        }

        Action::PageDidError { page, error } => {
            tracing::warn!(page, %error, "page failed");
            if !state.paginator.complete(page, Err(error), Instant::now()) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::FavoritesDidLoad { names, items } => {
            state
                .favorite_cache
                .insert(list_key(&names), items.clone(), Instant::now());
            if names.as_slice() != state.favorites.names() {
                tracing::trace!(count = names.len(), "favorites result superseded");
                return DispatchResult::unchanged();
            }
            state.favorite_items = DataResource::Loaded(items);
            clamp_selection(state);
            DispatchResult::changed()
        }

        Action::FavoriteToggle(name) => mutate_favorites(state, |favs| favs.toggle(&name)),
        Action::FavoriteAdd(name) => mutate_favorites(state, |favs| favs.add(&name)),
        Action::FavoriteRemove(name) => mutate_favorites(state, |favs| favs.remove(&name)),
        Action::FavoritesClear => mutate_favorites(state, Favorites::clear),

        Action::ToggleFavorite => {
            let Some(item) = state.selected_item() else {
                return DispatchResult::unchanged();
            };
            mutate_favorites(state, |favs| favs.toggle(&item.name))
        }

        Action::SelectionSet(index) => {
            let len = state.view().displayed_items.len();
            let moved = state.set_selected_index(index, len);
            let effects = prefetch(state);
            if !moved && effects.is_empty() {
                return DispatchResult::unchanged();
            }
            changed_with(effects)
        }

        Action::SelectionMove(delta) => {
            let len = state.view().displayed_items.len();
            let target = if delta.is_negative() {
                state
                    .selected_index
                    .saturating_sub(delta.unsigned_abs() as usize)
            } else {
                state.selected_index.saturating_add(delta as usize)
            };
            let moved = state.set_selected_index(target, len);
            let effects = prefetch(state);
            if !moved && effects.is_empty() {
                return DispatchResult::unchanged();
            }
            changed_with(effects)
        }

        Action::SelectionJumpTop => {
            let len = state.view().displayed_items.len();
            if state.set_selected_index(0, len) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SelectionJumpBottom => {
            let len = state.view().displayed_items.len();
            let moved = state.set_selected_index(len.saturating_sub(1), len);
            let effects = prefetch(state);
            if !moved && effects.is_empty() {
                return DispatchResult::unchanged();
            }
            changed_with(effects)
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_with(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn select_tab(state: &mut AppState, tab: Tab) -> DispatchResult<Effect> {
    state.tab = tab;
    state.selected_index = 0;
    let mut effects = sync_favorites(state);
    if tab == Tab::All && state.paginator.pages().is_empty() {
        effects.extend(refresh_listing(state));
    }
    changed_with(effects)
}

/// Feeds the search box into the debouncer.
fn apply_input(state: &mut AppState) -> DispatchResult<Effect> {
    let input = state.search.input.clone();
    match state.search.debouncer.input(&input) {
        DebounceStep::Scheduled(ticket) => {
            DispatchResult::changed_with(Effect::DebounceSearch { ticket })
        }
        DebounceStep::Cleared => {
            let mut effects = vec![Effect::CancelSearchDebounce];
            effects.extend(commit_query(state, String::new()));
            DispatchResult::changed_with_many(effects)
        }
    }
}

fn commit_query(state: &mut AppState, query: String) -> Vec<Effect> {
    state.selected_index = 0;
    if query.is_empty() {
        state.search.results = DataResource::Empty;
        return sync_favorites(state);
    }
    match state.search.cache.get_fresh(&query, Instant::now()) {
        Some(items) => {
            state.search.results = DataResource::Loaded(items);
            Vec::new()
        }
        None => {
            state.search.results = DataResource::Loading;
            vec![Effect::SearchPokemon { query }]
        }
    }
}

/// Brings `favorite_items` in line with the current favorites list. Only
/// resolves while the favorites tab is showing.
fn sync_favorites(state: &mut AppState) -> Vec<Effect> {
    if state.tab != Tab::Favorites {
        return Vec::new();
    }
    let names = state.favorites.names().to_vec();
    if names.is_empty() {
        state.favorite_items = DataResource::Loaded(Vec::new());
        return Vec::new();
    }
    if let Some(items) = state
        .favorite_cache
        .get_fresh(&list_key(&names), Instant::now())
    {
        state.favorite_items = DataResource::Loaded(items);
        return Vec::new();
    }
    state.favorite_items = DataResource::Loading;
    vec![Effect::LoadFavorites { names }]
}

fn mutate_favorites(
    state: &mut AppState,
    apply: impl FnOnce(&mut Favorites) -> Mutation,
) -> DispatchResult<Effect> {
    let mutation = apply(&mut state.favorites);
    if !mutation.changed {
        return DispatchResult::unchanged();
    }
    state.message = mutation
        .warning
        .map(|err| format!("Favorites not saved: {err}"));
    let effects = sync_favorites(state);
    clamp_selection(state);
    changed_with(effects)
}

fn refresh_listing(state: &mut AppState) -> Vec<Effect> {
    state
        .paginator
        .refresh(Instant::now())
        .map(|request| Effect::LoadPage {
            page: request.page,
            limit: request.limit,
        })
        .into_iter()
        .collect()
}

fn load_next_page(state: &mut AppState) -> Vec<Effect> {
    state
        .paginator
        .load_next()
        .map(|request| Effect::LoadPage {
            page: request.page,
            limit: request.limit,
        })
        .into_iter()
        .collect()
}

fn prefetch(state: &mut AppState) -> Vec<Effect> {
    let view = state.view();
    let len = view.displayed_items.len();
    if view.source != ViewSource::Listing || len == 0 {
        return Vec::new();
    }
    if state.selected_index + PREFETCH_MARGIN < len {
        return Vec::new();
    }
    load_next_page(state)
}

fn clamp_selection(state: &mut AppState) {
    let len = state.view().displayed_items.len();
    state.set_selected_index(state.selected_index, len);
}
