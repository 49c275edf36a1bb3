//! End-to-end reducer flows driven through `EffectStoreTestHarness`.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;

use pokedex::{
    action::Action,
    effect::Effect,
    favorites::{Favorites, JsonFileStorage, MemoryStorage},
    paginator::{Page, Paginator},
    reducer::reducer,
    state::{AppState, Item, Tab},
    view::ViewSource,
};

fn item(id: u32, name: &str) -> Item {
    Item {
        id,
        name: name.into(),
        sprite: format!("https://img.test/{name}.png"),
        weight: id * 10,
        height: id,
        types: vec!["normal".into()],
    }
}

fn state_with_favorites(names: &[&str]) -> AppState {
    let storage = MemoryStorage::with_names(names.iter().map(|name| name.to_string()).collect());
    AppState::new(Favorites::load(Arc::new(storage)), Paginator::new(2))
}

fn displayed(state: &AppState) -> Vec<String> {
    state
        .view()
        .displayed_items
        .into_iter()
        .map(|item| item.name)
        .collect()
}

#[test]
fn test_favorites_tab_resolves_then_follows_removal() {
    let mut harness =
        EffectStoreTestHarness::new(state_with_favorites(&["pikachu", "charizard"]), reducer);

    harness.dispatch_collect(Action::TabSelect(Tab::Favorites));
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::LoadFavorites { names } if names == &["pikachu", "charizard"])
    });

    harness.complete_action(Action::FavoritesDidLoad {
        names: vec!["pikachu".into(), "charizard".into()],
        items: vec![item(25, "pikachu"), item(6, "charizard")],
    });
    harness.process_emitted();
    harness.assert_state(|s| displayed(s) == vec!["pikachu", "charizard"]);

    harness.dispatch_collect(Action::FavoriteRemove("charizard".into()));
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(e, Effect::LoadFavorites { names } if names == &["pikachu"])
    });

    harness.complete_action(Action::FavoritesDidLoad {
        names: vec!["pikachu".into()],
        items: vec![item(25, "pikachu")],
    });
    harness.process_emitted();
    harness.assert_state(|s| displayed(s) == vec!["pikachu"]);
    harness.assert_state(|s| s.view().source == ViewSource::Favorites);
}

#[test]
fn test_returning_to_unchanged_favorites_uses_cache() {
    let mut harness = EffectStoreTestHarness::new(state_with_favorites(&["mew"]), reducer);

    harness.dispatch_collect(Action::TabSelect(Tab::Favorites));
    harness.drain_effects();
    harness.complete_action(Action::FavoritesDidLoad {
        names: vec!["mew".into()],
        items: vec![item(151, "mew")],
    });
    harness.process_emitted();

    harness.dispatch_collect(Action::TabSelect(Tab::All));
    harness.drain_effects();
    harness.dispatch_collect(Action::TabSelect(Tab::Favorites));

    let effects = harness.drain_effects();
    effects.effects_count(0);
    harness.assert_state(|s| displayed(s) == vec!["mew"]);
}

#[test]
fn test_empty_favorites_tab_shows_no_results() {
    let mut harness = EffectStoreTestHarness::new(state_with_favorites(&[]), reducer);

    harness.dispatch_collect(Action::TabSelect(Tab::Favorites));

    harness.drain_effects().effects_count(0);
    harness.assert_state(|s| s.view().show_no_results);
    harness.assert_state(|s| s.view().displayed_items.is_empty());
}

#[test]
fn test_search_without_matches_shows_no_results() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchStart);
    for ch in "nonexistent".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.drain_effects();
    harness.assert_state(|s| s.search.debouncer.is_pending());

    // one ticket per keystroke
    harness.dispatch_collect(Action::SearchDebounceElapsed(11));
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::SearchPokemon { query } if query == "nonexistent"),
    );
    harness.assert_state(|s| s.view().is_loading);

    harness.complete_action(Action::SearchDidLoad {
        query: "nonexistent".into(),
        items: Vec::new(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.view().source == ViewSource::Search);
    harness.assert_state(|s| s.view().show_no_results);
    harness.assert_state(|s| s.view().error.is_none());
}

#[test]
fn test_out_of_order_search_responses_keep_latest() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    for ch in "char".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchDebounceElapsed(4));
    harness.assert_state(|s| s.search.committed() == "char");

    for ch in "mander".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchDebounceElapsed(10));
    harness.assert_state(|s| s.search.committed() == "charmander");
    harness.drain_effects();

    harness.complete_action(Action::SearchDidLoad {
        query: "charmander".into(),
        items: vec![item(4, "charmander")],
    });
    harness.complete_action(Action::SearchDidLoad {
        query: "char".into(),
        items: vec![item(4, "charmander"), item(5, "charmeleon"), item(6, "charizard")],
    });
    harness.process_emitted();

    harness.assert_state(|s| displayed(s) == vec!["charmander"]);
}

#[test]
fn test_search_on_favorites_tab_is_limited_to_favorites() {
    let mut harness =
        EffectStoreTestHarness::new(state_with_favorites(&["pikachu"]), reducer);
    harness.dispatch_collect(Action::TabSelect(Tab::Favorites));
    harness.drain_effects();

    for ch in "chu".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchDebounceElapsed(3));
    harness.drain_effects();
    harness.complete_action(Action::SearchDidLoad {
        query: "chu".into(),
        items: vec![item(25, "pikachu"), item(26, "raichu")],
    });
    harness.process_emitted();

    harness.assert_state(|s| displayed(s) == vec!["pikachu"]);
}

#[test]
fn test_pages_accumulate_until_exhausted() {
    let mut harness = EffectStoreTestHarness::new(state_with_favorites(&[]), reducer);

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| *e == Effect::LoadPage { page: 1, limit: 2 });
    harness.assert_state(|s| s.view().is_loading);

    harness.complete_action(Action::PageDidLoad {
        page: 1,
        data: Page {
            items: vec![item(1, "bulbasaur"), item(2, "ivysaur")],
            total: 3,
            has_more: true,
        },
    });
    harness.process_emitted();

    harness.dispatch_collect(Action::PageLoadNext);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| *e == Effect::LoadPage { page: 2, limit: 2 });
    harness.assert_state(|s| s.view().is_fetching_next);
    harness.assert_state(|s| !s.view().is_loading);

    harness.complete_action(Action::PageDidLoad {
        page: 2,
        data: Page {
            items: vec![item(3, "venusaur")],
            total: 3,
            has_more: false,
        },
    });
    harness.process_emitted();

    harness.assert_state(|s| displayed(s) == vec!["bulbasaur", "ivysaur", "venusaur"]);
    harness.assert_state(|s| !s.paginator.has_next_page());

    let results = harness.dispatch_all([Action::PageLoadNext]);
    assert_eq!(results, vec![false]);
    harness.drain_effects().effects_count(0);
}

#[test]
fn test_favorites_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pokemon-favorite-ids.json");

    let favorites = Favorites::load(Arc::new(JsonFileStorage::new(&path)));
    let mut harness =
        EffectStoreTestHarness::new(AppState::new(favorites, Paginator::default()), reducer);
    harness.dispatch_collect(Action::FavoriteAdd("pikachu".into()));
    harness.dispatch_collect(Action::FavoriteAdd("eevee".into()));
    harness.dispatch_collect(Action::FavoriteToggle("pikachu".into()));
    harness.assert_state(|s| s.message.is_none());

    let reloaded = Favorites::load(Arc::new(JsonFileStorage::new(&path)));
    assert_eq!(reloaded.names(), &["eevee".to_string()]);
}
