use serde::{Deserialize, Serialize};

use crate::paginator::Page;
use crate::state::{Item, Tab};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    Refresh,

    TabNext,
    TabSelect(Tab),

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    SearchDebounceElapsed(u64),
    SearchDidLoad { query: String, items: Vec<Item> },
    SearchDidError { query: String, error: String },

    PageLoadNext,
    PageDidLoad { page: u32, data: Page },
    PageDidError { page: u32, error: String },

    FavoritesDidLoad { names: Vec<String>, items: Vec<Item> },
    FavoriteToggle(String),
    FavoriteAdd(String),
    FavoriteRemove(String),
    FavoritesClear,
    ToggleFavorite,

    SelectionSet(usize),
    SelectionMove(i16),
    SelectionJumpTop,
    SelectionJumpBottom,

    UiTerminalResize(u16, u16),
    Quit,
}
