#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Arm (or re-arm) the quiet-window timer for `ticket`.
    DebounceSearch { ticket: u64 },
    CancelSearchDebounce,
    SearchPokemon { query: String },
    LoadPage { page: u32, limit: usize },
    LoadFavorites { names: Vec<String> },
}
