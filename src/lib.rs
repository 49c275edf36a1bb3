//! Pokedex - browse, search and favorite Pokemon from PokeAPI
//!
//! The binary is a thin terminal shell; everything it dispatches lives here.

pub mod action;
pub mod api;
pub mod batch;
pub mod debounce;
pub mod effect;
pub mod favorites;
pub mod logging;
pub mod paginator;
pub mod query;
pub mod reducer;
pub mod search;
pub mod state;
pub mod tasks;
pub mod view;

#[cfg(test)]
mod fixtures;
