//! Saga - hero progression and combat resolution engine for an idle
//! adventure RPG.
//!
//! This library holds all game rules: layered stat bonuses, lazy health
//! regeneration, dice checks, turn-based combat, location progression and
//! persistence. Presentation layers drive it through
//! [`game_state::GameState`] and re-read state after each call.

pub mod bonus;
pub mod catalog;
pub mod combat_logic;
pub mod constants;
pub mod derived_stats;
pub mod encounter;
pub mod equipment;
pub mod game_state;
pub mod hero;
pub mod items;
pub mod locations;
pub mod monsters;
pub mod progression;
pub mod save_manager;
pub mod simulator;
