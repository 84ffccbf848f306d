//! Data-driven content for the adventure rules core.
//!
//! This crate houses the static game content and the registry that serves
//! it through the core's [`game_core::ContentOracle`] contract:
//! - named effect behaviors (code, one type per effect)
//! - NPC archetypes, interactable logic, item hooks, room hooks (code)
//! - ability/creature/class/item/room/floor/encounter templates (RON data)
//!
//! Content never appears in game state directly; the engines consume fresh
//! template clones per instantiation.
pub mod effects;
pub mod interactables;
pub mod items;
pub mod loaders;
pub mod npc;
pub mod registry;
pub mod rooms;

pub use loaders::{ContentFactory, ContentSources, RoomKindSpec};
pub use registry::Registry;
