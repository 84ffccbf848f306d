/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Base seed mixed into every random roll for this game.
    pub game_seed: u64,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Fixed number of battlefield slots in an encounter.
    pub const BATTLEFIELD_SLOTS: usize = 3;
    /// Maximum entries a numbered selection menu can render (1️⃣..🔟).
    pub const MAX_MENU_ENTRIES: usize = 10;

    pub fn new(game_seed: u64) -> Self {
        Self { game_seed }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
