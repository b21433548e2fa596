/// Things that happened during a tick or an input action.
///
/// The simulation reports these instead of touching the UI or audio
/// directly; the frontend decides what each one looks and sounds like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected { row: usize, col: usize },
    DiamondCollected { row: usize, col: usize },
    LifeCollected { row: usize, col: usize },
    /// Trap contact: player sent back to spawn, one life lost.
    TrapHit { lives_left: u32 },
    /// Lives hit zero. Carries the score at the moment of death.
    GameOver { score: u32 },
    /// Player ran off the right edge of the screen.
    LevelComplete { stars: u8, score: u32 },
    PlayerJumped,
    PlayerLanded,
}
