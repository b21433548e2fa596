/// Progression rules: star rating and high-score ordering.
///
/// Pure functions — no side effects, no I/O.
///
/// ## Star rating at level completion
/// ┌──────────────────────────────────────────────┬───────┐
/// │ Condition (priority order)                   │ Stars │
/// ├──────────────────────────────────────────────┼───────┤
/// │ lives == 3 AND all coins AND all diamonds    │ 3     │
/// │ (lives == 3) XOR (all coins and diamonds)    │ 2     │
/// │ otherwise (level merely finished)            │ 1     │
/// └──────────────────────────────────────────────┴───────┘
///
/// ## Best-result ordering
/// (stars, score) pairs compare by stars first, then score. A stored
/// best is replaced only by a STRICTLY better result.

/// Stars awarded for a completed attempt. Always 1..=3.
pub fn star_rating(lives: u32, all_coins: bool, all_diamonds: bool) -> u8 {
    let full_lives = lives == 3;
    let full_sweep = all_coins && all_diamonds;
    if full_lives && full_sweep {
        3
    } else if full_lives != full_sweep {
        2
    } else {
        1
    }
}

/// One per-level result: stars then score, in that precedence.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct BestResult {
    pub stars: u8,
    pub score: u32,
}

impl BestResult {
    pub fn new(stars: u8, score: u32) -> Self {
        BestResult { stars, score }
    }

    /// Strictly better under the (stars, score) ordering.
    /// Equal stars with a higher score counts as better.
    pub fn beats(self, other: BestResult) -> bool {
        self.stars > other.stars || (self.stars == other.stars && self.score > other.score)
    }
}
