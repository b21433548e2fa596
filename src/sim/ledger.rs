/// Collectible ledger: which cells have already been taken this attempt.
///
/// Overlap checks run every physics tick, so the same coin is "touched"
/// many times while the player stands on it. The ledger makes collection
/// idempotent: the first `try_collect` for a cell records it and scores,
/// every later one is a no-op.
///
/// Per kind the record is a bounded set (capacity `MAX_COLLECTABLE`,
/// assumed sufficient for any level). Inserting past capacity is an
/// explicit `Insert::Full` outcome, dropped rather than erroring.
/// Cleared on every level (re)entry.

pub const MAX_COLLECTABLE: usize = 30;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Kind {
    Coin,
    Diamond,
    Life,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Insert {
    Added,
    Duplicate,
    Full,
}

/// Fixed-capacity set of grid coordinates.
#[derive(Clone, Debug, Default)]
pub struct BoundedSet {
    cells: Vec<(usize, usize)>,
}

impl BoundedSet {
    pub fn new() -> Self {
        BoundedSet {
            cells: Vec::with_capacity(MAX_COLLECTABLE),
        }
    }

    pub fn insert(&mut self, row: usize, col: usize) -> Insert {
        if self.cells.contains(&(row, col)) {
            return Insert::Duplicate;
        }
        if self.cells.len() >= MAX_COLLECTABLE {
            return Insert::Full;
        }
        self.cells.push((row, col));
        Insert::Added
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub struct CollectibleLedger {
    coins: BoundedSet,
    diamonds: BoundedSet,
    lives: BoundedSet,
    // Mask totals, set at level load, for remaining() queries.
    coin_total: usize,
    diamond_total: usize,
    life_total: usize,
}

impl CollectibleLedger {
    pub fn new() -> Self {
        CollectibleLedger::default()
    }

    /// Fresh attempt: forget everything, adopt the new level's totals.
    pub fn reset(&mut self, coin_total: usize, diamond_total: usize, life_total: usize) {
        self.coins.clear();
        self.diamonds.clear();
        self.lives.clear();
        self.coin_total = coin_total;
        self.diamond_total = diamond_total;
        self.life_total = life_total;
    }

    fn set(&self, kind: Kind) -> &BoundedSet {
        match kind {
            Kind::Coin => &self.coins,
            Kind::Diamond => &self.diamonds,
            Kind::Life => &self.lives,
        }
    }

    fn set_mut(&mut self, kind: Kind) -> &mut BoundedSet {
        match kind {
            Kind::Coin => &mut self.coins,
            Kind::Diamond => &mut self.diamonds,
            Kind::Life => &mut self.lives,
        }
    }

    /// Record a pickup. True exactly once per cell per attempt.
    pub fn try_collect(&mut self, kind: Kind, row: usize, col: usize) -> bool {
        self.set_mut(kind).insert(row, col) == Insert::Added
    }

    /// Pure lookup; the renderer uses this to stop drawing taken items.
    pub fn is_collected(&self, kind: Kind, row: usize, col: usize) -> bool {
        self.set(kind).contains(row, col)
    }

    pub fn collected_count(&self, kind: Kind) -> usize {
        self.set(kind).len()
    }

    /// Mask total minus collected. Drives the "all collected" checks.
    pub fn remaining(&self, kind: Kind) -> usize {
        let total = match kind {
            Kind::Coin => self.coin_total,
            Kind::Diamond => self.diamond_total,
            Kind::Life => self.life_total,
        };
        total.saturating_sub(self.set(kind).len())
    }

    pub fn all_collected(&self, kind: Kind) -> bool {
        self.remaining(kind) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_is_idempotent() {
        let mut ledger = CollectibleLedger::new();
        ledger.reset(3, 0, 0);
        assert!(ledger.try_collect(Kind::Coin, 4, 7));
        assert!(!ledger.try_collect(Kind::Coin, 4, 7));
        assert!(!ledger.try_collect(Kind::Coin, 4, 7));
        assert_eq!(ledger.collected_count(Kind::Coin), 1);
        assert_eq!(ledger.remaining(Kind::Coin), 2);
    }

    #[test]
    fn kinds_are_independent() {
        let mut ledger = CollectibleLedger::new();
        ledger.reset(1, 1, 0);
        assert!(ledger.try_collect(Kind::Coin, 2, 2));
        // Same cell, different kind: still fresh.
        assert!(ledger.try_collect(Kind::Diamond, 2, 2));
        assert!(ledger.is_collected(Kind::Coin, 2, 2));
        assert!(ledger.is_collected(Kind::Diamond, 2, 2));
        assert!(!ledger.is_collected(Kind::Life, 2, 2));
    }

    #[test]
    fn reset_forgets_collections() {
        let mut ledger = CollectibleLedger::new();
        ledger.reset(2, 0, 0);
        assert!(ledger.try_collect(Kind::Coin, 0, 0));
        ledger.reset(2, 0, 0);
        assert!(!ledger.is_collected(Kind::Coin, 0, 0));
        assert!(ledger.try_collect(Kind::Coin, 0, 0));
        assert_eq!(ledger.remaining(Kind::Coin), 1);
    }

    #[test]
    fn all_collected_tracks_totals() {
        let mut ledger = CollectibleLedger::new();
        ledger.reset(2, 0, 0);
        assert!(!ledger.all_collected(Kind::Coin));
        // A kind with zero cells in the mask counts as fully collected.
        assert!(ledger.all_collected(Kind::Diamond));
        ledger.try_collect(Kind::Coin, 0, 1);
        ledger.try_collect(Kind::Coin, 0, 2);
        assert!(ledger.all_collected(Kind::Coin));
    }

    #[test]
    fn bounded_set_reports_full() {
        let mut set = BoundedSet::new();
        for i in 0..MAX_COLLECTABLE {
            assert_eq!(set.insert(0, i), Insert::Added);
        }
        assert_eq!(set.insert(1, 0), Insert::Full);
        // Duplicates are still detected at capacity.
        assert_eq!(set.insert(0, 0), Insert::Duplicate);
        assert_eq!(set.len(), MAX_COLLECTABLE);
    }
}
