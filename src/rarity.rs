use serde::Serialize;
use std::fmt;

/// The eight reward tiers, declared most common first. The weighted draw
/// walks tiers in this order and inventory views show it reversed, so the
/// derived `Ord` is significant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Secret,
    Divine,
}

impl Rarity {
    pub const ALL: [Rarity; 8] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::Secret,
        Rarity::Divine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
            Rarity::Secret => "Secret",
            Rarity::Divine => "Divine",
        }
    }

    /// Base drop chance in percent. The raw table does not sum to 100; the
    /// draw always renormalizes, see `engine::effective_chances`.
    pub fn base_chance(self) -> f64 {
        match self {
            Rarity::Common => 50.0,
            Rarity::Uncommon => 20.0,
            Rarity::Rare => 12.0,
            Rarity::Epic => 7.0,
            Rarity::Legendary => 5.0,
            Rarity::Mythic => 1.0,
            Rarity::Secret => 0.2,
            Rarity::Divine => 0.08,
        }
    }

    /// Inclusive value range for items of this tier.
    pub fn value_range(self) -> (u64, u64) {
        match self {
            Rarity::Common => (1, 3),
            Rarity::Uncommon => (4, 8),
            Rarity::Rare => (12, 35),
            Rarity::Epic => (40, 65),
            Rarity::Legendary => (75, 150),
            Rarity::Mythic => (200, 1000),
            Rarity::Secret => (1500, 3000),
            Rarity::Divine => (5000, 10000),
        }
    }

    /// Midpoint of the value range, the per-item price used when selling.
    pub fn average_value(self) -> f64 {
        let (lo, hi) = self.value_range();
        (lo + hi) as f64 / 2.0
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
