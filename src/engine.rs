use crate::rarity::Rarity;
use crate::rng::RollSource;
use crate::shop::ShopItem;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const STARTING_COINS: u64 = 100;
pub const ROLL_COOLDOWN_SECS: u32 = 2;
pub const BOOST_ROLLS_PER_PURCHASE: u32 = 10;
/// Multiplier applied to every non-Common base chance while a luck boost is
/// active.
pub const LUCK_MULTIPLIER: f64 = 1.1;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Boosts {
    pub luck_rolls: u32,
    pub coin_multiplier_rolls: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RollOutcome {
    pub rarity: Rarity,
    pub value: u64,
    pub coins_awarded: u64,
}

/// Result of a sell request. `sold == 0` means the request was a no-op.
/// `removed_entry` tells the caller its tier selection is no longer valid.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SellReceipt {
    pub sold: u64,
    pub coins_gained: u64,
    pub removed_entry: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Purchase {
    pub item: ShopItem,
    pub bonus_roll: Option<RollOutcome>,
}

/// The drop distribution for the next roll, in declared tier order. With
/// luck active every non-Common chance is scaled by [`LUCK_MULTIPLIER`]
/// first. The result is always rescaled by the running total so it sums to
/// exactly 100 regardless of boost state; skipping that rescale breaks the
/// distribution invariant.
pub fn effective_chances(luck_active: bool) -> [(Rarity, f64); 8] {
    let mut chances = [(Rarity::Common, 0.0); 8];
    let mut total = 0.0;
    for (slot, rarity) in chances.iter_mut().zip(Rarity::ALL) {
        let mut chance = rarity.base_chance();
        if luck_active && rarity != Rarity::Common {
            chance *= LUCK_MULTIPLIER;
        }
        total += chance;
        *slot = (rarity, chance);
    }
    for (_, chance) in chances.iter_mut() {
        *chance = *chance / total * 100.0;
    }
    chances
}

/// Walk the cumulative distribution and take the first tier whose bucket
/// contains `percent`. The last tier absorbs any floating-point remainder.
fn pick_rarity(chances: &[(Rarity, f64); 8], percent: f64) -> Rarity {
    let mut cumulative = 0.0;
    for (rarity, chance) in &chances[..chances.len() - 1] {
        cumulative += chance;
        if percent < cumulative {
            return *rarity;
        }
    }
    chances[chances.len() - 1].0
}

/// All session state and the operations that mutate it. One instance per
/// run; the presentation layer only ever calls these methods and re-reads
/// the accessors.
pub struct RollEngine {
    coins: u64,
    inventory: BTreeMap<Rarity, u64>,
    cooldown_secs: u32,
    boosts: Boosts,
    total_rolls: u64,
    last_roll: Option<RollOutcome>,
}

impl Default for RollEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RollEngine {
    pub fn new() -> Self {
        Self::with_coins(STARTING_COINS)
    }

    pub fn with_coins(coins: u64) -> Self {
        Self {
            coins,
            inventory: BTreeMap::new(),
            cooldown_secs: 0,
            boosts: Boosts::default(),
            total_rolls: 0,
            last_roll: None,
        }
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    /// Owned counts per tier. Entries are always positive; a tier that was
    /// sold out is removed rather than kept at zero.
    pub fn inventory(&self) -> &BTreeMap<Rarity, u64> {
        &self.inventory
    }

    pub fn owned(&self, rarity: Rarity) -> u64 {
        self.inventory.get(&rarity).copied().unwrap_or(0)
    }

    pub fn cooldown_secs(&self) -> u32 {
        self.cooldown_secs
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown_secs > 0
    }

    pub fn boosts(&self) -> Boosts {
        self.boosts
    }

    pub fn total_rolls(&self) -> u64 {
        self.total_rolls
    }

    pub fn last_roll(&self) -> Option<RollOutcome> {
        self.last_roll
    }

    pub fn effective_chances(&self) -> [(Rarity, f64); 8] {
        effective_chances(self.boosts.luck_rolls > 0)
    }

    /// Perform one roll: draw a tier from the effective distribution, draw
    /// its value, bank the coin reward and start the cooldown. Ignored (and
    /// `None`) while the cooldown is still counting.
    pub fn roll(&mut self, source: &mut impl RollSource) -> Option<RollOutcome> {
        if self.cooldown_secs > 0 {
            debug!(cooldown_secs = self.cooldown_secs, "roll ignored while cooling down");
            return None;
        }

        let chances = self.effective_chances();
        let rarity = pick_rarity(&chances, source.percent());
        let (lo, hi) = rarity.value_range();
        let value = source.value_between(lo, hi);

        *self.inventory.entry(rarity).or_insert(0) += 1;

        let mut coins_awarded = value / 2;
        if self.boosts.coin_multiplier_rolls > 0 {
            coins_awarded *= 2;
        }
        self.coins += coins_awarded;

        // The two counters burn down independently; a roll under both boosts
        // consumes one charge of each.
        self.boosts.luck_rolls = self.boosts.luck_rolls.saturating_sub(1);
        self.boosts.coin_multiplier_rolls = self.boosts.coin_multiplier_rolls.saturating_sub(1);

        let outcome = RollOutcome {
            rarity,
            value,
            coins_awarded,
        };
        self.last_roll = Some(outcome);
        self.total_rolls += 1;
        self.cooldown_secs = ROLL_COOLDOWN_SECS;

        info!(
            rarity = rarity.name(),
            value,
            coins_awarded,
            total_rolls = self.total_rolls,
            "rolled"
        );
        Some(outcome)
    }

    /// Sell up to `requested` items of a tier at the tier's average value,
    /// truncated after multiplying. Clamped to the owned count; a clamp down
    /// to zero makes the whole call a no-op.
    pub fn sell(&mut self, rarity: Rarity, requested: u64) -> SellReceipt {
        let owned = self.owned(rarity);
        let sold = requested.min(owned);
        if sold == 0 {
            debug!(rarity = rarity.name(), requested, "sale ignored, nothing to sell");
            return SellReceipt::default();
        }

        let coins_gained = (rarity.average_value() * sold as f64).floor() as u64;
        self.coins += coins_gained;

        let remaining = owned - sold;
        let removed_entry = remaining == 0;
        if removed_entry {
            self.inventory.remove(&rarity);
        } else {
            self.inventory.insert(rarity, remaining);
        }

        info!(rarity = rarity.name(), sold, coins_gained, "sold items");
        SellReceipt {
            sold,
            coins_gained,
            removed_entry,
        }
    }

    /// Buy a shop item. The price is deducted first, then the effect is
    /// applied; with too few coins the whole call is a no-op. Boost
    /// purchases stack onto any remaining charges. Extra Roll clears the
    /// cooldown and performs its bonus roll immediately.
    pub fn purchase(&mut self, item: ShopItem, source: &mut impl RollSource) -> Option<Purchase> {
        let price = item.price();
        if self.coins < price {
            debug!(
                item = item.name(),
                price,
                coins = self.coins,
                "purchase ignored, not enough coins"
            );
            return None;
        }
        self.coins -= price;

        let bonus_roll = match item {
            ShopItem::ExtraRoll => {
                self.cooldown_secs = 0;
                self.roll(source)
            }
            ShopItem::LuckBoost => {
                self.boosts.luck_rolls += BOOST_ROLLS_PER_PURCHASE;
                None
            }
            ShopItem::CoinMultiplier => {
                self.boosts.coin_multiplier_rolls += BOOST_ROLLS_PER_PURCHASE;
                None
            }
        };

        info!(item = item.name(), coins_left = self.coins, "purchased");
        Some(Purchase { item, bonus_roll })
    }

    /// Advance the cooldown clock. Called by the host once per second while
    /// the engine reports `on_cooldown`.
    pub fn tick(&mut self, delta_secs: u32) {
        self.cooldown_secs = self.cooldown_secs.saturating_sub(delta_secs);
    }

    /// Informational total of the inventory at average per-item value.
    /// Truncation is left to the display.
    pub fn inventory_value(&self) -> f64 {
        self.inventory
            .iter()
            .map(|(rarity, count)| rarity.average_value() * *count as f64)
            .sum()
    }

    pub fn total_items(&self) -> u64 {
        self.inventory.values().sum()
    }
}
