use std::fmt;

/// The three fixed shop offers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShopItem {
    ExtraRoll,
    LuckBoost,
    CoinMultiplier,
}

impl ShopItem {
    pub const ALL: [ShopItem; 3] = [
        ShopItem::ExtraRoll,
        ShopItem::LuckBoost,
        ShopItem::CoinMultiplier,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShopItem::ExtraRoll => "Extra Roll",
            ShopItem::LuckBoost => "Luck Boost",
            ShopItem::CoinMultiplier => "Coin Multiplier",
        }
    }

    pub fn price(self) -> u64 {
        match self {
            ShopItem::ExtraRoll => 50,
            ShopItem::LuckBoost => 200,
            ShopItem::CoinMultiplier => 500,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ShopItem::ExtraRoll => "Get an additional roll instantly",
            ShopItem::LuckBoost => "+10% rare drop chance for next 10 rolls",
            ShopItem::CoinMultiplier => "2x coin rewards for next 10 rolls",
        }
    }
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
