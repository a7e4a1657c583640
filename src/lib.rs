pub mod engine;
pub mod rarity;
pub mod rng;
pub mod shop;

pub use engine::{Boosts, Purchase, RollEngine, RollOutcome, SellReceipt};
pub use rarity::Rarity;
pub use rng::{EntropySource, RollSource, ScriptedSource};
pub use shop::ShopItem;
