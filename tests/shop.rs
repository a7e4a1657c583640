#![allow(non_snake_case)]

use rollbox::engine::RollEngine;
use rollbox::rarity::Rarity;
use rollbox::rng::ScriptedSource;
use rollbox::shop::ShopItem;

const COMMON_PERCENT: f64 = 10.0;
const UNCOMMON_PERCENT: f64 = 60.0;

#[test]
fn purchase__with_insufficient_coins_is_a_noop() {
    // given
    let mut engine = RollEngine::new();
    let mut source = ScriptedSource::new();

    // when
    let purchase = engine.purchase(ShopItem::CoinMultiplier, &mut source);

    // then
    assert!(purchase.is_none());
    assert_eq!(100, engine.coins());
    assert_eq!(0, engine.boosts().coin_multiplier_rolls);
}

#[test]
fn purchase__luck_boost_stacks_additively() {
    // given
    let mut engine = RollEngine::with_coins(400);
    let mut source = ScriptedSource::new();

    // when
    engine.purchase(ShopItem::LuckBoost, &mut source);
    engine.purchase(ShopItem::LuckBoost, &mut source);

    // then: the second purchase extends the first instead of resetting it
    assert_eq!(20, engine.boosts().luck_rolls);
    assert_eq!(0, engine.coins());
}

#[test]
fn purchase__coin_multiplier_doubles_the_next_reward() {
    // given
    let mut engine = RollEngine::with_coins(500);
    let mut source = ScriptedSource::new().with_roll(COMMON_PERCENT, 2);

    // when
    let purchase = engine.purchase(ShopItem::CoinMultiplier, &mut source);

    // then
    assert!(purchase.is_some());
    assert_eq!(0, engine.coins());
    assert_eq!(10, engine.boosts().coin_multiplier_rolls);

    // and the next roll pays twice the base floor(2/2)
    let outcome = engine.roll(&mut source);
    assert_eq!(Some(2), outcome.map(|o| o.coins_awarded));
    assert_eq!(2, engine.coins());
    assert_eq!(9, engine.boosts().coin_multiplier_rolls);
}

#[test]
fn purchase__same_drawn_value_pays_half_without_the_multiplier() {
    // given
    let mut engine = RollEngine::new();
    let mut source = ScriptedSource::new().with_roll(COMMON_PERCENT, 2);

    // when
    let outcome = engine.roll(&mut source);

    // then
    assert_eq!(Some(1), outcome.map(|o| o.coins_awarded));
}

#[test]
fn purchase__extra_roll_clears_cooldown_and_rolls_immediately() {
    // given
    let mut engine = RollEngine::new();
    let mut source = ScriptedSource::new()
        .with_roll(COMMON_PERCENT, 2)
        .with_roll(UNCOMMON_PERCENT, 6);
    engine.roll(&mut source);
    assert_eq!(101, engine.coins());
    assert_eq!(2, engine.cooldown_secs());

    // when
    let purchase = engine.purchase(ShopItem::ExtraRoll, &mut source);

    // then: 101 - 50 price + 3 reward, and the bonus roll restarts the clock
    let bonus = purchase.and_then(|p| p.bonus_roll);
    assert_eq!(Some(Rarity::Uncommon), bonus.map(|o| o.rarity));
    assert_eq!(Some(3), bonus.map(|o| o.coins_awarded));
    assert_eq!(54, engine.coins());
    assert_eq!(2, engine.total_rolls());
    assert_eq!(2, engine.cooldown_secs());
    assert_eq!(1, engine.owned(Rarity::Uncommon));
}

#[test]
fn purchase__extra_roll_is_refused_before_touching_the_cooldown() {
    // given
    let mut engine = RollEngine::with_coins(30);
    let mut source = ScriptedSource::new().with_roll(COMMON_PERCENT, 2);
    engine.roll(&mut source);
    assert_eq!(31, engine.coins());

    // when
    let purchase = engine.purchase(ShopItem::ExtraRoll, &mut source);

    // then
    assert!(purchase.is_none());
    assert_eq!(31, engine.coins());
    assert_eq!(2, engine.cooldown_secs());
    assert_eq!(1, engine.total_rolls());
}

#[test]
fn purchase__catalog_lists_the_three_offers_with_fixed_prices() {
    let prices: Vec<u64> = ShopItem::ALL.iter().map(|item| item.price()).collect();
    assert_eq!(vec![50, 200, 500], prices);
}
