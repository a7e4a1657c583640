#![allow(non_snake_case)]

use proptest::prelude::*;
use rollbox::engine::{self, RollEngine};
use rollbox::rarity::Rarity;
use rollbox::rng::{EntropySource, ScriptedSource};
use rollbox::shop::ShopItem;

const EPSILON: f64 = 1e-9;

fn chance_of(chances: &[(Rarity, f64); 8], rarity: Rarity) -> f64 {
    chances
        .iter()
        .find(|(r, _)| *r == rarity)
        .map(|(_, c)| *c)
        .unwrap_or(0.0)
}

#[test]
fn effective_chances__sum_to_one_hundred_in_both_boost_states() {
    for luck_active in [false, true] {
        let sum: f64 = engine::effective_chances(luck_active)
            .iter()
            .map(|(_, chance)| chance)
            .sum();
        assert!(
            (sum - 100.0).abs() < EPSILON,
            "luck_active={luck_active}: sum was {sum}"
        );
    }
}

#[test]
fn effective_chances__unboosted_is_the_renormalized_base_table() {
    // given
    let raw_total: f64 = Rarity::ALL.iter().map(|r| r.base_chance()).sum();

    // when
    let chances = engine::effective_chances(false);

    // then
    for (rarity, chance) in chances {
        let expected = rarity.base_chance() / raw_total * 100.0;
        assert!(
            (chance - expected).abs() < EPSILON,
            "{rarity}: {chance} vs {expected}"
        );
    }
}

#[test]
fn effective_chances__luck_shrinks_common_and_grows_every_other_tier() {
    // given
    let base = engine::effective_chances(false);

    // when
    let boosted = engine::effective_chances(true);

    // then: the non-Common tiers gained raw weight, so Common's share of the
    // rescaled total shrinks while every other share grows by one common ratio
    let common_base = chance_of(&base, Rarity::Common);
    let common_boosted = chance_of(&boosted, Rarity::Common);
    assert!(common_boosted < common_base);

    let mut ratios = Vec::new();
    for rarity in Rarity::ALL.into_iter().filter(|r| *r != Rarity::Common) {
        let before = chance_of(&base, rarity);
        let after = chance_of(&boosted, rarity);
        assert!(after > before, "{rarity}: {after} should exceed {before}");
        ratios.push(after / before);
    }
    for pair in ratios.windows(2) {
        assert!((pair[0] - pair[1]).abs() < EPSILON);
    }
}

#[test]
fn effective_chances__engine_reflects_luck_activation_and_expiry() {
    // given
    let mut engine = RollEngine::with_coins(200);
    let mut source = ScriptedSource::new();
    let base = engine.effective_chances();

    // when
    engine.purchase(ShopItem::LuckBoost, &mut source);

    // then
    let boosted = engine.effective_chances();
    assert!(chance_of(&boosted, Rarity::Common) < chance_of(&base, Rarity::Common));

    // and once the ten boosted rolls are spent the table reverts
    for _ in 0..10 {
        engine.roll(&mut source);
        engine.tick(2);
    }
    assert_eq!(0, engine.boosts().luck_rolls);
    let reverted = engine.effective_chances();
    for (rarity, chance) in reverted {
        assert!((chance - chance_of(&base, rarity)).abs() < EPSILON);
    }
}

#[derive(Clone, Debug)]
enum Op {
    Roll,
    Tick(u32),
    Sell(usize, u64),
    Purchase(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Roll),
        (0u32..=3).prop_map(Op::Tick),
        ((0usize..8), (0u64..=5)).prop_map(|(tier, amount)| Op::Sell(tier, amount)),
        (0usize..3).prop_map(Op::Purchase),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn session_invariants__hold_over_any_operation_sequence(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let mut source = EntropySource::seeded(seed);
        let mut engine = RollEngine::new();
        for op in ops {
            match op {
                Op::Roll => { engine.roll(&mut source); }
                Op::Tick(delta) => engine.tick(delta),
                Op::Sell(tier, amount) => { engine.sell(Rarity::ALL[tier], amount); }
                Op::Purchase(item) => { engine.purchase(ShopItem::ALL[item], &mut source); }
            }
            let sum: f64 = engine.effective_chances().iter().map(|(_, c)| c).sum();
            prop_assert!((sum - 100.0).abs() < EPSILON);
            // zero-count entries are removed, never stored
            prop_assert!(engine.inventory().values().all(|&count| count > 0));
            prop_assert!(engine.cooldown_secs() <= 2);
        }
    }
}
