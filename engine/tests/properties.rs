use coc_engine::{
    apply_age_modifiers, classify, roll_damage, settle_opposed, AttributeSet, DamageBonus,
    DefenseMode, Dice, DiceNotation, SuccessTier, Winner,
};
use proptest::prelude::*;

fn defense() -> impl Strategy<Value = DefenseMode> {
    prop_oneof![Just(DefenseMode::Dodge), Just(DefenseMode::Block)]
}

proptest! {
    #[test]
    fn success_means_one_or_at_most_threshold(roll in 1..=100i32, threshold in 0..=150i32) {
        let res = classify(roll, threshold);
        let expected = roll == 1 || (roll != 100 && roll <= threshold);
        prop_assert_eq!(res.success, expected);
        prop_assert_eq!(res.success, res.tier.is_success());
    }

    #[test]
    fn raising_skill_never_lowers_the_tier(roll in 1..=100i32, threshold in 0..=99i32) {
        prop_assert!(classify(roll, threshold).tier <= classify(roll, threshold + 1).tier);
    }

    #[test]
    fn stalemate_only_when_both_fail(
        a in 1..=100i32, askill in 0..=99i32,
        d in 1..=100i32, dskill in 0..=99i32,
        mode in defense(),
    ) {
        let att = classify(a, askill);
        let def = classify(d, dskill);
        let res = settle_opposed(att, def, mode);
        prop_assert_eq!(res.winner == Winner::None, !att.success && !def.success);
        if res.partial_hit {
            prop_assert_eq!(res.winner, Winner::Attacker);
            prop_assert_eq!(mode, DefenseMode::Block);
        }
        if att.tier == SuccessTier::CriticalSuccess && def.tier != SuccessTier::CriticalSuccess {
            prop_assert_eq!(res.winner, Winner::Attacker);
        }
    }

    #[test]
    fn damage_stays_within_dice_bounds(
        seed in any::<u64>(),
        count in 1..=4u32, sides in 2..=10u32,
        bonus_dice in 0..=2u32,
        armor in 0..=8i32,
        partial in any::<bool>(),
    ) {
        let weapon = DiceNotation::new(count, sides);
        let bonus = if bonus_dice == 0 {
            DamageBonus::Flat(-1)
        } else {
            DamageBonus::Dice(DiceNotation::new(bonus_dice, 6))
        };
        let max = weapon.max() + bonus.dice().map_or(0, |d| d.max());
        let dmg = roll_damage(&mut Dice::from_seed(seed), weapon, bonus, armor, partial);
        prop_assert!(dmg.total >= 0);
        prop_assert!(dmg.total <= max);
        prop_assert!((weapon.min()..=weapon.max()).contains(&dmg.weapon_roll));
        if partial {
            prop_assert_eq!(dmg.total, (dmg.weapon_roll + dmg.bonus_roll - armor).max(0) / 2);
        }
    }

    #[test]
    fn aging_never_leaves_negative_characteristics(seed in any::<u64>(), age in 0..=120u32) {
        let mut dice = Dice::from_seed(seed);
        let rolled = AttributeSet::roll(&mut dice);
        let aged = apply_age_modifiers(&mut dice, rolled, age).attributes;
        for c in coc_engine::Characteristic::ALL {
            prop_assert!(aged.get(c) >= 0);
        }
        prop_assert!(aged.education >= rolled.education - 5);
    }

    #[test]
    fn seeded_dice_stay_on_the_die(seed in any::<u64>(), sides in 1..=100u32) {
        let mut dice = Dice::from_seed(seed);
        for _ in 0..20 {
            let face = dice.die(sides);
            prop_assert!(face >= 1 && face <= sides.max(1) as i32);
        }
    }
}
