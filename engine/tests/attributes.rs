use coc_engine::attributes::age_band;
use coc_engine::{apply_age_modifiers, AttributeSet, Characteristic, Dice};

fn fifties() -> AttributeSet {
    AttributeSet {
        strength: 50,
        constitution: 50,
        size: 50,
        dexterity: 50,
        appearance: 50,
        intelligence: 50,
        power: 50,
        education: 50,
        luck: 50,
    }
}

#[test]
fn forties_band_applies_deltas_and_two_edu_checks() {
    // First check: 90 > 50 gains 4. Second: 10 <= 54, no gain.
    let mut dice = Dice::from_scripted(vec![90, 4, 10]);
    let aged = apply_age_modifiers(&mut dice, fifties(), 45);
    let a = aged.attributes;
    assert_eq!(a.strength, 48);
    assert_eq!(a.constitution, 48);
    assert_eq!(a.size, 50);
    assert_eq!(a.dexterity, 49);
    assert_eq!(a.appearance, 45);
    assert_eq!(a.education, 54);
    assert_eq!(a.luck, 50);
    assert_eq!(aged.move_rate_delta, -1);
    assert_eq!(aged.education_gains, vec![4]);
    assert_eq!(age_band(45).map(|b| b.education_checks), Some(2));
}

#[test]
fn teenagers_lose_edu_and_keep_better_luck() {
    // Luck rolls: 3D6 = 2+2+2 and 6+6+6; no EDU checks for this band.
    let mut dice = Dice::from_scripted(vec![2, 2, 2, 6, 6, 6]);
    let aged = apply_age_modifiers(&mut dice, fifties(), 17);
    assert_eq!(aged.attributes.strength, 45);
    assert_eq!(aged.attributes.size, 45);
    assert_eq!(aged.attributes.education, 45);
    assert_eq!(aged.attributes.luck, 90);
    assert_eq!(aged.move_rate_delta, 0);
    assert!(aged.education_gains.is_empty());
}

#[test]
fn eighties_floor_at_zero() {
    let weak = AttributeSet { strength: 20, dexterity: 15, appearance: 10, ..fifties() };
    let mut dice = Dice::from_scripted(vec![1]);
    let aged = apply_age_modifiers(&mut dice, weak, 85);
    assert_eq!(aged.attributes.strength, 0);
    assert_eq!(aged.attributes.dexterity, 0);
    assert_eq!(aged.attributes.appearance, 0);
    assert_eq!(aged.attributes.constitution, 24);
    assert_eq!(aged.move_rate_delta, -5);
}

#[test]
fn ages_outside_every_band_only_floor() {
    let odd = AttributeSet { luck: -5, ..fifties() };
    let mut dice = Dice::from_scripted(vec![]);
    for age in [0, 14, 90, 120] {
        let aged = apply_age_modifiers(&mut dice, odd, age);
        assert_eq!(aged.attributes, AttributeSet { luck: 0, ..fifties() });
        assert_eq!(aged.move_rate_delta, 0);
    }
}

#[test]
fn rolled_characteristics_stay_in_range() {
    let mut dice = Dice::from_seed(7);
    for _ in 0..200 {
        let a = AttributeSet::roll(&mut dice);
        for c in [Characteristic::Str, Characteristic::Con, Characteristic::Dex, Characteristic::App, Characteristic::Pow, Characteristic::Luck] {
            let v = a.get(c);
            assert!((15..=90).contains(&v) && v % 5 == 0, "{} = {}", c.abbreviation(), v);
        }
        for c in [Characteristic::Siz, Characteristic::Int, Characteristic::Edu] {
            let v = a.get(c);
            assert!((40..=90).contains(&v) && v % 5 == 0, "{} = {}", c.abbreviation(), v);
        }
    }
}

#[test]
fn characteristic_names_resolve() {
    assert_eq!(Characteristic::from_name("str"), Some(Characteristic::Str));
    assert_eq!(Characteristic::from_name("Education"), Some(Characteristic::Edu));
    assert_eq!(Characteristic::from_name("charisma"), None);
}
