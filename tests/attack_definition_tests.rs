//! Unit tests for attack definitions
//!
//! These tests verify that the shipped attacks.ron is complete and sane:
//! - Every attack variant is defined
//! - Telegraph timing matches each variant's nature
//! - Damage ranges and crit parameters are valid

use skirmish::attack_config::AttackDefinitions;
use skirmish::combat::components::AttackKind;

/// Helper to load attack definitions for tests
fn load_attacks() -> AttackDefinitions {
    AttackDefinitions::default()
}

#[test]
fn test_shipped_config_validates() {
    let attacks = load_attacks();
    attacks.validate().expect("shipped attacks.ron should validate");
}

#[test]
fn test_all_variants_have_names() {
    let attacks = load_attacks();
    for kind in AttackKind::ALL {
        let def = attacks.get_unchecked(&kind);
        assert!(!def.name.is_empty(), "{:?} should have a name", kind);
    }
}

#[test]
fn test_all_variants_have_positive_cooldown() {
    let attacks = load_attacks();
    for kind in AttackKind::ALL {
        let def = attacks.get_unchecked(&kind);
        assert!(
            def.cooldown_secs > 0.0,
            "{:?} needs a cooldown to gate re-triggering",
            kind
        );
        assert!(
            def.strike_visible_secs > 0.0,
            "{:?} strike shape must persist for at least a frame",
            kind
        );
    }
}

#[test]
fn test_telegraph_timing_matches_variant_nature() {
    let attacks = load_attacks();
    for kind in AttackKind::ALL {
        let def = attacks.get_unchecked(&kind);
        if kind.is_telegraphed() {
            assert!(
                def.telegraph_secs > 0.0,
                "{:?} is a telegraphed variant",
                kind
            );
        } else {
            assert_eq!(def.telegraph_secs, 0.0, "{:?} is an instant variant", kind);
        }
    }
}

#[test]
fn test_damage_ranges_are_valid() {
    let attacks = load_attacks();
    for kind in AttackKind::ALL {
        let def = attacks.get_unchecked(&kind);
        assert!(
            def.damage_min <= def.damage_max,
            "{:?} damage range inverted",
            kind
        );
        assert!(def.damage_min > 0, "{:?} should deal some damage", kind);
        assert!(
            (0.0..=1.0).contains(&def.crit_chance),
            "{:?} crit chance must be a probability",
            kind
        );
        assert!(
            def.crit_multiplier >= 1.0,
            "{:?} crit must not reduce damage",
            kind
        );
    }
}

#[test]
fn test_shape_parameters_present() {
    let attacks = load_attacks();

    let sweep = attacks.get_unchecked(&AttackKind::MeleeSweep);
    assert!(sweep.length > 0.0 && sweep.width > 0.0);
    assert!(sweep.auto_repeat, "sweep loops once started");

    let nova = attacks.get_unchecked(&AttackKind::PulseNova);
    assert!(nova.radius > 0.0);
    assert!(nova.auto_repeat, "nova loops once started");

    let zone = attacks.get_unchecked(&AttackKind::ZoneBlast);
    assert!(zone.radius > 0.0);
    assert!(zone.zone_offset > 0.0, "zone lands ahead of the attacker");
}

#[test]
fn test_line_strike_is_the_randomized_variant() {
    let attacks = load_attacks();
    let line = attacks.get_unchecked(&AttackKind::LineStrike);
    assert!(line.damage_min < line.damage_max);
    assert!(line.crit_chance > 0.0);
}
