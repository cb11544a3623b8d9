use std::cell::Cell;

use rand::{rngs::StdRng, SeedableRng};

use super::*;
use crate::{
    engine::{add_item, delete_item, spawn_tier},
    ids::{ContainerId, SequentialTierIds},
    partition::Item,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn untouched_pets() -> PartitionState {
    PartitionState::from_pool(Topic::new("pets").items())
}

#[test]
fn untouched_template_is_not_destructive() {
    let pets = Topic::new("pets");
    assert!(!is_destructive(&untouched_pets(), &pets));

    let reordered = PartitionState::from_pool(
        ["Fish", "Dog", "Bird", "Cat"].into_iter().map(Item::from),
    );
    assert!(!is_destructive(&reordered, &pets));
}

#[test]
fn ranking_or_editing_the_pool_is_destructive() {
    let pets = Topic::new("pets");
    let state = untouched_pets();

    let ranked = spawn_tier(
        &state,
        &Item::from("Dog"),
        ContainerId::Pool,
        &mut SequentialTierIds::default(),
    );
    assert!(is_destructive(&ranked, &pets));

    let added = add_item(&state, "Hamster").expect("added");
    assert!(is_destructive(&added, &pets));

    let removed = delete_item(&state, &Item::from("Cat")).expect("deleted");
    assert!(is_destructive(&removed, &pets));
}

#[test]
fn non_destructive_reset_skips_confirmation() {
    let asked = Cell::new(false);
    let decision = request_reset(
        &untouched_pets(),
        &Topic::new("pets"),
        &Topic::new("seasons"),
        || {
            asked.set(true);
            false
        },
        &mut rng(),
    );

    assert!(!asked.get());
    let ResetDecision::Proceed(next) = decision else {
        panic!("expected proceed");
    };
    assert!(next.tier_order().is_empty());
    let mut pool = next.pool().to_vec();
    pool.sort();
    let mut expected = Topic::new("seasons").items();
    expected.sort();
    assert_eq!(pool, expected);
}

#[test]
fn declined_destructive_reset_cancels() {
    let state = spawn_tier(
        &untouched_pets(),
        &Item::from("Dog"),
        ContainerId::Pool,
        &mut SequentialTierIds::default(),
    );
    let before = state.clone();

    let decision = request_reset(
        &state,
        &Topic::new("pets"),
        &Topic::new("seasons"),
        || false,
        &mut rng(),
    );
    assert_eq!(decision, ResetDecision::Cancel);
    assert_eq!(state, before);
}

#[test]
fn confirmed_destructive_reset_discards_tiers() {
    let state = spawn_tier(
        &untouched_pets(),
        &Item::from("Dog"),
        ContainerId::Pool,
        &mut SequentialTierIds::default(),
    );

    let decision = request_reset(
        &state,
        &Topic::new("pets"),
        &Topic::new("blank"),
        || true,
        &mut rng(),
    );
    assert_eq!(
        decision,
        ResetDecision::Proceed(PartitionState::from_pool(Vec::new()))
    );
}

#[test]
fn custom_topic_with_items_is_destructive() {
    let custom = Topic::new("Board games");
    let empty = PartitionState::default();
    assert!(!is_destructive(&empty, &custom));

    let with_item = add_item(&empty, "Catan").expect("added");
    assert!(is_destructive(&with_item, &custom));
}
