//! Property tests for mana bounds, tick monotonicity and hand generation.

use proptest::prelude::*;

use caro_skills::core::{BoardState, PlayerId, Position};
use caro_skills::draw::{TurnDrawRequest, TurnSkillRandomizer};
use caro_skills::effects::{EffectInstance, EffectKind};
use caro_skills::skills::{SkillId, SkillRegistry};
use caro_skills::state::{EffectStateManager, MatchSkillState, MemoryStateStore};

const ALICE: PlayerId = PlayerId::new(1);
const BOB: PlayerId = PlayerId::new(2);

#[derive(Clone, Debug)]
enum ManaOp {
    Tick(bool),
    Deduct(u32),
    Gain(u32),
}

fn mana_op() -> impl Strategy<Value = ManaOp> {
    prop_oneof![
        any::<bool>().prop_map(ManaOp::Tick),
        (0u32..20).prop_map(ManaOp::Deduct),
        (0u32..20).prop_map(ManaOp::Gain),
    ]
}

proptest! {
    #[test]
    fn test_mana_stays_within_cap(ops in prop::collection::vec(mana_op(), 0..40)) {
        let manager = EffectStateManager::new(MemoryStateStore::new());
        let cap = manager.config().mana_cap;
        let board = BoardState::new();
        let mut state = MatchSkillState::new();

        for op in ops {
            state = match op {
                ManaOp::Tick(alice) => {
                    let player = if alice { ALICE } else { BOB };
                    manager.tick_state(&state, player, &board).state
                }
                ManaOp::Deduct(cost) => {
                    let before = manager.mana_of(&state, ALICE);
                    match manager.deduct_mana(&state, ALICE, cost) {
                        Ok(next) => {
                            prop_assert_eq!(manager.mana_of(&next, ALICE), before - cost);
                            next
                        }
                        Err(_) => {
                            prop_assert!(before < cost);
                            state
                        }
                    }
                }
                ManaOp::Gain(amount) => manager.add_mana(&state, ALICE, amount),
            };
            prop_assert!(manager.mana_of(&state, ALICE) <= cap);
            prop_assert!(manager.mana_of(&state, BOB) <= cap);
        }
    }

    #[test]
    fn test_tick_never_extends_effects(
        durations in prop::collection::vec(1u32..6, 1..12),
        ticks in 1usize..8,
    ) {
        let manager = EffectStateManager::new(MemoryStateStore::new());
        let effects = durations.iter().enumerate().map(|(i, &d)| {
            EffectInstance::new(EffectKind::TrapReflect, ALICE)
                .with_positions([Position::new(i as i32, 0)])
                .with_remaining(d)
        });
        let mut state = manager.apply_effects(&MatchSkillState::new(), effects, ALICE);
        let board = BoardState::new();

        for _ in 0..ticks {
            let next = manager.tick_state(&state, BOB, &board).state;
            prop_assert_eq!(next.turn, state.turn + 1);
            prop_assert!(next.effects.len() <= state.effects.len());
            for effect in &next.effects {
                let before = state
                    .effects
                    .iter()
                    .find(|e| e.id == effect.id)
                    .and_then(|e| e.remaining);
                prop_assert_eq!(effect.remaining.map(|r| r + 1), before);
            }
            state = next;
        }

        let expected = durations.iter().filter(|&&d| d as usize > ticks).count();
        prop_assert_eq!(state.effects.len(), expected);
    }

    #[test]
    fn test_hand_is_reproducible(
        deck_size in 4u32..20,
        turn in 1u32..100,
        seed in any::<u64>(),
        luck in 0u32..6,
        locks in 0u32..4,
    ) {
        let randomizer = TurnSkillRandomizer::default();
        let request = TurnDrawRequest::new((1..=deck_size).map(SkillId::new), turn, seed)
            .with_luck_stacks(luck)
            .with_lock_count(locks);

        let hand = randomizer.generate_turn_skills(&request, &SkillRegistry::new());
        prop_assert_eq!(hand.len(), 3);
        prop_assert!(hand.iter().all(|id| id.raw() >= 1 && id.raw() <= deck_size));
        prop_assert_eq!(&hand, &randomizer.generate_turn_skills(&request, &SkillRegistry::new()));
    }

    #[test]
    fn test_held_skills_are_kept(
        held in prop::collection::vec(1u32..=12, 0..3),
        turn in 1u32..50,
        seed in any::<u64>(),
    ) {
        let randomizer = TurnSkillRandomizer::default();
        let held: Vec<SkillId> = held.into_iter().map(SkillId::new).collect();
        let request = TurnDrawRequest::new((1..=12).map(SkillId::new), turn, seed)
            .with_held(held.clone());

        let hand = randomizer.generate_turn_skills(&request, &SkillRegistry::new());

        let mut expected = held;
        let mut seen = Vec::new();
        expected.retain(|id| {
            let fresh = !seen.contains(id);
            seen.push(*id);
            fresh
        });
        prop_assert_eq!(&hand[..expected.len()], &expected[..]);

        let mut distinct = hand.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(distinct.len(), hand.len());
    }
}
