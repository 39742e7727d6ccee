use criterion::{black_box, criterion_group, criterion_main, Criterion};

use caro_skills::core::{BoardState, PlayerId, Position, Side};
use caro_skills::draw::{TurnDrawRequest, TurnSkillRandomizer};
use caro_skills::effects::{EffectInstance, EffectKind, ResolutionContext, SkillEngine};
use caro_skills::skills::{EffectType, Rarity, Skill, SkillId, SkillRegistry};
use caro_skills::state::{EffectStateManager, MatchSkillState, MemoryStateStore};

fn crowded_board() -> BoardState {
    let mut pieces = Vec::new();
    for y in 0..15 {
        for x in 0..15 {
            if (x + y) % 3 == 0 {
                pieces.push((Position::new(x, y), if x % 2 == 0 { Side::X } else { Side::O }));
            }
        }
    }
    BoardState::with_pieces(pieces)
}

fn catalog() -> SkillRegistry {
    EffectType::ALL
        .iter()
        .enumerate()
        .map(|(i, &effect)| {
            let rarity = match i % 5 {
                0 => Rarity::Legendary,
                1 | 2 => Rarity::Rare,
                _ => Rarity::Common,
            };
            Skill::new(SkillId::new(i as u32 + 1), effect).with_rarity(rarity)
        })
        .collect()
}

fn bench_dispatch(c: &mut Criterion) {
    let engine = SkillEngine::new(catalog());
    let board = crowded_board();
    let bomb = EffectType::ALL
        .iter()
        .position(|&e| e == EffectType::BombArea)
        .map_or(1, |i| i as u32 + 1);
    let chaos = EffectType::ALL
        .iter()
        .position(|&e| e == EffectType::ChaosBoard)
        .map_or(1, |i| i as u32 + 1);

    let shields: Vec<EffectInstance> = (0..15)
        .map(|x| {
            EffectInstance::new(EffectKind::ProtectPiece, PlayerId::new(2))
                .with_positions([Position::new(x, 7)])
                .with_target_side(Side::O)
        })
        .collect();
    let ctx = ResolutionContext::new(PlayerId::new(1), Side::X, PlayerId::new(2))
        .with_target(Position::new(7, 7))
        .with_active_effects(shields)
        .with_match_seed(42)
        .with_luck_stacks(2);

    c.bench_function("execute_bomb_area", |b| {
        b.iter(|| engine.execute(black_box(SkillId::new(bomb)), &board, &ctx))
    });
    c.bench_function("execute_chaos_board", |b| {
        b.iter(|| engine.execute(black_box(SkillId::new(chaos)), &board, &ctx))
    });
}

fn bench_tick(c: &mut Criterion) {
    let manager = EffectStateManager::new(MemoryStateStore::new());
    let board = crowded_board();
    let effects = (0..40).map(|i| {
        EffectInstance::new(EffectKind::StatusSpread, PlayerId::new(1))
            .with_positions([Position::new(i % 15, (i / 15) * 3)])
            .with_param("status", "burn")
            .with_remaining(50)
    });
    let state = manager.apply_effects(&MatchSkillState::new(), effects, PlayerId::new(1));

    c.bench_function("tick_40_effects", |b| {
        b.iter(|| manager.tick_state(black_box(&state), PlayerId::new(1), &board))
    });
}

fn bench_draw(c: &mut Criterion) {
    let randomizer = TurnSkillRandomizer::default();
    let catalog = catalog();
    let deck: Vec<SkillId> = (1..=30).map(SkillId::new).collect();
    let seed = TurnSkillRandomizer::get_seed("bench-match");

    c.bench_function("draw_plain", |b| {
        let request = TurnDrawRequest::new(deck.clone(), 7, seed);
        b.iter(|| randomizer.generate_turn_skills(black_box(&request), &catalog))
    });
    c.bench_function("draw_lucky_locked", |b| {
        let request = TurnDrawRequest::new(deck.clone(), 7, seed)
            .with_luck_stacks(3)
            .with_lock_count(2)
            .with_held([SkillId::new(4)]);
        b.iter(|| randomizer.generate_turn_skills(black_box(&request), &catalog))
    });
}

criterion_group!(benches, bench_dispatch, bench_tick, bench_draw);
criterion_main!(benches);
