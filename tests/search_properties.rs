//! Property tests for distance search and the planning model

use std::collections::VecDeque;

use proptest::prelude::*;

use hydroq_ai::ai::{AiState, DistanceField, FactionView, HydSimulator, RigCandidate};
use hydroq_ai::core::config::{DistanceConfig, SimulatorConfig};
use hydroq_ai::core::{Faction, Position};
use hydroq_ai::map::{GameMap, GridWorld, TerrainKind};
use hydroq_ai::search::Simulator;

/// Plain breadth-first search; the start is always usable and the goal may
/// be entered whatever its terrain
fn bfs(map: &GridWorld, start: Position, goal: Position) -> Option<u32> {
    if start == goal {
        return Some(0);
    }
    let mut seen = vec![false; (map.width * map.height) as usize];
    let index = |p: Position| (p.y as u32 * map.width + p.x as u32) as usize;
    let mut queue = VecDeque::new();
    seen[index(start)] = true;
    queue.push_back((start, 0u32));

    while let Some((pos, d)) = queue.pop_front() {
        for n in map.neighbors(pos) {
            if seen[index(n)] {
                continue;
            }
            if n == goal {
                return Some(d + 1);
            }
            if map.tile_at(n).is_some_and(|t| t.terrain.is_traversable()) {
                seen[index(n)] = true;
                queue.push_back((n, d + 1));
            }
        }
    }
    None
}

fn build_map(width: u32, height: u32, ground: &[bool]) -> GridWorld {
    let mut map = GridWorld::new(width, height, TerrainKind::Water);
    for y in 0..height {
        for x in 0..width {
            if ground[(y * width + x) as usize] {
                map.set_terrain(Position::new(x as i32, y as i32), TerrainKind::Ground);
            }
        }
    }
    map
}

fn arb_map() -> impl Strategy<Value = (u32, u32, Vec<bool>)> {
    (2u32..8, 2u32..8).prop_flat_map(|(w, h)| {
        (
            Just(w),
            Just(h),
            prop::collection::vec(prop::bool::weighted(0.7), (w * h) as usize),
        )
    })
}

fn arb_candidates(max: usize) -> impl Strategy<Value = Vec<RigCandidate>> {
    prop::collection::vec(
        (0u32..40, any::<bool>()).prop_map(|(distance, reachable)| RigCandidate {
            position: Position::new(0, 0),
            nearest: Position::new(0, 0),
            distance,
            reachable,
        }),
        0..max,
    )
}

proptest! {
    #[test]
    fn test_bounded_search_matches_bfs(
        (w, h, ground) in arb_map(),
        sx in 0u32..8, sy in 0u32..8, gx in 0u32..8, gy in 0u32..8,
        bound in 0u32..30,
    ) {
        let map = build_map(w, h, &ground);
        let start = Position::new((sx % w) as i32, (sy % h) as i32);
        let goal = Position::new((gx % w) as i32, (gy % h) as i32);

        let expected = bfs(&map, start, goal).filter(|d| *d <= bound);
        prop_assert_eq!(map.shortest_path_distance(start, goal, bound), expected);
    }

    #[test]
    fn test_distance_field_within_bound(
        (w, h, ground) in arb_map(),
        sx in 0u32..8, sy in 0u32..8, tx in 0u32..8, ty in 0u32..8,
    ) {
        let mut map = build_map(w, h, &ground);
        let source = Position::new((sx % w) as i32, (sy % h) as i32);
        let target = Position::new((tx % w) as i32, (ty % h) as i32);
        prop_assume!(source != target);
        map.add_rig(source, Faction::Blue).unwrap();
        map.add_rig(target, Faction::None).unwrap();

        let field = DistanceField::compute(&map, &DistanceConfig::default());
        prop_assert_eq!(field.blue_to_unclaimed.len(), 1);
        let candidate = field.blue_to_unclaimed[0];

        let bound = source.manhattan(&target) * 2;
        prop_assert!(candidate.distance <= bound);

        let shortest = [bfs(&map, source, target), bfs(&map, target, source)]
            .into_iter()
            .flatten()
            .min()
            .filter(|d| *d <= bound);
        match shortest {
            Some(d) => {
                prop_assert!(candidate.reachable);
                prop_assert_eq!(candidate.distance, d);
                prop_assert_eq!(candidate.nearest, target);
            }
            None => {
                prop_assert!(!candidate.reachable);
                prop_assert_eq!(candidate.distance, bound);
            }
        }
    }

    #[test]
    fn test_every_legal_action_keeps_state_well_formed(
        to_enemy in arb_candidates(5),
        enemy_to_own in arb_candidates(5),
        to_unclaimed in arb_candidates(5),
        contested in any::<bool>(),
        faction in prop_oneof![Just(Faction::Blue), Just(Faction::Red)],
    ) {
        let config = SimulatorConfig::default();
        // The opponent sees the same rigs from its side, or owns nothing
        let enemy_to_unclaimed = if contested { to_unclaimed.clone() } else { Vec::new() };
        let view = FactionView {
            to_enemy: &to_enemy,
            enemy_to_own: &enemy_to_own,
            to_unclaimed: &to_unclaimed,
            enemy_to_unclaimed: &enemy_to_unclaimed,
        };
        let state = AiState::from_view(faction, &view, config.capture_threshold);
        prop_assert!(state.is_well_formed());

        let simulator = HydSimulator::new(config.clone(), state.clone());
        let actions = simulator.legal_actions(&state);
        prop_assert_eq!(actions.len(), state.target_count());

        for action in actions {
            let before = state.distance_for(&action).unwrap();
            let (next, reward) = simulator.apply_action(&state, &action);
            prop_assert!(next.is_well_formed());
            prop_assert!(reward.is_finite());

            if action.kind.is_capture() {
                prop_assert!(before <= config.capture_threshold);
                prop_assert_eq!(next.target_count() + 1, state.target_count());
                prop_assert!(reward > 0.0);
            } else {
                prop_assert!(before > config.capture_threshold);
                prop_assert_eq!(next.target_count(), state.target_count());
                prop_assert!(next.distance_for(&action).unwrap() < before);
            }
        }
    }
}
