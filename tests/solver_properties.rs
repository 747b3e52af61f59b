//! Property-based tests for puzzle states and the dual-race solver

use std::collections::{HashMap, VecDeque};

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use slider_puzzle::{Move, PuzzleSolver, PuzzleState, SolveOptions};

fn scrambled(size: usize, steps: usize, seed: u64) -> PuzzleState {
    let mut rng = StdRng::seed_from_u64(seed);
    PuzzleState::scrambled(size, steps, &mut rng).expect("size >= 2")
}

/// Exact distances to the goal for every reachable 2x2 state.
fn bfs_2x2() -> HashMap<PuzzleState, u32> {
    let goal = PuzzleState::goal(2).unwrap();
    let mut dist = HashMap::from([(goal.clone(), 0)]);
    let mut queue = VecDeque::from([goal]);

    while let Some(state) = queue.pop_front() {
        let d = dist[&state];
        for next in state.neighbors() {
            if !dist.contains_key(&next) {
                dist.insert(next.clone(), d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

fn all_2x2() -> Vec<PuzzleState> {
    let mut boards = Vec::new();
    for a in 0..4u32 {
        for b in 0..4u32 {
            for c in 0..4u32 {
                for d in 0..4u32 {
                    if let Ok(s) = PuzzleState::new(&[[a, b], [c, d]]) {
                        boards.push(s);
                    }
                }
            }
        }
    }
    boards
}

fn adjacent_by_one_slide(a: &PuzzleState, b: &PuzzleState) -> bool {
    Move::ALL.iter().any(|&dir| a.slide(dir).as_ref() == Some(b))
}

#[test]
fn exhaustive_2x2_matches_breadth_first_distances() {
    let reachable = bfs_2x2();
    let boards = all_2x2();
    assert_eq!(boards.len(), 24);
    assert_eq!(reachable.len(), 12);

    for board in boards {
        let expected = reachable.get(&board).copied();
        for options in [SolveOptions::new(), SolveOptions::new().closed_set(true)] {
            let outcome = PuzzleSolver::solve_with(board.clone(), options).unwrap();
            assert_eq!(outcome.move_count, expected, "board:\n{}", board);
            assert_eq!(outcome.is_solvable, expected.is_some());
        }
        assert_ne!(
            reachable.contains_key(&board),
            reachable.contains_key(&board.twin()),
            "exactly one of a board and its twin is reachable:\n{}",
            board
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn neighbor_count_follows_blank_position(size in 2usize..=5, steps in 0usize..40, seed in any::<u64>()) {
        let state = scrambled(size, steps, seed);
        let (row, col) = state.blank_position();
        let on_edge = |i: usize| i == 0 || i == size - 1;
        let expected = 4 - usize::from(on_edge(row)) - usize::from(on_edge(col));
        prop_assert_eq!(state.neighbors().len(), expected);
    }

    #[test]
    fn slides_round_trip(size in 2usize..=5, steps in 0usize..40, seed in any::<u64>()) {
        let state = scrambled(size, steps, seed);
        for dir in Move::ALL {
            if let Some(next) = state.slide(dir) {
                prop_assert_eq!(next.slide(dir.opposite()), Some(state.clone()));
            }
        }
        let from_slides: Vec<PuzzleState> =
            Move::ALL.iter().filter_map(|&dir| state.slide(dir)).collect();
        prop_assert_eq!(state.neighbors(), from_slides);
    }

    #[test]
    fn displacement_is_zero_only_at_goal(size in 2usize..=5, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = PuzzleState::random(size, &mut rng).unwrap();
        prop_assert_eq!(state.displacement_distance() == 0, state.is_goal());
        prop_assert_eq!(state.misplaced_count() == 0, state.is_goal());
        prop_assert!(state.misplaced_count() <= state.displacement_distance());
    }

    #[test]
    fn twin_is_a_single_non_blank_swap(size in 2usize..=5, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = PuzzleState::random(size, &mut rng).unwrap();
        let twin = state.twin();
        prop_assert_eq!(twin.blank_position(), state.blank_position());
        prop_assert_eq!(twin.twin(), state.clone());

        let differing = (0..size)
            .flat_map(|r| (0..size).map(move |c| (r, c)))
            .filter(|&(r, c)| state.tile(r, c) != twin.tile(r, c))
            .count();
        prop_assert_eq!(differing, 2);
    }

    #[test]
    fn solution_path_is_valid_and_optimal(steps in 0usize..14, seed in any::<u64>()) {
        let initial = scrambled(3, steps, seed);
        let solver = PuzzleSolver::new(initial.clone()).unwrap();
        prop_assert!(solver.is_solvable());

        let moves = solver.move_count().unwrap();
        prop_assert!(moves as usize <= steps);
        prop_assert!(moves >= initial.displacement_distance());

        let path = solver.solution().unwrap();
        prop_assert_eq!(path.len(), moves as usize + 1);
        prop_assert_eq!(&path[0], &initial);
        prop_assert!(path[path.len() - 1].is_goal());
        for pair in path.windows(2) {
            prop_assert!(adjacent_by_one_slide(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn twin_of_solvable_board_is_unsolvable(steps in 0usize..14, seed in any::<u64>()) {
        let initial = scrambled(3, steps, seed);
        let twin = initial.twin();
        let original = PuzzleSolver::solve(initial).unwrap();
        let flipped = PuzzleSolver::solve(twin).unwrap();
        prop_assert!(original.is_solvable);
        prop_assert!(!flipped.is_solvable);
        prop_assert_eq!(flipped.move_count, None);
    }

    #[test]
    fn closed_set_agrees_on_4x4(steps in 0usize..16, seed in any::<u64>()) {
        let initial = scrambled(4, steps, seed);
        let closed = PuzzleSolver::solve_with(initial.clone(), SolveOptions::new().closed_set(true)).unwrap();
        prop_assert!(closed.is_solvable);
        let moves = closed.move_count.unwrap();
        prop_assert!(moves as usize <= steps);
        prop_assert!(moves >= initial.displacement_distance());
        prop_assert_eq!(closed.moves_between().map(|m| m.len()), Some(moves as usize));
    }
}
