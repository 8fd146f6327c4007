//! Property tests for the bag, the board and the running game.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use tetrs_engine::bag::Bag;
use tetrs_engine::{
    Action, BOARD_HEIGHT, BOARD_WIDTH, Board, Cell, Game, GameConfig, Mode, PieceKind,
    RotationDirection, TICK,
};

fn gameplay_action() -> impl Strategy<Value = Action> {
    prop::sample::select(vec![
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDropStart,
        Action::SoftDropStop,
        Action::HardDrop,
        Action::Rotate,
        Action::RotateCounterClockwise,
        Action::Hold,
        Action::Pause,
    ])
}

/// Each row as a bitmask of filled columns
fn board_rows() -> impl Strategy<Value = Vec<u16>> {
    let full = (1u16 << BOARD_WIDTH) - 1;
    prop::collection::vec(
        prop_oneof![
            3 => 0..=full,
            1 => Just(full),
        ],
        BOARD_HEIGHT,
    )
}

fn board_from(rows: &[u16]) -> Board {
    let mut board = Board::new();
    for (row, mask) in rows.iter().enumerate() {
        for col in 0..BOARD_WIDTH {
            if mask & (1 << col) != 0 {
                board.set(row as i32, col as i32, Cell::Filled(PieceKind::S));
            }
        }
    }
    board
}

fn mask_of(board: &Board, row: usize) -> u16 {
    board.rows()[row]
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_filled())
        .fold(0, |mask, (col, _)| mask | (1 << col))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every aligned run of seven draws is a permutation of the kinds
    #[test]
    fn bag_draws_are_permutations(seed: u64) {
        let mut bag = Bag::with_seed(seed);
        for _ in 0..6 {
            let mut draws: Vec<_> = (0..7).map(|_| bag.next()).collect();
            draws.sort_by_key(|k| k.index());
            prop_assert_eq!(draws, PieceKind::ALL.to_vec());
        }
    }

    /// Any 14 consecutive draws contain every kind
    #[test]
    fn bag_window_of_fourteen_covers_all(seed: u64, offset in 0usize..7) {
        let mut bag = Bag::with_seed(seed);
        let draws: Vec<_> = (0..offset + 14).map(|_| bag.next()).collect();
        let window = &draws[offset..];
        for kind in PieceKind::ALL {
            let seen = window.iter().filter(|k| **k == kind).count();
            prop_assert!((1..=2).contains(&seen), "{kind:?} seen {seen} times in {window:?}");
        }
    }

    #[test]
    fn same_seed_same_sequence(seed: u64) {
        let mut a = Bag::with_seed(seed);
        let mut b = Bag::with_seed(seed);
        for _ in 0..21 {
            prop_assert_eq!(a.next(), b.next());
        }
    }

    /// Clearing drops the full rows and keeps the rest in order at the bottom
    #[test]
    fn clear_keeps_surviving_rows_in_order(rows in board_rows()) {
        let full = (1u16 << BOARD_WIDTH) - 1;
        let mut board = board_from(&rows);

        let cleared = board.clear_full_rows();
        let expected_cleared: Vec<_> = rows
            .iter()
            .enumerate()
            .filter(|(_, mask)| **mask == full)
            .map(|(row, _)| row)
            .collect();
        prop_assert_eq!(&cleared, &expected_cleared);

        let survivors: Vec<_> = rows.iter().copied().filter(|mask| *mask != full).collect();
        let offset = BOARD_HEIGHT - survivors.len();
        for row in 0..offset {
            prop_assert_eq!(mask_of(&board, row), 0);
        }
        for (i, mask) in survivors.iter().enumerate() {
            prop_assert_eq!(mask_of(&board, offset + i), *mask);
        }
    }

    /// Random play never overlaps the stack and conserves cells
    #[test]
    fn random_play_keeps_invariants(
        seed: u64,
        actions in prop::collection::vec(gameplay_action(), 1..300),
    ) {
        let mut game = Game::new(GameConfig::default().with_seed(seed));
        game.enqueue(Action::StartGame);
        game.tick(TICK);

        let mut game_overs = 0;
        for action in actions {
            // A rotation the board refuses must leave the piece untouched
            let refused = matches!(action, Action::Rotate | Action::RotateCounterClockwise)
                && game.mode() == Mode::Playing
                && match (game.board(), game.active_piece()) {
                    (Some(board), Some(piece)) => {
                        let direction = if action == Action::Rotate {
                            RotationDirection::Clockwise
                        } else {
                            RotationDirection::CounterClockwise
                        };
                        board.try_rotate(piece, direction).is_none()
                    }
                    _ => false,
                };
            let before = game.active_piece().copied();

            game.apply(action);
            if refused {
                prop_assert_eq!(game.active_piece().copied(), before);
            }

            let events = game.tick(TICK);
            game_overs += events
                .iter()
                .filter(|e| matches!(e, tetrs_engine::Event::GameOver { .. }))
                .count();

            let board = game.board().unwrap();
            if let Some(piece) = game.active_piece() {
                prop_assert!(board.is_valid(&piece.cells()), "active piece overlaps: {piece:?}");
            }

            let stats = game.final_stats().unwrap();
            prop_assert_eq!(
                board.filled_count() as u64,
                4 * u64::from(stats.pieces) - 10 * u64::from(stats.lines)
            );
            prop_assert_eq!(stats.piece_counts.iter().sum::<u32>(), stats.pieces);
        }

        prop_assert!(game_overs <= 1);
        prop_assert_eq!(game_overs == 1, game.mode() == Mode::GameOver);
    }
}
