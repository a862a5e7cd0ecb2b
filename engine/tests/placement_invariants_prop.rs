/**
 * Property tests for the placement step.
 *
 * Invariants covered:
 * - Rejected placements leave grid, score and moves untouched.
 * - Accepted placements decrement moves by exactly one and add 100 per line.
 * - Before clearing, only the piece footprint changes.
 * - A grid produced by a placement never contains a full line.
 */
use proptest::prelude::*;
use qblock_engine::{Cell, Engine, EngineConfig, Grid, Piece, PieceShape, PlacementResult};

const N: usize = 8;

fn shape_strategy() -> impl Strategy<Value = PieceShape> {
    (1usize..=3, 1usize..=3)
        .prop_flat_map(|(h, w)| {
            prop::collection::vec(any::<bool>(), h * w).prop_map(move |bits| (h, w, bits))
        })
        .prop_filter_map("shape needs an occupied cell", |(h, w, bits)| {
            let rows = bits.chunks(w).map(|r| r.to_vec()).collect::<Vec<_>>();
            debug_assert_eq!(rows.len(), h);
            PieceShape::new(rows).ok()
        })
}

fn grid_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.4), N * N)
}

fn engine_with(cells: &[bool]) -> Engine {
    let mut engine = Engine::new(EngineConfig {
        grid_size: N,
        initial_score: 0,
        initial_moves: 100,
    })
    .unwrap();
    let grid = engine.grid_mut_for_test();
    for (i, &filled) in cells.iter().enumerate() {
        if filled {
            grid.set(i / N, i % N, Cell::Filled);
        }
    }
    engine
}

fn stamped(grid: &Grid, piece: &Piece, row: usize, col: usize) -> Grid {
    let mut out = grid.clone();
    for (r, c) in piece.shape.occupied_cells() {
        out.set(row + r, col + c, Cell::Filled);
    }
    out
}

proptest! {
    #[test]
    fn placement_respects_core_invariants(
        cells in grid_strategy(),
        shape in shape_strategy(),
        row in -2i64..(N as i64 + 2),
        col in -2i64..(N as i64 + 2),
    ) {
        let mut engine = engine_with(&cells);
        let before = engine.clone();
        let piece = Piece::new(9, shape, "bg-green-300");

        match engine.attempt_placement(&piece, row, col) {
            PlacementResult::Rejected(_) => {
                prop_assert_eq!(&engine, &before);
            }
            PlacementResult::Accepted(outcome) => {
                prop_assert!(row >= 0 && col >= 0);
                let (row, col) = (row as usize, col as usize);
                prop_assert!(row + piece.shape.height() <= N);
                prop_assert!(col + piece.shape.width() <= N);

                prop_assert_eq!(outcome.moves, before.moves_remaining() - 1);
                prop_assert_eq!(outcome.score_delta, outcome.cleared_count as u64 * 100);
                prop_assert_eq!(outcome.score, before.score() + outcome.score_delta);
                prop_assert_eq!(
                    outcome.cleared_count,
                    outcome.cleared_rows.len() + outcome.cleared_cols.len()
                );

                let pre_clear = stamped(before.grid(), &piece, row, col);
                prop_assert_eq!(
                    pre_clear.filled_count(),
                    before.grid().filled_count() + piece.shape.occupied_count()
                );
                for r in 0..N {
                    for c in 0..N {
                        let in_cleared = outcome.cleared_rows.contains(&r)
                            || outcome.cleared_cols.contains(&c);
                        let expected = !in_cleared && pre_clear.is_filled(r, c);
                        prop_assert_eq!(outcome.grid.is_filled(r, c), expected);
                    }
                }
                prop_assert!(outcome.grid.detect_full_lines().is_empty());
            }
        }
    }
}
