use chunklife::Board;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn set_cells(board: &mut Board, cells: &[(i64, i64)]) {
    for &(x, y) in cells {
        board.set_point(x, y, true).unwrap();
    }
}

fn collect_live(board: &Board) -> HashSet<(i64, i64)> {
    let mut out = HashSet::new();
    board.for_each_live(|x, y| {
        out.insert((x, y));
    });
    out
}

fn assert_alive(board: &Board, cells: &[(i64, i64)]) {
    for &(x, y) in cells {
        assert!(board.get_point(x, y), "expected alive at ({x}, {y})");
    }
}

fn assert_dead(board: &Board, cells: &[(i64, i64)]) {
    for &(x, y) in cells {
        assert!(!board.get_point(x, y), "expected dead at ({x}, {y})");
    }
}

fn step_naive(cells: &HashSet<(i64, i64)>) -> HashSet<(i64, i64)> {
    let mut candidates = HashSet::new();
    for &(x, y) in cells {
        for dy in -1..=1 {
            for dx in -1..=1 {
                candidates.insert((x + dx, y + dy));
            }
        }
    }

    let mut next = HashSet::new();
    for (x, y) in candidates {
        let mut neighbors = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if cells.contains(&(x + dx, y + dy)) {
                    neighbors += 1;
                }
            }
        }
        let alive = cells.contains(&(x, y));
        if neighbors == 3 || (alive && neighbors == 2) {
            next.insert((x, y));
        }
    }
    next
}

#[test]
fn set_and_get_round_trip_including_negative_coordinates() {
    let mut board = Board::new();
    for &(x, y) in &[(0, 0), (-1, -1), (-64, -64), (-65, 63), (1000, -1000)] {
        board.set_point(x, y, true).unwrap();
        assert!(board.get_point(x, y), "round trip at ({x}, {y})");
    }
}

#[test]
fn get_point_is_idempotent() {
    let mut board = Board::new();
    board.set_point(7, 7, true).unwrap();
    assert_eq!(board.get_point(7, 7), board.get_point(7, 7));
    assert_eq!(board.get_point(8, 8), board.get_point(8, 8));
}

#[test]
fn block_is_stable() {
    let mut board = Board::new();
    let block = [(10, 10), (11, 10), (10, 11), (11, 11)];
    set_cells(&mut board, &block);

    board.update();

    assert_alive(&board, &block);
    assert_eq!(board.population(), 4);
}

#[test]
fn blinker_oscillates_with_period_two() {
    let mut board = Board::new();
    set_cells(&mut board, &[(1, 0), (1, 1), (1, 2)]);

    board.update();
    assert_alive(&board, &[(0, 1), (1, 1), (2, 1)]);
    assert_dead(&board, &[(1, 0), (1, 2)]);

    board.update();
    assert_alive(&board, &[(1, 0), (1, 1), (1, 2)]);
    assert_dead(&board, &[(0, 1), (2, 1)]);
}

#[test]
fn block_straddling_vertical_chunk_boundary_is_stable() {
    let mut board = Board::new();
    let block = [(63, 10), (64, 10), (63, 11), (64, 11)];
    set_cells(&mut board, &block);

    for _ in 0..4 {
        board.update();
    }
    assert_alive(&board, &block);
    assert_eq!(board.population(), 4);
}

#[test]
fn block_straddling_horizontal_chunk_boundary_is_stable() {
    let mut board = Board::new();
    let block = [(10, 63), (11, 63), (10, 64), (11, 64)];
    set_cells(&mut board, &block);

    for _ in 0..4 {
        board.update();
    }
    assert_alive(&board, &block);
    assert_eq!(board.population(), 4);
}

#[test]
fn block_straddling_chunk_corner_is_stable() {
    let mut board = Board::new();
    // one cell in each of four chunks
    let block = [(63, 63), (64, 63), (63, 64), (64, 64)];
    set_cells(&mut board, &block);

    for _ in 0..4 {
        board.update();
    }
    assert_alive(&board, &block);
    assert_eq!(board.population(), 4);
}

#[test]
fn blinker_births_into_a_missing_chunk() {
    let mut board = Board::new();
    // vertical blinker hugging the east edge of chunk (0, 0)
    set_cells(&mut board, &[(63, 4), (63, 5), (63, 6)]);
    assert_eq!(board.chunk_count(), 1);

    board.update();
    // horizontal phase reaches into chunk (1, 0)
    assert_alive(&board, &[(62, 5), (63, 5), (64, 5)]);

    board.update();
    assert_alive(&board, &[(63, 4), (63, 5), (63, 6)]);
    assert_dead(&board, &[(62, 5), (64, 5)]);
}

#[test]
fn glider_crosses_chunk_boundaries_intact() {
    let mut board = Board::new();
    let glider = [(61, 60), (62, 61), (60, 62), (61, 62), (62, 62)];
    set_cells(&mut board, &glider);

    // 16 generations move the glider 4 cells down-right, across the
    // corner where four chunks meet
    board.update();
    let mut naive: HashSet<(i64, i64)> = glider.iter().copied().collect();
    naive = step_naive(&naive);
    for _ in 1..16 {
        board.update();
        naive = step_naive(&naive);
    }

    assert_eq!(collect_live(&board), naive);
    assert_eq!(board.population(), 5);
}

#[test]
fn matches_naive_on_random_soup_across_boundaries() {
    let mut board = Board::new();
    let mut naive = HashSet::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0xBADC_0FFE);
    // straddle the chunk origin so all four quadrants participate
    for y in -20..=20 {
        for x in -20..=20 {
            if rng.random::<f64>() < 0.33 {
                board.set_point(x, y, true).unwrap();
                naive.insert((x, y));
            }
        }
    }

    for generation in 0..12 {
        assert_eq!(collect_live(&board), naive, "generation {generation}");
        board.update();
        naive = step_naive(&naive);
    }
}

#[test]
fn empty_board_stays_empty() {
    let mut board = Board::new();
    for _ in 0..10 {
        board.update();
    }
    assert_eq!(board.population(), 0);
    assert_eq!(board.chunk_count(), 0);
    assert_eq!(board.bounds(), None);
}

#[test]
fn dead_chunks_are_pruned_and_not_recreated_by_reads() {
    let mut board = Board::new();
    board.set_point(200, 200, true).unwrap();
    assert_eq!(board.chunk_count(), 1);

    // a lone cell dies; its chunk must be reclaimed
    board.update();
    assert_eq!(board.population(), 0);
    assert_eq!(board.chunk_count(), 0);
    assert_eq!(board.bounds(), None);

    assert!(!board.get_point(200, 200));
    assert_eq!(board.chunk_count(), 0);
}

#[test]
fn mid_simulation_edits_take_effect() {
    let mut board = Board::new();
    set_cells(&mut board, &[(0, 0), (1, 0), (2, 0)]);

    board.update();
    board.set_point(50, 50, true).unwrap();
    assert!(board.get_point(50, 50));
    board.update();
    assert!(board.population() > 0);
}

#[test]
fn generation_counter_advances() {
    let mut board = Board::new();
    assert_eq!(board.generation(), 0);
    board.update();
    board.update();
    assert_eq!(board.generation(), 2);
}

#[test]
fn deterministic_across_thread_counts() {
    let mut initial = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0xD37E_A515);
    for y in -24..=24 {
        for x in -24..=24 {
            if rng.random::<f64>() < 0.3 {
                initial.push((x, y));
            }
        }
    }

    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("build thread pool");

        pool.install(|| {
            let mut board = Board::new();
            for &(x, y) in &initial {
                board.set_point(x, y, true).unwrap();
            }
            for _ in 0..12 {
                board.update();
            }
            (board.population(), collect_live(&board))
        })
    };

    let (pop1, live1) = run(1);
    let (pop4, live4) = run(4);

    assert_eq!(pop1, pop4);
    assert_eq!(live1, live4);
}
