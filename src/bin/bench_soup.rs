use chunklife::Board;
use rand::{Rng, SeedableRng};
use std::time::Instant;

const SEED_SIDE: i64 = 512;
const LIVE_DENSITY: f64 = 0.42;
const TOTAL_GENERATIONS: u64 = 256;
const CHECK_INTERVAL: u64 = 32;

fn main() {
    let mut board = Board::new();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0x5EED_1234_ABCD_EF01);
    for y in 0..SEED_SIDE {
        for x in 0..SEED_SIDE {
            if rng.random::<f64>() < LIVE_DENSITY {
                board.set_point(x, y, true).unwrap();
            }
        }
    }
    println!(
        "seeded {SEED_SIDE}x{SEED_SIDE} soup: population {}, chunks {}",
        board.population(),
        board.chunk_count()
    );

    let mut total = std::time::Duration::ZERO;
    for checkpoint in 1..=(TOTAL_GENERATIONS / CHECK_INTERVAL) {
        let start = Instant::now();
        for _ in 0..CHECK_INTERVAL {
            board.update();
        }
        let elapsed = start.elapsed();
        total += elapsed;

        let phase_ms = elapsed.as_secs_f64() * 1000.0;
        println!(
            "generation {}: {phase_ms:.3} ms ({:.6} ms/gen), population {}, chunks {}",
            checkpoint * CHECK_INTERVAL,
            phase_ms / CHECK_INTERVAL as f64,
            board.population(),
            board.chunk_count()
        );
    }

    let total_ms = total.as_secs_f64() * 1000.0;
    println!(
        "\n{TOTAL_GENERATIONS} generations in {total_ms:.3} ms ({:.6} ms/gen)",
        total_ms / TOTAL_GENERATIONS as f64
    );
}
