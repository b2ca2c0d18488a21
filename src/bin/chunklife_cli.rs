use chunklife::Board;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CLIParser {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Run a named starter pattern
    Run(RunArgs),
    /// Run a random soup and report throughput
    Soup(SoupArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Starter pattern seeded at the origin
    #[arg(short, long, value_enum, default_value_t = Starter::Glider)]
    pattern: Starter,

    /// Number of generations to simulate
    #[arg(short, long, default_value_t = 64)]
    steps: u64,

    /// Render every generation to the terminal
    #[arg(short, long)]
    render: bool,

    /// Delay between rendered generations, in milliseconds
    #[arg(short, long, default_value_t = 50)]
    delay_ms: u64,
}

#[derive(Args, Debug)]
struct SoupArgs {
    /// Side length of the seeded square region
    #[arg(long, default_value_t = 256)]
    side: i64,

    /// Live-cell density of the seed, in [0, 1]
    #[arg(long, default_value_t = 0.42)]
    density: f64,

    /// Seed for the random number generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of generations to simulate
    #[arg(short, long, default_value_t = 256)]
    steps: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Starter {
    /// 2x2 still life
    Block,
    /// Period-2 oscillator
    Blinker,
    /// Diagonal spaceship
    Glider,
    /// Methuselah, stabilizes after ~1100 generations
    RPentomino,
}

impl Starter {
    fn cells(self) -> &'static [(i64, i64)] {
        match self {
            Starter::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Starter::Blinker => &[(0, 1), (1, 1), (2, 1)],
            Starter::Glider => &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            Starter::RPentomino => &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
        }
    }
}

fn clear_screen() {
    print!("\x1b[2J\x1b[1;1H");
}

fn run_pattern(args: RunArgs) {
    let mut board = Board::new();
    for &(x, y) in args.pattern.cells() {
        board.set_point(x, y, true).unwrap();
    }

    let mut total = Duration::ZERO;
    for generation in 1..=args.steps {
        let start = Instant::now();
        board.update();
        total += start.elapsed();

        if args.render {
            clear_screen();
            print!("{board}");
            println!(
                "generation {generation} | population {} | chunks {}",
                board.population(),
                board.chunk_count()
            );
            std::thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    let total_ms = total.as_secs_f64() * 1000.0;
    println!(
        "{:?}: {} generations in {total_ms:.3} ms ({:.6} ms/gen), population {}, chunks {}",
        args.pattern,
        args.steps,
        total_ms / args.steps as f64,
        board.population(),
        board.chunk_count()
    );
}

fn run_soup(args: SoupArgs) {
    let mut board = Board::new();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(args.seed);
    for y in 0..args.side {
        for x in 0..args.side {
            if rng.random::<f64>() < args.density {
                board.set_point(x, y, true).unwrap();
            }
        }
    }
    println!(
        "seeded {}x{} soup, population {}, chunks {}",
        args.side,
        args.side,
        board.population(),
        board.chunk_count()
    );

    let start = Instant::now();
    for _ in 0..args.steps {
        board.update();
    }
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    println!(
        "{} generations in {total_ms:.3} ms ({:.6} ms/gen), population {}, chunks {}",
        args.steps,
        total_ms / args.steps as f64,
        board.population(),
        board.chunk_count()
    );
}

fn main() {
    let args = CLIParser::parse();

    match args.action {
        Action::Run(args) => run_pattern(args),
        Action::Soup(args) => run_soup(args),
    }
}
