// vim: set ai et ts=4 sts=4 sw=4:
mod util;
mod grid;
mod line;
mod puzzle;

use std::fs;
use std::io;
use std::process;
use std::time::Instant;
use clap::{App, Arg};
use log::{error, info};
use yaml_rust::{YamlLoader, Yaml};

use self::puzzle::{Puzzle, Solver};
use self::util::is_a_tty;

static SAMPLE_PUZZLE: &str = "
rows:
    - 5
    - 1 4
    - 1 1 1
    - 1 1 1 1
    - 1 1 1 1
    - 1 1 3 1
    - 1 1 1
    - 1 1 1
    - 3 4 1
    - 3 3
cols:
    - 8
    - 1 1
    - 1 1 5
    - 1 1
    - 1 2 2
    - 2 1 1
    - 5 1
    - 1 2
    - 1 1
    - 8
";

struct Args {
    filename: Option<String>,
    verbosity: u64,
}

fn parse_args() -> Args {
    let matches = App::new("picross")
        .about("Solves nonogram puzzles by iterative constraint propagation")
        .arg(Arg::with_name("INPUT")
                 .help("YAML file of puzzles to solve; solves a built-in sample when omitted")
                 .index(1))
        .arg(Arg::with_name("verbose")
                 .short("v")
                 .multiple(true)
                 .help("Increases log verbosity (-v: debug, -vv: trace)"))
        .get_matches();
    Args {
        filename: matches.value_of("INPUT").map(String::from),
        verbosity: matches.occurrences_of("verbose"),
    }
}

fn setup_logging(verbosity: u64) -> Result<(), fern::InitError> {
    let level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}

fn run(args: &Args) -> Result<(), String> {
    let source = match &args.filename {
        Some(filename) => fs::read_to_string(filename)
                              .map_err(|e| format!("cannot read {}: {}", filename, e))?,
        None           => String::from(SAMPLE_PUZZLE),
    };
    // note: column numbers are listed top to bottom
    let docs: Vec<Yaml> = YamlLoader::load_from_str(&source)
                              .map_err(|e| format!("cannot parse puzzle input: {}", e))?;
    if docs.is_empty() {
        return Err(String::from("no puzzles found in input"));
    }
    let emit_color = is_a_tty(io::stdout());

    let mut solved_count = 0usize;
    let started = Instant::now();
    for (i, doc) in docs.iter().enumerate() {
        let puzzle = Puzzle::from_yaml(doc)
                         .map_err(|e| format!("puzzle #{}: {}", i+1, e))?;
        let mut solver = Solver::new(puzzle);
        match solver.solve() {
            Ok(true) => {
                solved_count += 1;
                println!("{}", solver.puzzle.render(emit_color));
                println!("Solved in {} passes.\n", solver.iterations);
            }
            Ok(false) => {
                println!("{}", solver.puzzle.render(emit_color));
                println!("Unsolved: {} squares left undetermined after {} passes.\n",
                         solver.puzzle.count_unknown(), solver.iterations);
            }
            Err(e) => {
                error!("puzzle #{}: {}", i+1, e);
                eprintln!("{}", solver.puzzle.render(false));
                return Err(format!("puzzle #{}: {}", i+1, e));
            }
        }
    }
    println!("Solved {}/{} puzzles in {:.2?}.", solved_count, docs.len(), started.elapsed());
    info!("done");
    Ok(())
}

fn main() {
    let args = parse_args();
    if let Err(e) = setup_logging(args.verbosity) {
        eprintln!("error: failed to initialize logging: {}", e);
        process::exit(1);
    }
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
