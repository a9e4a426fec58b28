use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser as ClapParser, Subcommand};
use tracing_subscriber::EnvFilter;

use bfk::compiler;
use bfk::engine::{Engine, RunStatus};
use bfk::session::DEFAULT_TAPE_CELLS;

#[derive(ClapParser)]
#[command(name = "bfk", version, about = "bfk — a brainfuck kit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a program against stdin/stdout
    Run {
        /// Path to the program file
        file: PathBuf,
        /// Initial tape size in cells
        #[arg(short, long, default_value_t = DEFAULT_TAPE_CELLS)]
        memory: usize,
        /// Halt after this many instructions (0 = run to completion)
        #[arg(long, default_value_t = 0)]
        max_steps: u64,
    },
    /// Display the compiled instruction stream and loop table (debug)
    Dump {
        /// Path to the program file
        file: PathBuf,
    },
}

// Exit codes: 1 = I/O, 2 = compile error, 3 = runtime error, 4 = step
// budget exhausted before the program ended.
const EXIT_IO: i32 = 1;
const EXIT_COMPILE: i32 = 2;
const EXIT_RUNTIME: i32 = 3;
const EXIT_PAUSED: i32 = 4;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Commands::Run {
            file,
            memory,
            max_steps,
        } => cmd_run(&file, memory, max_steps),
        Commands::Dump { file } => cmd_dump(&file),
    };
    process::exit(exit_code);
}

const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

fn read_source(path: &PathBuf) -> Result<String, i32> {
    let filename = path.to_string_lossy();

    // Check file size before reading
    match std::fs::metadata(path) {
        Ok(meta) => {
            if meta.len() > MAX_SOURCE_SIZE {
                eprintln!(
                    "Error: file {} is too large ({} bytes, max {} bytes)",
                    filename,
                    meta.len(),
                    MAX_SOURCE_SIZE
                );
                return Err(EXIT_IO);
            }
        }
        Err(e) => {
            eprintln!("Error: cannot read file {}: {}", filename, e);
            return Err(EXIT_IO);
        }
    }

    match std::fs::read_to_string(path) {
        Ok(source) => Ok(source),
        Err(e) => {
            eprintln!("Error: cannot read file {}: {}", filename, e);
            Err(EXIT_IO)
        }
    }
}

fn cmd_run(path: &PathBuf, memory: usize, max_steps: u64) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let program = match compiler::compile(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Compile error: {}", e);
            return EXIT_COMPILE;
        }
    };

    let mut engine = Engine::new(program, memory);
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    match engine.run(&mut stdin, &mut stdout, max_steps) {
        Ok(RunStatus::Completed) => 0,
        Ok(RunStatus::Paused) => {
            eprintln!(
                "Halted: step budget of {} exhausted at instruction {}",
                max_steps,
                engine.pc()
            );
            EXIT_PAUSED
        }
        Err(e) => {
            eprintln!("{}", e);
            EXIT_RUNTIME
        }
    }
}

fn cmd_dump(path: &PathBuf) -> i32 {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let program = match compiler::compile(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Compile error: {}", e);
            return EXIT_COMPILE;
        }
    };

    for (i, inst) in program.code.iter().enumerate() {
        println!("{:5}  {}", i, inst);
    }
    if !program.loops.is_empty() {
        println!();
        for (i, record) in program.loops.iter().enumerate() {
            println!("loop {:3}: {}", i, record);
        }
    }
    0
}
