use std::{
    collections::HashSet,
    fmt, fs,
    io::{self},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, ValueEnum};
use colored::Colorize;

use tapeprof::{
    classify::classifier::classify_loops,
    interpreter::{interpreter::Interpreter, profiling::ProfilingInterpreter, Runtime, RuntimeError},
    jumps::matcher::match_brackets,
    lexer::{lexer::Lexer, LexerTokenKind},
    lowering::wasm::lower_to_wasm,
    profiler::{report::ProfileReport, ExecutionProfile},
};

/// Tape-language interpreter, execution profiler and wasm lowering
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to operate on
    #[arg()]
    file: PathBuf,

    #[arg(value_enum)]
    commands: Vec<Commands>,

    /// Where the `wasm` command writes the lowered module
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Cells on the tape
    #[arg(short, long, default_value_t = 30_000)]
    tape_size: usize,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Commands {
    /// Output the lexer tokens
    Tokens,
    /// Output the jump table
    Jumps,
    /// Output the innermost-loop classifications
    Loops,

    /// Run the program
    Interpreter,
    /// Run the program and report execution counts
    ProfilingInterpreter,

    /// Lower the program to a wasm module (needs --output)
    Wasm,
}

// every failure class gets its own exit status
const EXIT_USAGE: u8 = 1;
const EXIT_MALFORMED: u8 = 2;
const EXIT_TAPE_BOUNDS: u8 = 3;
const EXIT_STREAM: u8 = 4;
const EXIT_LOWERING: u8 = 5;

fn fail(code: u8, message: impl fmt::Display) -> ExitCode {
    eprintln!("{}: {}", "Error".red(), message);
    ExitCode::from(code)
}

fn runtime_exit_code(error: &RuntimeError) -> u8 {
    match error {
        RuntimeError::TapeOutOfBounds { .. } => EXIT_TAPE_BOUNDS,
        RuntimeError::Io { .. } => EXIT_STREAM,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let commands: HashSet<Commands> = HashSet::from_iter(args.commands.into_iter());

    println!("Running {}", args.file.display());

    let text = match fs::read_to_string(&args.file) {
        Ok(text) => text,
        Err(e) => return fail(EXIT_USAGE, format!("{}: {}", args.file.display(), e)),
    };

    println!("{}", "Starting lexing".blue());
    let now = Instant::now();
    let tokens = Lexer::new(&text).collect_tokens();
    println!("{} {:.2?}", "Finished lexing in".green(), now.elapsed());

    if commands.contains(&Commands::Tokens) {
        for token in tokens.iter() {
            print!("{}", token.kind);
        }
        println!();
    }

    println!("{}", "Starting bracket matching".blue());
    let now = Instant::now();
    let matched = match match_brackets(&tokens) {
        Ok(matched) => matched,
        Err(e) => return fail(EXIT_MALFORMED, e),
    };
    println!(
        "{} {:.2?}",
        "Finished bracket matching in".green(),
        now.elapsed()
    );

    if commands.contains(&Commands::Jumps) {
        for (position, token) in tokens.iter().enumerate() {
            if matches!(
                token.kind,
                LexerTokenKind::JumpStart | LexerTokenKind::JumpEnd
            ) {
                println!("{} {} -> {}", token.kind, position, matched.jumps.target(position));
            }
        }
    }

    println!("{}", "Starting loop classification".blue());
    let now = Instant::now();
    let classifications = classify_loops(&tokens, &matched.innermost);
    println!(
        "{} {:.2?}",
        "Finished loop classification in".green(),
        now.elapsed()
    );

    if commands.contains(&Commands::Loops) {
        for class in classifications.iter() {
            println!(
                "{:>8} {} [{}]",
                class.open,
                if class.simple { "simple " } else { "general" },
                class.body
            );
        }
    }

    let mut runtime = Runtime::new(
        args.tape_size,
        Box::new(io::stdin()),
        Box::new(io::stdout()),
    );

    if commands.contains(&Commands::Interpreter) {
        println!("{}", "Starting interpreter".blue());
        let now = Instant::now();
        if let Err(e) = Interpreter::new().run(&mut runtime, &tokens, &matched.jumps) {
            return fail(runtime_exit_code(&e), e);
        }
        runtime.reset();
        println!();
        println!("{} {:.2?}", "Finished interpreter in".green(), now.elapsed());
    }

    if commands.contains(&Commands::ProfilingInterpreter) {
        let mut profile = ExecutionProfile::new(tokens.len(), classifications.clone());
        println!("{}", "Starting profiling-interpreter".blue());
        let now = Instant::now();
        if let Err(e) =
            ProfilingInterpreter::new().run(&mut runtime, &tokens, &matched.jumps, &mut profile)
        {
            return fail(runtime_exit_code(&e), e);
        }
        runtime.reset();
        println!();
        println!(
            "{} {:.2?}",
            "Finished profiling-interpreter in".green(),
            now.elapsed()
        );

        println!("{}", ProfileReport::from_profile(&tokens, &profile));
    }

    if commands.contains(&Commands::Wasm) {
        let Some(output) = args.output else {
            return fail(EXIT_USAGE, "the wasm command needs --output");
        };
        println!("{}", "Starting wasm lowering".blue());
        let now = Instant::now();
        let bytes = match lower_to_wasm(&tokens) {
            Ok(bytes) => bytes,
            Err(e) => return fail(EXIT_LOWERING, e),
        };
        println!(
            "{} {} bytes in {:.2?}",
            "Finished wasm lowering with".green(),
            bytes.len(),
            now.elapsed()
        );
        if let Err(e) = fs::write(&output, bytes) {
            return fail(EXIT_USAGE, format!("{}: {}", output.display(), e));
        }
    }

    ExitCode::SUCCESS
}
