use std::fs::File;
use std::io::{self, Read, Write};
use std::process::ExitCode;

enum Mode {
    Encode,
    Decode,
}

enum Source {
    Stdin,
    File(String),
}

fn print_usage() {
    eprintln!("usage: huffpack (--encode | -e | --decode | -d) [--file | -f <path>] [--verbose | -v]...");
    eprintln!();
    eprintln!("Reads from stdin (or <path>; '-' also means stdin) and writes to stdout.");
    eprintln!("Repeat -v for per-node diagnostics on stderr.");
}

fn main() -> ExitCode {
    let mut mode = None;
    let mut source = Source::Stdin;
    let mut verbosity: u8 = 0;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--encode" | "-e" => mode = Some(Mode::Encode),
            "--decode" | "-d" => mode = Some(Mode::Decode),
            "--file" | "-f" => match args.next() {
                Some(path) if path != "-" => source = Source::File(path),
                Some(_) => source = Source::Stdin,
                None => {
                    eprintln!("--file requires a path");
                    return ExitCode::FAILURE;
                }
            },
            "--verbose" | "-v" => verbosity = verbosity.saturating_add(1),
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("unrecognised argument: {}", other);
                print_usage();
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(mode) = mode else {
        eprintln!("please specify either --encode, -e or --decode, -d");
        return ExitCode::FAILURE;
    };

    // diagnostics go to stderr; stdout carries the output bytes
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match run(mode, source, verbosity) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("huffpack: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(mode: Mode, source: Source, verbosity: u8) -> huffpack::Result<()> {
    let mut input = Vec::new();
    match source {
        Source::Stdin => {
            io::stdin().lock().read_to_end(&mut input)?;
        }
        Source::File(path) => {
            File::open(path)?.read_to_end(&mut input)?;
        }
    }

    let output = match mode {
        Mode::Encode => huffpack::encode(&input, verbosity)?,
        Mode::Decode => huffpack::decode(&input, verbosity)?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}
