//! `yuan-format` — reformats source by routing through parse + pretty-print.
//!
//! `--check` exits non-zero if input differs from its formatted output;
//! `-i` rewrites the file in place; `--stdin` reads from stdin.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use yuan_format::format_with_defaults;

#[derive(Parser)]
#[command(name = "yuan-format", version, about = "Yuan source formatter")]
struct Args {
    input: Option<PathBuf>,

    /// Exit non-zero if input differs from its formatted output
    #[arg(long)]
    check: bool,

    /// Rewrite the file in place
    #[arg(short = 'i', long = "in-place")]
    in_place: bool,

    /// Read source from stdin instead of a file
    #[arg(long)]
    stdin: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = if args.stdin {
        let mut buf = String::new();
        if std::io::stdin().read_to_string(&mut buf).is_err() {
            eprintln!("yuan-format: failed to read stdin");
            return ExitCode::from(3);
        }
        buf
    } else {
        match &args.input {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("yuan-format: {}: {}", path.display(), e);
                    return ExitCode::from(3);
                }
            },
            None => {
                eprintln!("yuan-format: no input file (pass a path or --stdin)");
                return ExitCode::from(3);
            }
        }
    };

    let formatted = match format_with_defaults(&source) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("yuan-format: {}", e);
            return ExitCode::from(1);
        }
    };

    if args.check {
        return if formatted == source {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        };
    }

    if args.in_place {
        let Some(path) = &args.input else {
            eprintln!("yuan-format: -i requires a file path, not --stdin");
            return ExitCode::from(3);
        };
        if std::fs::write(path, &formatted).is_err() {
            return ExitCode::from(3);
        }
        return ExitCode::SUCCESS;
    }

    print!("{}", formatted);
    ExitCode::SUCCESS
}
