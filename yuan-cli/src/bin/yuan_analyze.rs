//! `yuan-analyze` — syntax-only parse plus style checks.
//!
//! Two checks, each with the thresholds spec.md names:
//!   - `style-too-many-params`: a function declares more than 6 parameters.
//!   - `style-long-function`: a function's body spans more than 80 lines.
//!
//! The AST (`yuan_ast`) carries no source spans (span tracking lives in
//! `yuan_diagnostics::SpanMap`, built during Sema, not during a syntax-only
//! pass), so function extent is recovered from the raw source text by
//! locating `fn <name>` and brace-matching to the closing `}` — a textual
//! heuristic, adequate for a style linter that never touches semantics.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use yuan_ast::Item;

const MAX_PARAMS: usize = 6;
const MAX_LINES: usize = 80;

#[derive(Parser)]
#[command(name = "yuan-analyze", version, about = "Yuan syntax + style checker")]
struct Args {
    inputs: Vec<PathBuf>,

    #[arg(long = "max-params", default_value_t = MAX_PARAMS)]
    max_params: usize,

    #[arg(long = "max-lines", default_value_t = MAX_LINES)]
    max_lines: usize,
}

/// Returns the 1-based (line, col) of the first occurrence of `needle` at
/// or after `from_byte`, plus the line count of the brace-matched block
/// starting at that occurrence's first `{`.
fn locate_function(source: &str, name: &str, from_byte: usize) -> Option<(usize, usize, usize)> {
    let pat = format!("fn {}", name);
    let start = source[from_byte..].find(&pat)? + from_byte;
    let prefix = &source[..start];
    let line = prefix.matches('\n').count() + 1;
    let col = start - prefix.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;

    let brace_start = source[start..].find('{')? + start;
    let mut depth = 0usize;
    let mut end = brace_start;
    for (i, c) in source[brace_start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = brace_start + i;
                    break;
                }
            }
            _ => {}
        }
    }
    let body_lines = source[brace_start..=end].matches('\n').count() + 1;
    Some((line, col, body_lines))
}

fn main() -> ExitCode {
    let args = Args::parse();
    if args.inputs.is_empty() {
        eprintln!("yuan-analyze: no input files");
        return ExitCode::from(3);
    }

    let mut warning_count = 0usize;

    for input in &args.inputs {
        let source = match std::fs::read_to_string(input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("yuan-analyze: {}: {}", input.display(), e);
                return ExitCode::from(3);
            }
        };

        let mut parser = match yuan_parser::Parser::new(&source) {
            Ok(p) => p,
            Err(e) => {
                println!("{}:1:1: error[err_lex]: {}", input.display(), e);
                return ExitCode::from(1);
            }
        };
        let program = match parser.parse_file() {
            Ok(p) => p,
            Err(e) => {
                println!("{}:1:1: error[err_parse]: {}", input.display(), e);
                return ExitCode::from(1);
            }
        };

        for item in &program.items {
            let functions: Vec<&yuan_ast::Function> = match item {
                Item::Function(f) => vec![f],
                Item::Struct(s) => s.methods.iter().collect(),
                Item::TraitImpl(i) => i.methods.iter().collect(),
                _ => vec![],
            };

            for func in functions {
                let Some((line, col, body_lines)) = locate_function(&source, &func.name, 0) else {
                    continue;
                };

                if func.params.len() > args.max_params {
                    println!(
                        "{}:{}:{}: warning[style-too-many-params]: function `{}` has {} parameters (max {})",
                        input.display(),
                        line,
                        col,
                        func.name,
                        func.params.len(),
                        args.max_params
                    );
                    warning_count += 1;
                }
                if body_lines > args.max_lines {
                    println!(
                        "{}:{}:{}: warning[style-long-function]: function `{}` is {} lines (max {})",
                        input.display(),
                        line,
                        col,
                        func.name,
                        body_lines,
                        args.max_lines
                    );
                    warning_count += 1;
                }
            }
        }
    }

    if warning_count > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
