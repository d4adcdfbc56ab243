//! `yuanc` — the Yuan compiler driver.
//!
//! Thin over the core compiler pipeline (`yuan_compiler::sema`, `ast_context`,
//! `module_manager`): parses, runs Sema, and then either stops (syntax-only /
//! analysis-only emit modes) or hands the analyzed program to the existing
//! `codegen_ast` backend for IR/object emission. Exit codes follow:
//! 0 success, 1 lex/parse/sema error, 2 codegen/link error, 3 I/O error,
//! 4 internal error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use inkwell::context::Context;

use yuan_compiler::ast_context::ASTContext;
use yuan_compiler::diagnostics::DiagnosticEngine;
use yuan_compiler::project_config::ProjectConfig;
use yuan_compiler::sema::{NullModuleLoader, Sema};
use yuan_compiler::BuiltinRegistry;

#[derive(Parser)]
#[command(name = "yuanc", version, about = "Yuan compiler driver")]
struct Args {
    /// Input .yu source files
    inputs: Vec<PathBuf>,

    /// Stop after semantic analysis; do not invoke CodeGen
    #[arg(long = "fsyntax-only")]
    syntax_only: bool,

    /// Emit textual LLVM IR instead of linking
    #[arg(short = 'S')]
    emit_ir: bool,

    /// Emit a relocatable object file instead of linking
    #[arg(short = 'c')]
    emit_object: bool,

    /// Emit tokens, ast, or pretty-printed source instead of compiling
    #[arg(long = "emit", value_name = "WHAT")]
    emit: Option<String>,

    /// Output path
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Optimization level 0-3
    #[arg(short = 'O', value_name = "LEVEL")]
    opt_level: Option<String>,

    #[arg(short = 'v')]
    verbose: bool,

    #[arg(short = 'I', value_name = "PATH", action = clap::ArgAction::Append)]
    include_paths: Vec<PathBuf>,

    #[arg(short = 'L', value_name = "PATH", action = clap::ArgAction::Append)]
    library_paths: Vec<PathBuf>,

    #[arg(short = 'l', value_name = "LIB", action = clap::ArgAction::Append)]
    libraries: Vec<String>,

    #[arg(long = "module-cache", value_name = "DIR")]
    module_cache: Option<PathBuf>,

    #[arg(long = "pkg-path", value_name = "PATH", action = clap::ArgAction::Append)]
    pkg_paths: Vec<PathBuf>,

    #[arg(long = "stdlib", value_name = "PATH")]
    stdlib: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.inputs.is_empty() {
        eprintln!("yuanc: no input files");
        return ExitCode::from(3);
    }

    // project config: discover yuan-project.json, apply "explicit flag wins".
    let project_config = ProjectConfig::discover_and_load(&args.inputs[0])
        .ok()
        .flatten();
    let _module_cache = args
        .module_cache
        .or_else(|| {
            project_config
                .as_ref()
                .and_then(|c| c.compile.module_cache_dir.as_ref())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(".yuan/cache"));

    let mut overall_status = ExitCode::SUCCESS;

    for input in &args.inputs {
        let source = match std::fs::read_to_string(input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("yuanc: {}: {}", input.display(), e);
                return ExitCode::from(3);
            }
        };

        log::debug!("yuanc: lexing/parsing {:?}", input);
        let mut parser = match yuan_parser::Parser::new(&source) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}: error[err_lex]: {}", input.display(), e);
                return ExitCode::from(1);
            }
        };
        let program = match parser.parse_file() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}: error[err_parse]: {}", input.display(), e);
                return ExitCode::from(1);
            }
        };

        if let Some(what) = &args.emit {
            match what.as_str() {
                "ast" => println!("{:#?}", program),
                "tokens" => {
                    // Token emission is the lexer's contract;
                    // re-lex for a flat dump since the parser consumes its own stream.
                    println!("{:#?}", yuan_lexer::Lexer::new(&source).collect::<Vec<_>>());
                }
                "pretty" => {
                    print!("{}", yuan_format::format_with_defaults(&source).unwrap_or(source))
                }
                other => {
                    eprintln!("yuanc: unknown --emit kind '{}'", other);
                    return ExitCode::from(4);
                }
            }
            continue;
        }

        let ctx = ASTContext::new();
        let mut diagnostics = DiagnosticEngine::new();
        let builtins = BuiltinRegistry::global();
        let module_name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("module")
            .to_string();

        // Single-file analysis: no cross-module alias resolution without a
        // `ModuleManager`-backed loader (the recursive collaborator that
        // resolves imports; this driver analyzes one translation unit at a time).
        let mut null_loader = NullModuleLoader;
        let mut sema = Sema::new(&ctx, &mut diagnostics, builtins, &mut null_loader, &module_name);
        sema.analyze_program(&program);

        if sema.diagnostics.has_errors() {
            sema.diagnostics.print_all(&source);
            overall_status = ExitCode::from(1);
            continue;
        }
        if args.verbose {
            sema.diagnostics.print_summary();
        }

        if args.syntax_only {
            continue;
        }

        let llvm_ctx = Context::create();
        let mut codegen = yuan_compiler::ASTCodeGen::new(&llvm_ctx, &module_name);
        if let Err(e) = codegen.compile_program(&program) {
            eprintln!("{}: error[err_codegen]: {}", input.display(), e);
            return ExitCode::from(2);
        }

        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("a");
        if args.emit_ir {
            let out = args.output.clone().unwrap_or_else(|| PathBuf::from(format!("{}.ll", stem)));
            if std::fs::write(&out, codegen.module.print_to_string().to_string()).is_err() {
                return ExitCode::from(3);
            }
        } else if args.emit_object {
            let out = args.output.clone().unwrap_or_else(|| PathBuf::from(format!("{}.o", stem)));
            if codegen.compile_to_object(&out).is_err() {
                return ExitCode::from(2);
            }
        } else {
            let obj_path = PathBuf::from(format!("{}.o", stem));
            if codegen.compile_to_object(&obj_path).is_err() {
                return ExitCode::from(2);
            }
            let out = args.output.clone().unwrap_or_else(|| PathBuf::from(stem));
            let mut link = std::process::Command::new("clang");
            link.arg(&obj_path).arg("-o").arg(&out);
            for p in &args.library_paths {
                link.arg(format!("-L{}", p.display()));
            }
            for l in &args.libraries {
                link.arg(format!("-l{}", l));
            }
            match link.status() {
                Ok(status) if status.success() => {}
                _ => return ExitCode::from(2),
            }
            let _ = std::fs::remove_file(&obj_path);
        }
    }

    overall_status
}
