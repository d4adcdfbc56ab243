//! `yuanfilt` — demangles `_Y1...` symbols.
//!
//! Reads token-by-token from argv (one token per arg) when args are given,
//! otherwise reads lines from stdin and demangles every `_Y1`-prefixed token
//! found within each line, leaving everything else untouched.

use yuan_compiler::demangle;

fn filter_token(tok: &str) -> String {
    // A token may carry surrounding punctuation (e.g. a trailing comma from
    // a linker error line); only the longest `_Y1...` run is demangled.
    match tok.find("_Y1") {
        Some(start) => {
            let (prefix, mangled) = tok.split_at(start);
            let end = mangled
                .char_indices()
                .rev()
                .find(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(mangled.len());
            let (candidate, suffix) = mangled.split_at(end);
            match demangle(candidate) {
                Some(d) => format!("{}{}{}", prefix, d, suffix),
                None => tok.to_string(),
            }
        }
        None => tok.to_string(),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if !args.is_empty() {
        let out: Vec<String> = args.iter().map(|a| filter_token(a)).collect();
        println!("{}", out.join(" "));
        return;
    }

    use std::io::{BufRead, Write};
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let filtered: Vec<String> = line.split_whitespace().map(filter_token).collect();
        let _ = writeln!(out, "{}", filtered.join(" "));
    }
}
