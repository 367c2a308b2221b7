use clap::{Parser, Subcommand};
use latex_lexer::{AnnotatedLatex, LatexTokenizer, Token, TokenizeError, TraceEvent};
use std::path::Path;

#[derive(Parser)]
#[command(name = "latex-tok")]
#[command(about = "Inspect the token stream of LaTeX sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tokens of a file, one per line
    Tokens {
        /// Input LaTeX file
        path: String,

        /// Skip a leading `%%` header block
        #[arg(long)]
        annotated: bool,

        /// Print a JSON array instead of one token per line
        #[arg(long)]
        json: bool,

        /// Trace every tokenizer step to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Tokenize a set of files and report which ones fail
    Check {
        /// Input LaTeX files
        #[arg(required = true)]
        paths: Vec<String>,

        /// Skip a leading `%%` header block
        #[arg(long)]
        annotated: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Tokens {
            path,
            annotated,
            json,
            trace,
        } => cmd_tokens(&path, annotated, json, trace),
        Command::Check { paths, annotated } => cmd_check(&paths, annotated),
    }
}

fn read_source(path: &str, annotated: bool) -> Result<String, String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("file not found: {path}"));
    }
    let source = std::fs::read_to_string(p).map_err(|e| format!("reading {path}: {e}"))?;
    if annotated {
        Ok(AnnotatedLatex::parse(&source).body().to_string())
    } else {
        Ok(source)
    }
}

fn run_tokenizer(source: &str, trace: bool) -> Result<Vec<Token>, TokenizeError> {
    if trace {
        let mut sink = |event: &TraceEvent<'_>| eprintln!("trace: {event}");
        LatexTokenizer::with_trace(&mut sink).tokenize(source)
    } else {
        LatexTokenizer::new().tokenize(source)
    }
}

fn cmd_tokens(path: &str, annotated: bool, json: bool, trace: bool) {
    let source = match read_source(path, annotated) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let tokens = match run_tokenizer(&source, trace) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Tokenize error in {path}: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&tokens) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error serializing tokens: {e}");
                std::process::exit(1);
            }
        }
    } else {
        for token in &tokens {
            println!("{token}");
        }
    }
}

fn cmd_check(paths: &[String], annotated: bool) {
    let mut failed = Vec::new();

    for path in paths {
        let result = read_source(path, annotated)
            .and_then(|source| run_tokenizer(&source, false).map_err(|e| e.to_string()));
        match result {
            Ok(tokens) => eprintln!("OK: {path} ({} tokens)", tokens.len()),
            Err(e) => {
                eprintln!("FAIL: {path}: {e}");
                failed.push(path.as_str());
            }
        }
    }

    if failed.is_empty() {
        eprintln!("All {} files passed", paths.len());
    } else {
        eprintln!(
            "{} of {} files failed: {}",
            failed.len(),
            paths.len(),
            failed.join(", ")
        );
        std::process::exit(1);
    }
}
