//! CLI entry point for codetree

use std::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use codetree::{
    BuildConfig, Command, Digest, DigestGenerator, OutputConfig, Outcome, Session, TreeView,
    format_status, print_stats_json,
};
use glob::Pattern;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "codetree")]
#[command(about = "Pick files from a directory tree and pack them into one digest")]
#[command(version)]
struct Args {
    /// Directory to open
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Show all files (ignore .gitignore rules, show .git)
    #[arg(short, long)]
    all: bool,

    /// Exclude paths matching a gitignore-style pattern (can be used multiple times)
    #[arg(short = 'I', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Select paths matching a glob, relative to the root (can be used multiple times)
    #[arg(short = 's', long = "select", value_name = "GLOB")]
    select: Vec<String>,

    /// Select the whole tree
    #[arg(long = "select-all")]
    select_all: bool,

    /// Write the digest to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the tree with selection marks instead of the digest
    #[arg(long = "tree")]
    tree: bool,

    /// Print selection statistics instead of the digest
    #[arg(long = "stats")]
    stats: bool,

    /// Print statistics as JSON (with --stats)
    #[arg(long = "json", requires = "stats")]
    json: bool,

    /// Skip token counting
    #[arg(long = "no-tokens")]
    no_tokens: bool,

    /// Navigate interactively, one command per line on stdin
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log debug information to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = BuildConfig {
        show_all: args.all,
        exclude_patterns: args.exclude.clone(),
    };
    let generator = if args.no_tokens {
        DigestGenerator::without_tokens()
    } else {
        DigestGenerator::new()
    };

    let mut session = match Session::open(&args.path, config, generator) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("codetree: {}", e);
            process::exit(1);
        }
    };
    if let Some(ref output) = args.output {
        session.set_output_file(output);
    }

    let view = TreeView::new(OutputConfig {
        use_color: should_use_color(args.color),
        expand_all: true,
    });

    let result = if args.interactive {
        run_interactive(&mut session, &view)
    } else {
        run_batch(&mut session, &args, &view)
    };

    if let Err(e) = result {
        eprintln!("codetree: {}", e);
        process::exit(1);
    }
}

/// Apply command-line selections and print the requested output.
fn run_batch(session: &mut Session, args: &Args, view: &TreeView) -> Result<(), Box<dyn Error>> {
    let patterns = args
        .select
        .iter()
        .map(|s| Pattern::new(s).map_err(|e| format!("invalid --select pattern '{}': {}", s, e)))
        .collect::<Result<Vec<_>, _>>()?;

    if args.select_all {
        session.select_all();
    }
    if !patterns.is_empty() && session.select_matching(&patterns) == 0 {
        eprintln!("codetree: warning: --select matched nothing");
    }

    if args.tree {
        view.print_tree(session.tree())?;
    }
    if args.stats {
        if args.json {
            print_stats_json(session.stats())?;
        } else {
            println!("{}", format_status(session.stats()));
        }
    }

    if !(args.tree || args.stats) || session.output_file().is_some() {
        let digest = session.generate()?;
        if session.output_file().is_none() {
            print_digest(&digest)?;
        }
    }
    Ok(())
}

/// Read one command per line from stdin until the user generates or quits.
fn run_interactive(session: &mut Session, view: &TreeView) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        view.print_session(session)?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("codetree: {}", e);
                continue;
            }
        };

        match session.handle(command) {
            Outcome::Continue => {}
            Outcome::Quit => return Ok(()),
            Outcome::Finished(digest) => {
                if session.output_file().is_none() {
                    print_digest(&digest)?;
                }
                return Ok(());
            }
        }
    }
}

/// Write the digest bytes to stdout unchanged.
fn print_digest(digest: &Digest) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(&digest.output)?;
    stdout.flush()
}
