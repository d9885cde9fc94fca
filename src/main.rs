//! Command line driver for lrkit.
//!
//! Usage:
//!   lrkit grammar `<file>` [--variant slr1] [--input "a + a"]... [--dot]
//!   lrkit regex `<pattern>` [--matches `<string>`]... [--describe nfa|dfa|min] [--dot nfa|dfa|min]
//!
//! Set `RUST_LOG=debug` to see construction details.

use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use lrkit::{parser::Variant, Automaton, Session};

#[derive(Debug, ClapParser)]
#[command(name = "lrkit", version, about = "LR parser and regex automata construction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the canonical collection and parse table of a grammar file and optionally parse
    /// token strings with it.
    Grammar {
        /// Grammar file with one `A -> x y | z` rule per line.
        file: PathBuf,
        /// Parser variant (`lr0` or `slr1`).
        #[arg(short, long, default_value = "slr1")]
        variant: Variant,
        /// Whitespace separated tokens to parse, may be given multiple times.
        #[arg(short, long)]
        input: Vec<String>,
        /// Print the canonical collection as a dot graph instead of the textual summary.
        #[arg(long)]
        dot: bool,
    },
    /// Compile a regex into NFA, DFA and minimized DFA and optionally match strings with it.
    Regex {
        pattern: String,
        /// String to match in full, may be given multiple times.
        #[arg(short, long)]
        matches: Vec<String>,
        /// Only describe the given automaton (`nfa`, `dfa` or `min`).
        #[arg(long)]
        describe: Option<Automaton>,
        /// Print the given automaton (`nfa`, `dfa` or `min`) as a dot graph.
        #[arg(long)]
        dot: Option<Automaton>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut session = Session::new();

    match cli.command {
        Command::Grammar {
            file,
            variant,
            input,
            dot,
        } => {
            let text = std::fs::read_to_string(&file)?;
            session.build_grammar_table(&text, variant)?;

            if dot {
                println!("{}", session.graph(Automaton::Cfsm)?.to_dot());
            } else {
                println!("{}", session.describe(Automaton::Cfsm)?);
            }

            for tokens in input {
                let trace = session.parse_input(&tokens)?;
                println!("\nInput: {tokens}\n{trace}");
            }
        }
        Command::Regex {
            pattern,
            matches,
            describe,
            dot,
        } => {
            let summary = session.compile_regex(&pattern)?.to_string();

            match (describe, dot) {
                (_, Some(automaton)) => println!("{}", session.graph(automaton)?.to_dot()),
                (Some(automaton), None) => println!("{}", session.describe(automaton)?),
                (None, None) => println!("{summary}"),
            }

            for input in matches {
                let verdict = if session.match_string(&input)? {
                    "accepted"
                } else {
                    "rejected"
                };
                println!("{input:?}: {verdict}");
            }
        }
    }

    Ok(())
}
