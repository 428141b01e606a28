//! Mochi Term Info Inspector
//!
//! Loads a JSON terminal profile, checks every template in it, and prints
//! what it contains. Can also format a single sequence with arguments.

use std::io::{self, Read};
use std::process::ExitCode;

use mochi_term_info::{SeqKind, TermInfoConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut input_file: Option<String> = None;
    let mut emit: Option<String> = None;
    let mut emit_args: Vec<u32> = Vec::new();
    let mut output_format = OutputFormat::Text;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "-e" | "--emit" => {
                i += 1;
                if i < args.len() {
                    emit = Some(args[i].clone());
                }
            },
            "-a" | "--args" => {
                i += 1;
                if i < args.len() {
                    match parse_arg_list(&args[i]) {
                        Some(values) => emit_args = values,
                        None => {
                            eprintln!("Invalid argument list '{}'", args[i]);
                            return ExitCode::FAILURE;
                        },
                    }
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as profile file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    // Read profile
    let json = match &input_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut data = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    let term_info = match TermInfoConfig::from_json(&json).and_then(|config| config.build()) {
        Ok(term_info) => term_info,
        Err(e) => {
            eprintln!("Error loading profile: {}", e);
            return ExitCode::FAILURE;
        },
    };

    if let Some(name) = emit {
        let kind: SeqKind = match name.parse() {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            },
        };
        return match term_info.emit_seq(kind, &emit_args) {
            Ok(bytes) => {
                println!("{}", escape_bytes(&bytes));
                ExitCode::SUCCESS
            },
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            },
        };
    }

    match output_format {
        OutputFormat::Text => {
            println!("Terminal: {}", term_info.name().unwrap_or("(unnamed)"));
            println!("---");
            for (kind, template) in term_info.iter() {
                println!("{:<32} {}", kind.name(), escape_bytes(template.as_bytes()));
            }
            println!("---");
        },
        OutputFormat::Json => {
            let config = TermInfoConfig::from_term_info(&term_info);
            match serde_json::to_string_pretty(&config) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing profile: {}", e);
                    return ExitCode::FAILURE;
                },
            }
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

/// Parse "1,2,3" into argument values
fn parse_arg_list(list: &str) -> Option<Vec<u32>> {
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.trim().parse().ok())
        .collect()
}

/// Render control bytes as printable escapes
fn escape_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}

fn print_help() {
    println!("Mochi Term Info Inspector");
    println!();
    println!("Usage: mochi-term-info [OPTIONS] [PROFILE]");
    println!();
    println!("Options:");
    println!("  -f, --file <PATH>    Read profile from file");
    println!("  -e, --emit <SEQ>     Format one sequence instead of listing");
    println!("  -a, --args <LIST>    Comma-separated arguments for --emit");
    println!("  -j, --json           Print the checked profile as JSON");
    println!("  -t, --text           Print the profile as text (default)");
    println!("  -h, --help           Show this help message");
    println!();
    println!("If no profile is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  mochi-term-info xterm.json");
    println!("  mochi-term-info -e cursor_to_pos -a 10,5 xterm.json");
    println!("  mochi-term-info --json < xterm.json");
}
