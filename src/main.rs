//! refunge: runs a multi-cursor grid program against stdin/stdout.

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use refunge::config::{parse_nul, Config};
use refunge::debug::{cursor_views, render_cursors, render_grid};
use refunge::interpreter::{Features, Interpreter};
use refunge::runner::{ReadSource, Runner, WriteSink};

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    /// `-*`: enable clear mode.
    clear_mode: bool,
    /// `-c X`: NUL substitution character.
    nul: Option<u8>,
    /// `--max-ticks N`: stop after N ticks.
    max_ticks: Option<u64>,
    /// `--dump`: print the final grid and cursors to stderr.
    dump: bool,
    /// `--sample-config`: print a sample config file and exit.
    sample_config: bool,
    /// `-h` / `--help`.
    help: bool,
    /// Program path.
    program: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let argv: Vec<String> = env::args().collect();
    let name = argv.first().map(String::as_str).unwrap_or("refunge");

    // No arguments at all: show usage and succeed.
    if argv.len() < 2 {
        print_usage(name);
        return Ok(());
    }

    let args = match parse_args(&argv[1..]) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage(name);
            std::process::exit(1);
        }
    };

    if args.help {
        print_usage(name);
        return Ok(());
    }

    if args.sample_config {
        if let Some(path) = Config::user_config_path() {
            println!("# {}", path.display());
        }
        print!("{}", Config::sample_config());
        return Ok(());
    }

    let Some(path) = args.program.as_ref() else {
        print_usage(name);
        std::process::exit(1);
    };

    let config = Config::get();
    let mut options = config.options_with(args.nul).context("Invalid configuration")?;
    if args.clear_mode {
        options = options.with_features(Features::CLEAR_MODE);
    }

    let mut interp = Interpreter::from_source_file(path, options)
        .with_context(|| format!("Could not open {}", path.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut runner = Runner::new(ReadSource::new(stdin.lock()), WriteSink::new(stdout.lock()));
    if let Some(limit) = args.max_ticks {
        runner = runner.with_tick_limit(limit);
    }

    let summary = runner.run(&mut interp)?;
    log::info!(
        "{} ticks, {} bytes in, {} bytes out",
        summary.ticks,
        summary.bytes_in,
        summary.bytes_out
    );

    if args.dump {
        eprint!("{}", render_grid(interp.grid()));
        eprint!("{}", render_cursors(&cursor_views(&interp)));
    }

    if !summary.success() {
        eprintln!("Stopped after {} ticks without halting", summary.ticks);
        std::process::exit(1);
    }

    Ok(())
}

fn print_usage(name: &str) {
    println!("Usage: {} [-*] [-c X] [--max-ticks N] [--dump] <program>", name);
    println!();
    println!("Options:");
    println!("  -*               Enable the * clear instruction");
    println!("  -c X             Load character X as a 0 cell");
    println!("  --max-ticks N    Stop after N ticks");
    println!("  --dump           Print the final grid and cursors to stderr");
    println!("  --sample-config  Print a sample configuration file");
    println!("  -h, --help       Show this help");
}

/// Parse arguments after the program name.
fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = argv.iter();
    let mut flags_done = false;

    while let Some(arg) = iter.next() {
        if flags_done || !arg.starts_with('-') || arg == "-" {
            if args.program.is_some() {
                return Err(format!("Unexpected argument \"{}\"", arg));
            }
            args.program = Some(PathBuf::from(arg));
            continue;
        }

        match arg.as_str() {
            "--" => flags_done = true,
            "-*" => args.clear_mode = true,
            "--dump" => args.dump = true,
            "--sample-config" => args.sample_config = true,
            "-h" | "--help" => args.help = true,
            "-c" => {
                let value = iter.next().ok_or("-c expects a character")?;
                args.nul = Some(nul_arg(value)?);
            }
            "--max-ticks" => {
                let value = iter.next().ok_or("--max-ticks expects a number")?;
                args.max_ticks = Some(ticks_arg(value)?);
            }
            _ => {
                if let Some(value) = arg.strip_prefix("--max-ticks=") {
                    args.max_ticks = Some(ticks_arg(value)?);
                } else if let Some(value) = arg.strip_prefix("-c") {
                    args.nul = Some(nul_arg(value)?);
                } else {
                    return Err(format!("Unknown option \"{}\"", arg));
                }
            }
        }
    }

    Ok(args)
}

fn nul_arg(value: &str) -> Result<u8, String> {
    parse_nul(value).map_err(|_| format!("-c expects a single character, not \"{}\"", value))
}

fn ticks_arg(value: &str) -> Result<u64, String> {
    value
        .parse()
        .map_err(|e| format!("--max-ticks expects a number, not \"{}\": {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_args(&owned)
    }

    #[test]
    fn test_parse_program_only() {
        let args = parse(&["prog.rf"]).unwrap();
        assert_eq!(args.program, Some(PathBuf::from("prog.rf")));
        assert!(!args.clear_mode);
        assert_eq!(args.nul, None);
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&["-*", "-c", ".", "--max-ticks", "50", "--dump", "p"]).unwrap();
        assert!(args.clear_mode);
        assert_eq!(args.nul, Some(b'.'));
        assert_eq!(args.max_ticks, Some(50));
        assert!(args.dump);
        assert_eq!(args.program, Some(PathBuf::from("p")));
    }

    #[test]
    fn test_parse_joined_values() {
        let args = parse(&["-c_", "--max-ticks=7", "p"]).unwrap();
        assert_eq!(args.nul, Some(b'_'));
        assert_eq!(args.max_ticks, Some(7));
    }

    #[test]
    fn test_parse_double_dash() {
        let args = parse(&["--", "-weird-name"]).unwrap();
        assert_eq!(args.program, Some(PathBuf::from("-weird-name")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["-c", "ab", "p"]).unwrap_err().contains("single character"));
        assert!(parse(&["-c"]).is_err());
        assert!(parse(&["--max-ticks", "lots", "p"]).is_err());
        assert!(parse(&["-x", "p"]).unwrap_err().contains("Unknown option"));
        assert!(parse(&["a", "b"]).unwrap_err().contains("Unexpected"));
    }
}
