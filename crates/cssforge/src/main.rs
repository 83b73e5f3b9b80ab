//! cssforge - CSS optimizer and vendor prefixer
//!
//! Usage: cssforge [OPTIONS] <FILE|->

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use cssforge::{compile, Config};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command line
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    input: Option<String>,
    output: Option<String>,
    config: Option<String>,
    pretty: bool,
    no_optimize: bool,
    no_prefix: bool,
    remove_ie_hacks: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Version,
    Compile(Options),
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cssforge");

    match parse_args(&args[1.min(args.len())..]) {
        Ok(Command::Help) => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        Ok(Command::Version) => {
            println!("cssforge {}", VERSION);
            ExitCode::SUCCESS
        }
        Ok(Command::Compile(options)) => {
            if let Err(e) = run(&options) {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r#"cssforge {} - CSS optimizer and vendor prefixer

USAGE:
    {} [OPTIONS] <FILE|->

OPTIONS:
    -h, --help            Print this help message
    -V, --version         Print version information
    -o, --output <PATH>   Write the result to PATH instead of stdout
    --pretty              Indented output instead of compressed
    --config <PATH>       Read pipeline options from a JSON file
    --no-optimize         Skip the optimizer pass
    --no-prefix           Skip the vendor prefixer pass
    --remove-ie-hacks     Drop declarations only old Internet Explorer reads

EXAMPLES:
    {} style.css
    {} --pretty -o out.css style.css
    cat style.css | {} -
"#,
        VERSION, program, program, program, program
    );
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-o" | "--output" => {
                let path = iter.next().ok_or_else(|| format!("{} needs a path", arg))?;
                options.output = Some(path.clone());
            }
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                options.config = Some(path.clone());
            }
            "--pretty" => options.pretty = true,
            "--no-optimize" => options.no_optimize = true,
            "--no-prefix" => options.no_prefix = true,
            "--remove-ie-hacks" => options.remove_ie_hacks = true,
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("unknown option {}", flag));
            }
            input => {
                if options.input.is_some() {
                    return Err(format!("unexpected argument {}", input));
                }
                options.input = Some(input.to_string());
            }
        }
    }

    if options.input.is_none() {
        return Err("no input file".to_string());
    }
    Ok(Command::Compile(options))
}

/// Build the pipeline configuration: config file first, then flags
fn load_config(options: &Options) -> Result<Config, String> {
    let mut config = match &options.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path, e))?;
            Config::from_json(&text).map_err(|e| format!("{}: {}", path, e))?
        }
        None => Config::default(),
    };

    if options.pretty {
        config.compressed = false;
    }
    if options.no_optimize {
        config.optimize = false;
    }
    if options.no_prefix {
        config.prefix = false;
    }
    if options.remove_ie_hacks {
        config.optimizer.remove_ie_hacks = true;
    }
    Ok(config)
}

fn read_input(input: &str) -> Result<String, String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        Ok(text)
    } else {
        fs::read_to_string(input).map_err(|e| format!("Failed to read {}: {}", input, e))
    }
}

fn run(options: &Options) -> Result<(), String> {
    let config = load_config(options)?;
    let input = options.input.as_deref().unwrap_or("-");
    let source = read_input(input)?;

    let output = compile(&source, &config).map_err(|e| format!("{}: {}", input, e))?;
    log::info!("{}: {} bytes -> {} bytes", input, source.len(), output.len());

    match &options.output {
        Some(path) => {
            fs::write(path, &output).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        }
        None => print!("{}", output),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let command = parse_args(&args(&["--pretty", "-o", "out.css", "--no-prefix", "in.css"])).unwrap();
        assert_eq!(
            command,
            Command::Compile(Options {
                input: Some("in.css".to_string()),
                output: Some("out.css".to_string()),
                pretty: true,
                no_prefix: true,
                ..Options::default()
            })
        );
        assert_eq!(parse_args(&args(&["-V"])).unwrap(), Command::Version);
        assert_eq!(parse_args(&args(&["a.css", "--help"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_stdin_input() {
        let Command::Compile(options) = parse_args(&args(&["-"])).unwrap() else {
            panic!("expected compile");
        };
        assert_eq!(options.input.as_deref(), Some("-"));
    }

    #[test]
    fn test_bad_args() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--bogus", "a.css"])).is_err());
        assert!(parse_args(&args(&["a.css", "b.css"])).is_err());
        assert!(parse_args(&args(&["a.css", "-o"])).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let options = Options {
            input: Some("a.css".to_string()),
            no_optimize: true,
            remove_ie_hacks: true,
            ..Options::default()
        };
        let config = load_config(&options).unwrap();
        assert!(!config.optimize);
        assert!(config.prefix);
        assert!(config.optimizer.remove_ie_hacks);
    }
}
