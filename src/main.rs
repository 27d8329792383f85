/* Compiles one BST style into a Groovy script. */

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use bstgroovy::{compile_file, CompileOptions};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The .bst style to compile
    input: PathBuf,
    /// Where to write the script. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Skip constant folding and dead store elimination
    #[arg(long)]
    no_optimize: bool,
    /// Name of the generated class
    #[arg(long, default_value = "Style")]
    class_name: String,
    /// A processor option, as name=value. May be repeated.
    #[arg(long = "option", value_parser = parse_option)]
    options: Vec<(String, String)>,
    /// More logging. Repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_option(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{arg}'")),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = CompileOptions { optimize: !cli.no_optimize, class_name: cli.class_name, options: cli.options };

    let path = cli.input.to_string_lossy().into_owned();
    let script = compile_file(&path, &options).with_context(|| format!("Failed to compile {path}"))?;

    match cli.output {
        Some(output) => std::fs::write(&output, script).with_context(|| format!("Failed to write {}", output.display()))?,
        None => print!("{script}"),
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
