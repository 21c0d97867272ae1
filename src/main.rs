use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use astgen::{Config, Output, Report, SchemaSource, Writer, generate};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(argh::FromArgs)]
/// Generate visitor-pattern AST classes, one file per schema category.
struct Args {
    /// schema file to read, may be repeated (default: the built-in Lox schema)
    #[argh(option, short = 's')]
    schema: Vec<PathBuf>,

    /// TOML config file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// check that the files in the output directory are up to date instead of
    /// writing them
    #[argh(switch)]
    check: bool,

    /// output directory, or `-` to print to stdout
    #[argh(positional)]
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astgen=info,generate_ast=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    match run(args) {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            for (_, failure) in report.failures() {
                eprintln!("{}", failure.diagnostic);
            }
            for path in report.stale() {
                eprintln!("out of date: {}", path.display());
            }
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Like `argh::from_env`, but usage errors exit with 2.
fn parse_args() -> Result<Args, ExitCode> {
    let strings: Vec<String> = std::env::args().collect();
    let cmd = strings.first().map_or("generate-ast", String::as_str);
    let rest = dash_as_positional(strings.get(1..).unwrap_or_default());

    <Args as argh::FromArgs>::from_args(&[cmd], &rest).map_err(|early| match early.status {
        Ok(()) => {
            println!("{}", early.output);
            ExitCode::SUCCESS
        }
        Err(()) => {
            eprintln!("{}", early.output);
            ExitCode::from(2)
        }
    })
}

/// argh reads a lone `-` as an unknown flag, so move it behind `--`.
fn dash_as_positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::with_capacity(args.len() + 2);
    let mut dash = false;
    let mut takes_value = false;

    let mut iter = args.iter().map(String::as_str);
    while let Some(arg) = iter.next() {
        if !takes_value && arg == "--" {
            out.push(arg);
            out.extend(iter.by_ref());
            if dash {
                out.push("-");
            }
            return out;
        }
        if !takes_value && arg == "-" {
            dash = true;
        } else {
            out.push(arg);
        }
        takes_value = !takes_value && matches!(arg, "-s" | "--schema" | "-c" | "--config");
    }

    if dash {
        out.extend(["--", "-"]);
    }
    out
}

fn run(args: Args) -> anyhow::Result<Report> {
    let stdout = args.output_dir.as_os_str() == "-";
    if stdout && args.check {
        anyhow::bail!("`--check` needs an output directory, not `-`");
    }

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let schema_paths = if args.schema.is_empty() {
        config.schemas.clone()
    } else {
        args.schema.clone()
    };

    let sources = if schema_paths.is_empty() {
        vec![SchemaSource::builtin()]
    } else {
        schema_paths
            .iter()
            .map(|path| {
                SchemaSource::read(path)
                    .with_context(|| format!("failed to read schema `{}`", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let output = if stdout {
        Output::Stdout
    } else if args.check {
        Output::Check(Writer::new(&args.output_dir))
    } else {
        Output::Dir(Writer::new(&args.output_dir))
    };

    Ok(generate(&sources, &config.emit_options(), &output))
}
