use std::{
    fs,
    io::{self, Read},
    iter,
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error};

use tacgen::{
    error::{Location, PositionalError},
    il::OptimisationLog,
    span::Span,
};

mod commandline;

use commandline::{LogOptions, Operation, Options, OutputOptions};

fn main() -> Result<()> {
    let options = Options::parse();

    stderrlog::new()
        .module(module_path!())
        .quiet(options.quiet)
        .verbosity(options.verbose as usize + 1)
        .init()?;

    match &options.operation {
        Operation::Convert { file, output } => {
            let source = read_input(file)?;
            let listing = tacgen::convert(&source).map_err(|e| report(&e, &source))?;
            write_output(output, &tacgen::render(&listing))
        }
        Operation::Optimise { file, output, log } => {
            let source = read_input(file)?;
            let compiled = tacgen::optimise_text(&source).map_err(|e| report(&e, &source))?;
            write_output(output, &compiled.code)?;
            write_log(log, &compiled.log)
        }
        Operation::Compile {
            file,
            output,
            log,
            no_optimise,
        } => {
            let source = read_input(file)?;
            let compiled =
                tacgen::compile(&source, !no_optimise).map_err(|e| report(&e, &source))?;
            write_output(output, &compiled.code)?;
            if !no_optimise {
                write_log(log, &compiled.log)?;
            }
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }

    debug!("Reading {}", path.display());
    fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn write_output(options: &OutputOptions, code: &str) -> Result<()> {
    match &options.output {
        Some(path) => {
            debug!("Writing code to {}", path.display());
            fs::write(path, format!("{}\n", code))
                .with_context(|| format!("Failed to write '{}'", path.display()))
        }
        None => {
            if !code.is_empty() {
                println!("{}", code);
            }
            Ok(())
        }
    }
}

fn write_log(options: &LogOptions, log: &OptimisationLog) -> Result<()> {
    match &options.log_file {
        Some(path) => {
            debug!("Writing optimisation log to {}", path.display());
            fs::write(path, log.to_string())
                .with_context(|| format!("Failed to write '{}'", path.display()))
        }
        None => {
            eprint!("{}", log);
            Ok(())
        }
    }
}

/// Prints an error with the part of the input it refers to, and turns it into an
/// [`anyhow::Error`] for the exit status.
fn report<E: PositionalError>(err: &E, source: &str) -> anyhow::Error {
    match err.location() {
        Location::Source(span) => describe_span(span, source),
        Location::Line(position) => {
            if let Some(line) = source.lines().filter(|l| !l.trim().is_empty()).nth(position.0) {
                let gutter = format!("{}", position.line_number());
                eprintln!("{}| {}", gutter, line.trim());
            }
        }
        Location::Input => (),
    }

    error!("{}", err.describe());
    anyhow::anyhow!("{}", err.describe())
}

fn describe_span(span: Span, source: &str) {
    let start: usize = span.start().into();
    let Some((line_no, line_start, error_line)) = find_line(source, start) else {
        return;
    };
    let padding = source[line_start..start].chars().count();
    let width = span
        .lookup(source)
        .lines()
        .next()
        .map_or(1, |first| first.chars().count().max(1));

    fn pad_char(ch: char, times: usize) -> String {
        iter::repeat(ch).take(times).collect()
    }

    let gutter = format!("{}", line_no);

    eprintln!("{}| {}", gutter, error_line);
    eprintln!(
        "{}| {}{}",
        pad_char(' ', gutter.len()),
        pad_char(' ', padding),
        pad_char('^', width),
    );
}

fn find_line(source: &str, target_position: usize) -> Option<(usize, usize, &str)> {
    let lines = source.split_inclusive(|c| c == '\n' || c == '\r');
    let mut position = 0usize;
    for (line_idx, line) in lines.enumerate() {
        let end_position = position + line.len();
        if target_position >= position && target_position <= end_position {
            return Some((line_idx + 1, position, line.trim_end()));
        }
        position = end_position;
    }

    None
}
