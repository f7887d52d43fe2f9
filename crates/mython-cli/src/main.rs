//! Command-line driver: reads a Mython source file and runs it, printing to stdout.

use std::{env, fs, process::ExitCode, time::Instant};

use mython::{Runner, StdPrint};

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: mython <path-to-script>");
        return ExitCode::FAILURE;
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("mython: could not read '{path}': {err}");
            return ExitCode::FAILURE;
        }
    };

    let started = Instant::now();
    let runner = match Runner::compile(&source) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("mython: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink = StdPrint;
    if let Err(err) = runner.run(&mut sink) {
        eprintln!("mython: {err}");
        return ExitCode::FAILURE;
    }

    eprintln!("mython: ran '{path}' in {:.3}ms", started.elapsed().as_secs_f64() * 1000.0);
    ExitCode::SUCCESS
}
