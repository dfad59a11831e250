//! tangle: streaming topological sort over binary relation records.
//!
//! Reads a relation stream on stdin, writes the ordered objects on
//! stdout. Exit status: 0 when every object was ordered, 1 when the
//! relations contain a cycle, 2 on malformed input or resource failure.

use std::env;
use std::io;
use std::process::ExitCode;

use tangle::core::drain::Completion;
use tangle::core::graph::GraphError;
use tangle::stream::{self, StreamError};

fn usage() {
    println!("usage: tangle <in.dat >out.dat");
    println!();
    println!("Reads pairs of binary little-endian u32 values on stdin.");
    println!("Each pair is a precedence relation: predecessor, then successor.");
    println!("The first pair is (0, N) with N the object count; a (0, 0) pair");
    println!("terminates the input. Writes the object ids on stdout as binary");
    println!("little-endian u32 values, in an order consistent with every");
    println!("relation, followed by a 0 record.");
    println!();
    println!("Example:");
    println!("tangle <in.dat | od -An -td4 -w4 -v");
}

fn describe(err: &StreamError) -> String {
    match err {
        StreamError::MalformedHeader => "malformed header record".into(),
        StreamError::TruncatedInput => "input ended before the terminator record".into(),
        StreamError::Graph(GraphError::ObjectOutOfRange) => {
            "relation names an object outside 1..=N".into()
        }
        StreamError::Graph(GraphError::OutOfMemory) => "out of memory".into(),
        StreamError::Io(err) => format!("i/o error: {err}"),
    }
}

fn main() -> ExitCode {
    if env::args_os().len() > 1 {
        usage();
        return ExitCode::from(2);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match stream::run(stdin.lock(), stdout.lock()) {
        Ok(Completion::Complete) => ExitCode::SUCCESS,
        Ok(Completion::Cyclic { remaining }) => {
            eprintln!("tangle: cycle detected, {remaining} object(s) unresolved");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("tangle: {}", describe(&err));
            ExitCode::from(2)
        }
    }
}
