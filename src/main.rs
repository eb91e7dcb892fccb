//! Birdspot CLI entry point.

#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = birdspot::run() {
        if matches!(e, birdspot::Error::Interrupted) {
            std::process::exit(130);
        }
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
