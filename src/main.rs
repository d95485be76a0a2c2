use std::process::exit;

use chess_duel::{report_error, run_program};

fn main() {
    if let Err(err) = run_program() {
        exit(report_error(&err));
    }
}
