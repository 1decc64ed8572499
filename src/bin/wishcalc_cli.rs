use std::{env, process};

use wishcalc::{cli, init};

fn main() {
    init();

    if let Err(err) = cli::run_cli(env::args().skip(1)) {
        cli::output::error(format!("Error: {err}"));
        process::exit(1);
    }
}
