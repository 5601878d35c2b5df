/// MX3D command-line tool
///
/// Examples:
///   mx3d matrix "translate(2, 1, 0) @ rotate_y(45)"
///   mx3d apply "rotate_y(90)" -p 1,0,0
///   mx3d euler "euler(10, 20, 30, zyx)" --order zyx
///   mx3d mesh cube --transform "translate(-3,0,0) @ rx(20)" --json
use std::io;

use clap::Parser;
use mx3d_terminal::{run, Cli};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    if let Err(err) = run(&cli, &mut stdout.lock()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
