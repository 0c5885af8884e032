use clap::Parser;

use thumbs::cli::{Args, run};

fn main() {
    let args = Args::parse();

    match run(args) {
        // Everything ok
        Ok(true) => {}
        // Found nothing to do
        Ok(false) => std::process::exit(125),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
