//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::process::exit;

use huffzip::tools::cli::huffopts_init;
use huffzip::tools::files::run;

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The command line narrows
    // this down. Logs go to stderr so --stdout output stays clean.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not start the logger: {}", e);
    }

    let options = huffopts_init();

    //----- Figure how what we need to do and go do it
    match run(&options) {
        Ok(0) => info!("Done."),
        Ok(failed) => {
            error!("{} of {} inputs failed.", failed, options.files.len());
            exit(1);
        }
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}
