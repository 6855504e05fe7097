//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use chrigizip::compression::{compress::compress, decompress::decompress};
use chrigizip::tools::cli::{zipopts_init, Mode};
use chrigizip::tools::report::Reporter;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The CLI lowers this afterwards.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::AlwaysAnsi,
    ) {
        eprintln!("Could not start the logger: {}", e);
    }

    let options = zipopts_init();
    let mut reporter = Reporter::new(std::io::stdout(), options.verbose);

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress(&options, &mut reporter),
        Mode::Unzip => decompress(&options, &mut reporter),
    };

    match result {
        Ok(()) => info!("Done.\n"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
