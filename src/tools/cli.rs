use std::ffi::OsString;
use std::path::PathBuf;
use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::info;

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Progress lines
    Normal,
    /// Progress plus the per byte code statistics
    Chatty,
}

impl From<u8> for Verbosity {
    fn from(v: u8) -> Self {
        match v {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            _ => Verbosity::Chatty,
        }
    }
}

/// Zip, Unzip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Everything a run of chrigizip needs to know.
#[derive(Debug, Clone)]
pub struct ZipOpts {
    /// Compress or decompress
    pub op_mode: Mode,
    /// Files to read for input, processed in order
    pub files: Vec<PathBuf>,
    /// Output path. Only valid with a single input file.
    pub output: Option<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
    /// Raw -v value, also used for the log level
    pub log_level: u8,
}

impl ZipOpts {
    pub fn new() -> Self {
        Self {
            op_mode: Mode::Zip,
            files: vec![],
            output: None,
            force_overwrite: false,
            verbose: Verbosity::Quiet,
            log_level: 0,
        }
    }

    /// Parse a full command line (program name first).
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::try_parse_from(args)?;
        if args.output.is_some() && args.files.len() > 1 {
            return Err(clap::Error::raw(
                clap::ErrorKind::ArgumentConflict,
                "--output can only be used with a single input file\n",
            ));
        }
        Ok(args.into())
    }

    /// Log level filter matching the -v value.
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.log_level {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

impl Default for ZipOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Compress and extract files with a weight-split prefix code",
    long_about = "
    Each file is compressed on its own. The output carries the original file name, so
    extracting writes the file back under that name unless -o says otherwise."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true)]
    files: Vec<PathBuf>,

    /// Compress the input files (the default)
    #[clap(short = 'z', long = "compress", short_alias = 'e')]
    compress: bool,

    /// Extract the input files
    #[clap(short = 'd', long = "decompress", short_alias = 'x', conflicts_with = "compress")]
    decompress: bool,

    /// Write the result here instead of the default name
    #[clap(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Sets verbosity. 1 reports progress, 2 adds code statistics, 3 traces
    #[clap(short = 'v', long = "verbose", default_value_t = 0)]
    v: u8,
}

impl From<Args> for ZipOpts {
    fn from(args: Args) -> Self {
        Self {
            op_mode: if args.decompress { Mode::Unzip } else { Mode::Zip },
            files: args.files,
            output: args.output,
            force_overwrite: args.force,
            verbose: Verbosity::from(args.v),
            log_level: args.v,
        }
    }
}

/// Read the process command line and set the log level from it. Exits with clap's usage message
/// on bad arguments.
pub fn zipopts_init() -> ZipOpts {
    let opts = match ZipOpts::try_from_args(std::env::args_os()) {
        Ok(opts) => opts,
        Err(e) => e.exit(),
    };
    log::set_max_level(opts.level_filter());

    info!("---- chrigizip initialization ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    if let Some(out) = &opts.output {
        info!("Writing output to {}", out.display());
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}
