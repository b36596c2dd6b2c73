use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "firstmatch",
    about = "Run first-match clauses against JSON-lines records",
    version
)]
pub struct Cli {
    /// Records file, one JSON object per line, or "-" to read from stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Evaluate records one after another instead of in parallel
    #[arg(short, long)]
    pub sequential: bool,

    /// Log clause evaluation to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print one JSON result per record
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
