use clap::Parser;
use firstmatch::cli::Cli;
use firstmatch::output::Output;
use firstmatch::record::parse_file;
use firstmatch::runner::evaluate_all;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Reset SIGPIPE handler to default (terminate) so piping to head/tail works correctly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    let cli = Cli::parse();
    init_tracing(&cli);

    let use_color = !cli.no_color && atty::is(atty::Stream::Stdout);
    let mut output = Output::new(use_color);

    let entries = parse_file(&cli.input)?;
    if entries.is_empty() {
        let source = if cli.reads_stdin() {
            "stdin".to_string()
        } else {
            cli.input.display().to_string()
        };
        eprintln!("No records found in {}", source);
        return Ok(());
    }

    let start_time = Instant::now();
    let results = evaluate_all(&entries, cli.sequential)?;
    let elapsed = start_time.elapsed();

    if cli.json {
        output.print_json(&results)?;
    } else {
        output.print_results(&results, elapsed)?;
    }

    Ok(())
}

/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(atty::is(atty::Stream::Stderr))
                .with_target(true),
        )
        .with(filter)
        .init();
}
