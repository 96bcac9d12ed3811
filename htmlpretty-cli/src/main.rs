//! `htmlpretty`: pretty-print an HTML5 document from stdin to stdout.
//!
//! Set `HTMLPRETTY_LOG` (e.g. `HTMLPRETTY_LOG=htmlpretty=trace`) to log printing
//! decisions to stderr.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use htmlpretty::{Document, PrintOptions};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::time::Uptime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Pretty-print an HTML5 document from stdin.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// String to use for each level of indenting
    #[arg(long, default_value = "  ")]
    indent: String,

    /// Line wrap length; 0 or less disables wrapping
    #[arg(long, default_value_t = 120, allow_negative_numbers = true)]
    wrap: i64,
}

impl Cli {
    fn print_options(&self) -> PrintOptions {
        let wrap = usize::try_from(self.wrap).unwrap_or(0);
        PrintOptions::new().indent(self.indent.as_str()).wrap(wrap)
    }
}

fn setup_tracing() {
    // Only log when HTMLPRETTY_LOG is set: stdout is the document
    let Some(filter) = std::env::var("HTMLPRETTY_LOG")
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
    else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_timer(Uptime::default())
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing();

    let doc = match Document::read_from(&mut io::stdin().lock()) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("failed parsing HTML: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = cli.print_options();
    tracing::debug!(?options, "parsed input");

    let out = BufWriter::new(io::stdout().lock());
    if let Err(err) = htmlpretty::print(out, &doc, &options) {
        eprintln!("failed printing HTML: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
