use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod convert;

use convert::{convert_file, ConvertOptions};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compiles the Oxford Russian dictionary export into a Yomitan term bank"
)]
struct Cli {
    /// Text export of the MDict dictionary, one entry per line
    #[arg(short, long, value_name = "FILE", default_value = "Ru-En_Oxf_Russian4th_v1_1.txt")]
    input: PathBuf,

    /// Term bank to write; an existing file is overwritten
    #[arg(short, long, value_name = "FILE", default_value = "term_bank_1.json")]
    output: PathBuf,

    /// Write the JSON without indentation
    #[arg(long)]
    compact: bool,

    /// Leave the definitionTags column empty instead of tagging parts of speech
    #[arg(long)]
    no_pos_tags: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            pretty: !self.compact,
            pos_tags: !self.no_pos_tags,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::info!("📖 Reading export from {:?}...", cli.input);
    let report = convert_file(&cli.input, &cli.output, &cli.options())?;

    println!(
        "✅ Success! {} terms written to {:?} ({} lines skipped)",
        report.records, cli.output, report.skipped
    );
    Ok(())
}
