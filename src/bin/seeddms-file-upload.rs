// Upload files from disk or stdin (`-`) into SeedDMS.
// With mutt: `macro attach S "| seeddms-file-upload -<enter>"`.
// The first failed upload ends the run with status 1.

use clap::Parser;
use seeddms_upload::cli::{init_tracing, CommonArgs, CONFIG_HELP};
use seeddms_upload::payload::preflight;
use seeddms_upload::ui::{Prompter, TerminalPrompter};
use seeddms_upload::workflow::{connect, load_profile};
use std::io;
use std::process::ExitCode;

/// Read files from disk or stdin and upload them into SeedDMS
#[derive(Parser, Debug)]
#[command(version, after_help = CONFIG_HELP)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Comment stored with every uploaded document
    #[arg(long)]
    comment: Option<String>,

    /// Files to upload, `-` reads from stdin
    files: Vec<String>,
}

fn run(cli: &Cli, prompter: &mut TerminalPrompter) -> anyhow::Result<()> {
    let sources = preflight(&cli.files)?;
    let profile = load_profile(&cli.common.config_path(), cli.common.section.as_deref(), prompter)?;
    let target = connect(profile, prompter)?;

    let mut stdin = io::stdin().lock();
    for source in &sources {
        let mut payload = source.load(&mut stdin, prompter)?;
        payload.comment = cli.comment.clone();
        target.upload(&payload, &payload.document_name, prompter)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let mut prompter = TerminalPrompter::new("Upload file into SeedDMS");
    match run(&cli, &mut prompter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            prompter.message(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
