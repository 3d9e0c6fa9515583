// Upload a complete email message, read from stdin, into SeedDMS.
// With mutt: `macro index,pager S "| seeddms-email-upload<enter>"`.
// Exits with status 1 on any failure.

use clap::Parser;
use seeddms_upload::cli::{init_tracing, CommonArgs, CONFIG_HELP};
use seeddms_upload::payload::UploadPayload;
use seeddms_upload::ui::{Prompter, TerminalPrompter};
use seeddms_upload::workflow::{connect, load_profile};
use seeddms_upload::UploadError;
use std::io::{self, Read};
use std::process::ExitCode;

/// Read an email from stdin and upload it into SeedDMS
#[derive(Parser, Debug)]
#[command(version, after_help = CONFIG_HELP)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn run(cli: &Cli, prompter: &mut TerminalPrompter) -> anyhow::Result<()> {
    let profile = load_profile(&cli.common.config_path(), cli.common.section.as_deref(), prompter)?;

    // The message is parsed before logging in so that non-emails never
    // reach the server.
    let mut raw = Vec::new();
    io::stdin().read_to_end(&mut raw).map_err(UploadError::Stdin)?;
    let payload = UploadPayload::from_email(raw)?;

    let target = connect(profile, prompter)?;
    target.upload(&payload, "email", prompter)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let mut prompter = TerminalPrompter::new("Upload mail into SeedDMS");
    match run(&cli, &mut prompter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            prompter.message(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
