use crate::files::{write_archive, write_bundle};
use crate::llm::{ProviderOptions, RigCompletion};
use crate::prelude::{eprintln, println, *};
use crate::relay::Relay;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitegen_core::session::Session;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    /// Description of the website to generate
    pub prompt: String,

    /// Write every generated file below this directory
    #[clap(long)]
    pub out: Option<PathBuf>,

    /// Package the generated files into this zip archive
    #[clap(long)]
    pub zip: Option<PathBuf>,

    /// Print a single generated file instead of the raw response
    #[clap(long)]
    pub preview: Option<String>,

    #[clap(flatten)]
    pub provider: ProviderOptions,
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Generating site...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let service = RigCompletion::from_options(&options.provider)?;

    if global.verbose {
        eprintln!("Using {}", service.describe());
        eprintln!("Prompt length: {} chars", options.prompt.len());
    }

    let relay = Relay::new(Arc::new(service), options.provider.completion_options());

    let spinner = spinner();
    let result = relay.generate(&options.prompt).await;
    spinner.finish_and_clear();

    let mut session = Session::new(global.marker_mode.into());
    session.record(result?);

    if options.out.is_none() && options.zip.is_none() && options.preview.is_none() {
        if let Some(text) = session.last_response() {
            print!("{text}");
        }
        return Ok(());
    }

    if let Some(path) = &options.preview {
        let preview = session.preview(path)?;
        if preview.is_found() {
            println!("{}", preview.html());
        } else {
            eprintln!(
                "{}",
                f!("No file named '{}' in the response.", preview.path()).yellow()
            );
        }
    }

    if let Some(dir) = &options.out {
        let bundle = session.bundle()?;
        if bundle.is_empty() {
            eprintln!("{}", "The response contains no file markers; nothing written.".yellow());
        } else {
            let written = write_bundle(&bundle, dir)?;
            eprintln!(
                "{}",
                f!("Wrote {} files to {}", written.len(), dir.display()).green()
            );
        }
    }

    if let Some(zip) = &options.zip {
        let bundle = session.bundle()?;
        if write_archive(&bundle, zip)? {
            eprintln!(
                "{}",
                f!("Packaged {} files into {}", bundle.len(), zip.display()).green()
            );
        }
    }

    Ok(())
}
