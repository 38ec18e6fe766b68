//! Commands that work on a saved completion blob: list, extract and package
//! the files it contains.

use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use sitegen_core::archive::pack;
use sitegen_core::bundle::{is_safe_relative_path, split_all, ResponseBundle};
use sitegen_core::session::preview;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args)]
pub struct SplitOptions {
    /// File holding the completion text (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// Output as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args)]
pub struct ExtractOptions {
    /// Path of the file to extract, as written in its marker
    pub path: String,

    /// File holding the completion text (reads stdin when omitted)
    pub input: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct PackOptions {
    /// File holding the completion text (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// Where to write the zip archive
    #[clap(short, long, default_value = "site.zip")]
    pub output: PathBuf,
}

/// Read the completion text from a file, or from stdin when no file is given.
pub fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read completion text from stdin")?;
            Ok(text)
        }
    }
}

/// Write every file of the bundle below `root`, creating directories as needed.
///
/// Paths are validated up front, so nothing is written when any of them would
/// escape `root`. Returns the written paths.
pub fn write_bundle(bundle: &ResponseBundle, root: &Path) -> Result<Vec<PathBuf>> {
    if bundle.is_empty() {
        return Err(Error::EmptyBundle.into());
    }

    let entries = bundle.unique_entries();
    if let Some((path, _)) = entries.iter().find(|(path, _)| !is_safe_relative_path(path)) {
        return Err(Error::UnsafePath(path.to_string()).into());
    }

    let mut written = Vec::with_capacity(entries.len());
    for (path, content) in entries {
        let target = root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        fs::write(&target, content)
            .with_context(|| format!("Failed to write '{}'", target.display()))?;
        written.push(target);
    }

    Ok(written)
}

/// Write the zip archive of a bundle to `output`.
///
/// An empty bundle is reported to the user and nothing is written.
pub fn write_archive(bundle: &ResponseBundle, output: &Path) -> Result<bool> {
    let bytes = match pack(bundle) {
        Ok(bytes) => bytes,
        Err(sitegen_core::archive::ArchiveError::EmptyBundle) => {
            eprintln!(
                "{}",
                "Nothing to package: the response contains no file markers. Generate a site first."
                    .yellow()
            );
            return Ok(false);
        }
        Err(err) => return Err(Error::from(err).into()),
    };

    fs::write(output, &bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    log::info!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(true)
}

pub fn split(options: SplitOptions, global: crate::Global) -> Result<()> {
    let text = read_input(options.input.as_deref())?;
    let bundle = split_all(&text, global.marker_mode.into());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    if bundle.is_empty() {
        eprintln!("{}", "No file markers found.".yellow());
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Path".bold().cyan(),
        "Lines".bold().cyan(),
        "Bytes".bold().cyan()
    ]);
    for block in &bundle {
        table.add_row(prettytable::row![
            block.path.green(),
            block.content.lines().count(),
            block.content.len()
        ]);
    }
    table.printstd();

    Ok(())
}

pub fn extract(options: ExtractOptions, global: crate::Global) -> Result<()> {
    let text = read_input(options.input.as_deref())?;
    let preview = preview(&text, &options.path, global.marker_mode.into());

    if preview.is_found() {
        println!("{}", preview.html());
    } else {
        eprintln!(
            "{}",
            f!("No file named '{}' in the response.", preview.path()).yellow()
        );
    }

    Ok(())
}

pub fn pack_cmd(options: PackOptions, global: crate::Global) -> Result<()> {
    let text = read_input(options.input.as_deref())?;
    let bundle = split_all(&text, global.marker_mode.into());

    if write_archive(&bundle, &options.output)? {
        println!(
            "{}",
            f!("Packaged {} files into {}", bundle.len(), options.output.display()).green()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegen_core::archive::unpack;
    use sitegen_core::bundle::{FileBlock, MarkerMode};

    const SITE: &str = "<!-- File: index.html -->\n<h1>Deli</h1>\n<!-- File: css/styles.css -->\nbody {}\n<!-- File: js/main.js -->\nconsole.log(1);";

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.txt");
        fs::write(&path, SITE).unwrap();

        assert_eq!(read_input(Some(path.as_path())).unwrap(), SITE);
        assert!(read_input(Some(dir.path().join("missing.txt").as_path())).is_err());
    }

    #[test]
    fn test_write_bundle_creates_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = split_all(SITE, MarkerMode::Strict);

        let written = write_bundle(&bundle, dir.path()).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("css/styles.css")).unwrap(),
            "body {}"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("js/main.js")).unwrap(),
            "console.log(1);"
        );
    }

    #[test]
    fn test_write_bundle_refuses_traversal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = ResponseBundle::new(vec![
            FileBlock::new("index.html", "ok"),
            FileBlock::new("../escape.html", "bad"),
        ]);

        assert!(write_bundle(&bundle, dir.path()).is_err());
        assert!(!dir.path().join("index.html").exists());
    }

    #[test]
    fn test_write_bundle_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_bundle(&ResponseBundle::default(), dir.path()).is_err());
    }

    #[test]
    fn test_write_archive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("site.zip");
        let bundle = split_all(SITE, MarkerMode::Strict);

        assert!(write_archive(&bundle, &output).unwrap());

        let restored = unpack(&fs::read(&output).unwrap()).unwrap();
        assert_eq!(restored, bundle);
    }

    #[test]
    fn test_write_archive_empty_bundle_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("site.zip");

        assert!(!write_archive(&ResponseBundle::default(), &output).unwrap());
        assert!(!output.exists());
    }
}
