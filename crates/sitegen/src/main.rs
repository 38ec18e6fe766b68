use crate::prelude::*;
use clap::Parser;

mod error;
mod files;
mod generate;
mod llm;
mod prelude;
mod relay;
mod server;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate multi-file static websites from a single prompt"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum MarkerMode {
    /// Markers must sit on their own line (default)
    Strict,
    /// Any `<!-- File: ... -->` occurrence starts a new file
    Lenient,
}

impl From<MarkerMode> for sitegen_core::bundle::MarkerMode {
    fn from(mode: MarkerMode) -> Self {
        match mode {
            MarkerMode::Strict => sitegen_core::bundle::MarkerMode::Strict,
            MarkerMode::Lenient => sitegen_core::bundle::MarkerMode::Lenient,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// How file markers are recognized in a response
    #[clap(
        long,
        env = "SITEGEN_MARKER_MODE",
        global = true,
        value_enum,
        default_value = "strict"
    )]
    marker_mode: MarkerMode,

    /// Whether to display additional information.
    #[clap(long, env = "SITEGEN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Serve the generation, preview and archive API over HTTP
    Serve(crate::server::App),

    /// Generate a site from a prompt
    Generate(crate::generate::GenerateOptions),

    /// List the files contained in a saved response
    Split(crate::files::SplitOptions),

    /// Print one file from a saved response
    Extract(crate::files::ExtractOptions),

    /// Package a saved response into a zip archive
    Pack(crate::files::PackOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(sub_app) => crate::server::run(sub_app, app.global).await,
        SubCommands::Generate(options) => crate::generate::run(options, app.global).await,
        SubCommands::Split(options) => crate::files::split(options, app.global),
        SubCommands::Extract(options) => crate::files::extract(options, app.global),
        SubCommands::Pack(options) => crate::files::pack_cmd(options, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        App::command().debug_assert();
    }

    #[test]
    fn test_parse_pack_with_lenient_markers() {
        let app = App::try_parse_from([
            "sitegen",
            "--marker-mode",
            "lenient",
            "pack",
            "response.txt",
            "--output",
            "out.zip",
        ])
        .unwrap();

        assert!(matches!(app.global.marker_mode, MarkerMode::Lenient));
        match app.command {
            SubCommands::Pack(options) => {
                assert_eq!(options.output, std::path::PathBuf::from("out.zip"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_generate_with_provider_flags() {
        let app = App::try_parse_from([
            "sitegen",
            "generate",
            "A ramen shop",
            "--provider",
            "ollama",
            "--model",
            "llama3",
            "--zip",
            "ramen.zip",
        ])
        .unwrap();

        match app.command {
            SubCommands::Generate(options) => {
                assert_eq!(options.prompt, "A ramen shop");
                assert_eq!(options.provider.provider, crate::llm::Provider::Ollama);
                assert_eq!(options.provider.model, "llama3");
                assert_eq!(options.zip, Some(std::path::PathBuf::from("ramen.zip")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
