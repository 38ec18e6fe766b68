#[derive(Debug, clap::Parser)]
#[command(name = "serve")]
#[command(about = "Serve the generation API over HTTP")]
pub struct App {
    /// Port to listen on
    #[arg(short, long, env = "SITEGEN_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "SITEGEN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// File name offered for archive downloads
    #[arg(long, default_value = "site.zip")]
    pub archive_name: String,

    #[clap(flatten)]
    pub provider: crate::llm::ProviderOptions,
}
