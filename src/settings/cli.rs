use super::Parser;

/// Forum HTTP server.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Path of the TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,

    /// Listen address, overriding `http.address`.
    #[arg(long)]
    pub address: Option<String>,
}
