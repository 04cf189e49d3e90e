// CLI module for imagen-relay
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;

/// imagen-relay - Relay image prompts to Vertex AI Imagen
#[derive(Parser, Debug)]
#[command(name = "imagen-relay", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.imagen-relay/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Address to bind, overriding the config file
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the config file
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

impl Args {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
