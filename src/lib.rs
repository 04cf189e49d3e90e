// imagen-relay - Relay image prompts to Vertex AI Imagen
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod oauth;
pub mod relay;
pub mod server;
pub mod utils;
pub mod vertex;
