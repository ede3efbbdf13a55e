//! Iconforge - Command-line tool for generating pixel-art sprites from SVG icons

use std::process::ExitCode;

use iconforge::cli;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    cli::run().await
}
