#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Error;
use tokio::sync::mpsc;
use yansi::Paint;

use crate::application::cli;
use crate::application::repl;
use crate::configuration::Catalogs;
use crate::domain::models::Event;
use crate::domain::models::GenerationBox;
use crate::domain::services::Orchestrator;
use crate::infrastructure::generation::HttpGeneration;
use crate::infrastructure::identity::ConfigIdentity;
use crate::infrastructure::sandbox::HttpSandbox;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "artifex failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    process::exit(1);
}

#[tokio::main]
async fn main() {
    let debug_log_dir = env::var("ARTIFEX_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap()
            .join("artifex")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("artifex")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let ready_res = cli::parse().await;
    if let Err(ready_err) = ready_res {
        handle_error(ready_err);
        return;
    }
    if !ready_res.unwrap() {
        process::exit(0);
    }

    let catalogs_res = Catalogs::load();
    if let Err(catalogs_err) = catalogs_res {
        handle_error(catalogs_err);
        return;
    }

    let generation: GenerationBox = Arc::new(HttpGeneration::default());
    if let Err(health_err) = generation.health_check().await {
        eprintln!(
            "{}",
            Paint::yellow(format!(
                "The generation endpoint did not pass its health check, submissions may fail.\n\nError: {health_err}"
            ))
        );
    }

    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let orchestrator = Orchestrator::new(
        generation,
        Arc::new(HttpSandbox::default()),
        Arc::new(ConfigIdentity::default()),
        catalogs_res.unwrap(),
        tx,
    );

    let res = repl::start(orchestrator, rx).await;
    if res.is_err() {
        handle_error(res.unwrap_err());
    }

    process::exit(0);
}
