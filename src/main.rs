#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

#[cfg(not(unix))]
compile_error!("issuetimer supports unix hosts only: session logs are keyed by the unix host name");

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Error;
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use yansi::Paint;

use crate::application::cli;
use crate::domain::models::SessionInput;
use crate::domain::services::commit_suggestion;
use crate::domain::services::SessionController;
use crate::infrastructure::signals;
use crate::infrastructure::storage::LogWriter;
use crate::infrastructure::trackers::redmine::Redmine;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Issuetimer has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {:#}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() != "disabled backtrace" {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn run_session() -> Result<()> {
    let input = SessionInput::from_config()?;

    let stop = CancellationToken::new();
    signals::cancel_on_stop_signal(stop.clone())?;

    eprintln!(
        "{}",
        Paint::green(format!(
            "Working on issue #{}. Press CTRL+C when you are done.",
            input.issue_id
        ))
    );

    let mut controller = SessionController::new(Arc::new(Redmine::default()), LogWriter::default());
    let result = controller.run(input, stop).await;
    tracing::info!(state = %controller.state(), "Session finished");
    let record = result?;

    println!("{}", commit_suggestion(&record));
    return Ok(());
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let debug_log_dir = env::var("ISSUETIMER_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("issuetimer")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("issuetimer")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => process::exit(0),
        Err(err) => handle_error(err),
    }

    if let Err(err) = run_session().await {
        handle_error(err);
    }

    process::exit(0);
}
