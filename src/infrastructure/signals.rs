#[cfg(test)]
#[path = "signals_test.rs"]
mod tests;

use anyhow::Result;
use tokio::signal;
use tokio::signal::unix::SignalKind;
use tokio_util::sync::CancellationToken;

/// Cancels `token` on the first SIGINT or SIGTERM. Handlers are registered
/// before returning so a signal sent right after startup is not lost.
pub fn cancel_on_stop_signal(token: CancellationToken) -> Result<()> {
    let mut interrupt = signal::unix::signal(SignalKind::interrupt())?;
    let mut terminate = signal::unix::signal(SignalKind::terminate())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => tracing::info!("Received SIGINT"),
            _ = terminate.recv() => tracing::info!("Received SIGTERM"),
        }
        token.cancel();
    });

    return Ok(());
}
