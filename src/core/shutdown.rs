//! Termination signals that wind a command down.
//!
//! On unix the command stops on `SIGINT`, `SIGTERM` or `SIGQUIT`; elsewhere
//! only Ctrl-C is available.

use std::io;

/// Resolves with the name of the first termination signal received.
///
/// Fails if the handlers cannot be registered.
#[cfg(unix)]
pub(crate) async fn termination_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
pub(crate) async fn termination_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
