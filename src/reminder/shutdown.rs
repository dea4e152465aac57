
use tokio::select;
use tokio_util::sync::CancellationToken;

/// Detects signals sent to the process. `remind stop` terminates the service, Ctrl-C covers the
/// foreground case.
///
/// On Windows detached processes can't detect signals sent to them, there the service is simply
/// killed.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = termination() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => {},
    };
}

#[cfg(unix)]
async fn termination() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            select! {
                _ = tokio::signal::ctrl_c() => {},
                _ = terminate.recv() => {},
            }
        }
        Err(e) => {
            tracing::warn!("Can't listen for SIGTERM {e}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn termination() {
    let _ = tokio::signal::ctrl_c().await;
}
