use std::path::PathBuf;

use anyhow::Result;
use notifier::{LogNotifier, Notifier};
use service::{ReminderService, DEFAULT_REFRESH_INTERVAL};
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    store::kv::{FileKeyValueStore, KeyValueStore},
    utils::clock::{Clock, DefaultClock},
};

pub mod notifier;
pub mod service;
pub mod shutdown;

/// Represents the starting point for the reminder service.
pub async fn start_reminder(dir: PathBuf) -> Result<()> {
    let storage = FileKeyValueStore::new(&dir)?;
    let shutdown_token = CancellationToken::new();

    let service = create_service(storage, LogNotifier, &shutdown_token, DefaultClock);

    let (_, service_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        async {
            let result = service.run().await;
            // Lets the signal listener finish if the loop ever stops on its own.
            shutdown_token.cancel();
            result
        },
    );

    if let Err(service_result) = service_result {
        error!("Reminder service got an error {:?}", service_result);
    }

    Ok(())
}

fn create_service<S: KeyValueStore>(
    storage: S,
    notifier: impl Notifier + 'static,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> ReminderService<S> {
    ReminderService::new(
        storage,
        Box::new(notifier),
        shutdown_token.clone(),
        DEFAULT_REFRESH_INTERVAL,
        Box::new(clock),
    )
}
