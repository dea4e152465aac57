use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use crate::{
    reminder::start_reminder,
    store::{
        kv::FileKeyValueStore,
        reminder_time::{load_reminder_time, save_reminder_time, ReminderTime},
    },
    utils::runtime::single_thread_runtime,
};

use super::process::{current_executable, restart_reminder, stop_reminder_services};

#[derive(Subcommand, Debug)]
pub enum RemindCommand {
    #[command(about = "Show the daily reminder time")]
    Show {},
    #[command(about = "Change the daily reminder time, e.g. 21:30")]
    Set { time: ReminderTime },
    #[command(about = "Start the reminder service in the background, replacing a running one")]
    Start {},
    #[command(about = "Stop the running reminder service")]
    Stop {},
    #[command(
        about = "Run the reminder service directly in current console. Used for starting the service internally and for debugging"
    )]
    Serve {},
}

/// Command to process `remind` command. Reminder time is read by the service on every wake-up,
/// so `set` never needs a restart.
pub fn process_remind_command(command: RemindCommand, dir: &Path) -> Result<()> {
    match command {
        RemindCommand::Show {} => {
            let storage = FileKeyValueStore::new(dir)?;
            println!("{}", load_reminder_time(&storage)?);
            Ok(())
        }
        RemindCommand::Set { time } => {
            let mut storage = FileKeyValueStore::new(dir)?;
            save_reminder_time(&mut storage, time)?;
            println!("{time}");
            Ok(())
        }
        RemindCommand::Start {} => {
            restart_reminder(dir)?;
            println!("Reminder service started");
            Ok(())
        }
        RemindCommand::Stop {} => {
            let stopped = stop_reminder_services(&current_executable()?)?;
            println!("Stopped {stopped} reminder service(s)");
            Ok(())
        }
        RemindCommand::Serve {} => {
            let dir = dir.to_path_buf();
            single_thread_runtime()?.block_on(async move { start_reminder(dir).await })
        }
    }
}
