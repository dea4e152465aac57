pub mod habits;
pub mod process;
pub mod remind;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use habits::{
    confirm, print_added, print_checked_in, print_habits, print_tags, report_rejection,
};
use remind::{process_remind_command, RemindCommand};

use crate::{
    store::{entities::HabitId, kv::FileKeyValueStore},
    streak::CheckState,
    tracker::HabitTracker,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, LogSource},
    },
};

#[derive(Parser, Debug)]
#[command(name = "jielema", version, long_about = None)]
#[command(about = "Quit bad habits one day at a time", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show all habits with their streaks")]
    List {},
    #[command(about = "Start tracking a habit. Use a preset tag or any other name")]
    Add { name: String },
    #[command(about = "Show preset habit names")]
    Tags {},
    #[command(about = "Check in a habit for today")]
    Check {
        #[arg(help = "Habit id or name")]
        habit: String,
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(about = "Stop tracking a habit and forget its history")]
    Delete {
        #[arg(help = "Habit id or name")]
        habit: String,
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(about = "Daily reminder settings and service")]
    Remind {
        #[command(subcommand)]
        command: RemindCommand,
    },
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let log_source = match &args.commands {
        Commands::Remind {
            command: RemindCommand::Serve {},
        } => LogSource::Reminder,
        _ => LogSource::Cli,
    };
    enable_logging(log_source, &app_dir, args.log)?;

    let open_tracker = || -> Result<_> {
        Ok(HabitTracker::open(
            FileKeyValueStore::new(&app_dir)?,
            DefaultClock,
        ))
    };

    match args.commands {
        Commands::List {} => {
            print_habits(&open_tracker()?);
            Ok(())
        }
        Commands::Tags {} => {
            print_tags();
            Ok(())
        }
        Commands::Add { name } => match open_tracker()?.add_habit(&name) {
            Ok(habit) => {
                print_added(&habit);
                Ok(())
            }
            Err(e) => report_rejection(e),
        },
        Commands::Check { habit, yes } => {
            let mut tracker = open_tracker()?;
            let id = find_habit(&tracker, &habit)?;
            let Some(current) = tracker.list_habits().iter().find(|v| v.id == id) else {
                return Err(anyhow!("No habit with id or name {habit}"));
            };
            if tracker.status(current) == CheckState::CheckedToday {
                println!("{} is already checked in today", current.name);
                return Ok(());
            }
            let prompt = format!("摸着良心说，今天真的戒【{}】了吗？", current.name);
            if !yes && !confirm(&prompt)? {
                return Ok(());
            }
            match tracker.check_in(&id) {
                Ok(habit) => {
                    print_checked_in(&habit);
                    Ok(())
                }
                Err(e) => report_rejection(e),
            }
        }
        Commands::Delete { habit, yes } => {
            let mut tracker = open_tracker()?;
            let id = find_habit(&tracker, &habit)?;
            let name = tracker
                .list_habits()
                .iter()
                .find(|v| v.id == id)
                .map_or(habit.clone(), |v| v.name.clone());
            if !yes && !confirm(&format!("确定要删除「{name}」吗？"))? {
                return Ok(());
            }
            match tracker.delete_habit(&id) {
                Ok(Some(removed)) => {
                    println!("Deleted {}", removed.name);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => report_rejection(e),
            }
        }
        Commands::Remind { command } => process_remind_command(command, &app_dir),
    }
}

fn find_habit(
    tracker: &HabitTracker<FileKeyValueStore, DefaultClock>,
    key: &str,
) -> Result<HabitId> {
    tracker
        .resolve(key)
        .ok_or_else(|| anyhow!("No habit with id or name {key}"))
}
