use std::io::{self, BufRead, IsTerminal, Write};

use ansi_term::Colour;
use anyhow::Result;

use crate::{
    error::HabitError,
    store::{entities::Habit, kv::KeyValueStore},
    streak::CheckState,
    tracker::{HabitTracker, PRESET_TAGS},
    utils::{clock::Clock, time::format_date},
};

pub fn print_habits<S: KeyValueStore, C: Clock>(tracker: &HabitTracker<S, C>) {
    let habits = tracker.list_habits();
    if habits.is_empty() {
        println!("开启第一项戒断");
        println!("Let's Get Started: jielema add <name>");
        return;
    }

    let colored = io::stdout().is_terminal();
    println!("{} habits", habits.len());
    for habit in habits {
        println!(
            "{}\t{}\t{}\t{} Days\t{}",
            habit.id,
            habit.name,
            status_label(tracker.status(habit), colored),
            habit.streak,
            habit
                .last_checked
                .map(format_date)
                .unwrap_or_else(|| "-".into())
        );
    }
}

fn status_label(state: CheckState, colored: bool) -> String {
    let (label, colour) = match state {
        CheckState::CheckedToday => ("Checked", Colour::Green),
        CheckState::Checkable => ("Ready", Colour::Yellow),
    };
    if colored {
        colour.paint(label).to_string()
    } else {
        label.to_string()
    }
}

pub fn print_tags() {
    println!("{}", PRESET_TAGS.join(" "));
}

pub fn print_added(habit: &Habit) {
    println!("Added {} ({})", habit.name, habit.id);
}

pub fn print_checked_in(habit: &Habit) {
    println!("{}\t{} Days", habit.name, habit.streak);
}

/// Expected rejections are reported to the user without failing the command.
pub fn report_rejection(error: HabitError) -> Result<()> {
    if error.is_rejection() {
        eprintln!("{error}");
        Ok(())
    } else {
        Err(error.into())
    }
}

/// Asks a yes/no question on stdin. Anything but an explicit yes declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "是" | "戒了"
    )
}

#[cfg(test)]
mod tests {
    use crate::streak::CheckState;

    use super::{is_yes, status_label};

    #[test]
    fn answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(is_yes("是"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }

    #[test]
    fn plain_labels() {
        assert_eq!(status_label(CheckState::CheckedToday, false), "Checked");
        assert_eq!(status_label(CheckState::Checkable, false), "Ready");
    }
}
