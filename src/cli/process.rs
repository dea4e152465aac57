use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::{anyhow, Result};
use sysinfo::{get_current_pid, Signal, System};
use tracing::info;

/// Arguments identifying a foreground reminder service, see [restart_reminder].
const SERVE_ARGS: [&str; 2] = ["remind", "serve"];

fn is_reminder_service<T: AsRef<OsStr>>(cmd: &[T]) -> bool {
    cmd.windows(SERVE_ARGS.len())
        .any(|v| v.iter().zip(SERVE_ARGS).all(|(arg, expected)| arg.as_ref() == expected))
}

/// Stops every reminder service started from `name`. Other invocations of the cli are left alone.
pub fn stop_reminder_services(name: &Path) -> Result<usize> {
    let system = System::new_all();
    let current_id = get_current_pid().map_err(|e| anyhow!("Can't determine own pid: {e}"))?;
    let mut stopped = 0;
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
            && is_reminder_service(process.cmd())
        {
            info!("Stopping reminder service {pid}");
            // This will forcefully terminate the process on Windows. Anything better will require a
            // lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
            stopped += 1;
        }
    }
    Ok(stopped)
}

/// Intended for shutting down a previous reminder service and starting a new one. The service is
/// the same executable running `remind serve` in a detached process.
pub fn restart_reminder(dir: &Path) -> Result<()> {
    let process_name = current_executable()?;
    stop_reminder_services(&process_name)?;
    let mut command = std::process::Command::new(process_name);
    command.arg("--dir").arg(dir).args(SERVE_ARGS);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const DETACHED_PROCESS: u32 = 0x00000008;
        command.creation_flags(DETACHED_PROCESS);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());
    command.stderr(Stdio::null());

    #[allow(clippy::zombie_processes)]
    let child = command.spawn()?;
    info!("Spawned reminder service {}", child.id());
    Ok(())
}

pub fn current_executable() -> Result<PathBuf> {
    // The program uses executable passed into the process. It's not the best option but it will
    // do the job in most cases.
    env::current_exe().map_err(|e| anyhow!("Can't operate without an executable: {e}"))
}

#[cfg(test)]
mod tests {
    use super::is_reminder_service;

    #[test]
    fn recognizes_serve_invocation() {
        assert!(is_reminder_service(&["jielema", "--dir", "/tmp/x", "remind", "serve"]));
        assert!(!is_reminder_service(&["jielema", "remind", "start"]));
        assert!(!is_reminder_service(&["jielema", "list"]));
        assert!(!is_reminder_service::<&str>(&[]));
    }
}
