use std::ffi::OsString;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use crossterm::{
    style::{style, Stylize},
    tty::IsTty,
};
use log::{debug, info};

use crate::app::builtin;
use crate::app::config::Config;
use crate::manager::job_control::{JobControl, SpawnOutcome};
use crate::models::command::ParsedCommand;

/// Consecutive failed reads tolerated before input is considered unusable.
const MAX_READ_ERRORS: u32 = 5;

/// Prompt, read, dispatch until end of input.
///
/// Finished background jobs are announced right before each prompt, which is
/// the only point where completion notices are written.
pub fn run_cli(mut jobs: JobControl, config: &Config) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let styled = stdout.is_tty();
    let mut line = Vec::new();
    let mut read_errors = 0;

    loop {
        jobs.report(&mut stdout)
            .context("failed to write job notices")?;
        render_prompt(&mut stdout, &config.prompt, styled).context("failed to write prompt")?;

        line.clear();
        match stdin.lock().read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => read_errors = 0,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                eprintln!("read failed: {}", e);
                read_errors += 1;
                if read_errors >= MAX_READ_ERRORS {
                    bail!("giving up after {} consecutive read errors", read_errors);
                }
                continue;
            }
        }

        let Some(command) = ParsedCommand::parse(&line) else {
            continue;
        };
        execute(&mut jobs, &command);
    }

    if !jobs.is_idle() {
        info!(
            "End of input, {} background job(s) still running.",
            jobs.active_jobs()
        );
    }
    Ok(())
}

fn render_prompt<W: Write>(out: &mut W, prompt: &str, styled: bool) -> io::Result<()> {
    if styled {
        write!(out, "{}", style(prompt).bold())?;
    } else {
        write!(out, "{}", prompt)?;
    }
    out.flush()
}

fn execute(jobs: &mut JobControl, command: &ParsedCommand) {
    if command.is_builtin("cd") {
        if let Err(e) = builtin::change_dir(command.args.first().map(OsString::as_os_str)) {
            eprintln!("{}", e);
        }
        return;
    }

    match jobs.run(command) {
        Ok(SpawnOutcome::Completed(status)) => {
            debug!("'{}' finished ({}).", command.text, status);
        }
        Ok(SpawnOutcome::Background { job_id, pid }) => {
            println!("[{}] {}", job_id, pid);
        }
        Ok(SpawnOutcome::Untracked { pid }) => {
            println!(
                "Too many background jobs (limit {}): pid {} is running untracked",
                jobs.capacity(),
                pid
            );
        }
        Err(e) => eprintln!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prompt_is_written_verbatim() {
        let mut out = Vec::new();
        render_prompt(&mut out, "msh> ", false).unwrap();
        assert_eq!(out, b"msh> ");
    }

    #[test]
    fn styled_prompt_keeps_the_text() {
        let mut out = Vec::new();
        render_prompt(&mut out, "msh> ", true).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("msh> "));
    }
}
