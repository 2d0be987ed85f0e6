use std::process::{Command, Output, Stdio};

use crate::error::{ConvoyError, ConvoyResult};

/// Run a command and capture its output. Fails if the command
/// returns a non-zero exit code.
pub fn run(program: &str, args: &[&str]) -> ConvoyResult<String> {
    run_env(program, args, &[])
}

/// Run a command with extra environment variables and capture
/// its output.
///
/// The release step exports deploy credentials into the `eb`
/// subprocess this way rather than mutating the parent
/// environment.
pub fn run_env(program: &str, args: &[&str], envs: &[(String, String)]) -> ConvoyResult<String> {
    let output = spawn_captured(program, args, envs)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        eprintln!("stderr: {stderr}");
        Err(ConvoyError::CommandFailed {
            command: format_command(program, args),
            status: output.status,
        })
    }
}

/// Run a command with stdin/stdout/stderr inherited (interactive).
pub fn run_interactive(program: &str, args: &[&str]) -> ConvoyResult<()> {
    run_interactive_env(program, args, &[])
}

/// Interactive variant of [`run_env`].
pub fn run_interactive_env(
    program: &str,
    args: &[&str],
    envs: &[(String, String)],
) -> ConvoyResult<()> {
    let status = Command::new(program)
        .args(args)
        .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| map_spawn_error(program, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(ConvoyError::CommandFailed {
            command: format_command(program, args),
            status,
        })
    }
}

/// Run a shell pipeline (via `sh -c`).
pub fn run_pipeline(shell_cmd: &str) -> ConvoyResult<()> {
    run_interactive("sh", &["-c", shell_cmd])
}

/// Check if a command exists on PATH.
#[must_use]
pub fn command_exists(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

fn spawn_captured(
    program: &str,
    args: &[&str],
    envs: &[(String, String)],
) -> ConvoyResult<Output> {
    Command::new(program)
        .args(args)
        .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| map_spawn_error(program, e))
}

fn map_spawn_error(program: &str, e: std::io::Error) -> ConvoyError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ConvoyError::CommandNotFound(program.to_string())
    } else {
        ConvoyError::Io(e)
    }
}

fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| (*a).to_string()));
    parts.join(" ")
}
