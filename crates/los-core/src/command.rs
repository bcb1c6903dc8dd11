//! External command invocation.
//!
//! Provisioning leans on system tools (`apt-get`, `dpkg-reconfigure`, `git`,
//! `ssh-keygen`, ...). Every invocation is synchronous and a non-zero exit is
//! an error carrying the tool's stderr.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{LosError, Result};

/// A command to run: program, arguments, and optional stdin/cwd/env.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(data.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `cmd` to completion.
///
/// Stdout and stderr are captured; stderr is attached to the error when the
/// command exits non-zero so callers can inspect it (e.g. `git checkout`
/// reporting that a branch already exists).
pub fn run(cmd: &Cmd) -> Result<CmdOutput> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);
    if let Some(dir) = &cmd.cwd {
        command.current_dir(dir);
    }
    for (k, v) in &cmd.env {
        command.env(k, v);
    }
    command.stdin(if cmd.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    tracing::debug!(command = %cmd, "running");

    let mut child = command.spawn().map_err(|source| LosError::CommandSpawn {
        command: cmd.to_string(),
        source,
    })?;

    if let Some(data) = &cmd.stdin {
        // Dropping the handle closes the pipe so the child sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data)?;
        }
    }

    let output = child.wait_with_output()?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(LosError::CommandFailed {
            command: cmd.to_string(),
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(CmdOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = Cmd::new("chown").args(["-R", "pi:pi", "/var/cache/Rowdy Dog Software"]);
        assert_eq!(
            cmd.to_string(),
            r#"chown -R pi:pi "/var/cache/Rowdy Dog Software""#
        );
    }

    #[test]
    fn display_quotes_empty_arguments() {
        let cmd = Cmd::new("ssh-keygen").args(["-N", ""]);
        assert_eq!(cmd.to_string(), r#"ssh-keygen -N """#);
    }

    #[test]
    fn run_captures_stdout() {
        let out = run(&Cmd::new("sh").args(["-c", "echo hello"])).unwrap();
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn run_feeds_stdin() {
        let out = run(&Cmd::new("cat").stdin("pi:secret")).unwrap();
        assert_eq!(out.stdout, "pi:secret");
    }

    #[test]
    fn run_honours_cwd_and_env() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = run(&Cmd::new("sh")
            .args(["-c", "pwd; echo $LOS_TEST_VALUE"])
            .current_dir(dir.path())
            .env("LOS_TEST_VALUE", "42"))
        .unwrap();
        assert!(out.stdout.contains("42"));
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let err = run(&Cmd::new("sh").args(["-c", "echo nope >&2; exit 3"])).unwrap_err();
        match err {
            LosError::CommandFailed { stderr, .. } => assert_eq!(stderr.trim(), "nope"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = run(&Cmd::new("los-definitely-not-a-program")).unwrap_err();
        assert!(matches!(err, LosError::CommandSpawn { .. }));
    }
}
