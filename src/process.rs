// ABOUTME: External tool invocation with concurrently captured output streams.
// ABOUTME: Shared by the build toolchain and the container engine drivers.

use futures::try_join;
use snafu::{ResultExt, Snafu};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Failures to run a tool at all, as opposed to the tool reporting failure.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ToolError {
    #[snafu(display("failed to start {program}: {source}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("failed to write to stdin of {program}: {source}"))]
    Stdin {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("failed to collect output of {program}: {source}"))]
    Collect {
        program: String,
        source: std::io::Error,
    },
}

/// Captured result of a finished tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Both streams, stdout first. Toolchains such as `dotnet` report
    /// compiler errors on stdout, so a build log needs both.
    pub fn combined_log(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            (out, "") => out.to_string(),
            ("", err) => err.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

/// A single invocation of an external program.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    stdin: Option<Vec<u8>>,
}

impl ToolCommand {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            current_dir: None,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Feed `input` to the program's stdin, then close it.
    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Run to completion, reading stdout and stderr concurrently with the
    /// wait so neither pipe can fill up and stall the child.
    ///
    /// The child is killed if the returned future is dropped.
    pub async fn run(self) -> Result<ToolOutput, ToolError> {
        let program = self.program_name();
        tracing::debug!(program = %program, args = ?self.args, "running tool");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().context(SpawnSnafu {
            program: program.clone(),
        })?;

        if let Some(input) = self.stdin
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin.write_all(&input).await.context(StdinSnafu {
                program: program.clone(),
            })?;
            // Dropping closes the pipe so the program sees EOF.
            drop(stdin);
        }

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (stdout, stderr, status) = try_join!(
            collect_lines(stdout, &program, "stdout"),
            collect_lines(stderr, &program, "stderr"),
            async { child.wait().await },
        )
        .context(CollectSnafu {
            program: program.clone(),
        })?;

        tracing::debug!(program = %program, status = %status, "tool finished");

        Ok(ToolOutput {
            status,
            stdout,
            stderr,
        })
    }
}

async fn collect_lines<R>(
    stream: Option<R>,
    program: &str,
    name: &str,
) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return Ok(String::new());
    };

    // Tool output is not guaranteed to be UTF-8; decode each line lossily.
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let mut collected = String::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        tracing::trace!(program = %program, stream = %name, "{line}");
        collected.push_str(line);
        collected.push('\n');
    }
    Ok(collected)
}
