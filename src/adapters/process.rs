//! Subprocess helper for the rasterizer and OCR binaries

use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Failure of an external command, before mapping into a domain error
#[derive(Debug, Error)]
pub enum CommandFailure {
    /// The binary could not be started
    #[error("failed to start: {0}")]
    Spawn(std::io::Error),

    /// Writing stdin or collecting output failed
    #[error("I/O failure: {0}")]
    Io(std::io::Error),

    /// The binary exited unsuccessfully (`code` is `None` when killed by a signal)
    #[error("exited with status {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },
}

/// Run `program args...`, feed `input` on stdin and return stdout
///
/// Stdin is written from a separate task so a child that streams output
/// before consuming all of its input cannot deadlock.
pub async fn run_with_stdin(
    program: &str,
    args: &[String],
    input: Vec<u8>,
) -> Result<Vec<u8>, CommandFailure> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(CommandFailure::Spawn)?;

    let writer = child.stdin.take().map(|mut stdin| {
        tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        })
    });

    let output = child.wait_with_output().await.map_err(CommandFailure::Io)?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            // A child that exits early closes the pipe; its exit status says more
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(CommandFailure::Io(e)),
            Err(e) => return Err(CommandFailure::Io(std::io::Error::other(e.to_string()))),
        }
    }

    if !output.status.success() {
        return Err(CommandFailure::Exit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stdin_round_trip() {
        let out = run_with_stdin("cat", &[], b"hello".to_vec()).await.unwrap();
        assert_eq!(out, b"hello");
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let err = run_with_stdin("/nonexistent/binary", &[], Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CommandFailure::Spawn(_)));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = run_with_stdin("false", &[], Vec::new()).await.unwrap_err();
        assert!(matches!(err, CommandFailure::Exit { code: Some(1), .. }));
    }
}
