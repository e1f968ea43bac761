//! # Command Execution Module / 命令执行模块
//!
//! Spawns child processes and captures their combined output.
//!
//! 派生子进程并捕获其合并输出。

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::Mutex;

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<std::process::ExitStatus>, String) {
    let mut child = match cmd
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let output = Arc::new(Mutex::new(String::new()));

    let stdout_handle = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(collect_lines(stdout, Arc::clone(&output))));
    let stderr_handle = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(collect_lines(stderr, Arc::clone(&output))));

    let status = child.wait().await;

    // Wait for the readers so that all output is captured.
    // 等待读取任务完成，以确保所有输出都被捕获。
    for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "output reader task failed");
        }
    }

    let captured = output.lock().await.clone();
    (status, captured)
}

/// Appends every line of `stream` to `output`. Invalid UTF-8 is replaced
/// rather than ending the read, so the pipe is drained until the child closes it.
async fn collect_lines<R>(stream: R, output: Arc<Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                let mut output = output.lock().await;
                output.push_str(text.trim_end_matches(['\r', '\n']));
                output.push('\n');
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read engine output");
                break;
            }
        }
    }
}
