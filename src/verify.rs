// src/verify.rs

//! Post-install smoke tests
//!
//! A recipe's test step runs the installed binary (by default with
//! `--version`) and requires that it exits successfully and that its output
//! contains an expected substring.

use crate::error::{Error, Result};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

/// Default timeout for test commands (30 seconds)
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `binary args...` and check its output contains `expected`
///
/// Returns the combined stdout and stderr on success. Fails with
/// [`Error::VerificationError`] if the binary is missing, cannot be
/// executed, exits non-zero, times out, or does not print `expected`.
pub fn verify(binary: &Path, args: &[String], expected: &str, timeout: Duration) -> Result<String> {
    if !binary.is_file() {
        return Err(Error::VerificationError(format!(
            "{} is not installed",
            binary.display()
        )));
    }

    debug!("Executing: {} {:?}", binary.display(), args);

    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::VerificationError(format!("Failed to run {}: {}", binary.display(), e))
        })?;

    // Pipes are read concurrently with the wait; a full pipe stalls the child.
    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            // Timeout - kill the process
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::VerificationError(format!(
                "{} timed out after {} seconds",
                binary.display(),
                timeout.as_secs()
            )));
        }
    };

    let stdout = collect(stdout_reader)?;
    let stderr = collect(stderr_reader)?;
    let stdout = String::from_utf8_lossy(&stdout);
    let stderr = String::from_utf8_lossy(&stderr);
    let combined = format!("{}{}", stdout, stderr);

    for line in stderr.lines() {
        warn!("[{}] {}", binary.display(), line);
    }

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        return Err(Error::VerificationError(format!(
            "{} exited with code {}: {}",
            binary.display(),
            code,
            combined.trim()
        )));
    }

    if !combined.contains(expected) {
        return Err(Error::VerificationError(format!(
            "output of {} does not contain {:?}: {}",
            binary.display(),
            expected,
            combined.trim()
        )));
    }

    info!("Verified {}: {}", binary.display(), combined.trim());
    Ok(combined)
}

/// Read a child pipe to the end on its own thread
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| Error::VerificationError("Output reader thread panicked".to_string()))?
            .map_err(Error::from),
        None => Ok(Vec::new()),
    }
}
