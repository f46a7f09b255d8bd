//! Public address discovery for access URLs
//!
//! Runs an external command (by default `curl --silent ifconfig.me`) under a
//! timeout and uses its trimmed stdout. Any failure falls back to the
//! configured loopback address.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::IpLookup;
use crate::error::{FleetError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run `argv` and return its stdout, killing it once `timeout` elapses.
pub fn run_with_timeout(argv: &[String], timeout: Duration) -> Result<String> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| FleetError::Config("empty command".to_string()))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    // Drain stdout while polling so a chatty command cannot block on a full pipe.
    let reader = child.stdout.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            pipe.read_to_string(&mut buf).map(|_| buf)
        })
    });

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            // The reader is not joined: a grandchild may still hold the pipe.
            return Err(FleetError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("`{}` timed out after {:?}", program, timeout),
            )));
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let stdout = match reader {
        Some(handle) => handle.join().map_err(|_| {
            FleetError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("stdout reader for `{}` panicked", program),
            ))
        })??,
        None => String::new(),
    };

    if !status.success() {
        return Err(FleetError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("`{}` exited with {}", program, status),
        )));
    }
    Ok(stdout)
}

/// Look up the host's public address, falling back on any failure.
pub fn public_ip(lookup: &IpLookup) -> String {
    match run_with_timeout(&lookup.command, lookup.timeout()) {
        Ok(out) => {
            let ip = out.trim();
            if ip.is_empty() {
                warn!(fallback = %lookup.fallback, "public IP lookup returned nothing, using fallback");
                lookup.fallback.clone()
            } else {
                debug!(ip, "resolved public IP");
                ip.to_string()
            }
        }
        Err(e) => {
            warn!(error = %e, fallback = %lookup.fallback, "could not fetch public IP, using fallback");
            lookup.fallback.clone()
        }
    }
}
