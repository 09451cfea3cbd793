//! Local port selection for development runs.
//!
//! Scans a port range and, when asked to, kills whatever local process is
//! holding a busy port before trying it again.

use std::net::TcpListener;
use std::ops::RangeInclusive;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

/// How long to wait for a killed process to release its socket.
const RECLAIM_GRACE: Duration = Duration::from_millis(500);
const RECLAIM_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum PortError {
    #[error("no available ports in range {start}-{end}")]
    Exhausted { start: u16, end: u16 },
}

/// True when binding `host:port` fails.
pub fn is_port_in_use(host: &str, port: u16) -> bool {
    TcpListener::bind((host, port)).is_err()
}

/// Return the first free port in `ports`.
///
/// With `reclaim` set, a busy port's owning process is killed and the port is
/// re-checked before moving on.
pub async fn find_available_port(
    host: &str,
    ports: RangeInclusive<u16>,
    reclaim: bool,
) -> Result<u16, PortError> {
    let (start, end) = (*ports.start(), *ports.end());
    for port in ports {
        if !is_port_in_use(host, port) {
            return Ok(port);
        }
        if !reclaim {
            debug!(port, "Port busy, skipping");
            continue;
        }

        let killed = kill_process_on_port(port);
        if killed == 0 {
            debug!(port, "Port busy and no owner could be killed");
            continue;
        }
        info!(port, killed, "Killed process holding port");

        let mut waited = Duration::ZERO;
        while waited < RECLAIM_GRACE {
            if !is_port_in_use(host, port) {
                return Ok(port);
            }
            tokio::time::sleep(RECLAIM_POLL).await;
            waited += RECLAIM_POLL;
        }
        warn!(port, "Port still busy after killing its owner");
    }
    Err(PortError::Exhausted { start, end })
}

/// Kill every local process with a socket bound to `port`. Returns how many were signalled.
#[cfg(target_os = "linux")]
pub fn kill_process_on_port(port: u16) -> usize {
    let mut inodes = Vec::new();
    for table in ["/proc/net/tcp", "/proc/net/tcp6"] {
        match std::fs::read_to_string(table) {
            Ok(contents) => inodes.extend(socket_inodes_on_port(&contents, port)),
            Err(e) => debug!(table, error = %e, "Cannot read socket table"),
        }
    }
    if inodes.is_empty() {
        return 0;
    }

    let own_pid = std::process::id();
    let mut killed = 0;
    for pid in pids_holding_inodes(&inodes) {
        if pid == own_pid {
            continue;
        }
        let Ok(raw_pid) = libc::pid_t::try_from(pid) else {
            continue;
        };
        // SAFETY: kill(2) has no memory-safety preconditions.
        let rc = unsafe { libc::kill(raw_pid, libc::SIGKILL) };
        if rc == 0 {
            killed += 1;
        } else {
            debug!(pid, error = %std::io::Error::last_os_error(), "kill failed");
        }
    }
    killed
}

#[cfg(not(target_os = "linux"))]
pub fn kill_process_on_port(port: u16) -> usize {
    warn!(port, "Reclaiming busy ports is only supported on Linux");
    0
}

/// Socket inodes in a `/proc/net/tcp`-format table whose local port is `port`.
pub fn socket_inodes_on_port(table: &str, port: u16) -> Vec<u64> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let local = fields.get(1)?;
            let (_, hex_port) = local.rsplit_once(':')?;
            let local_port = u16::from_str_radix(hex_port, 16).ok()?;
            let inode: u64 = fields.get(9)?.parse().ok()?;
            (local_port == port && inode != 0).then_some(inode)
        })
        .collect()
}

#[cfg(target_os = "linux")]
fn pids_holding_inodes(inodes: &[u64]) -> Vec<u32> {
    let targets: Vec<String> = inodes.iter().map(|i| format!("socket:[{i}]")).collect();
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return Vec::new();
    };

    let mut pids = Vec::new();
    for entry in entries.flatten() {
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<u32>().ok())
        else {
            continue;
        };
        // Processes we cannot inspect are skipped.
        let Ok(fds) = std::fs::read_dir(entry.path().join("fd")) else {
            continue;
        };
        let holds_socket = fds.flatten().any(|fd| {
            std::fs::read_link(fd.path())
                .ok()
                .and_then(|link| link.to_str().map(|s| targets.iter().any(|t| t == s)))
                .unwrap_or(false)
        });
        if holds_socket {
            pids.push(pid);
        }
    }
    pids
}
