// src/status.rs
use std::fmt;
use std::sync::{Arc, Mutex};

use sysinfo::System;

const MB: u64 = 1_024 * 1_024;

/// Point-in-time host/process snapshot served on `/status`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub cpu_percent: f32,
    pub process_mb: u64,
    pub host_used_mb: u64,
    pub host_total_mb: u64,
    pub host_used_percent: f64,
    pub tasks: usize,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CPU used:\t{:.2}%", self.cpu_percent)?;
        writeln!(
            f,
            "RAM used:\t{} / {} / {} MB ({:.0}%)",
            self.process_mb, self.host_used_mb, self.host_total_mb, self.host_used_percent
        )?;
        write!(f, "Tasks:\t{}", self.tasks)
    }
}

/// Keeps one `System` around so CPU usage is measured against the previous call.
#[derive(Clone)]
pub struct StatusSampler {
    sys: Arc<Mutex<System>>,
}

impl Default for StatusSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSampler {
    pub fn new() -> Self {
        Self {
            sys: Arc::new(Mutex::new(System::new())),
        }
    }

    pub fn snapshot(&self) -> StatusReport {
        let mut sys = self.sys.lock().unwrap_or_else(|e| e.into_inner());
        sys.refresh_cpu();
        sys.refresh_memory();

        let process_bytes = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| {
                sys.refresh_process(pid);
                sys.process(pid).map(|p| p.memory())
            })
            .unwrap_or(0);

        let used = sys.used_memory();
        let total = sys.total_memory();
        let used_pct = if total == 0 {
            0.0
        } else {
            used as f64 * 100.0 / total as f64
        };

        StatusReport {
            cpu_percent: sys.global_cpu_info().cpu_usage(),
            process_mb: process_bytes / MB,
            host_used_mb: used / MB,
            host_total_mb: total / MB,
            host_used_percent: used_pct,
            tasks: alive_tasks(),
        }
    }
}

fn alive_tasks() -> usize {
    tokio::runtime::Handle::try_current()
        .map(|h| h.metrics().num_alive_tasks())
        .unwrap_or(0)
}
