//! System Metadata Collection
//!
//! Host details recorded next to sweep results so timings can be compared
//! across machines. Linux-specific data (CPU model, memory) degrades to
//! "Unknown" or 0 elsewhere.

use chrono::Utc;
use sweepbench_report::{ReportConfig, ReportMeta, SystemInfo};

/// Build report metadata for a sweep run with `config`
pub fn build_report_meta(config: ReportConfig) -> ReportMeta {
    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system: collect_system_info(),
        config,
    }
}

/// Snapshot of the current host
pub fn collect_system_info() -> SystemInfo {
    SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: cpu_cores(),
        memory_gb: memory_gb().unwrap_or(0.0),
    }
}

fn cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        content
            .lines()
            .find(|l| l.starts_with("model name"))
            .and_then(|l| l.split(':').nth(1))
            .map(|s| s.trim().to_string())
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn cpu_cores() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

fn memory_gb() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/meminfo").ok()?;
        content
            .lines()
            .find(|l| l.starts_with("MemTotal"))
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse::<u64>().ok())
            .map(|kb| kb as f64 / 1024.0 / 1024.0)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_info_is_populated() {
        let info = collect_system_info();
        assert_eq!(info.os, std::env::consts::OS);
        assert!(info.cpu_cores >= 1);
        assert!(info.memory_gb >= 0.0);
    }
}
