use std::path::Path;

use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};

/// Percentage above which a resource counts as saturated.
pub const SATURATION_PERCENT: f32 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSnapshot {
    pub cpu_cores: usize,
    pub cpu_usage_percent: f32,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub disk_total_bytes: u64,
    pub disk_used_bytes: u64,
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0) as f32
    }
}

impl ResourceSnapshot {
    pub fn memory_usage_percent(&self) -> f32 {
        percent(self.memory_used_bytes, self.memory_total_bytes)
    }

    pub fn disk_usage_percent(&self) -> f32 {
        percent(self.disk_used_bytes, self.disk_total_bytes)
    }

    pub fn is_saturated(&self) -> bool {
        self.cpu_usage_percent > SATURATION_PERCENT
            || self.memory_usage_percent() > SATURATION_PERCENT
            || self.disk_usage_percent() > SATURATION_PERCENT
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceMonitor;

impl ResourceMonitor {
    /// Samples CPU, memory and root-disk usage on a blocking thread.
    pub async fn sample(&self) -> Option<ResourceSnapshot> {
        match tokio::task::spawn_blocking(sample_blocking).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::error!(error = %e, "Resource sampling task failed");
                None
            }
        }
    }
}

fn sample_blocking() -> ResourceSnapshot {
    let mut system = System::new();
    system.refresh_cpu_usage();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_cpu_usage();
    system.refresh_memory();

    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first());
    let (disk_total_bytes, disk_used_bytes) = root
        .map(|disk| {
            let total = disk.total_space();
            (total, total.saturating_sub(disk.available_space()))
        })
        .unwrap_or((0, 0));

    ResourceSnapshot {
        cpu_cores: system.cpus().len(),
        cpu_usage_percent: system.global_cpu_usage(),
        memory_total_bytes: system.total_memory(),
        memory_used_bytes: system.used_memory(),
        disk_total_bytes,
        disk_used_bytes,
    }
}
