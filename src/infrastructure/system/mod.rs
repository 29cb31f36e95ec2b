mod resource_monitor;

pub use resource_monitor::{ResourceMonitor, ResourceSnapshot, SATURATION_PERCENT};
