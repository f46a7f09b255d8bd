//! Naming convention shared by the launcher and the cleaner
//!
//! A container for render id `id` at position `index` is called
//! `prefix + id`, listens on `base_port + 100 * index`, and gets the compute
//! device plus `/dev/dri/renderD<id>`.

use serde::Serialize;

use crate::config::FleetConfig;
use crate::error::{FleetError, Result};
use crate::runtime::DeviceMapping;

/// Port distance between consecutive containers
pub const PORT_STRIDE: u32 = 100;

/// Compute device shared by every container
pub const COMPUTE_DEVICE: &str = "/dev/kfd";

pub fn container_name(prefix: &str, render_id: u32) -> String {
    format!("{}{}", prefix, render_id)
}

/// Port for the container at `index` in the id list
pub fn port_for(base_port: u16, index: usize) -> Result<u16> {
    let offset = u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(PORT_STRIDE));
    offset
        .and_then(|o| o.checked_add(base_port as u32))
        .and_then(|p| u16::try_from(p).ok())
        .ok_or_else(|| {
            FleetError::Config(format!(
                "port for container #{} overflows (base port {})",
                index, base_port
            ))
        })
}

pub fn render_device(render_id: u32) -> String {
    format!("/dev/dri/renderD{}", render_id)
}

/// Devices bound into the container for `render_id`
pub fn devices_for(render_id: u32) -> Vec<DeviceMapping> {
    vec![
        DeviceMapping::passthrough(COMPUTE_DEVICE),
        DeviceMapping::passthrough(render_device(render_id)),
    ]
}

/// The deterministic part of one managed container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerPlan {
    pub index: usize,
    pub render_id: u32,
    pub name: String,
    pub port: u16,
    pub devices: Vec<DeviceMapping>,
}

/// Derive name, port and devices for every configured id, in order.
pub fn plan(config: &FleetConfig) -> Result<Vec<ContainerPlan>> {
    config
        .render_ids
        .iter()
        .enumerate()
        .map(|(index, &render_id)| {
            Ok(ContainerPlan {
                index,
                render_id,
                name: container_name(&config.prefix, render_id),
                port: port_for(config.base_port, index)?,
                devices: devices_for(render_id),
            })
        })
        .collect()
}
