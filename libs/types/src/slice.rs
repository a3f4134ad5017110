//! Slice configuration: the service-level shape derived from an intent.

use crate::intent::ServiceClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MobilityLevel {
    Stationary,
    Pedestrian,
    Vehicular,
    HighSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Smartphone,
    Sensor,
    Vehicle,
    Drone,
    IndustrialController,
    Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficPattern {
    Streaming,
    Bursty,
    Periodic,
    EventDriven,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    pub qos_class: ServiceClass,
    pub traffic_pattern: TrafficPattern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coverage {
    pub areas: Vec<String>,
    pub indoor: bool,
    pub outdoor: bool,
    /// Expected device density per square kilometer.
    pub density_per_km2: u32,
}

impl Default for Coverage {
    fn default() -> Self {
        Self { areas: Vec::new(), indoor: true, outdoor: true, density_per_km2: 0 }
    }
}

/// Slice-level configuration derived from an intent at parse time. Never
/// mutated post-admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceConfiguration {
    pub name: String,
    pub service_class: ServiceClass,
    pub coverage: Coverage,
    pub mobility: MobilityLevel,
    pub device_types: Vec<DeviceType>,
    pub applications: Vec<Application>,
}

impl SliceConfiguration {
    pub fn for_class(name: impl Into<String>, service_class: ServiceClass) -> Self {
        let (mobility, device_types) = match service_class {
            ServiceClass::Urllc => (MobilityLevel::Vehicular, vec![DeviceType::Vehicle, DeviceType::IndustrialController]),
            ServiceClass::Embb => (MobilityLevel::Pedestrian, vec![DeviceType::Smartphone, DeviceType::Camera]),
            ServiceClass::Mmtc => (MobilityLevel::Stationary, vec![DeviceType::Sensor]),
            ServiceClass::Custom => (MobilityLevel::Stationary, vec![]),
        };
        Self {
            name: name.into(),
            service_class,
            coverage: Coverage::default(),
            mobility,
            device_types,
            applications: Vec::new(),
        }
    }
}
