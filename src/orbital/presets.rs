use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

use super::elements::{OrbitalElements, RawElements};
use crate::error::{OrbitError, OrbitResult};

// ---------------------------------------------------------------------------
// Named element sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub elements: OrbitalElements,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// Lookup table of presets keyed by unique string.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    presets: BTreeMap<&'static str, Preset>,
}

impl PresetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a preset. Invalid elements or a duplicate key are programming
    /// errors in the catalog definition and panic.
    pub fn register(
        mut self,
        key: &'static str,
        name: &'static str,
        description: &'static str,
        raw: RawElements,
    ) -> Self {
        let elements = raw
            .validate()
            .unwrap_or_else(|err| panic!("preset '{key}' has invalid elements: {err}"));
        let previous = self.presets.insert(
            key,
            Preset { key, name, description, elements, warning: None },
        );
        assert!(previous.is_none(), "preset '{key}' registered twice");
        self
    }

    /// Attach a caution to an already registered preset.
    pub fn warn(mut self, key: &'static str, warning: &'static str) -> Self {
        match self.presets.get_mut(key) {
            Some(preset) => preset.warning = Some(warning),
            None => panic!("cannot attach warning to unregistered preset '{key}'"),
        }
        self
    }

    /// The builtin Earth-orbit catalog.
    pub fn builtin() -> Self {
        Self::new()
            .register(
                "default",
                "Default Orbit",
                "LEO orbit with moderate eccentricity",
                RawElements::new(7_000.0, 0.2, 28.5, 0.0, 0.0, 0.0),
            )
            .register(
                "iss",
                "International Space Station",
                "Near-circular low Earth orbit of the ISS",
                RawElements::new(6_778.0, 0.0003, 51.6, 0.0, 0.0, 0.0),
            )
            .register(
                "geostationary",
                "Geostationary Orbit",
                "Equatorial satellite with a one sidereal day period",
                RawElements::new(42_164.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            )
            .register(
                "molniya",
                "Molniya Orbit",
                "Highly elliptical communications orbit with apogee over the north",
                RawElements::new(26_600.0, 0.74, 63.4, 270.0, 0.0, 0.0),
            )
            .register(
                "polar",
                "Polar Orbit",
                "Polar Earth-observation orbit",
                RawElements::new(8_000.0, 0.1, 90.0, 0.0, 0.0, 0.0),
            )
            .register(
                "impact-demo",
                "Impact Orbit (Educational)",
                "Orbit whose periapsis lies below the Earth's surface",
                RawElements::new(6_000.0, 0.6, 45.0, 0.0, 0.0, 0.0),
            )
            .warn("impact-demo", "This orbit will impact the Earth's surface")
    }

    /// Process-wide builtin catalog, built and validated on first use.
    pub fn global() -> &'static PresetCatalog {
        static CATALOG: OnceLock<PresetCatalog> = OnceLock::new();
        CATALOG.get_or_init(PresetCatalog::builtin)
    }

    pub fn get(&self, key: &str) -> OrbitResult<&Preset> {
        self.presets
            .get(key)
            .ok_or_else(|| OrbitError::PresetNotFound { key: key.to_string() })
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
