//! Read-only directory of the physical sites warehouses can be placed at.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::Location;

/// Resolves a location identifier to its limits.
#[cfg_attr(test, mockall::automock)]
pub trait LocationResolver: Send + Sync {
    fn resolve_by_identifier(&self, identifier: &str) -> Option<Location>;
}

static BUILTIN_LOCATIONS: Lazy<Vec<Location>> = Lazy::new(|| {
    vec![
        Location::new("ZWOLLE-001", 1, 40),
        Location::new("ZWOLLE-002", 2, 50),
        Location::new("AMSTERDAM-001", 5, 100),
        Location::new("AMSTERDAM-002", 3, 75),
        Location::new("TILBURG-001", 1, 40),
        Location::new("HELMOND-001", 1, 45),
        Location::new("EINDHOVEN-001", 2, 70),
        Location::new("VETSBY-001", 1, 90),
    ]
});

/// Fixed, in-process location catalogue.
#[derive(Debug, Clone)]
pub struct LocationDirectory {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl LocationDirectory {
    /// Builds a directory from `locations`; a later entry wins on duplicate identifiers.
    pub fn new(locations: Vec<Location>) -> Self {
        let index = locations
            .iter()
            .enumerate()
            .map(|(i, location)| (location.identification.clone(), i))
            .collect();
        Self { locations, index }
    }

    /// The catalogue the service ships with.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_LOCATIONS.clone())
    }

    /// All locations in catalogue order.
    pub fn all(&self) -> &[Location] {
        &self.locations
    }
}

impl Default for LocationDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LocationResolver for LocationDirectory {
    fn resolve_by_identifier(&self, identifier: &str) -> Option<Location> {
        self.index
            .get(identifier)
            .and_then(|&i| self.locations.get(i))
            .cloned()
    }
}
