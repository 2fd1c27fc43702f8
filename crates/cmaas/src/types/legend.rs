use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::map_unit::{MapUnit, MapUnitType, Provenance};

/// The ordered legend entries of one map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Legend {
    pub provenance: Provenance,
    #[serde(default)]
    pub features: Vec<MapUnit>,
}

impl Legend {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features of one type, in legend order.
    pub fn features_of_type(&self, unit_type: MapUnitType) -> impl Iterator<Item = &MapUnit> {
        self.features.iter().filter(move |f| f.unit_type == unit_type)
    }

    /// Labels grouped by unit type.
    pub fn map_unit_distr(&self) -> HashMap<MapUnitType, Vec<String>> {
        let mut dist: HashMap<MapUnitType, Vec<String>> = HashMap::new();
        for feature in &self.features {
            dist.entry(feature.unit_type)
                .or_default()
                .push(feature.label.clone().unwrap_or_default());
        }
        dist
    }
}

/// Set comparison: every feature on each side has an equal feature on the
/// other. Order is ignored and duplicate counts are not checked.
///
/// Stricter than a one-way "every feature of `self` is in `other`" check, so
/// a legend with an extra feature never equals its subset in either order.
/// Provenance is not compared.
impl PartialEq for Legend {
    fn eq(&self, other: &Self) -> bool {
        let covered = |a: &Legend, b: &Legend| {
            a.features.iter().all(|u1| {
                let matched = b.features.iter().any(|u2| u1 == u2);
                if !matched {
                    tracing::trace!(unit = %u1, "legend feature has no match");
                }
                matched
            })
        };
        covered(self, other) && covered(other, self)
    }
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Legend{{Provenance : {}, {} Features}}", self.provenance, self.features.len())
    }
}
