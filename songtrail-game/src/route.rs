//! Route templates and the built-in route catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::feature::LandscapeFeature;
use crate::numbers::usize_to_f64;

/// Terrain category; drives the feature-kind weight tables and lore pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Desert,
    Grassland,
    Forest,
}

impl Terrain {
    pub const ALL: [Self; 3] = [Self::Desert, Self::Grassland, Self::Forest];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desert => "desert",
            Self::Grassland => "grassland",
            Self::Forest => "forest",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terrain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desert" => Ok(Self::Desert),
            "grassland" => Ok(Self::Grassland),
            "forest" => Ok(Self::Forest),
            _ => Err(()),
        }
    }
}

/// Progression gate: a route unlocks once the player's best score on a
/// prerequisite route reaches the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRule {
    pub after_route: String,
    pub required_score: i32,
}

/// Static catalog entry; features are generated per session, not stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Total length in miles.
    pub distance: f32,
    /// Allotted duration in minutes.
    pub duration: f32,
    pub target_points: i32,
    pub terrain: Terrain,
    #[serde(default)]
    pub unlock: Option<UnlockRule>,
}

impl RouteTemplate {
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        f64::from(self.duration) * 60.0
    }
}

/// Immutable per-session route: a template plus its generated feature set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub description: String,
    pub distance: f32,
    pub duration: f32,
    pub target_points: i32,
    pub terrain: Terrain,
    pub features: Vec<LandscapeFeature>,
}

impl Route {
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        f64::from(self.duration) * 60.0
    }

    /// Comparable difficulty score: feature density, time pressure, and
    /// length folded together. Higher means harder.
    #[must_use]
    pub fn difficulty(&self) -> f64 {
        if self.distance <= 0.0 {
            return 0.0;
        }
        let density = usize_to_f64(self.features.len()) / f64::from(self.distance);
        let time_pressure = f64::from(self.distance) / f64::from(self.duration.max(f32::EPSILON));
        let length = f64::from(self.distance) / 10.0;
        density * 2.0 + time_pressure * 3.0 + length
    }
}

/// Error raised when a caller names a route the catalog does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unknown route id: {0}")]
    UnknownRoute(String),
}

/// Ordered collection of route templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCatalog {
    routes: Vec<RouteTemplate>,
}

impl RouteCatalog {
    /// The shipped three-route campaign.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            routes: vec![
                RouteTemplate {
                    id: "desert-crossing".to_string(),
                    name: "Desert Crossing".to_string(),
                    description:
                        "A gentle introduction across red sand country with scattered sacred sites."
                            .to_string(),
                    distance: 15.0,
                    duration: 6.0,
                    target_points: 800,
                    terrain: Terrain::Desert,
                    unlock: None,
                },
                RouteTemplate {
                    id: "grassland-journey".to_string(),
                    name: "Grassland Journey".to_string(),
                    description:
                        "Rolling country rich with animal signs and seasonal plant indicators."
                            .to_string(),
                    distance: 20.0,
                    duration: 8.0,
                    target_points: 1200,
                    terrain: Terrain::Grassland,
                    unlock: Some(UnlockRule {
                        after_route: "desert-crossing".to_string(),
                        required_score: 600,
                    }),
                },
                RouteTemplate {
                    id: "mountain-passage".to_string(),
                    name: "Mountain Passage".to_string(),
                    description:
                        "Challenging terrain with complex geological formations and dense feature clusters."
                            .to_string(),
                    distance: 25.0,
                    duration: 10.0,
                    target_points: 1600,
                    terrain: Terrain::Forest,
                    unlock: Some(UnlockRule {
                        after_route: "grassland-journey".to_string(),
                        required_score: 900,
                    }),
                },
            ],
        }
    }

    /// Build a catalog from explicit templates (fixtures, modded campaigns).
    #[must_use]
    pub fn from_templates(routes: Vec<RouteTemplate>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteTemplate] {
        &self.routes
    }

    /// Look up a template by id.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownRoute`] when the id is not in the catalog.
    pub fn get(&self, id: &str) -> Result<&RouteTemplate, RouteError> {
        self.routes
            .iter()
            .find(|route| route.id == id)
            .ok_or_else(|| RouteError::UnknownRoute(id.to_string()))
    }

    /// Whether a route is unlocked given the player's best score per route.
    #[must_use]
    pub fn is_unlocked(&self, id: &str, best_scores: &HashMap<String, i32>) -> bool {
        match self.get(id) {
            Ok(template) => template.unlock.as_ref().is_none_or(|rule| {
                best_scores
                    .get(&rule.after_route)
                    .is_some_and(|best| *best >= rule.required_score)
            }),
            Err(_) => false,
        }
    }

    /// Ids of all currently unlocked routes, in catalog order.
    #[must_use]
    pub fn unlocked_ids(&self, best_scores: &HashMap<String, i32>) -> Vec<String> {
        self.routes
            .iter()
            .filter(|route| self.is_unlocked(&route.id, best_scores))
            .map(|route| route.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_resolves_known_ids() {
        let catalog = RouteCatalog::builtin();
        let desert = catalog.get("desert-crossing").unwrap();
        assert_eq!(desert.terrain, Terrain::Desert);
        assert!((desert.duration_seconds() - 360.0).abs() < 1e-9);
        assert!(matches!(
            catalog.get("nullarbor"),
            Err(RouteError::UnknownRoute(_))
        ));
    }

    #[test]
    fn unlock_chain_follows_best_scores() {
        let catalog = RouteCatalog::builtin();
        let mut best = HashMap::new();
        assert!(catalog.is_unlocked("desert-crossing", &best));
        assert!(!catalog.is_unlocked("grassland-journey", &best));

        best.insert("desert-crossing".to_string(), 600);
        assert!(catalog.is_unlocked("grassland-journey", &best));
        assert!(!catalog.is_unlocked("mountain-passage", &best));

        best.insert("grassland-journey".to_string(), 899);
        assert!(!catalog.is_unlocked("mountain-passage", &best));
        best.insert("grassland-journey".to_string(), 900);
        assert_eq!(catalog.unlocked_ids(&best).len(), 3);
    }

    #[test]
    fn difficulty_scales_with_density_and_pressure() {
        let short = Route {
            id: "a".into(),
            name: "A".into(),
            description: String::new(),
            distance: 10.0,
            duration: 10.0,
            target_points: 100,
            terrain: Terrain::Desert,
            features: Vec::new(),
        };
        let mut pressured = short.clone();
        pressured.duration = 5.0;
        assert!(pressured.difficulty() > short.difficulty());
    }
}
