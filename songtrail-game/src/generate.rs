//! Procedural landscape-feature generation.
//!
//! Runs once per route instantiation: counts are drawn from a density
//! range, positions come from a mix of clusters and uniform scatter, and
//! category/interaction/lore draws go through terrain- and category-
//! specific weight tables. The output list is always sorted ascending by
//! position; range checks and render culling rely on that ordering.

use rand::Rng;

use crate::constants::{
    CLUSTER_EDGE_MARGIN_MILES, CLUSTER_FRACTION, CLUSTER_SIZE_MAX, CLUSTER_SIZE_MIN,
    CLUSTER_SPREAD_MILES, FEATURES_PER_MILE_MAX, FEATURES_PER_MILE_MIN, FEATURE_SIZE_MAX,
    FEATURE_SIZE_MIN, MIN_SCATTERED_FEATURES, POSITION_CLAMP_MARGIN_MILES,
    SCATTER_EDGE_MARGIN_MILES,
};
use crate::feature::{FeatureKind, FeatureVisual, InteractionKind, LandscapeFeature};
use crate::rng::{RngBundle, range_f32, weighted_index};
use crate::route::{Route, RouteTemplate, Terrain};

/// Feature-kind weights per terrain, in [`FeatureKind::ALL`] order.
const fn terrain_weights(terrain: Terrain) -> [f32; 4] {
    match terrain {
        Terrain::Desert => [0.3, 0.25, 0.2, 0.25],
        Terrain::Grassland => [0.2, 0.4, 0.3, 0.1],
        Terrain::Forest => [0.25, 0.2, 0.35, 0.2],
    }
}

/// Interaction-kind weights per feature kind, in [`InteractionKind::ALL`]
/// order. Plant signs never roll a trace.
const fn interaction_weights(kind: FeatureKind) -> [f32; 4] {
    match kind {
        FeatureKind::SacredSite => [0.1, 0.6, 0.2, 0.1],
        FeatureKind::AnimalTracks => [0.3, 0.2, 0.1, 0.4],
        FeatureKind::PlantSigns => [0.5, 0.3, 0.2, 0.0],
        FeatureKind::Geological => [0.2, 0.4, 0.3, 0.1],
    }
}

/// Flavor text pools keyed by feature kind and terrain.
fn lore_pool(kind: FeatureKind, terrain: Terrain) -> &'static [&'static str] {
    match (kind, terrain) {
        (FeatureKind::SacredSite, Terrain::Desert) => &[
            "Ceremonial ground where generations gathered to honor the ancestors.",
            "A waterhole where the rainbow serpent rested, leaving marks in red stone.",
            "Initiation site where the old laws were taught under desert stars.",
            "Meeting place of the seven sisters, whose songs still ride the wind.",
        ],
        (FeatureKind::SacredSite, Terrain::Grassland) => &[
            "Corroboree ground where dances mark the turning of the seasons.",
            "A grove watched over by the ancestral spirits of the plains.",
            "Stone circle laid out to tell the creation story.",
            "Gathering place where elders pass knowledge to the next generation.",
        ],
        (FeatureKind::SacredSite, Terrain::Forest) => &[
            "Burial ground resting beneath the old-growth canopy.",
            "A cave of rock paintings recounting the dreamtime.",
            "Healing spring ringed by powerful medicinal plants.",
            "Vision quest site where seekers meet their spirit guides.",
        ],
        (FeatureKind::AnimalTracks, Terrain::Desert) => &[
            "Fresh kangaroo tracks following ancient pathways to water.",
            "Goanna prints crossing between rocky outcrops.",
            "Dingo trails along scent lines known for generations.",
            "Echidna diggings marking seasonal movement.",
        ],
        (FeatureKind::AnimalTracks, Terrain::Grassland) => &[
            "Wallaby paths worn smooth by countless journeys.",
            "Emu tracks heading for the fruiting grounds.",
            "Wombat runs linking burrows across the grass.",
            "Bird scratchings over rich feeding soil.",
        ],
        (FeatureKind::AnimalTracks, Terrain::Forest) => &[
            "Possum highways scored into the old trees.",
            "Game paths winding between groves and water.",
            "Lyrebird scrapes where courtship displays have echoed for ages.",
            "Koala scratches marking shelter trees.",
        ],
        (FeatureKind::PlantSigns, Terrain::Desert) => &[
            "Desert pea blooming after rare rain, keeping the seasonal count.",
            "Sturt's pea pointing the way to hidden soaks.",
            "Saltbush clusters marking soil change and animal paths.",
            "A ghost gum carved with symbols pointing toward sacred ground.",
        ],
        (FeatureKind::PlantSigns, Terrain::Grassland) => &[
            "Kangaroo grass heavy with seed for bread-making.",
            "Billy buttons blooming in patterns that foretell rain.",
            "Native millet ready for the gathering season.",
            "Wattle in flower, announcing the ceremonies.",
        ],
        (FeatureKind::PlantSigns, Terrain::Forest) => &[
            "Bunya cones ripening toward the great gathering.",
            "Medicine bark that heals wounds of body and spirit.",
            "Berry bushes fruiting on cycles the grandmothers know.",
            "Tree ferns flagging permanent water and sheltered camps.",
        ],
        (FeatureKind::Geological, Terrain::Desert) => &[
            "Rock formations holding creation stories within their stone.",
            "Ochre beds worked for ceremony and healing across millennia.",
            "Stone arrangements mapping the ancestors across the sky.",
            "Breakaway country telling of ancient seas.",
        ],
        (FeatureKind::Geological, Terrain::Grassland) => &[
            "Granite tors marking boundaries and meeting points.",
            "Stone circles aligned with the seasonal stars.",
            "Clay beds suited to pottery and paint.",
            "Ridgelines that channel water and guide migrations.",
        ],
        (FeatureKind::Geological, Terrain::Forest) => &[
            "Old lava flows feeding soil for the sacred plants.",
            "Sandstone galleries layered with generations of rock art.",
            "Quartz outcrops that catch the moonlight for night ceremony.",
            "Limestone caves that carry song deep into the dark.",
        ],
    }
}

/// Instantiate a route: template plus a freshly generated feature set.
#[must_use]
pub fn build_route(template: &RouteTemplate, rng: &RngBundle) -> Route {
    let features = generate_features(&template.id, template.distance, template.terrain, rng);
    Route {
        id: template.id.clone(),
        name: template.name.clone(),
        description: template.description.clone(),
        distance: template.distance,
        duration: template.duration,
        target_points: template.target_points,
        terrain: template.terrain,
        features,
    }
}

/// Generate the sorted feature list for a route of the given length.
#[must_use]
pub fn generate_features(
    route_id: &str,
    distance: f32,
    terrain: Terrain,
    rng: &RngBundle,
) -> Vec<LandscapeFeature> {
    let distance = distance.max(0.0);
    let rate = range_f32(
        &mut *rng.placement(),
        FEATURES_PER_MILE_MIN,
        FEATURES_PER_MILE_MAX,
    );
    let total = ((distance * rate).round() as usize).max(MIN_SCATTERED_FEATURES);

    let positions = generate_positions(distance, total, rng);
    let mut features: Vec<LandscapeFeature> = positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| {
            make_feature(&format!("{route_id}-feature-{index}"), position, terrain, rng)
        })
        .collect();

    features.sort_by(|a, b| a.position.total_cmp(&b.position));
    features
}

/// Mix of clustered and individually scattered positions.
fn generate_positions(distance: f32, total: usize, rng: &RngBundle) -> Vec<f32> {
    let mut positions = Vec::with_capacity(total);
    let clamp_margin = POSITION_CLAMP_MARGIN_MILES.min(distance / 4.0);
    let mut rng = rng.placement();

    // Clusters only fit once the route clears its edge margins.
    if distance > 2.0 * CLUSTER_EDGE_MARGIN_MILES {
        let cluster_count = ((total as f32) * CLUSTER_FRACTION).floor() as usize;
        for _ in 0..cluster_count {
            if positions.len() >= total {
                break;
            }
            let center = range_f32(
                &mut *rng,
                CLUSTER_EDGE_MARGIN_MILES,
                distance - CLUSTER_EDGE_MARGIN_MILES,
            );
            let size = rng.gen_range(CLUSTER_SIZE_MIN..=CLUSTER_SIZE_MAX) as usize;
            for _ in 0..size.min(total - positions.len()) {
                let offset = range_f32(&mut *rng, -CLUSTER_SPREAD_MILES, CLUSTER_SPREAD_MILES);
                positions.push((center + offset).clamp(clamp_margin, distance - clamp_margin));
            }
        }
    }

    // Scatter the remainder uniformly, avoiding the route's extreme ends.
    let scatter_margin = SCATTER_EDGE_MARGIN_MILES.min(distance / 4.0);
    while positions.len() < total {
        positions.push(range_f32(
            &mut *rng,
            scatter_margin,
            (distance - scatter_margin).max(scatter_margin),
        ));
    }
    positions
}

fn make_feature(id: &str, position: f32, terrain: Terrain, rng: &RngBundle) -> LandscapeFeature {
    let mut rng = rng.variety();
    let kind = FeatureKind::ALL[weighted_index(&mut *rng, &terrain_weights(terrain))];
    let interaction = InteractionKind::ALL[weighted_index(&mut *rng, &interaction_weights(kind))];
    let pool = lore_pool(kind, terrain);
    let lore = pool[rng.gen_range(0..pool.len())];
    let size = range_f32(&mut *rng, FEATURE_SIZE_MIN, FEATURE_SIZE_MAX);

    LandscapeFeature {
        id: id.to_string(),
        kind,
        position,
        base_points: kind.base_points(),
        interaction,
        visual: FeatureVisual {
            icon: kind.icon().to_string(),
            color: kind.color().to_string(),
            size,
        },
        lore: lore.to_string(),
        is_active: false,
        is_completed: false,
    }
}

/// Sanity check used by debug assertions and tests: non-empty, in-bounds,
/// sorted ascending by position.
#[must_use]
pub fn validate_features(features: &[LandscapeFeature], distance: f32) -> bool {
    if features.is_empty() {
        return false;
    }
    let in_bounds = features
        .iter()
        .all(|f| f.position >= 0.0 && f.position <= distance);
    let sorted = features
        .windows(2)
        .all(|pair| pair[0].position <= pair[1].position);
    in_bounds && sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_features_are_sorted_and_bounded() {
        let rng = RngBundle::from_user_seed(404);
        let features = generate_features("desert-crossing", 15.0, Terrain::Desert, &rng);
        assert!(validate_features(&features, 15.0));
        // Density range 2..6 per mile over 15 miles.
        assert!(features.len() >= 30);
        assert!(features.len() <= 90);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = generate_features(
            "grassland-journey",
            20.0,
            Terrain::Grassland,
            &RngBundle::from_user_seed(9),
        );
        let second = generate_features(
            "grassland-journey",
            20.0,
            Terrain::Grassland,
            &RngBundle::from_user_seed(9),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn tiny_routes_still_get_the_scattered_minimum() {
        let rng = RngBundle::from_user_seed(1);
        let features = generate_features("stub", 0.4, Terrain::Forest, &rng);
        assert!(features.len() >= MIN_SCATTERED_FEATURES);
        assert!(validate_features(&features, 0.4));
    }

    #[test]
    fn plant_signs_never_roll_trace() {
        let rng = RngBundle::from_user_seed(31);
        let features = generate_features("mountain-passage", 25.0, Terrain::Forest, &rng);
        assert!(
            features
                .iter()
                .filter(|f| f.kind == FeatureKind::PlantSigns)
                .all(|f| f.interaction != InteractionKind::Trace)
        );
    }

    #[test]
    fn weight_tables_cover_every_kind() {
        for terrain in Terrain::ALL {
            assert!(terrain_weights(terrain).iter().sum::<f32>() > 0.0);
        }
        for kind in FeatureKind::ALL {
            assert!(interaction_weights(kind).iter().sum::<f32>() > 0.0);
            for terrain in Terrain::ALL {
                assert!(!lore_pool(kind, terrain).is_empty());
            }
        }
    }

    #[test]
    fn build_route_carries_template_fields() {
        let catalog = crate::route::RouteCatalog::builtin();
        let template = catalog.get("desert-crossing").unwrap();
        let route = build_route(template, &RngBundle::from_user_seed(2));
        assert_eq!(route.id, template.id);
        assert_eq!(route.target_points, template.target_points);
        assert!(validate_features(&route.features, route.distance));
    }
}
