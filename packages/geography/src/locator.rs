//! R-tree point-in-polygon lookup from map coordinates to districts.

use geo::{BoundingRect, Contains, MultiPolygon};
use ma_equity_district_models::DistrictFeature;
use rstar::{AABB, RTree, RTreeObject};

use crate::DistrictCollection;
use crate::projection::MercatorProjection;

/// A district polygon stored in the R-tree.
struct DistrictEntry {
    feature: DistrictFeature,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for DistrictEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over district boundaries.
///
/// Districts tile the state without overlap, so the first containing
/// polygon wins.
pub struct DistrictLocator {
    tree: RTree<DistrictEntry>,
}

impl DistrictLocator {
    /// Builds the index from a collection of shapes.
    #[must_use]
    pub fn new(collection: &DistrictCollection) -> Self {
        let entries = collection
            .shapes()
            .iter()
            .filter_map(|shape| {
                let rect = shape.polygon.bounding_rect()?;
                Some(DistrictEntry {
                    feature: shape.feature.clone(),
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                    polygon: shape.polygon.clone(),
                })
            })
            .collect();

        let tree = RTree::bulk_load(entries);
        log::debug!("Built district locator over {} shapes", tree.size());
        Self { tree }
    }

    /// District containing the given longitude/latitude.
    #[must_use]
    pub fn locate(&self, lng: f64, lat: f64) -> Option<&DistrictFeature> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .find(|entry| entry.polygon.contains(&point))
            .map(|entry| &entry.feature)
    }

    /// District under a canvas pixel of a map drawn with `projection`.
    #[must_use]
    pub fn locate_pixel(
        &self,
        projection: &MercatorProjection,
        px: f64,
        py: f64,
    ) -> Option<&DistrictFeature> {
        let coord = projection.invert(px, py);
        self.locate(coord.x, coord.y)
    }
}

impl std::fmt::Debug for DistrictLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistrictLocator")
            .field("districts", &self.tree.size())
            .finish()
    }
}
