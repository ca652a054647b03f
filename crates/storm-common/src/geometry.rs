//! Boundary geometry: regions, simplified rings and the polygon store.
//!
//! Regions arrive as GeoJSON-style polygons or multi-polygons in geographic
//! coordinates. The store flattens every ring of every region into one list
//! of [`Polygon`]s, each carrying its own bounding box for cheap rejection.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::bbox::BoundingBox;
use crate::error::{StormError, StormResult};

/// Divisor used in place of a zero-height edge in the crossing test.
pub const HORIZONTAL_EDGE_EPSILON: f64 = 1e-12;

/// A position as `[x, y]` (longitude, latitude).
pub type Position = [f64; 2];

/// GeoJSON-style area geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Outer ring followed by any holes
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Iterate over every ring, outer rings and holes alike.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Vec<Position>> + '_> {
        match self {
            Geometry::Polygon(rings) => Box::new(rings.iter()),
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten()),
        }
    }
}

/// A named boundary region (e.g. one state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub geometry: Geometry,
}

/// Minimal GeoJSON feature collection, as exported by mapping tools.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: Option<Geometry>,
}

impl FeatureCollection {
    /// Convert features with an area geometry into regions.
    ///
    /// The region name comes from the `name` property, falling back to the
    /// feature's position in the collection.
    pub fn into_regions(self) -> Vec<Region> {
        self.features
            .into_iter()
            .enumerate()
            .filter_map(|(i, feature)| {
                let name = feature
                    .properties
                    .get("name")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("feature-{}", i));
                feature.geometry.map(|geometry| Region { name, geometry })
            })
            .collect()
    }
}

/// A closed ring of vertices with its precomputed bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<(f64, f64)>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Build a polygon from a vertex ring. Returns `None` for fewer than
    /// three vertices.
    pub fn new(vertices: Vec<(f64, f64)>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let bbox = BoundingBox::from_points(vertices.iter().copied())?;
        Some(Self { vertices, bbox })
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Point-in-polygon test: bounding-box rejection, then crossing number.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.bbox.contains_point(x, y) && ring_contains(&self.vertices, x, y)
    }
}

/// Crossing-number (ray casting) test of a point against a ring.
///
/// Counts crossings of a ray cast in +x from the point. Horizontal edges use
/// [`HORIZONTAL_EDGE_EPSILON`] as divisor; their `(yi > y) != (yj > y)`
/// guard is false anyway, so they never count.
pub fn ring_contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];

        let dy = yj - yi;
        let divisor = if dy == 0.0 { HORIZONTAL_EDGE_EPSILON } else { dy };

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / divisor + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Flattened list of boundary rings.
#[derive(Debug, Clone, Default)]
pub struct PolygonStore {
    polygons: Vec<Polygon>,
    extent: Option<BoundingBox>,
    fingerprint: u64,
}

impl PolygonStore {
    /// Build a store from raw rings, dropping rings with fewer than three vertices.
    pub fn from_rings(rings: Vec<Vec<(f64, f64)>>) -> Self {
        let polygons: Vec<Polygon> = rings.into_iter().filter_map(Polygon::new).collect();
        Self::from_polygons(polygons)
    }

    /// Build a store from regions, simplifying each ring.
    ///
    /// `tolerance` is in degrees; `0.0` disables simplification.
    pub fn from_regions(regions: &[Region], tolerance: f64) -> StormResult<Self> {
        let mut polygons = Vec::new();

        for region in regions {
            for ring in region.geometry.rings() {
                if ring.iter().any(|[x, y]| !x.is_finite() || !y.is_finite()) {
                    return Err(StormError::InvalidGeometry {
                        region: region.name.clone(),
                        message: "non-finite coordinate".to_string(),
                    });
                }

                let points: Vec<(f64, f64)> = ring.iter().map(|[x, y]| (*x, *y)).collect();
                let simplified = simplify_ring(&points, tolerance);

                match Polygon::new(simplified) {
                    Some(polygon) => polygons.push(polygon),
                    None => {
                        return Err(StormError::InvalidGeometry {
                            region: region.name.clone(),
                            message: format!("ring has only {} vertices", ring.len()),
                        })
                    }
                }
            }
        }

        if polygons.is_empty() {
            return Err(StormError::EmptyBoundary);
        }

        let before: usize = regions
            .iter()
            .flat_map(|r| r.geometry.rings())
            .map(|r| r.len())
            .sum();
        let store = Self::from_polygons(polygons);
        debug!(
            regions = regions.len(),
            rings = store.len(),
            vertices_before = before,
            vertices_after = store.vertex_count(),
            "Built polygon store"
        );

        Ok(store)
    }

    fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let extent = polygons
            .iter()
            .map(|p| *p.bbox())
            .reduce(|a, b| a.union(&b));
        let fingerprint = fingerprint(&polygons);
        Self {
            polygons,
            extent,
            fingerprint,
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Union bounding box of all polygons in geographic space.
    pub fn extent(&self) -> Option<BoundingBox> {
        self.extent
    }

    /// Structural hash of every vertex of every ring, in order.
    ///
    /// Two stores with the same rings produce the same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len()).sum()
    }

    /// True if any polygon contains the point.
    ///
    /// Stops at the first containing polygon. Overlapping polygons are fine:
    /// the result is the logical OR, only the amount of work depends on order.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        for polygon in &self.polygons {
            if polygon.contains(x, y) {
                return true;
            }
        }
        false
    }
}

fn fingerprint(polygons: &[Polygon]) -> u64 {
    let mut hasher = DefaultHasher::new();
    polygons.len().hash(&mut hasher);
    for polygon in polygons {
        polygon.vertices.len().hash(&mut hasher);
        for (x, y) in &polygon.vertices {
            x.to_bits().hash(&mut hasher);
            y.to_bits().hash(&mut hasher);
        }
    }
    hasher.finish()
}

// ============================================================================
// Ring simplification (radial distance pass, then Douglas-Peucker)
// ============================================================================

/// Simplify a closed ring.
///
/// Rings that would fall below four positions keep their original vertices,
/// so small islands are not erased.
pub fn simplify_ring(points: &[(f64, f64)], tolerance: f64) -> Vec<(f64, f64)> {
    if tolerance <= 0.0 || points.len() <= 4 {
        return points.to_vec();
    }

    let sq_tolerance = tolerance * tolerance;
    let radial = simplify_radial_distance(points, sq_tolerance);
    let simplified = simplify_douglas_peucker(&radial, sq_tolerance);

    if simplified.len() < 4 {
        points.to_vec()
    } else {
        simplified
    }
}

fn sq_dist(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// Squared distance from `p` to the segment `a`-`b`.
fn sq_segment_dist(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (mut x, mut y) = a;
    let dx = b.0 - x;
    let dy = b.1 - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p.0 - x) * dx + (p.1 - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b.0;
            y = b.1;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    sq_dist(p, (x, y))
}

fn simplify_radial_distance(points: &[(f64, f64)], sq_tolerance: f64) -> Vec<(f64, f64)> {
    let mut prev = points[0];
    let mut out = vec![prev];

    for &point in &points[1..] {
        if sq_dist(point, prev) > sq_tolerance {
            out.push(point);
            prev = point;
        }
    }

    let last = points[points.len() - 1];
    if prev != last {
        out.push(last);
    }
    out
}

fn simplify_douglas_peucker(points: &[(f64, f64)], sq_tolerance: f64) -> Vec<(f64, f64)> {
    let last = points.len() - 1;
    let mut out = vec![points[0]];
    douglas_peucker_step(points, 0, last, sq_tolerance, &mut out);
    out.push(points[last]);
    out
}

fn douglas_peucker_step(
    points: &[(f64, f64)],
    first: usize,
    last: usize,
    sq_tolerance: f64,
    out: &mut Vec<(f64, f64)>,
) {
    let mut max_sq_dist = sq_tolerance;
    let mut index = first;

    for i in first + 1..last {
        let d = sq_segment_dist(points[i], points[first], points[last]);
        if d > max_sq_dist {
            index = i;
            max_sq_dist = d;
        }
    }

    if max_sq_dist > sq_tolerance {
        if index - first > 1 {
            douglas_peucker_step(points, first, index, sq_tolerance, out);
        }
        out.push(points[index]);
        if last - index > 1 {
            douglas_peucker_step(points, index, last, sq_tolerance, out);
        }
    }
}
