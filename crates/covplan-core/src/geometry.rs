//! Geodesic geometry primitives on the WGS-84 ellipsoid.
//!
//! Distances and bearings use the Karney geodesic algorithms (via
//! `geographiclib-rs`) rather than a flat-earth approximation: survey areas
//! can span hundreds of meters and a Cartesian shortcut would drift enough
//! to misplace grid cells at the boundary.

use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};
use serde::{Deserialize, Serialize};

/// Maximum bounding-box diagonal (meters) for which the decomposer's planar
/// corner-sum composition is assumed to track the geodesic to sub-meter
/// accuracy. See SPEC_FULL.md §9.
pub const MAX_SURVEY_DIAGONAL_M: f64 = 5_000.0;

/// Shared tolerance applied wherever the `(1 + sqrt(2)/2) * dim` adjacency
/// bound is compared, so the router's forbidden-edge sentinel and the
/// post-solve audit can never disagree at the diagonal length.
pub const ADJACENCY_EPSILON_M: f64 = 1e-6;

fn geod() -> Geodesic {
    Geodesic::wgs84()
}

/// A point on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Geodesic distance to `other`, in meters.
    pub fn distance(&self, other: GeoPoint) -> f64 {
        geod().inverse(self.lat, self.lon, other.lat, other.lon)
    }

    /// Initial bearing toward `other`, in degrees.
    pub fn azimuth(&self, other: GeoPoint) -> f64 {
        let (_s12, azi1, _azi2): (f64, f64, f64) =
            geod().inverse(self.lat, self.lon, other.lat, other.lon);
        azi1
    }

    /// The point `distance_m` meters from `self` along `azimuth_deg`.
    pub fn offset(&self, distance_m: f64, azimuth_deg: f64) -> GeoPoint {
        let (lat2, lon2, _azi2): (f64, f64, f64) =
            geod().direct(self.lat, self.lon, azimuth_deg, distance_m);
        GeoPoint::new(lat2, lon2)
    }

    /// Local-frame planar sum `self + other - origin`, valid only within a
    /// small survey footprint (see `MAX_SURVEY_DIAGONAL_M`).
    fn planar_sum(a: GeoPoint, b: GeoPoint, origin: GeoPoint) -> GeoPoint {
        GeoPoint::new(
            a.lat + b.lat - origin.lat,
            a.lon + b.lon - origin.lon,
        )
    }
}

/// The `(1 + sqrt(2)/2) * dim` neighbor-distance bound, with a shared
/// epsilon tolerance applied consistently everywhere it's compared.
pub fn is_admissible_edge(dist_m: f64, dim: f64) -> bool {
    let bound = (1.0 + std::f64::consts::FRAC_1_SQRT_2) * dim;
    dist_m > ADJACENCY_EPSILON_M && dist_m <= bound + ADJACENCY_EPSILON_M
}

/// An ordered ring of points, stored canonically (no duplicated wrap point).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<GeoPoint>,
}

impl Polygon {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Iterate the ring's edges, wrapping the last point back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Axis-aligned bounding box in (lat, lon) space: (south, west, north, east).
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut south = f64::INFINITY;
        let mut west = f64::INFINITY;
        let mut north = f64::NEG_INFINITY;
        let mut east = f64::NEG_INFINITY;
        for p in &self.points {
            south = south.min(p.lat);
            north = north.max(p.lat);
            west = west.min(p.lon);
            east = east.max(p.lon);
        }
        (south, west, north, east)
    }

    /// Odd-even (ray casting) point-in-polygon test.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            let crosses = (a.lon > point.lon) != (b.lon > point.lon);
            if crosses {
                let x_at_lat = a.lat
                    + (point.lon - a.lon) / (b.lon - a.lon) * (b.lat - a.lat);
                if point.lat < x_at_lat {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Strict bounded-intersection test: the two segments cross at a point
/// strictly interior to both parameter ranges. Touching endpoints count as
/// an intersection.
pub fn segments_bounded_intersect(
    p1: GeoPoint,
    p2: GeoPoint,
    p3: GeoPoint,
    p4: GeoPoint,
) -> bool {
    let d1x = p2.lat - p1.lat;
    let d1y = p2.lon - p1.lon;
    let d2x = p4.lat - p3.lat;
    let d2y = p4.lon - p3.lon;

    let denom = d1x * d2y - d1y * d2x;
    if denom.abs() < 1e-15 {
        return false; // parallel or collinear: no bounded intersection
    }

    let dx = p3.lat - p1.lat;
    let dy = p3.lon - p1.lon;

    let t = (dx * d2y - dy * d2x) / denom;
    let u = (dx * d1y - dy * d1x) / denom;

    // Inclusive bounds: touching endpoints count as intersection (§4.1).
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Compose a cell corner from x/y geodesic offsets using the local-frame
/// planar-sum convention (§4.2, step 4).
pub fn compose_corner(offset_x: GeoPoint, offset_y: GeoPoint, origin: GeoPoint) -> GeoPoint {
    GeoPoint::planar_sum(offset_x, offset_y, origin)
}
