// crates/sweepdb-core/src/model/geometry.rs
use crate::error::{Result, SweepError};
use geo::{BoundingRect, Closest, ClosestPoint, Contains, Coord, Intersects, LineString, MapCoords, Point, Rect};
use serde::{Deserialize, Serialize};

/// A WGS84 position. Latitude first, unlike the `[lon, lat]` order of the
/// source files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeographicPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeographicPoint {
    /// Validating constructor. Rejects NaN and anything outside
    /// `[-90, 90] x [-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(SweepError::InvalidGeometry(format!(
                "coordinate out of range: lat {lat}, lon {lon}"
            )));
        }
        Ok(Self { lat, lon })
    }
}

impl From<GeographicPoint> for Coord<f64> {
    #[inline]
    fn from(p: GeographicPoint) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<&GeographicPoint> for Point<f64> {
    #[inline]
    fn from(p: &GeographicPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

/// Coordinates stored in a model line were validated on the way in.
#[inline]
fn from_coord(c: Coord<f64>) -> GeographicPoint {
    GeographicPoint { lat: c.y, lon: c.x }
}

fn line_of(points: &[GeographicPoint]) -> LineString<f64> {
    points.iter().copied().map(Coord::from).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingRole {
    Exterior,
    Interior,
}

/// A closed sequence of at least four points (first == last), kept in the
/// order it was built with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// The ring as a hole-free `geo` polygon, so containment is a single
    /// crossing-number test on this ring alone.
    shape: geo::Polygon<f64>,
    role: RingRole,
}

impl Ring {
    pub const MIN_POINTS: usize = 4;

    pub fn new(points: Vec<GeographicPoint>, role: RingRole) -> Result<Self> {
        if points.len() < Self::MIN_POINTS {
            return Err(SweepError::InvalidGeometry(format!(
                "ring has {} points, need at least {}",
                points.len(),
                Self::MIN_POINTS
            )));
        }
        if points.first() != points.last() {
            return Err(SweepError::InvalidGeometry("ring is not closed".into()));
        }
        Ok(Self {
            shape: geo::Polygon::new(line_of(&points), Vec::new()),
            role,
        })
    }

    pub fn points(&self) -> Vec<GeographicPoint> {
        self.shape.exterior().coords().copied().map(from_coord).collect()
    }

    #[inline]
    pub fn line(&self) -> &LineString<f64> {
        self.shape.exterior()
    }

    #[inline]
    pub fn role(&self) -> RingRole {
        self.role
    }

    /// Interior test, longitude as x and latitude as y. Winding does not
    /// matter; points on the boundary are outside.
    pub fn contains(&self, p: &GeographicPoint) -> bool {
        self.shape.contains(&Point::from(p))
    }

    fn bounds(&self) -> Option<Bounds> {
        self.shape.bounding_rect().map(Bounds)
    }
}

/// One exterior ring plus zero or more holes. Holes are assumed to lie
/// inside the exterior; this is not checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    #[inline]
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    #[inline]
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Inside the exterior and outside every hole.
    pub fn contains(&self, p: &GeographicPoint) -> bool {
        self.exterior.contains(p) && !self.holes.iter().any(|h| h.contains(p))
    }
}

/// An open path of at least two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    line: LineString<f64>,
}

impl Polyline {
    pub const MIN_POINTS: usize = 2;

    pub fn new(points: Vec<GeographicPoint>) -> Result<Self> {
        if points.len() < Self::MIN_POINTS {
            return Err(SweepError::InvalidGeometry(format!(
                "polyline has {} points, need at least {}",
                points.len(),
                Self::MIN_POINTS
            )));
        }
        Ok(Self {
            line: line_of(&points),
        })
    }

    pub fn points(&self) -> Vec<GeographicPoint> {
        self.line.coords().copied().map(from_coord).collect()
    }

    #[inline]
    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    /// Shortest distance in metres from `p` to the path.
    ///
    /// The path is projected to a local equirectangular plane centred on
    /// `p`, which is accurate to well under a metre at street scale.
    pub fn distance_m(&self, p: &GeographicPoint) -> f64 {
        let origin = LocalProjection::at(p);
        let projected: LineString<f64> = self.line.map_coords(move |c| origin.project(c));
        match projected.closest_point(&Point::new(0.0, 0.0)) {
            Closest::Intersection(c) | Closest::SinglePoint(c) => c.x().hypot(c.y()),
            Closest::Indeterminate => f64::INFINITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Polygon(Polygon),
    Polyline(Polyline),
}

impl Geometry {
    /// `None` only for an empty line, which the constructors rule out.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Polygon(poly) => poly.exterior().bounds(),
            Geometry::Polyline(line) => line.line.bounding_rect().map(Bounds),
        }
    }

    #[inline]
    pub fn is_polygon(&self) -> bool {
        matches!(self, Geometry::Polygon(_))
    }
}

/// Axis-aligned lat/lon box, used to reject far-away overlays before the
/// exact test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds(pub Rect<f64>);

impl Bounds {
    /// Grow the box by `metres` on every side.
    pub fn expanded_m(&self, metres: f64) -> Self {
        let (min, max) = (self.0.min(), self.0.max());
        let dlat = metres / METRES_PER_DEGREE;
        let mid = ((min.y + max.y) / 2.0).to_radians().cos().max(1e-6);
        let dlon = metres / (METRES_PER_DEGREE * mid);
        Bounds(Rect::new(
            Coord { x: min.x - dlon, y: min.y - dlat },
            Coord { x: max.x + dlon, y: max.y + dlat },
        ))
    }

    /// Edges included.
    #[inline]
    pub fn contains(&self, p: &GeographicPoint) -> bool {
        self.0.intersects(&Coord::from(*p))
    }
}

const EARTH_RADIUS_M: f64 = 6_371_008.8;
const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

#[derive(Clone, Copy)]
struct LocalProjection {
    origin: Coord<f64>,
    cos_lat0: f64,
}

impl LocalProjection {
    fn at(p: &GeographicPoint) -> Self {
        Self {
            origin: Coord::from(*p),
            cos_lat0: p.lat.to_radians().cos(),
        }
    }

    fn project(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (c.x - self.origin.x) * self.cos_lat0 * METRES_PER_DEGREE,
            y: (c.y - self.origin.y) * METRES_PER_DEGREE,
        }
    }
}
