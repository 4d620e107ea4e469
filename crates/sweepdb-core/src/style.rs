// crates/sweepdb-core/src/style.rs
//! Style requests handed to the map renderer. Drawing itself happens
//! elsewhere; this only decides colours and widths per tier.

use crate::model::Geometry;
use crate::status::StatusTier;
use serde::Serialize;

/// Straight RGBA, channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
const ORANGE: Rgba = Rgba::new(1.0, 0.5, 0.0, 1.0);
const YELLOW: Rgba = Rgba::new(1.0, 1.0, 0.0, 1.0);
const LIGHT_GRAY: Rgba = Rgba::new(2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 1.0);
const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OverlayStyle {
    /// `None` for open paths.
    pub fill: Option<Rgba>,
    pub stroke: Rgba,
    pub line_width: f32,
}

impl OverlayStyle {
    /// Areas are filled and outlined in white; streets are drawn as a
    /// coloured stroke.
    pub fn for_overlay(tier: StatusTier, geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Polygon(_) => Self {
                fill: Some(match tier {
                    StatusTier::Urgent => RED.with_alpha(0.5),
                    StatusTier::Soon => ORANGE.with_alpha(0.5),
                    StatusTier::Clear => LIGHT_GRAY.with_alpha(0.3),
                }),
                stroke: WHITE.with_alpha(0.5),
                line_width: 1.0,
            },
            Geometry::Polyline(_) => Self {
                fill: None,
                stroke: match tier {
                    StatusTier::Urgent => RED.with_alpha(0.8),
                    StatusTier::Soon => YELLOW.with_alpha(0.8),
                    StatusTier::Clear => LIGHT_GRAY.with_alpha(0.6),
                },
                line_width: 2.0,
            },
        }
    }
}
