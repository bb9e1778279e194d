//! Drawable assets and the per-node presentation state built from them

use serde::{Deserialize, Serialize};
use starfall_core::{Scalar, Vec3};

/// Where hidden drawables are parked on the presentation pass.
pub const HIDDEN_POSITION: [f32; 3] = [-100_000.0, -100_000.0, -100_000.0];

/// Authoring-time description of a vector shape.
///
/// Parsed from a table with a `shape` key, e.g.
/// ```toml
/// shape = "rect"
/// width = 0.0
/// height = 1.5
/// stroke = 1.0
/// color = "#e63"
/// fill = true
/// ```
/// Unrecognised shape names parse as [`DrawableAsset::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum DrawableAsset {
    Anchor,
    Rect {
        width: f32,
        height: f32,
        #[serde(default = "default_stroke")]
        stroke: f32,
        #[serde(default = "default_color")]
        color: String,
        #[serde(default)]
        fill: bool,
    },
    RoundRect {
        width: f32,
        height: f32,
        corner_radius: f32,
        #[serde(default = "default_stroke")]
        stroke: f32,
        #[serde(default = "default_color")]
        color: String,
        #[serde(default)]
        fill: bool,
    },
    Ellipse {
        diameter: f32,
        #[serde(default = "default_quarters")]
        quarters: u8,
        #[serde(default = "default_stroke")]
        stroke: f32,
        #[serde(default = "default_color")]
        color: String,
    },
    Polygon {
        radius: f32,
        sides: u32,
        #[serde(default = "default_stroke")]
        stroke: f32,
        #[serde(default = "default_color")]
        color: String,
    },
    Sphere {
        #[serde(default = "default_stroke")]
        stroke: f32,
        #[serde(default = "default_color")]
        color: String,
    },
    Polyline {
        path: Vec<[f32; 3]>,
        #[serde(default)]
        closed: bool,
        #[serde(default = "default_stroke")]
        stroke: f32,
        #[serde(default = "default_color")]
        color: String,
    },
    Cone {
        diameter: f32,
        length: f32,
        #[serde(default = "default_color")]
        color: String,
        #[serde(default)]
        backface: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

fn default_stroke() -> f32 {
    1.0
}

fn default_color() -> String {
    "#fff".to_string()
}

fn default_quarters() -> u8 {
    4
}

impl DrawableAsset {
    /// Name of the shape kind, as written in asset files
    pub fn kind(&self) -> &'static str {
        match self {
            DrawableAsset::Anchor => "anchor",
            DrawableAsset::Rect { .. } => "rect",
            DrawableAsset::RoundRect { .. } => "round-rect",
            DrawableAsset::Ellipse { .. } => "ellipse",
            DrawableAsset::Polygon { .. } => "polygon",
            DrawableAsset::Sphere { .. } => "sphere",
            DrawableAsset::Polyline { .. } => "polyline",
            DrawableAsset::Cone { .. } => "cone",
            DrawableAsset::Unknown => "unknown",
        }
    }
}

impl Default for DrawableAsset {
    fn default() -> Self {
        DrawableAsset::Anchor
    }
}

/// Presentation state for one node.
///
/// Mirrors the node's tracked fields as plain values the rendering backend
/// can read without touching dirty flags. A drawable built from an
/// unresolvable asset is a no-op: it keeps its state but reports
/// [`Drawable::is_noop`] so backends skip it.
#[derive(Debug, Clone)]
pub struct Drawable {
    asset: DrawableAsset,
    noop: bool,
    visible: bool,
    pub translate: [f32; 3],
    pub rotate: [f32; 3],
    pub scale: [f32; 3],
    /// RGBA, components in [0, 1]
    pub color: [f32; 4],
}

impl Drawable {
    pub fn new(asset: DrawableAsset) -> Self {
        let noop = matches!(asset, DrawableAsset::Unknown);
        if noop {
            log::warn!("cannot construct drawable: unknown shape kind, using a no-op drawable");
        }
        Self {
            asset,
            noop,
            visible: true,
            translate: [0.0; 3],
            rotate: [0.0; 3],
            scale: [1.0; 3],
            color: [1.0; 4],
        }
    }

    pub fn asset(&self) -> &DrawableAsset {
        &self.asset
    }

    pub fn is_noop(&self) -> bool {
        self.noop
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn update_transform(&mut self, position: &Vec3, rotation: &Vec3, scale: &Vec3) {
        self.translate = position.to_array();
        self.rotate = rotation.to_array();
        self.scale = scale.to_array();
    }

    pub fn update_color(&mut self, color: &Vec3, opacity: &Scalar) {
        self.color = [color.x(), color.y(), color.z(), opacity.get()];
    }

    /// Park hidden drawables off screen
    pub fn update_visibility(&mut self) {
        if !self.visible {
            self.translate = HIDDEN_POSITION;
        }
    }
}

impl Default for Drawable {
    fn default() -> Self {
        Self::new(DrawableAsset::Anchor)
    }
}
