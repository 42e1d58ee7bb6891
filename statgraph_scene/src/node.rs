// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable scene nodes.

use kurbo::{Affine, BezPath, Circle, Point, Rect};
use peniko::{Brush, Mix};

use crate::paint::{Paint, StrokeStyle};
use crate::z_order;

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    #[default]
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// An unshaped text run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSpec {
    /// Anchor position (alphabetic baseline) in node-local coordinates.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size in px; `None` leaves the rasterizer default.
    pub font_size: Option<f64>,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
    /// Baseline shift in em units.
    pub dy_em: Option<f64>,
    /// Whether to request an italic face.
    pub italic: bool,
}

impl TextSpec {
    /// Creates a start-anchored text run at `pos`.
    pub fn new(pos: Point, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
            font_size: None,
            anchor: TextAnchor::Start,
            dy_em: None,
            italic: false,
        }
    }

    /// Sets the font size in px.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the horizontal anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Shifts the baseline by `dy` em.
    pub fn with_dy_em(mut self, dy: f64) -> Self {
        self.dy_em = Some(dy);
        self
    }

    /// Requests an italic face.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

/// Geometry of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle with optional corner radius.
    Rect {
        /// Geometry.
        rect: Rect,
        /// Corner radius (`rx`).
        corner_radius: f64,
    },
    /// Circle.
    Circle(Circle),
    /// Arbitrary path.
    Path(BezPath),
    /// Closed polygon through the given vertices.
    Polygon(Vec<Point>),
    /// Text run.
    Text(TextSpec),
}

/// A single drawable: geometry, paint, transform and paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Geometry.
    pub shape: Shape,
    /// Paint state.
    pub paint: Paint,
    /// Node-to-scene transform.
    pub transform: Affine,
    /// Paint order (see [`z_order`]).
    pub z_index: i32,
}

impl Node {
    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            paint: Paint::default(),
            transform: Affine::IDENTITY,
            z_index: z_order::SERIES_FILL,
        }
    }

    /// A rectangle node.
    pub fn rect(rect: Rect) -> Self {
        Self::with_shape(Shape::Rect {
            rect,
            corner_radius: 0.0,
        })
    }

    /// A rectangle node with rounded corners.
    pub fn rounded_rect(rect: Rect, corner_radius: f64) -> Self {
        Self::with_shape(Shape::Rect {
            rect,
            corner_radius,
        })
    }

    /// A circle node.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::with_shape(Shape::Circle(Circle::new(center, radius)))
    }

    /// A path node.
    pub fn path(path: BezPath) -> Self {
        Self::with_shape(Shape::Path(path))
    }

    /// A closed polygon node.
    pub fn polygon(points: impl IntoIterator<Item = Point>) -> Self {
        Self::with_shape(Shape::Polygon(points.into_iter().collect()))
    }

    /// A text node. Text defaults to the label layer.
    pub fn text(spec: TextSpec) -> Self {
        let mut node = Self::with_shape(Shape::Text(spec));
        node.z_index = z_order::VALUE_LABELS;
        node
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.paint.fill = Some(fill.into());
        self
    }

    /// Sets the fill opacity.
    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.paint.fill_opacity = Some(opacity);
        self
    }

    /// Sets the stroke.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.paint.stroke = Some(stroke);
        self
    }

    /// Sets the whole-node opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.paint.opacity = Some(opacity);
        self
    }

    /// Sets the blend mode.
    pub fn with_blend(mut self, blend: Mix) -> Self {
        self.paint.blend = blend;
        self
    }

    /// Replaces the paint wholesale.
    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    /// Sets the node-to-scene transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the z-index used for paint ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Returns the text run when this is a text node.
    pub fn as_text(&self) -> Option<&TextSpec> {
        match &self.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }
}
