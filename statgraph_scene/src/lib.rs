// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned vector scenes for `statgraph` charts.
//!
//! A [`Scene`] is a fixed-size surface that charts fill with [`Node`]s (rects, circles,
//! paths, polygons, and text), each carrying its own [`Paint`], transform, and z-index.
//! Scenes serialize to standalone SVG documents wrapped in a [`Fragment`].
//!
//! Scenes are created per chart and consumed on serialization; there is no shared or
//! reusable drawing surface.

mod fragment;
mod node;
mod paint;
mod scene;
mod svg;

pub use fragment::Fragment;
pub use node::{Node, Shape, TextAnchor, TextSpec};
pub use paint::{Paint, StrokeStyle};
pub use scene::{Scene, z_order};
pub use svg::fmt_num;
