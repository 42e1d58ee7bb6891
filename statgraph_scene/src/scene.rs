// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owned scene a chart draws into.

use kurbo::Size;

use crate::fragment::Fragment;
use crate::node::Node;
use crate::svg;

/// Layer indices for [`Node::with_z_index`], lowest painted first.
pub mod z_order {
    /// Radar disc and gauge face.
    pub const PLOT_BACKGROUND: i32 = -100;
    /// Rings and spokes.
    pub const GRID_LINES: i32 = -50;
    /// Bars, areas and zones.
    pub const SERIES_FILL: i32 = 0;
    /// Flows and outlines.
    pub const SERIES_STROKE: i32 = 10;
    /// Vertices and needle caps.
    pub const SERIES_POINTS: i32 = 20;
    /// Axis domain lines and ticks.
    pub const AXIS_RULES: i32 = 30;
    /// Tick labels.
    pub const AXIS_LABELS: i32 = 40;
    /// Boxes behind in-plot values.
    pub const LABEL_BACKDROPS: i32 = 45;
    /// In-plot values.
    pub const VALUE_LABELS: i32 = 50;
    /// Legend swatches.
    pub const LEGEND_SWATCHES: i32 = 60;
    /// Legend text.
    pub const LEGEND_LABELS: i32 = 70;
    /// Chart captions.
    pub const TITLES: i32 = 80;
}

#[derive(Clone, Debug)]
pub(crate) enum Item {
    Node(Node),
    /// Nodes that blend only with each other (`isolation: isolate`).
    Isolated(Vec<Node>),
}

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) z_index: i32,
    pub(crate) seq: usize,
    pub(crate) item: Item,
}

/// A fixed-size drawable surface.
///
/// A scene is created for one chart, filled with [`Node`]s, serialized once, and dropped.
/// Nothing is shared between scenes.
#[derive(Clone, Debug)]
pub struct Scene {
    size: Size,
    entries: Vec<Entry>,
}

impl Scene {
    /// Creates an empty scene of `width × height` px.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            entries: Vec::new(),
        }
    }

    /// Builds a scene with `build` and serializes it.
    ///
    /// The scene only lives for the duration of the call: it is dropped whether `build`
    /// succeeds or fails.
    pub fn render<E>(
        width: f64,
        height: f64,
        build: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<Fragment, E> {
        let mut scene = Self::new(width, height);
        build(&mut scene)?;
        Ok(scene.into_fragment())
    }

    /// Canvas size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of top-level entries (an isolated group counts once).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a node.
    pub fn push(&mut self, node: Node) {
        let seq = self.entries.len();
        self.entries.push(Entry {
            z_index: node.z_index,
            seq,
            item: Item::Node(node),
        });
    }

    /// Appends several nodes in order.
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            self.push(node);
        }
    }

    /// Appends a group whose members composite only against each other.
    ///
    /// The group is placed at `z_index`; members are ordered among themselves by their own
    /// z-indexes.
    pub fn push_isolated(&mut self, z_index: i32, nodes: Vec<Node>) {
        if nodes.is_empty() {
            return;
        }
        let seq = self.entries.len();
        self.entries.push(Entry {
            z_index,
            seq,
            item: Item::Isolated(nodes),
        });
    }

    /// Iterates over every node in paint order, flattening isolated groups.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.sorted_entries().into_iter().flat_map(|entry| {
            let nodes: Vec<&Node> = match &entry.item {
                Item::Node(node) => vec![node],
                Item::Isolated(nodes) => svg::sorted_nodes(nodes),
            };
            nodes
        })
    }

    pub(crate) fn sorted_entries(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by_key(|e| (e.z_index, e.seq));
        entries
    }

    /// Serializes the scene as a standalone SVG document.
    pub fn to_svg_string(&self) -> String {
        svg::write_document(self)
    }

    /// Serializes and consumes the scene.
    pub fn into_fragment(self) -> Fragment {
        let markup = self.to_svg_string();
        Fragment::new(markup, self.size.width, self.size.height)
    }
}
