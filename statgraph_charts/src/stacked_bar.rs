// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized (100%) stacked bar charts.

use kurbo::{Point, Rect};
use statgraph_scene::{Fragment, Node, Scene, TextAnchor, TextSpec};

use crate::axis::{AxisOrient, AxisSpec};
use crate::error::{ChartError, Result};
use crate::format::{format_number, percent0};
use crate::layout::Margin;
use crate::legend::{LegendItem, LegendSpec};
use crate::scale::{ScaleBand, ScaleLinearSpec};
use crate::series::{CategoryRow, SeriesKey, StackOffset, StackedSpan, stack_rows};
use crate::theme::{Theme, yiq};
use crate::title::TitleSpec;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 500.0;
const MARGIN: Margin = Margin::new(60.0, 20.0, 30.0, 40.0);

/// Segments shorter than this (px) are drawn unlabeled.
pub const MIN_LABEL_HEIGHT: f64 = 10.0;

/// One bar per category; each bar shows its keys as shares of the category's total.
#[derive(Clone, Debug)]
pub struct StackedBarSpec {
    /// Caption drawn top-left.
    pub title: String,
    /// Series, bottom of the stack first.
    pub keys: Vec<SeriesKey>,
    /// Bars, left to right.
    pub rows: Vec<CategoryRow>,
}

impl StackedBarSpec {
    /// Creates an empty chart.
    pub fn new(title: impl Into<String>, keys: Vec<SeriesKey>) -> Self {
        Self {
            title: title.into(),
            keys,
            rows: Vec::new(),
        }
    }

    /// Sets the rows.
    pub fn with_rows(mut self, rows: Vec<CategoryRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Stacked spans in fraction space, one layer per key.
    pub fn stack(&self) -> Result<Vec<Vec<StackedSpan>>> {
        stack_rows(&self.rows, self.keys.len(), StackOffset::Normalize)
    }

    /// Renders the chart.
    pub fn render(&self, theme: &Theme) -> Result<Fragment> {
        if self.rows.is_empty() {
            return Err(ChartError::EmptyInput {
                chart: "stacked bar",
            });
        }
        let layers = self.stack()?;
        let colors: Vec<_> = self.keys.iter().map(|k| k.color).collect();
        let legend_items = LegendItem::aligned(&self.keys, &colors, |k| k.label.clone())?;

        let plot = MARGIN.plot(WIDTH, HEIGHT);
        let band = ScaleBand::new((plot.x0, plot.x1), self.rows.len()).with_padding(0.3, 0.3);
        let y = ScaleLinearSpec::new((0.0, 1.0)).instantiate((plot.y1, plot.y0));

        Scene::render(WIDTH, HEIGHT, |scene| {
            for (layer, key) in layers.iter().zip(&self.keys) {
                for span in layer {
                    let x0 = band.x(span.row);
                    let (top, bottom) = (y.map(span.y1), y.map(span.y0));
                    scene.push(
                        Node::rect(Rect::new(x0, top, x0 + band.band_width(), bottom))
                            .with_fill(key.color),
                    );
                    if bottom - top <= MIN_LABEL_HEIGHT {
                        continue;
                    }
                    let mid = (top + bottom) / 2.0 + 2.5;
                    let share = span.y1 - span.y0;
                    let contrast = if yiq(key.color) >= 128.0 {
                        theme.b_med
                    } else {
                        theme.f_high
                    };
                    scene.push(
                        Node::text(
                            TextSpec::new(
                                Point::new(band.center(span.row), mid),
                                percent0(share),
                            )
                            .with_anchor(TextAnchor::Middle)
                            .with_font_size(10.0),
                        )
                        .with_fill(contrast),
                    );
                    scene.push(
                        Node::text(
                            TextSpec::new(Point::new(x0 - 2.0, mid), format_number(span.value))
                                .with_anchor(TextAnchor::End)
                                .with_font_size(10.0),
                        )
                        .with_fill(theme.f_low),
                    );
                }
            }

            let labels = self.rows.iter().map(|r| r.category.clone());
            scene.extend(
                AxisSpec::bottom_band(&band, (plot.x0, plot.x1), labels, plot.y1, theme).nodes(),
            );
            scene.extend(
                AxisSpec::vertical(AxisOrient::Left, &y, 2, percent0, plot.x0, theme).nodes(),
            );

            scene.extend(
                LegendSpec::new(legend_items)
                    .with_extent(plot.x0, plot.width())
                    .with_y(plot.y0 - LegendSpec::DEFAULT_Y)
                    .nodes(),
            );
            let title = TitleSpec::new(self.title.clone(), Point::new(10.0, 15.0), theme.f_high);
            scene.extend(title.node());
            Ok(())
        })
    }
}
