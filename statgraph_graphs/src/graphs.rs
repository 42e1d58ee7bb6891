// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fixed graph catalogue and its batch driver.

use core::fmt;

use peniko::Color;
use statgraph_charts::theme::rainbow::{
    BLUE, GREEN, ORANGE, PINK, PURPLE, RED, TEAL, VIOLET, YELLOW,
};
use statgraph_charts::{
    CategoryRow, ChartError, GaugeZone, OverflowBarSpec, PpsSegmentsSpec, RadarAxis, RadarEntity,
    RadarSpec, SankeyInstance, SankeyLink, SankeySpec, ScaleLinearSpec, ScaleSpec, ScaleSqrtSpec,
    SeriesKey, SpeedGaugeSpec, StackedBarSpec, Theme, WellColumnsSpec, compose_grid,
    merge_buckets, round_half_up,
};
use statgraph_scene::Fragment;
use tracing::{debug, info_span};

use crate::batch::BatchControl;
use crate::error::{Error, Result};
use crate::stats::{EntityMetrics, StatsMapping};

/// Identifies one chart of the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartId {
    /// Kill causes per entity.
    Kills,
    /// Death causes per entity.
    Deaths,
    /// Line clear kinds per entity.
    LineclearDistribution,
    /// Placement speed distribution.
    PlacementPps,
    /// Well column distribution.
    WellColumns,
    /// Clear efficiency, over a tiered ceiling.
    Efficiency,
    /// Attack per line, over a tiered ceiling.
    Apl,
    /// Pieces per second, over a tiered ceiling.
    PpsBar,
    /// Attack per minute, over a tiered ceiling.
    ApmBar,
    /// Where incoming garbage ends up.
    IncomingAttacks,
    /// Downstacking gauge.
    DownstackingRatio,
    /// Cheesiness gauge.
    AttackCheesiness,
    /// Surge radar.
    SurgeRadar,
    /// Placement speed radar.
    PpsRadar,
}

impl ChartId {
    /// Caption drawn on the chart itself; empty for the untitled bars.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Kills => "Kills",
            Self::Deaths => "Deaths",
            Self::LineclearDistribution => "Lineclear Distribution",
            Self::PlacementPps => "Placement PPS",
            Self::WellColumns => "Well Columns",
            Self::Efficiency | Self::Apl => "",
            Self::PpsBar | Self::PpsRadar => "PPS",
            Self::ApmBar => "APM",
            Self::IncomingAttacks => "Incoming Attacks",
            Self::DownstackingRatio => "Downstacking Ratio",
            Self::AttackCheesiness => "Attack Cheesiness",
            Self::SurgeRadar => "Surge",
        }
    }

    fn build(self, entities: &[EntityMetrics<'_>], theme: &Theme) -> Result<Fragment> {
        match self {
            Self::Kills => attack_bar(self, "killStats", entities, theme),
            Self::Deaths => attack_bar(self, "deathStats", entities, theme),
            Self::LineclearDistribution => lineclear_bar(self, entities, theme),
            Self::PlacementPps => placement_pps(self, entities, theme),
            Self::WellColumns => well_columns(self, entities, theme),
            Self::Efficiency => overflow_bar(self, &EFFICIENCY, entities, theme),
            Self::Apl => overflow_bar(self, &APL, entities, theme),
            Self::PpsBar => overflow_bar(self, &PPS_BAR, entities, theme),
            Self::ApmBar => overflow_bar(self, &APM_BAR, entities, theme),
            Self::IncomingAttacks => incoming_attacks(self, entities, theme),
            Self::DownstackingRatio => gauge(self, &DOWNSTACKING, entities, theme),
            Self::AttackCheesiness => gauge(self, &CHEESINESS, entities, theme),
            Self::SurgeRadar => radar(self, &SURGE_AXES, entities, theme),
            Self::PpsRadar => radar(self, &PPS_AXES, entities, theme),
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Efficiency => "Efficiency",
            Self::Apl => "APL",
            Self::PpsRadar => "PPS radar",
            other => other.title(),
        })
    }
}

enum Document {
    Single(ChartId),
    Grid(&'static str, &'static [ChartId]),
}

const DOCUMENTS: [Document; 9] = [
    Document::Grid("kills and deaths", &[ChartId::Kills, ChartId::Deaths]),
    Document::Single(ChartId::LineclearDistribution),
    Document::Single(ChartId::PlacementPps),
    Document::Single(ChartId::WellColumns),
    Document::Grid(
        "overflow bars",
        &[
            ChartId::Efficiency,
            ChartId::Apl,
            ChartId::PpsBar,
            ChartId::ApmBar,
        ],
    ),
    Document::Single(ChartId::IncomingAttacks),
    Document::Grid(
        "gauges",
        &[ChartId::DownstackingRatio, ChartId::AttackCheesiness],
    ),
    Document::Single(ChartId::SurgeRadar),
    Document::Single(ChartId::PpsRadar),
];

/// Number of documents a successful batch returns.
pub const DOCUMENT_COUNT: usize = DOCUMENTS.len();

/// Builds every document for `stats`, in catalogue order.
pub fn build_graphs(stats: &StatsMapping, theme: &Theme) -> Result<Vec<String>> {
    build_graphs_with(stats, theme, &BatchControl::new())
}

/// Like [`build_graphs`], checking `control` before each chart.
///
/// Either every document is returned or none is.
pub fn build_graphs_with(
    stats: &StatsMapping,
    theme: &Theme,
    control: &BatchControl,
) -> Result<Vec<String>> {
    if stats.is_empty() {
        return Err(Error::NoEntities);
    }
    let span = info_span!("build_graphs", entities = stats.len());
    let _guard = span.enter();

    let mut batch = Batch {
        entities: stats
            .iter()
            .map(|(name, record)| EntityMetrics::new(name, record))
            .collect(),
        theme,
        control,
        completed: 0,
    };

    let mut documents = Vec::with_capacity(DOCUMENT_COUNT);
    for document in &DOCUMENTS {
        let fragment = match document {
            Document::Single(id) => batch.chart(*id)?,
            Document::Grid(group, ids) => {
                let tiles = ids
                    .iter()
                    .map(|id| batch.chart(*id))
                    .collect::<Result<Vec<_>>>()?;
                compose_grid(&tiles).map_err(|source| Error::Composition {
                    group: *group,
                    source,
                })?
            }
        };
        documents.push(fragment.into_markup());
    }
    Ok(documents)
}

struct Batch<'a> {
    entities: Vec<EntityMetrics<'a>>,
    theme: &'a Theme,
    control: &'a BatchControl,
    completed: usize,
}

impl Batch<'_> {
    fn chart(&mut self, id: ChartId) -> Result<Fragment> {
        self.control.check(self.completed)?;
        let fragment = id.build(&self.entities, self.theme)?;
        self.completed += 1;
        debug!(
            chart = %id,
            width = fragment.width(),
            height = fragment.height(),
            "chart rendered"
        );
        Ok(fragment)
    }
}

fn failed(chart: ChartId) -> impl FnOnce(ChartError) -> Error {
    move |source| Error::GraphGenerationFailed { chart, source }
}

/// Two decimal places, halves toward positive infinity.
fn round2(x: f64) -> f64 {
    round_half_up(x * 100.0) / 100.0
}

fn percent(x: f64) -> f64 {
    round_half_up(x * 100.0)
}

/// `(metric key, legend label, color)`, bottom of the stack first.
type KeyDef = (&'static str, &'static str, Color);

fn series(keys: &[KeyDef]) -> Vec<SeriesKey> {
    keys.iter()
        .map(|(key, label, color)| SeriesKey::new(*key, *label, *color))
        .collect()
}

fn rows(
    entities: &[EntityMetrics<'_>],
    keys: &[KeyDef],
    value: impl Fn(&EntityMetrics<'_>, &str) -> Result<f64>,
) -> Result<Vec<CategoryRow>> {
    entities
        .iter()
        .map(|entity| {
            let values = keys
                .iter()
                .map(|(key, _, _)| value(entity, *key))
                .collect::<Result<Vec<_>>>()?;
            Ok(CategoryRow::new(entity.entity(), values))
        })
        .collect()
}

const ATTACK_KEYS: [KeyDef; 6] = [
    ("Pressure", "Pressure", BLUE),
    ("Cheese Pressure", "Cheese", PINK),
    ("Spike", "Spike", PURPLE),
    ("Cheese Spike", "Cheese Spike", VIOLET),
    ("Surge Spike", "Surge", TEAL),
    ("Surge Conflict", "Surge Conflict", GREEN),
];

fn attack_bar(
    id: ChartId,
    prefix: &str,
    entities: &[EntityMetrics<'_>],
    theme: &Theme,
) -> Result<Fragment> {
    let rows = rows(entities, &ATTACK_KEYS, |e, key| {
        e.finite(&format!("{prefix}.{key}"))
    })?;
    StackedBarSpec::new(id.title(), series(&ATTACK_KEYS))
        .with_rows(rows)
        .render(theme)
        .map_err(failed(id))
}

const CLEAR_KEYS: [KeyDef; 9] = [
    ("single", "single", RED),
    ("double", "double", YELLOW),
    ("triple", "triple", ORANGE),
    ("quad", "quad", BLUE),
    ("tspinSingle", "tss", PINK),
    ("tspinDouble", "tsd", PURPLE),
    ("tspinTriple", "tst", VIOLET),
    ("allspin", "allspin", TEAL),
    ("perfectClear", "pc", GREEN),
];

fn lineclear_bar(id: ChartId, entities: &[EntityMetrics<'_>], theme: &Theme) -> Result<Fragment> {
    let rows = rows(entities, &CLEAR_KEYS, |e, key| {
        e.finite(&format!("clearTypes.{key}"))
    })?;
    StackedBarSpec::new(id.title(), series(&CLEAR_KEYS))
        .with_rows(rows)
        .render(theme)
        .map_err(failed(id))
}

fn placement_pps(id: ChartId, entities: &[EntityMetrics<'_>], theme: &Theme) -> Result<Fragment> {
    let series = entities
        .iter()
        .map(|e| Ok((e.entity().to_owned(), merge_buckets(e.histogram("ppsSegments")?))))
        .collect::<Result<Vec<_>>>()?;
    PpsSegmentsSpec::new(id.title(), series)
        .render(theme)
        .map_err(failed(id))
}

fn well_columns(id: ChartId, entities: &[EntityMetrics<'_>], theme: &Theme) -> Result<Fragment> {
    let series = entities
        .iter()
        .map(|e| Ok((e.entity().to_owned(), e.histogram("wellColumns")?.to_vec())))
        .collect::<Result<Vec<_>>>()?;
    WellColumnsSpec::new(id.title(), series)
        .render(theme)
        .map_err(failed(id))
}

struct OverflowGroup {
    keys: [KeyDef; 3],
    ceiling: f64,
    step: f64,
    transform: fn(f64) -> f64,
}

const EFFICIENCY: OverflowGroup = OverflowGroup {
    keys: [
        ("iEfficiency", "quadEff", BLUE),
        ("tEfficiency", "tspinEff", PURPLE),
        ("allspinEfficiency", "allspinEff", GREEN),
    ],
    ceiling: 90.0,
    step: 30.0,
    transform: percent,
};

const APL: OverflowGroup = OverflowGroup {
    keys: [
        ("upstackAPL", "upstack APL", GREEN),
        ("downstackAPL", "downstack APL", RED),
        ("cheeseAPL", "cheese APL", YELLOW),
    ],
    ceiling: 3.6,
    step: 0.5,
    transform: round2,
};

const PPS_BAR: OverflowGroup = OverflowGroup {
    keys: [
        ("midgamePPS", "midgame", GREEN),
        ("PPS", "overall", RED),
        ("openerPPS", "opener", YELLOW),
    ],
    ceiling: 7.5,
    step: 0.9,
    transform: round2,
};

const APM_BAR: OverflowGroup = OverflowGroup {
    keys: [
        ("midgameAPM", "midgame", GREEN),
        ("APM", "overall", RED),
        ("openerAPM", "opener", YELLOW),
    ],
    ceiling: 300.0,
    step: 37.5,
    transform: round_half_up,
};

fn overflow_bar(
    id: ChartId,
    group: &OverflowGroup,
    entities: &[EntityMetrics<'_>],
    theme: &Theme,
) -> Result<Fragment> {
    let rows = rows(entities, &group.keys, |e, key| {
        e.finite(key).map(group.transform)
    })?;
    OverflowBarSpec::new(id.title(), series(&group.keys), group.ceiling, group.step)
        .with_rows(rows)
        .render(theme)
        .map_err(failed(id))
}

const SANKEY_NODES: [&str; 6] = [
    "IncomingAttacks",
    "Cheese",
    "Clean",
    "Cancelled",
    "CheeseTanked",
    "CleanTanked",
];

/// `(source, target, metric)`; link values are `round_half_up(metric * 100)`.
const SANKEY_LINKS: [(usize, usize, &str); 7] = [
    (0, 1, "cheeseLinesRecieved"),
    (0, 2, "cleanLinesRecieved"),
    (1, 3, "cheeseLinesCancelled"),
    (1, 4, "cheeseLinesTanked"),
    (2, 3, "cleanLinesCancelled"),
    (2, 4, "cleanLinesTankedAsCheese"),
    (2, 5, "cleanLinesTankedAsClean"),
];

fn attack_link_color(source: &str, target: &str) -> Color {
    match (source, target) {
        (_, "CleanTanked") => GREEN,
        (_, "CheeseTanked") => RED,
        ("Cheese", "Cancelled") => TEAL,
        (_, "Cancelled") => YELLOW,
        (_, "Cheese") => PURPLE,
        (_, "Clean") => PINK,
        _ => TEAL,
    }
}

fn incoming_attacks(
    id: ChartId,
    entities: &[EntityMetrics<'_>],
    theme: &Theme,
) -> Result<Fragment> {
    let instances = entities
        .iter()
        .map(|e| {
            let links = SANKEY_LINKS
                .iter()
                .map(|(source, target, key)| {
                    Ok(SankeyLink::new(*source, *target, percent(e.finite(key)?)))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(SankeyInstance::new(e.entity(), links))
        })
        .collect::<Result<Vec<_>>>()?;
    let nodes = SANKEY_NODES.iter().map(|n| (*n).to_owned()).collect();
    SankeySpec::new(nodes, attack_link_color)
        .with_instances(instances)
        .render(theme)
        .map_err(failed(id))
}

struct GaugeGroup {
    metric: &'static str,
    zones: [(&'static str, Color); 5],
}

const GAUGE_MAX: f64 = 100.0;
const GAUGE_CUTOFFS: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

const DOWNSTACKING: GaugeGroup = GaugeGroup {
    metric: "downstackingRatio",
    zones: [
        ("upstacker", TEAL),
        ("aggressive", GREEN),
        ("medium", YELLOW),
        ("defensive", ORANGE),
        ("downstacker", RED),
    ],
};

const CHEESINESS: GaugeGroup = GaugeGroup {
    metric: "attackCheesiness",
    zones: [
        ("lean", TEAL),
        ("clean", GREEN),
        ("medium", YELLOW),
        ("cheesy", ORANGE),
        ("greasy", RED),
    ],
};

fn gauge(
    id: ChartId,
    group: &GaugeGroup,
    entities: &[EntityMetrics<'_>],
    theme: &Theme,
) -> Result<Fragment> {
    let readings = entities
        .iter()
        .map(|e| Ok((e.entity().to_owned(), percent(e.finite(group.metric)?))))
        .collect::<Result<Vec<_>>>()?;
    let zones = group
        .zones
        .iter()
        .map(|(label, color)| GaugeZone::new(*label, *color))
        .collect();
    SpeedGaugeSpec::new(id.title(), GAUGE_MAX, GAUGE_CUTOFFS.to_vec(), zones)
        .with_readings(readings)
        .render(theme)
        .map_err(failed(id))
}

#[derive(Clone, Copy)]
enum AxisKind {
    Linear,
    /// Square root, small values at the rim.
    SqrtInverted,
}

struct AxisDef {
    label: &'static str,
    metric: &'static str,
    factor: f64,
    /// Lowest upper bound of the domain.
    floor: f64,
    kind: AxisKind,
}

const fn axis(label: &'static str, metric: &'static str, floor: f64) -> AxisDef {
    AxisDef {
        label,
        metric,
        factor: 1.0,
        floor,
        kind: AxisKind::Linear,
    }
}

const SURGE_AXES: [AxisDef; 6] = [
    axis("APM", "surgeAPM", 300.0),
    axis("PPS", "surgePPS", 5.0),
    axis("Length", "surgeLength", 10.0),
    AxisDef {
        factor: 100.0,
        ..axis("Rate", "surgeRate", 15.0)
    },
    AxisDef {
        kind: AxisKind::SqrtInverted,
        ..axis("Sec/DS", "surgeSecsPerDS", 20.0)
    },
    AxisDef {
        kind: AxisKind::SqrtInverted,
        ..axis("Sec/Cheese", "surgeSecsPerCheese", 40.0)
    },
];

const PPS_AXES: [AxisDef; 6] = [
    axis("PPS", "PPS", 5.0),
    axis("Plonk PPS", "PlonkPPS", 5.0),
    axis("Upstack PPS", "upstackPPS", 5.0),
    axis("PPS Variance", "PPSCoeff", 5.0),
    axis("Downstack PPS", "downstackPPS", 5.0),
    axis("Burst PPS", "BurstPPS", 5.0),
];

/// Entities with a NaN axis are passed through and dropped by the chart; they do not
/// widen any domain.
fn radar(
    id: ChartId,
    axes: &[AxisDef],
    entities: &[EntityMetrics<'_>],
    theme: &Theme,
) -> Result<Fragment> {
    let radar_entities = entities
        .iter()
        .map(|e| {
            let values = axes
                .iter()
                .map(|a| {
                    let value = e.raw(a.metric)? * a.factor;
                    if value.is_infinite() {
                        return Err(Error::NonFiniteMetric {
                            entity: e.entity().to_owned(),
                            key: a.metric.to_owned(),
                        });
                    }
                    Ok(value)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(RadarEntity::new(e.entity(), values))
        })
        .collect::<Result<Vec<_>>>()?;

    let scale_axes = axes
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let upper = radar_entities
                .iter()
                .filter(|e| !e.values.iter().any(|v| v.is_nan()))
                .filter_map(|e| e.values.get(i).copied())
                .fold(a.floor, f64::max);
            let scale: ScaleSpec = match a.kind {
                AxisKind::Linear => ScaleLinearSpec::new((0.0, upper)).into(),
                AxisKind::SqrtInverted => {
                    ScaleSpec::from(ScaleSqrtSpec::new((0.0, upper))).inverted()
                }
            };
            RadarAxis::new(a.label, scale.clamped())
        })
        .collect();

    RadarSpec::new(id.title(), scale_axes)
        .with_entities(radar_entities)
        .render(theme)
        .map_err(failed(id))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use statgraph_charts::theme::same_color;

    use super::*;
    use crate::stats::stats_from_value;

    fn player(scale: f64) -> Value {
        let spread = |n: usize| -> Vec<f64> { (0..n).map(|i| (i % 7) as f64 * scale).collect() };
        json!({
            "killStats": {
                "Pressure": 3, "Cheese Pressure": 1, "Spike": 2,
                "Cheese Spike": 0, "Surge Spike": 4, "Surge Conflict": 1
            },
            "deathStats": {
                "Pressure": 1, "Cheese Pressure": 2, "Spike": 0,
                "Cheese Spike": 1, "Surge Spike": 2, "Surge Conflict": 0
            },
            "clearTypes": {
                "single": 40, "double": 20, "triple": 5, "quad": 12,
                "tspinSingle": 3, "tspinDouble": 9, "tspinTriple": 1,
                "allspin": 2, "perfectClear": 0
            },
            "ppsSegments": spread(100),
            "wellColumns": spread(10),
            "iEfficiency": 0.4 * scale, "tEfficiency": 0.35, "allspinEfficiency": 0.1,
            "upstackAPL": 1.2, "downstackAPL": 0.8 * scale, "cheeseAPL": 0.4,
            "midgamePPS": 2.1, "PPS": 2.3 * scale, "openerPPS": 3.0,
            "midgameAPM": 90.0, "APM": 100.0 * scale, "openerAPM": 140.0,
            "cheeseLinesRecieved": 4.0, "cleanLinesRecieved": 6.0,
            "cheeseLinesCancelled": 1.5, "cheeseLinesTanked": 2.5,
            "cleanLinesCancelled": 3.0, "cleanLinesTankedAsCheese": 1.0,
            "cleanLinesTankedAsClean": 2.0,
            "downstackingRatio": 0.45, "attackCheesiness": 0.3 * scale,
            "surgeAPM": 180.0, "surgePPS": 3.1, "surgeLength": 6.0, "surgeRate": 0.08,
            "surgeSecsPerDS": 12.0, "surgeSecsPerCheese": 25.0,
            "PlonkPPS": 1.8, "upstackPPS": 2.6, "PPSCoeff": 0.4,
            "downstackPPS": 1.9, "BurstPPS": 4.2
        })
    }

    fn two_players() -> StatsMapping {
        stats_from_value(json!({ "alice": player(1.0), "bob": player(1.5) })).unwrap()
    }

    fn parse(markup: &str) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(markup).unwrap_or_else(|e| panic!("invalid svg: {e}"))
    }

    fn tiles(doc: &roxmltree::Document<'_>) -> usize {
        doc.root_element()
            .children()
            .filter(|n| n.has_tag_name("g"))
            .count()
    }

    #[test]
    fn builds_every_document_in_order() {
        let docs = build_graphs(&two_players(), &Theme::default()).unwrap();
        assert_eq!(docs.len(), DOCUMENT_COUNT, "document count");
        assert_eq!(docs.len(), 9, "nine documents");
        for (i, markup) in docs.iter().enumerate() {
            let doc = parse(markup);
            assert_eq!(doc.root_element().tag_name().name(), "svg", "document {i} root");
        }
        assert_eq!(tiles(&parse(&docs[0])), 2, "kills and deaths are tiled");
        assert_eq!(tiles(&parse(&docs[4])), 4, "four overflow bars are tiled");
        assert_eq!(tiles(&parse(&docs[6])), 2, "two gauges are tiled");

        let text = |i: usize| -> Vec<String> {
            parse(&docs[i])
                .descendants()
                .filter(|n| n.has_tag_name("text"))
                .filter_map(|n| n.text().map(str::to_owned))
                .collect()
        };
        assert!(
            text(1).iter().any(|t| t == "Lineclear Distribution"),
            "lineclear title"
        );
        assert!(text(1).iter().any(|t| t == "tsd"), "short clear names");
        assert!(text(7).iter().any(|t| t == "Sec/Cheese"), "surge axes");
        assert!(text(8).iter().any(|t| t == "PPS Variance"), "pps axes");
    }

    #[test]
    fn output_is_deterministic() {
        let theme = Theme::default();
        let stats = two_players();
        assert_eq!(
            build_graphs(&stats, &theme).unwrap(),
            build_graphs(&stats, &theme).unwrap(),
            "same input, same markup"
        );
    }

    #[test]
    fn a_single_entity_gets_well_bars() {
        let stats = stats_from_value(json!({ "alice": player(1.0) })).unwrap();
        let docs = build_graphs(&stats, &Theme::default()).unwrap();
        let wells = parse(&docs[3]);
        assert!(
            wells.descendants().filter(|n| n.has_tag_name("rect")).count() >= 10,
            "one bar per column"
        );
    }

    #[test]
    fn empty_mapping_is_rejected() {
        let err = build_graphs(&StatsMapping::new(), &Theme::default()).unwrap_err();
        assert!(matches!(err, Error::NoEntities), "got {err:?}");
    }

    #[test]
    fn missing_and_non_finite_metrics_fail_the_batch() {
        let mut alice = player(1.0);
        alice["clearTypes"]
            .as_object_mut()
            .unwrap()
            .remove("quad");
        let stats = stats_from_value(json!({ "alice": alice })).unwrap();
        match build_graphs(&stats, &Theme::default()) {
            Err(Error::MissingMetric { entity, key }) => {
                assert_eq!((entity.as_str(), key.as_str()), ("alice", "clearTypes.quad"), "which");
            }
            other => panic!("expected MissingMetric, got {other:?}"),
        }

        let mut bob = player(1.0);
        bob["APM"] = Value::Null;
        let stats = stats_from_value(json!({ "bob": bob })).unwrap();
        assert!(
            matches!(
                build_graphs(&stats, &Theme::default()),
                Err(Error::NonFiniteMetric { ref key, .. }) if key == "APM"
            ),
            "null APM cannot be drawn"
        );
    }

    #[test]
    fn radar_drops_nan_entities_only() {
        let mut bob = player(2.0);
        bob["surgeSecsPerDS"] = Value::Null;
        let stats = stats_from_value(json!({ "alice": player(1.0), "bob": bob })).unwrap();
        let docs = build_graphs(&stats, &Theme::default()).unwrap();
        let polygons = |i: usize| {
            parse(&docs[i])
                .descendants()
                .filter(|n| n.has_tag_name("polygon") && n.attribute("fill-opacity").is_some())
                .count()
        };
        assert!(polygons(8) > polygons(7), "bob is drawn on the PPS radar only");
    }

    #[test]
    fn a_lone_entity_without_surges_keeps_the_batch() {
        let mut alice = player(1.0);
        alice["surgeSecsPerCheese"] = Value::Null;
        let stats = stats_from_value(json!({ "alice": alice })).unwrap();
        let docs = build_graphs(&stats, &Theme::default()).unwrap();
        assert_eq!(docs.len(), DOCUMENT_COUNT, "no document is lost");
        let polygons = |i: usize| {
            parse(&docs[i])
                .descendants()
                .filter(|n| n.has_tag_name("polygon") && n.attribute("fill-opacity").is_some())
                .count()
        };
        assert_eq!(polygons(7), 0, "empty surge radar");
        assert_eq!(polygons(8), 1, "alice on the PPS radar");
        assert!(docs[7].contains("Surge"), "the frame and caption are still drawn");
    }

    #[test]
    fn chart_failures_name_the_chart() {
        let mut alice = player(1.0);
        alice["ppsSegments"] = json!([0.0, 0.0, 0.0, 0.0]);
        let stats = stats_from_value(json!({ "alice": alice })).unwrap();
        let err = build_graphs(&stats, &Theme::default()).unwrap_err();
        assert!(
            matches!(
                err,
                Error::GraphGenerationFailed { chart: ChartId::PlacementPps, .. }
            ),
            "got {err:?}"
        );
        assert_eq!(err.to_string(), "failed to generate the Placement PPS graph", "message");
        assert!(core::error::Error::source(&err).is_some(), "keeps the chart error");
    }

    #[test]
    fn cancelled_batches_return_nothing() {
        let control = BatchControl::new();
        control.cancel();
        let err = build_graphs_with(&two_players(), &Theme::default(), &control).unwrap_err();
        assert!(matches!(err, Error::Cancelled), "got {err:?}");
    }

    #[test]
    fn link_colors_follow_the_target_first() {
        assert!(same_color(attack_link_color("Clean", "CleanTanked"), GREEN), "clean tanked");
        assert!(same_color(attack_link_color("Cheese", "CheeseTanked"), RED), "cheese tanked");
        assert!(same_color(attack_link_color("Cheese", "Cancelled"), TEAL), "cheese cancelled");
        assert!(same_color(attack_link_color("Clean", "Cancelled"), YELLOW), "clean cancelled");
        assert!(same_color(attack_link_color("IncomingAttacks", "Cheese"), PURPLE), "to cheese");
        assert!(same_color(attack_link_color("IncomingAttacks", "Clean"), PINK), "to clean");
        assert!(same_color(attack_link_color("Cancelled", "Elsewhere"), TEAL), "fallback");
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(percent(0.125), 13.0, "half up");
        assert_eq!(round2(-0.125), -0.12, "negative half up");
        assert_eq!(round2(1.234), 1.23, "two places");
        assert_eq!(percent(0.456), 46.0, "percent");
    }

    #[test]
    fn chart_names() {
        assert_eq!(ChartId::Efficiency.to_string(), "Efficiency", "untitled bars still display");
        assert_eq!(ChartId::Efficiency.title(), "", "but draw no caption");
        assert_eq!(ChartId::SurgeRadar.to_string(), "Surge", "radar");
    }
}
