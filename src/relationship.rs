//! Relationship detection between charts
//!
//! Charts are related when the data columns they visualize overlap. Four
//! detectors classify every unordered pair of charts that carry a data
//! binding; the resulting edges drive grouping and strategy selection.
//! Nothing here decides content, only how existing content relates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arrange::Strategy;
use crate::config::LayoutConfig;
use crate::model::{DataBinding, DataBound, ElementType};
use crate::union_find::UnionFind;

/// Dimension names that mark a chart as time-based
pub const TEMPORAL_KEYWORDS: [&str; 7] = ["date", "time", "month", "year", "quarter", "week", "day"];

/// Fewest KPIs that turn a batch into a KPI dashboard
const DASHBOARD_MIN_KPIS: usize = 3;

/// Largest batch still laid out as a temporal flow
const FLOW_MAX_ELEMENTS: usize = 4;

/// Typed payload of a relationship edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// Shared columns; `strength` is shared columns over the source's columns
    DataOverlap {
        shared_dimensions: Vec<String>,
        shared_measures: Vec<String>,
        strength: f64,
    },
    /// Drill-down from `child` (more dimensions) to `parent` (a strict subset)
    Hierarchical { parent: String, child: String },
    /// Both charts are broken down over time
    Temporal,
    /// Same metric, disjoint slicing
    Comparison { compared_metrics: Vec<String> },
}

/// A typed edge between two element ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: RelationshipKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }

    /// Whether the edge joins `a` and `b`, in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn involves(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    pub fn is_data_overlap(&self) -> bool {
        matches!(self.kind, RelationshipKind::DataOverlap { .. })
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self.kind, RelationshipKind::Comparison { .. })
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self.kind, RelationshipKind::Temporal)
    }

    /// Strength of a data-overlap edge
    pub fn strength(&self) -> Option<f64> {
        match self.kind {
            RelationshipKind::DataOverlap { strength, .. } => Some(strength),
            _ => None,
        }
    }
}

/// How a group was formed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKind {
    DataOverlap,
    Comparison,
    Singleton,
}

/// Elements selected for joint layout treatment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    pub members: Vec<String>,
    pub relationships: Vec<Relationship>,
}

/// Strategy picked by the decision table, with a machine-readable reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategySuggestion {
    pub strategy: Strategy,
    pub reason: &'static str,
}

/// Charts with a data binding, in input order
fn bound_charts<T: DataBound>(elements: &[T]) -> Vec<(&str, &DataBinding)> {
    elements
        .iter()
        .filter(|e| e.element_type() == ElementType::Chart)
        .filter_map(|e| e.data().map(|data| (e.id(), data)))
        .collect()
}

fn column_set(columns: &[String]) -> BTreeSet<&str> {
    columns.iter().map(String::as_str).collect()
}

fn shared(a: &[String], b: &[String]) -> Vec<String> {
    column_set(a)
        .intersection(&column_set(b))
        .map(|s| s.to_string())
        .collect()
}

/// Run every detector over all chart pairs
pub fn detect_relationships<T: DataBound>(elements: &[T]) -> Vec<Relationship> {
    let mut relationships = detect_data_relationships(elements);
    relationships.extend(detect_hierarchical_relationships(elements));
    relationships.extend(detect_temporal_relationships(elements));
    relationships.extend(detect_comparison_relationships(elements));
    relationships
}

/// Pairs of charts sharing at least one dimension or measure.
///
/// Shared column lists are sorted, so swapping the pair never changes them.
pub fn detect_data_relationships<T: DataBound>(elements: &[T]) -> Vec<Relationship> {
    let charts = bound_charts(elements);
    let mut relationships = Vec::new();

    for (i, (id_a, a)) in charts.iter().enumerate() {
        for (id_b, b) in &charts[i + 1..] {
            let shared_dimensions = shared(&a.dimensions, &b.dimensions);
            let shared_measures = shared(&a.measures, &b.measures);
            if shared_dimensions.is_empty() && shared_measures.is_empty() {
                continue;
            }

            let columns = a.column_count();
            let strength = if columns == 0 {
                0.0
            } else {
                ((shared_dimensions.len() + shared_measures.len()) as f64 / columns as f64)
                    .clamp(0.0, 1.0)
            };

            relationships.push(Relationship::new(
                *id_a,
                *id_b,
                RelationshipKind::DataOverlap {
                    shared_dimensions,
                    shared_measures,
                    strength,
                },
            ));
        }
    }

    relationships
}

/// Drill-down pairs: one chart's dimensions are a strict, non-empty subset of the other's
pub fn detect_hierarchical_relationships<T: DataBound>(elements: &[T]) -> Vec<Relationship> {
    let charts = bound_charts(elements);
    let mut relationships = Vec::new();

    for (i, (id_a, a)) in charts.iter().enumerate() {
        for (id_b, b) in &charts[i + 1..] {
            let dims_a = column_set(&a.dimensions);
            let dims_b = column_set(&b.dimensions);
            if dims_a.is_disjoint(&dims_b) {
                continue;
            }

            let (child, parent) = if dims_b.len() < dims_a.len() && dims_b.is_subset(&dims_a) {
                (*id_a, *id_b)
            } else if dims_a.len() < dims_b.len() && dims_a.is_subset(&dims_b) {
                (*id_b, *id_a)
            } else {
                continue;
            };

            relationships.push(Relationship::new(
                child,
                parent,
                RelationshipKind::Hierarchical {
                    parent: parent.to_string(),
                    child: child.to_string(),
                },
            ));
        }
    }

    relationships
}

/// Whether a dimension name looks like a time axis
pub fn is_temporal_dimension(name: &str) -> bool {
    let lower = name.to_lowercase();
    TEMPORAL_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Every pair of charts that both have a temporal dimension
pub fn detect_temporal_relationships<T: DataBound>(elements: &[T]) -> Vec<Relationship> {
    let temporal: Vec<&str> = bound_charts(elements)
        .into_iter()
        .filter(|(_, data)| data.dimensions.iter().any(|d| is_temporal_dimension(d)))
        .map(|(id, _)| id)
        .collect();

    let mut relationships = Vec::new();
    for (i, a) in temporal.iter().enumerate() {
        for b in &temporal[i + 1..] {
            relationships.push(Relationship::new(*a, *b, RelationshipKind::Temporal));
        }
    }
    relationships
}

/// Whether a binding describes the distribution of a single measure.
///
/// Two shapes count: no dimension and one measure other than `count`, or the
/// binned form with the single dimension `bin` and the measure `count`.
pub fn is_measure_histogram(data: &DataBinding) -> bool {
    match (data.dimensions.as_slice(), data.measures.as_slice()) {
        ([], [measure]) => measure != "count",
        ([dimension], [measure]) => dimension == "bin" && measure == "count",
        _ => false,
    }
}

/// Charts sharing a measure but no dimension: same metric, different slice.
///
/// Histograms are never comparison candidates; their bins are not a slice.
pub fn detect_comparison_relationships<T: DataBound>(elements: &[T]) -> Vec<Relationship> {
    let charts: Vec<(&str, &DataBinding)> = bound_charts(elements)
        .into_iter()
        .filter(|(_, data)| !is_measure_histogram(data))
        .collect();
    let mut relationships = Vec::new();

    for (i, (id_a, a)) in charts.iter().enumerate() {
        for (id_b, b) in &charts[i + 1..] {
            let compared_metrics = shared(&a.measures, &b.measures);
            if compared_metrics.is_empty() || !shared(&a.dimensions, &b.dimensions).is_empty() {
                continue;
            }
            relationships.push(Relationship::new(
                *id_a,
                *id_b,
                RelationshipKind::Comparison { compared_metrics },
            ));
        }
    }

    relationships
}

/// Greedy grouping of elements for joint layout.
///
/// Strong data-overlap edges (strength above the configured threshold) are
/// merged first; comparison edges then join elements still ungrouped; every
/// remaining element becomes a singleton. Groups are numbered in creation order.
pub fn suggest_groupings<T: DataBound>(
    elements: &[T],
    relationships: &[Relationship],
    config: &LayoutConfig,
) -> Vec<Group> {
    let ids: Vec<&str> = elements.iter().map(DataBound::id).collect();
    let index_of = |id: &str| ids.iter().position(|candidate| *candidate == id);
    let edges = |keep: &dyn Fn(&Relationship) -> bool| -> Vec<(usize, usize)> {
        relationships
            .iter()
            .filter(|r| keep(r))
            .filter_map(|r| Some((index_of(&r.source)?, index_of(&r.target)?)))
            .filter(|(a, b)| a != b)
            .collect()
    };

    let mut grouped = vec![false; ids.len()];
    let mut groups: Vec<Group> = Vec::new();

    let threshold = config.grouping_strength_threshold;
    let strong = edges(&|r: &Relationship| r.strength().is_some_and(|s| s > threshold));
    collect_groups(&strong, &ids, relationships, GroupKind::DataOverlap, &mut grouped, &mut groups);

    let comparisons: Vec<(usize, usize)> = edges(&|r: &Relationship| r.is_comparison())
        .into_iter()
        .filter(|(a, b)| !grouped[*a] && !grouped[*b])
        .collect();
    collect_groups(&comparisons, &ids, relationships, GroupKind::Comparison, &mut grouped, &mut groups);

    for (i, id) in ids.iter().enumerate() {
        if !grouped[i] {
            grouped[i] = true;
            let members = vec![id.to_string()];
            groups.push(Group {
                id: format!("group-{}", groups.len() + 1),
                kind: GroupKind::Singleton,
                relationships: Vec::new(),
                members,
            });
        }
    }

    groups
}

/// Union the edge endpoints and append one group per multi-member component
fn collect_groups(
    edges: &[(usize, usize)],
    ids: &[&str],
    relationships: &[Relationship],
    kind: GroupKind,
    grouped: &mut [bool],
    groups: &mut Vec<Group>,
) {
    let mut uf = UnionFind::new(ids.len());
    for &(a, b) in edges {
        uf.union(a, b);
    }

    for component in uf.components() {
        if component.len() < 2 {
            continue;
        }
        let members: Vec<String> = component.iter().map(|&i| ids[i].to_string()).collect();
        for &i in &component {
            grouped[i] = true;
        }
        let internal = relationships
            .iter()
            .filter(|r| members.contains(&r.source) && members.contains(&r.target))
            .cloned()
            .collect();
        groups.push(Group {
            id: format!("group-{}", groups.len() + 1),
            kind,
            members,
            relationships: internal,
        });
    }
}

/// Share of id pairs joined by at least one relationship, in [0, 1].
///
/// Sets with fewer than two distinct ids score 0.
pub fn calculate_grouping_score<S: AsRef<str>>(ids: &[S], relationships: &[Relationship]) -> f64 {
    let mut distinct: Vec<&str> = Vec::new();
    for id in ids {
        if !distinct.contains(&id.as_ref()) {
            distinct.push(id.as_ref());
        }
    }
    let n = distinct.len();
    if n < 2 {
        return 0.0;
    }

    let mut realized = 0usize;
    for (i, a) in distinct.iter().enumerate() {
        for b in &distinct[i + 1..] {
            if relationships.iter().any(|r| r.connects(a, b)) {
                realized += 1;
            }
        }
    }
    let possible = n * (n - 1) / 2;
    realized as f64 / possible as f64
}

/// Pick a strategy for a batch, detecting relationships first
pub fn suggest_layout_strategy<T: DataBound>(elements: &[T]) -> StrategySuggestion {
    let relationships = detect_relationships(elements);
    suggest_layout_strategy_with(elements, &relationships)
}

/// Decision table over element counts and already-detected relationships
pub fn suggest_layout_strategy_with<T: DataBound>(
    elements: &[T],
    relationships: &[Relationship],
) -> StrategySuggestion {
    let count_of = |kind: ElementType| elements.iter().filter(|e| e.element_type() == kind).count();
    let kpis = count_of(ElementType::Kpi);
    let charts = count_of(ElementType::Chart);

    let (strategy, reason) = if kpis >= DASHBOARD_MIN_KPIS && charts >= 1 {
        (Strategy::KpiDashboard, "kpi-with-charts")
    } else if relationships.iter().any(Relationship::is_comparison) {
        (Strategy::Comparison, "comparison-relationship")
    } else if relationships.iter().any(Relationship::is_temporal) && elements.len() <= FLOW_MAX_ELEMENTS
    {
        (Strategy::Flow, "temporal-sequence")
    } else if elements.len() == 2 && relationships.iter().any(Relationship::is_data_overlap) {
        (Strategy::Hero, "related-pair")
    } else {
        (Strategy::Grid, "default")
    };

    debug!(strategy = %strategy, reason, kpis, charts, "suggested layout strategy");
    StrategySuggestion { strategy, reason }
}
