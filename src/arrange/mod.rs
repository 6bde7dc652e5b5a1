//! Arrangement strategies for batches of new elements
//!
//! A strategy turns a list of pending elements into a [`LayoutPlan`]: one
//! position and size per element, with no two entries overlapping. Plans
//! only account for their own entries; keeping clear of elements already on
//! the canvas is the placement finder's job.

pub mod comparison;
pub mod dashboard;
pub mod flow;
pub mod grid;
pub mod hero;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::{bounding_box, rectangles_overlap, Point, Rect, Size};
use crate::model::{ElementType, PendingElement};

pub use comparison::arrange_comparison;
pub use dashboard::arrange_kpi_dashboard;
pub use flow::arrange_flow;
pub use grid::arrange_grid;
pub use hero::arrange_hero;

/// The closed set of arrangement algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Grid,
    Hero,
    Flow,
    Comparison,
    KpiDashboard,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Grid,
        Strategy::Hero,
        Strategy::Flow,
        Strategy::Comparison,
        Strategy::KpiDashboard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Grid => "grid",
            Strategy::Hero => "hero",
            Strategy::Flow => "flow",
            Strategy::Comparison => "comparison",
            Strategy::KpiDashboard => "kpi-dashboard",
        }
    }

    /// Parse a strategy name, falling back to [`Strategy::Grid`] with a warning
    pub fn from_name_or_default(name: &str) -> Strategy {
        name.parse().unwrap_or_else(|_| {
            warn!(name, "unknown layout strategy, falling back to grid");
            Strategy::Grid
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == normalized)
            .ok_or_else(|| format!("unknown layout strategy '{}'", s))
    }
}

/// Axis of a flow layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl FromStr for FlowDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "row" => Ok(FlowDirection::Horizontal),
            "vertical" | "column" | "col" => Ok(FlowDirection::Vertical),
            other => Err(format!("unknown flow direction '{}'", other)),
        }
    }
}

/// Caller-supplied knobs; unset values come from [`LayoutConfig`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeOptions {
    pub cols: Option<usize>,
    pub gap: Option<f64>,
    pub direction: Option<FlowDirection>,
    pub start_x: Option<f64>,
    pub start_y: Option<f64>,
}

impl ArrangeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn with_direction(mut self, direction: FlowDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_start(mut self, x: f64, y: f64) -> Self {
        self.start_x = Some(x);
        self.start_y = Some(y);
        self
    }

    /// Column count, at least 1
    pub fn columns(&self, config: &LayoutConfig) -> usize {
        self.cols.unwrap_or(config.grid_columns).max(1)
    }

    /// Spacing; negative values collapse to 0 and non-finite ones to the default
    pub fn spacing(&self, config: &LayoutConfig) -> f64 {
        match self.gap {
            Some(gap) if gap.is_finite() => gap.max(0.0),
            _ => config.gap,
        }
    }

    pub fn direction(&self) -> FlowDirection {
        self.direction.unwrap_or_default()
    }

    /// Top-left of the plan; unset or non-finite coordinates become 0
    pub fn origin(&self) -> Point {
        let coord = |value: Option<f64>| value.filter(|v| v.is_finite()).unwrap_or(0.0);
        Point::new(coord(self.start_x), coord(self.start_y))
    }
}

/// Where one element goes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub element_ref: String,
    pub element_type: ElementType,
    pub position: Point,
    pub size: Size,
}

impl PlanEntry {
    pub fn new(element: &PendingElement, position: Point, size: Size) -> Self {
        Self {
            element_ref: element.id.clone(),
            element_type: element.element_type,
            position,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin(self.position, self.size)
    }
}

/// Output of an arrangement strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub strategy: Strategy,
    pub entries: Vec<PlanEntry>,
}

impl LayoutPlan {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: PlanEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter()
    }

    /// Entry for an element id
    pub fn entry(&self, element_ref: &str) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.element_ref == element_ref)
    }

    pub fn position_of(&self, element_ref: &str) -> Option<Point> {
        self.entry(element_ref).map(|e| e.position)
    }

    /// Bounding box of all entries; zero for an empty plan
    pub fn bounds(&self) -> Rect {
        bounding_box(self.entries.iter().map(PlanEntry::rect))
    }

    /// The same plan shifted by an offset
    pub fn translate(&self, dx: f64, dy: f64) -> LayoutPlan {
        LayoutPlan {
            strategy: self.strategy,
            entries: self
                .entries
                .iter()
                .map(|e| PlanEntry {
                    position: e.position.offset(dx, dy),
                    ..e.clone()
                })
                .collect(),
        }
    }

    /// Pairs of entries whose rectangles overlap
    pub fn overlapping_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                if rectangles_overlap(&a.rect(), &b.rect()) {
                    pairs.push((a.element_ref.clone(), b.element_ref.clone()));
                }
            }
        }
        pairs
    }

    pub fn is_collision_free(&self) -> bool {
        self.overlapping_pairs().is_empty()
    }
}

/// Run the given strategy
pub fn arrange(
    strategy: Strategy,
    elements: &[PendingElement],
    options: &ArrangeOptions,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    match strategy {
        Strategy::Grid => arrange_grid(elements, options, config),
        Strategy::Hero => arrange_hero(elements, options, config),
        Strategy::Flow => arrange_flow(elements, options, config),
        Strategy::Comparison => arrange_comparison(elements, options, config),
        Strategy::KpiDashboard => arrange_kpi_dashboard(elements, options, config),
    }
}

/// Run a strategy by name; unknown names fall back to grid
pub fn arrange_by_name(
    name: &str,
    elements: &[PendingElement],
    options: &ArrangeOptions,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    arrange(Strategy::from_name_or_default(name), elements, options, config)
}

/// Pair every element with its resolved size
pub(crate) fn sized_elements<'a>(
    elements: &'a [PendingElement],
    config: &LayoutConfig,
) -> Result<Vec<(&'a PendingElement, Size)>, LayoutError> {
    elements
        .iter()
        .map(|e| e.resolved_size(config).map(|size| (e, size)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charts(n: usize) -> Vec<PendingElement> {
        (0..n)
            .map(|i| PendingElement::new(format!("c{}", i), ElementType::Chart))
            .collect()
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("KPI_Dashboard".parse::<Strategy>(), Ok(Strategy::KpiDashboard));
    }

    #[test]
    fn test_unknown_strategy_falls_back_to_grid() {
        assert!("mosaic".parse::<Strategy>().is_err());
        assert_eq!(Strategy::from_name_or_default("mosaic"), Strategy::Grid);
    }

    #[test]
    fn test_arrange_by_unknown_name_is_grid() {
        let config = LayoutConfig::default();
        let elements = charts(3);
        let plan = arrange_by_name("spiral", &elements, &ArrangeOptions::default(), &config).unwrap();
        let grid = arrange_grid(&elements, &ArrangeOptions::default(), &config).unwrap();
        assert_eq!(plan, grid);
    }

    #[test]
    fn test_every_strategy_keeps_every_element() {
        let config = LayoutConfig::default();
        let mut elements = charts(3);
        elements.push(PendingElement::new("k1", ElementType::Kpi));
        elements.push(PendingElement::new("t1", ElementType::Textbox));
        elements.push(PendingElement::new("tab", ElementType::Table));

        for strategy in Strategy::ALL {
            let plan = arrange(strategy, &elements, &ArrangeOptions::default(), &config).unwrap();
            assert_eq!(plan.len(), elements.len(), "{} dropped elements", strategy);
            assert!(plan.is_collision_free(), "{} overlaps: {:?}", strategy, plan.overlapping_pairs());
            assert_eq!(plan.strategy, strategy);
        }
    }

    #[test]
    fn test_every_strategy_handles_empty_batch() {
        let config = LayoutConfig::default();
        for strategy in Strategy::ALL {
            let plan = arrange(strategy, &[], &ArrangeOptions::default(), &config).unwrap();
            assert!(plan.is_empty());
            assert_eq!(plan.bounds(), Rect::zero());
        }
    }

    #[test]
    fn test_non_finite_start_falls_back_to_zero() {
        let config = LayoutConfig::default();
        let elements = charts(3);
        let options = ArrangeOptions::new().with_start(f64::NAN, 10.0);
        assert_eq!(options.origin(), Point::new(0.0, 10.0));
        let options = ArrangeOptions::new().with_start(f64::INFINITY, f64::NEG_INFINITY);
        assert_eq!(options.origin(), Point::zero());

        for strategy in Strategy::ALL {
            let plan = arrange(strategy, &elements, &options, &config).unwrap();
            assert!(plan.iter().all(|e| e.position.x.is_finite() && e.position.y.is_finite()));
            assert_eq!(plan.bounds().origin(), Point::zero(), "{}", strategy);
            assert!(plan.is_collision_free());
        }
    }

    #[test]
    fn test_negative_estimated_size_is_rejected() {
        let config = LayoutConfig::default();
        let elements = vec![PendingElement::new("bad", ElementType::Chart).with_size(-10.0, 100.0)];
        for strategy in Strategy::ALL {
            let result = arrange(strategy, &elements, &ArrangeOptions::default(), &config);
            assert!(matches!(result, Err(LayoutError::InvalidSize { .. })));
        }
    }

    #[test]
    fn test_plan_translate_and_overlaps() {
        let config = LayoutConfig::default();
        let plan = arrange_grid(&charts(2), &ArrangeOptions::default(), &config).unwrap();
        let moved = plan.translate(100.0, 50.0);
        assert_eq!(moved.position_of("c0"), Some(Point::new(100.0, 50.0)));
        assert_eq!(moved.bounds().x, 100.0);

        let mut clashing = plan.clone();
        clashing.entries[1].position = Point::new(10.0, 10.0);
        assert_eq!(
            clashing.overlapping_pairs(),
            vec![("c0".to_string(), "c1".to_string())]
        );
    }

    #[test]
    fn test_options_resolution() {
        let config = LayoutConfig::default();
        let options = ArrangeOptions::new().with_cols(0).with_gap(-5.0);
        assert_eq!(options.columns(&config), 1);
        assert_eq!(options.spacing(&config), 0.0);
        assert_eq!(ArrangeOptions::default().spacing(&config), 50.0);
        assert_eq!(ArrangeOptions::new().with_gap(f64::NAN).spacing(&config), 50.0);
        assert_eq!(ArrangeOptions::default().direction(), FlowDirection::Horizontal);
    }
}
