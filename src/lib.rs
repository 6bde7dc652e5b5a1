//! Canvas Layout - spatial layout and relationship engine for dashboard canvases
//!
//! This library analyzes a snapshot of placed dashboard elements, detects how
//! charts relate through the data columns they show, arranges batches of new
//! elements with one of five strategies, and finds collision-free positions
//! for single elements.
//!
//! # Example
//!
//! ```rust
//! use canvas_layout::{plan_batch, BatchRequest, ElementType, LayoutConfig, PendingElement, Strategy};
//!
//! let pending = vec![
//!     PendingElement::new("revenue", ElementType::Kpi),
//!     PendingElement::new("orders", ElementType::Kpi),
//!     PendingElement::new("margin", ElementType::Kpi),
//!     PendingElement::new("trend", ElementType::Chart),
//! ];
//! let batch = plan_batch(&pending, &BatchRequest::default(), &LayoutConfig::default()).unwrap();
//! assert_eq!(batch.strategy, Strategy::KpiDashboard);
//! assert_eq!(batch.plan.len(), 4);
//! ```

pub mod arrange;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod placement;
pub mod relationship;
pub mod snapshot;
pub mod spatial;

mod union_find;

pub use arrange::{arrange, arrange_by_name, ArrangeOptions, FlowDirection, LayoutPlan, PlanEntry, Strategy};
pub use config::LayoutConfig;
pub use error::{ConfigError, LayoutError};
pub use geometry::{Point, Rect, Size};
pub use model::{
    AnnotationRegion, DataBinding, DataBound, Element, ElementRecord, ElementType, PendingElement,
    Viewport,
};
pub use placement::{
    anchor_plan_below, find_optimal_position, get_default_position, Anchor, Placement,
    PlacementSource,
};
pub use relationship::{
    detect_relationships, suggest_groupings, suggest_layout_strategy, Group, GroupKind,
    Relationship, RelationshipKind, StrategySuggestion,
};
pub use snapshot::{CanvasSnapshot, CanvasSnapshotProvider};
pub use spatial::{analyze_canvas, SpatialAnalysis};

use serde::{Deserialize, Serialize};
use tracing::debug;

use relationship::suggest_layout_strategy_with;

/// Reason reported when the caller picked the strategy
pub const CALLER_OVERRIDE_REASON: &str = "caller-override";

/// How a batch should be arranged
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchRequest {
    /// Forced strategy; wins over `strategy_name`
    pub strategy: Option<Strategy>,
    /// Strategy by name; unknown names fall back to grid
    pub strategy_name: Option<String>,
    pub options: ArrangeOptions,
}

impl BatchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a strategy instead of the suggested one
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Force a strategy by name
    pub fn with_strategy_name(mut self, name: impl Into<String>) -> Self {
        self.strategy_name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: ArrangeOptions) -> Self {
        self.options = options;
        self
    }

    fn forced_strategy(&self) -> Option<Strategy> {
        self.strategy.or_else(|| {
            self.strategy_name
                .as_deref()
                .map(Strategy::from_name_or_default)
        })
    }
}

/// Everything decided for one batch of new elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub strategy: Strategy,
    pub reason: String,
    pub relationships: Vec<Relationship>,
    pub groups: Vec<Group>,
    pub plan: LayoutPlan,
}

/// Relate, group, pick a strategy for and arrange a batch of new elements
///
/// # Example
///
/// ```rust
/// use canvas_layout::{plan_batch, BatchRequest, ElementType, LayoutConfig, PendingElement, Point};
///
/// let pending: Vec<_> = (0..3)
///     .map(|i| PendingElement::new(format!("c{}", i), ElementType::Chart))
///     .collect();
/// let request = BatchRequest::new().with_strategy_name("grid");
/// let batch = plan_batch(&pending, &request, &LayoutConfig::default()).unwrap();
///
/// assert_eq!(batch.reason, "caller-override");
/// assert_eq!(batch.plan.position_of("c2"), Some(Point::new(0.0, 450.0)));
/// ```
pub fn plan_batch(
    pending: &[PendingElement],
    request: &BatchRequest,
    config: &LayoutConfig,
) -> Result<BatchPlan, LayoutError> {
    let relationships = detect_relationships(pending);
    let groups = suggest_groupings(pending, &relationships, config);

    let (strategy, reason) = match request.forced_strategy() {
        Some(strategy) => (strategy, CALLER_OVERRIDE_REASON.to_string()),
        None => {
            let suggestion = suggest_layout_strategy_with(pending, &relationships);
            (suggestion.strategy, suggestion.reason.to_string())
        }
    };

    let plan = arrange(strategy, pending, &request.options, config)?;
    debug!(
        strategy = %strategy,
        entries = plan.len(),
        relationships = relationships.len(),
        groups = groups.len(),
        "planned batch"
    );

    Ok(BatchPlan {
        strategy,
        reason,
        relationships,
        groups,
        plan,
    })
}

/// [`plan_batch`], then move the plan below the elements already on the canvas
pub fn place_batch(
    pending: &[PendingElement],
    request: &BatchRequest,
    elements: &[Element],
    config: &LayoutConfig,
) -> Result<BatchPlan, LayoutError> {
    let mut batch = plan_batch(pending, request, config)?;
    batch.plan = anchor_plan_below(&batch.plan, elements, config);
    Ok(batch)
}
