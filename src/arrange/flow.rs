//! Sequential arrangement along one axis

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::model::PendingElement;

use super::{sized_elements, ArrangeOptions, FlowDirection, LayoutPlan, PlanEntry, Strategy};

/// Place elements one after another; each step advances by the previous
/// element's extent along the axis plus the gap.
pub fn arrange_flow(
    elements: &[PendingElement],
    options: &ArrangeOptions,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    let sized = sized_elements(elements, config)?;
    let gap = options.spacing(config);
    let origin = options.origin();
    let direction = options.direction();

    let mut plan = LayoutPlan::new(Strategy::Flow);
    let mut offset = 0.0;
    for (element, size) in sized {
        let position = match direction {
            FlowDirection::Horizontal => origin.offset(offset, 0.0),
            FlowDirection::Vertical => origin.offset(0.0, offset),
        };
        offset += match direction {
            FlowDirection::Horizontal => size.width,
            FlowDirection::Vertical => size.height,
        } + gap;
        plan.push(PlanEntry::new(element, position, size));
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::model::ElementType;

    fn batch() -> Vec<PendingElement> {
        vec![
            PendingElement::new("a", ElementType::Kpi),
            PendingElement::new("b", ElementType::Chart),
            PendingElement::new("c", ElementType::Textbox).with_size(100.0, 40.0),
        ]
    }

    #[test]
    fn test_horizontal_flow() {
        let config = LayoutConfig::default();
        let plan = arrange_flow(&batch(), &ArrangeOptions::default(), &config).unwrap();
        assert_eq!(plan.position_of("a"), Some(Point::new(0.0, 0.0)));
        assert_eq!(plan.position_of("b"), Some(Point::new(290.0, 0.0)));
        assert_eq!(plan.position_of("c"), Some(Point::new(1140.0, 0.0)));
        assert!(plan.is_collision_free());
    }

    #[test]
    fn test_vertical_flow() {
        let config = LayoutConfig::default();
        let options = ArrangeOptions::new()
            .with_direction(FlowDirection::Vertical)
            .with_gap(10.0)
            .with_start(5.0, 5.0);
        let plan = arrange_flow(&batch(), &options, &config).unwrap();
        assert_eq!(plan.position_of("a"), Some(Point::new(5.0, 5.0)));
        assert_eq!(plan.position_of("b"), Some(Point::new(5.0, 135.0)));
        assert_eq!(plan.position_of("c"), Some(Point::new(5.0, 545.0)));
    }
}
