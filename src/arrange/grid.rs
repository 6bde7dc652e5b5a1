//! Row-major grid arrangement

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::Size;
use crate::model::PendingElement;

use super::{sized_elements, ArrangeOptions, LayoutPlan, PlanEntry, Strategy};

/// Place elements left to right, top to bottom.
///
/// Every cell has the size of the largest element in the batch, so mixed
/// element types never overlap. The i-th element lands at
/// `(start_x + (i % cols) * (cell_w + gap), start_y + (i / cols) * (cell_h + gap))`.
pub fn arrange_grid(
    elements: &[PendingElement],
    options: &ArrangeOptions,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    let sized = sized_elements(elements, config)?;
    let cols = options.columns(config);
    let gap = options.spacing(config);
    let origin = options.origin();
    let cell = sized
        .iter()
        .fold(Size::default(), |acc, (_, size)| acc.max(size));

    let mut plan = LayoutPlan::new(Strategy::Grid);
    for (i, (element, size)) in sized.into_iter().enumerate() {
        let col = (i % cols) as f64;
        let row = (i / cols) as f64;
        let position = origin.offset(col * (cell.width + gap), row * (cell.height + gap));
        plan.push(PlanEntry::new(element, position, size));
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::model::ElementType;

    #[test]
    fn test_three_columns_wrap() {
        let config = LayoutConfig::default();
        let elements: Vec<_> = (0..4)
            .map(|i| PendingElement::new(format!("k{}", i), ElementType::Kpi))
            .collect();
        let plan = arrange_grid(&elements, &ArrangeOptions::new().with_cols(3).with_gap(10.0), &config)
            .unwrap();

        assert_eq!(plan.position_of("k2"), Some(Point::new(500.0, 0.0)));
        assert_eq!(plan.position_of("k3"), Some(Point::new(0.0, 130.0)));
    }

    #[test]
    fn test_mixed_sizes_use_largest_cell() {
        let config = LayoutConfig::default();
        let elements = vec![
            PendingElement::new("kpi", ElementType::Kpi),
            PendingElement::new("chart", ElementType::Chart),
        ];
        let plan = arrange_grid(&elements, &ArrangeOptions::default(), &config).unwrap();
        assert_eq!(plan.position_of("chart"), Some(Point::new(850.0, 0.0)));
        assert_eq!(plan.entry("kpi").unwrap().size, Size::new(240.0, 120.0));
        assert!(plan.is_collision_free());
    }

    #[test]
    fn test_start_offset() {
        let config = LayoutConfig::default();
        let elements = vec![PendingElement::new("a", ElementType::Chart)];
        let plan = arrange_grid(&elements, &ArrangeOptions::new().with_start(100.0, 200.0), &config)
            .unwrap();
        assert_eq!(plan.position_of("a"), Some(Point::new(100.0, 200.0)));
    }
}
