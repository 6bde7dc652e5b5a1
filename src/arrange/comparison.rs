//! Side-by-side arrangement for comparing two halves of a batch

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::{Point, Size};
use crate::model::PendingElement;

use super::{sized_elements, ArrangeOptions, LayoutPlan, PlanEntry, Strategy};

/// Stack the first half (rounded up) in a left column and the rest in a
/// right column.
///
/// The right column starts `comparison_offset` to the right, or further if
/// the left column is wider than that.
pub fn arrange_comparison(
    elements: &[PendingElement],
    options: &ArrangeOptions,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    let sized = sized_elements(elements, config)?;
    let gap = options.spacing(config);
    let origin = options.origin();

    let split = sized.len().div_ceil(2);
    let (left, right) = sized.split_at(split);
    let left_width = left.iter().map(|(_, size)| size.width).fold(0.0, f64::max);
    let offset = config.comparison_offset.max(left_width + gap);

    let mut plan = LayoutPlan::new(Strategy::Comparison);
    stack_column(&mut plan, left, origin, gap);
    stack_column(&mut plan, right, origin.offset(offset, 0.0), gap);
    Ok(plan)
}

fn stack_column(plan: &mut LayoutPlan, column: &[(&PendingElement, Size)], top: Point, gap: f64) {
    let mut y = 0.0;
    for (element, size) in column {
        plan.push(PlanEntry::new(element, top.offset(0.0, y), *size));
        y += size.height + gap;
    }
}
