//! Hero arrangement: one dominant element, a sidekick, and a tiled remainder

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::Size;
use crate::model::PendingElement;

use super::{sized_elements, ArrangeOptions, LayoutPlan, PlanEntry, Strategy};

/// Columns of the grid below the hero row
const TILE_COLUMNS: usize = 3;

/// The first element takes `hero_ratio` of the dashboard width at hero
/// height, the second fills the rest of that row, and everything else tiles
/// below in three equal columns.
pub fn arrange_hero(
    elements: &[PendingElement],
    options: &ArrangeOptions,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    let sized = sized_elements(elements, config)?;
    let gap = options.spacing(config);
    let origin = options.origin();
    let hero_width = config.dashboard_width * config.hero_ratio;
    let side_width = config.dashboard_width - hero_width;

    let mut plan = LayoutPlan::new(Strategy::Hero);
    let mut rest = sized.into_iter();

    if let Some((hero, _)) = rest.next() {
        plan.push(PlanEntry::new(hero, origin, Size::new(hero_width, config.hero_height)));
    }
    if let Some((side, _)) = rest.next() {
        plan.push(PlanEntry::new(
            side,
            origin.offset(hero_width, 0.0),
            Size::new(side_width, config.hero_height),
        ));
    }

    let rest: Vec<_> = rest.collect();
    let tile_width =
        ((config.dashboard_width - gap * (TILE_COLUMNS - 1) as f64) / TILE_COLUMNS as f64).max(0.0);
    let row_height = rest.iter().map(|(_, size)| size.height).fold(0.0, f64::max);
    let top = config.hero_height + gap;

    for (i, (element, size)) in rest.into_iter().enumerate() {
        let col = (i % TILE_COLUMNS) as f64;
        let row = (i / TILE_COLUMNS) as f64;
        plan.push(PlanEntry::new(
            element,
            origin.offset(col * (tile_width + gap), top + row * (row_height + gap)),
            Size::new(tile_width, size.height),
        ));
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::model::ElementType;

    #[test]
    fn test_hero_and_side() {
        let config = LayoutConfig::default();
        let elements = vec![
            PendingElement::new("main", ElementType::Chart),
            PendingElement::new("side", ElementType::Textbox),
        ];
        let plan = arrange_hero(&elements, &ArrangeOptions::default(), &config).unwrap();

        let main = plan.entry("main").unwrap();
        assert_eq!(main.position, Point::new(0.0, 0.0));
        assert_eq!(main.size, Size::new(900.0, 400.0));

        let side = plan.entry("side").unwrap();
        assert_eq!(side.position, Point::new(900.0, 0.0));
        assert_eq!(side.size, Size::new(300.0, 400.0));
        assert!(plan.is_collision_free());
    }

    #[test]
    fn test_remaining_elements_tile_below() {
        let config = LayoutConfig::default();
        let elements: Vec<_> = (0..6)
            .map(|i| PendingElement::new(format!("e{}", i), ElementType::Kpi))
            .collect();
        let plan = arrange_hero(&elements, &ArrangeOptions::new().with_gap(30.0), &config).unwrap();

        // (1200 - 2 * 30) / 3 = 380 wide tiles starting 430 down
        assert_eq!(plan.position_of("e2"), Some(Point::new(0.0, 430.0)));
        assert_eq!(plan.position_of("e4"), Some(Point::new(820.0, 430.0)));
        assert_eq!(plan.position_of("e5"), Some(Point::new(0.0, 580.0)));
        assert_eq!(plan.entry("e5").unwrap().size, Size::new(380.0, 120.0));
        assert!(plan.is_collision_free());
    }

    #[test]
    fn test_single_element() {
        let config = LayoutConfig::default();
        let elements = vec![PendingElement::new("only", ElementType::Chart)];
        let plan = arrange_hero(&elements, &ArrangeOptions::default(), &config).unwrap();
        assert_eq!(plan.len(), 1);
    }
}
