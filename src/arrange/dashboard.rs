//! KPI dashboard arrangement
//!
//! Rows from top to bottom:
//!
//! 1. every KPI card, sharing the dashboard width equally; when the cards
//!    would get narrower than `min_kpi_width` they wrap onto further rows
//! 2. the first visual (chart or table) beside the first insight (text box)
//! 3. the remaining visuals, each followed by its insight when one is left,
//!    two to a row
//! 4. insights still unplaced, three to a row
//!
//! `dashboard_padding` is the only spacing used, both between cards and
//! between rows.

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::Size;
use crate::model::{ElementType, PendingElement};

use super::{sized_elements, ArrangeOptions, LayoutPlan, PlanEntry, Strategy};

const PAIR_COLUMNS: usize = 2;
const INSIGHT_COLUMNS: usize = 3;

pub fn arrange_kpi_dashboard(
    elements: &[PendingElement],
    options: &ArrangeOptions,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    let sized = sized_elements(elements, config)?;
    let pad = config.dashboard_padding;
    let width = config.dashboard_width;
    let origin = options.origin();

    let mut kpis = Vec::new();
    let mut visuals = Vec::new();
    let mut insights = Vec::new();
    for item in sized {
        match item.0.element_type {
            ElementType::Kpi => kpis.push(item),
            ElementType::Chart | ElementType::Table => visuals.push(item),
            ElementType::Textbox => insights.push(item),
        }
    }

    let mut plan = LayoutPlan::new(Strategy::KpiDashboard);
    let mut y = 0.0;

    if !kpis.is_empty() {
        let per_row = kpis_per_row(width, pad, config.min_kpi_width).min(kpis.len());
        let kpi_width = column_width(width, pad, per_row);
        let row_height = kpis.iter().map(|(_, size)| size.height).fold(0.0, f64::max);
        for row in kpis.chunks(per_row) {
            for (col, (kpi, _)) in row.iter().enumerate() {
                plan.push(PlanEntry::new(
                    kpi,
                    origin.offset(col as f64 * (kpi_width + pad), y),
                    Size::new(kpi_width, row_height),
                ));
            }
            y += row_height + pad;
        }
    }

    let mut visuals = visuals.into_iter();
    let mut insights = insights.into_iter();

    if let Some((hero, _)) = visuals.next() {
        let hero_width = width * config.hero_ratio;
        plan.push(PlanEntry::new(
            hero,
            origin.offset(0.0, y),
            Size::new(hero_width - pad, config.hero_height),
        ));
        if let Some((insight, _)) = insights.next() {
            plan.push(PlanEntry::new(
                insight,
                origin.offset(hero_width, y),
                Size::new(width - hero_width, config.hero_height),
            ));
        }
        y += config.hero_height + pad;
    }

    let mut pairs = Vec::new();
    for (visual, _) in visuals {
        pairs.push(visual);
        if let Some((insight, _)) = insights.next() {
            pairs.push(insight);
        }
    }
    let pair_width = column_width(width, pad, PAIR_COLUMNS);
    for row in pairs.chunks(PAIR_COLUMNS) {
        for (col, element) in row.iter().enumerate() {
            plan.push(PlanEntry::new(
                element,
                origin.offset(col as f64 * (pair_width + pad), y),
                Size::new(pair_width, config.pair_row_height),
            ));
        }
        y += config.pair_row_height + pad;
    }

    let leftover: Vec<_> = insights.collect();
    let insight_width = column_width(width, pad, INSIGHT_COLUMNS);
    for row in leftover.chunks(INSIGHT_COLUMNS) {
        let row_height = row.iter().map(|(_, size)| size.height).fold(0.0, f64::max);
        for (col, (insight, size)) in row.iter().enumerate() {
            plan.push(PlanEntry::new(
                insight,
                origin.offset(col as f64 * (insight_width + pad), y),
                Size::new(insight_width, size.height),
            ));
        }
        y += row_height + pad;
    }

    Ok(plan)
}

/// Most KPI cards of at least `min_width` that fit across `total`
fn kpis_per_row(total: f64, pad: f64, min_width: f64) -> usize {
    let fit = ((total + pad) / (min_width + pad)).floor();
    if fit.is_finite() && fit >= 1.0 {
        fit as usize
    } else {
        1
    }
}

/// Width of each of `count` equal columns separated by `pad`
fn column_width(total: f64, pad: f64, count: usize) -> f64 {
    let count = count.max(1) as f64;
    ((total - pad * (count - 1.0)) / count).max(0.0)
}
