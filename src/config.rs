//! Configuration for the layout engine
//!
//! Every tunable constant of the analyzer, the strategies and the placement
//! finder lives here. A configuration can be built in code with the `with_*`
//! builders or loaded from TOML; keys missing from the TOML keep their
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Size;
use crate::model::ElementType;

/// Configuration options for layout computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Side length of a cell in the empty-region scan
    pub grid_cell_size: f64,

    /// Maximum number of scan cells per axis; larger viewports get larger cells
    pub max_grid_dimension: usize,

    /// Maximum center-to-center distance for two elements to share a cluster
    pub cluster_distance: f64,

    /// Data-overlap strength above which charts are grouped together
    pub grouping_strength_threshold: f64,

    /// Default chart size
    pub chart_size: Size,

    /// Default KPI card size
    pub kpi_size: Size,

    /// Default table size
    pub table_size: Size,

    /// Default text box size
    pub textbox_size: Size,

    /// Default number of grid columns
    pub grid_columns: usize,

    /// Default spacing between arranged elements
    pub gap: f64,

    /// Total width of hero and KPI dashboard layouts
    pub dashboard_width: f64,

    /// Height of hero rows
    pub hero_height: f64,

    /// Share of the dashboard width taken by the hero element
    pub hero_ratio: f64,

    /// Height of the chart/insight pair rows below the dashboard hero
    pub pair_row_height: f64,

    /// The only spacing constant of the KPI dashboard
    pub dashboard_padding: f64,

    /// Narrowest KPI card; more cards than fit at this width wrap onto
    /// further rows
    pub min_kpi_width: f64,

    /// Minimum horizontal offset between the two comparison columns
    pub comparison_offset: f64,

    /// Inset of default anchor positions from the viewport edges
    pub placement_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: 100.0,
            max_grid_dimension: 100,
            cluster_distance: 900.0,
            grouping_strength_threshold: 0.3,
            chart_size: Size::new(800.0, 400.0),
            kpi_size: Size::new(240.0, 120.0),
            table_size: Size::new(800.0, 400.0),
            textbox_size: Size::new(400.0, 200.0),
            grid_columns: 2,
            gap: 50.0,
            dashboard_width: 1200.0,
            hero_height: 400.0,
            hero_ratio: 0.75,
            pair_row_height: 400.0,
            dashboard_padding: 12.0,
            min_kpi_width: 80.0,
            comparison_offset: 900.0,
            placement_margin: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: LayoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_cell_size.is_finite() && self.grid_cell_size > 0.0) {
            return Err(ConfigError::invalid("grid_cell_size", "must be positive"));
        }
        if self.max_grid_dimension == 0 {
            return Err(ConfigError::invalid("max_grid_dimension", "must be at least 1"));
        }
        if !(self.cluster_distance.is_finite() && self.cluster_distance >= 0.0) {
            return Err(ConfigError::invalid("cluster_distance", "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.grouping_strength_threshold) {
            return Err(ConfigError::invalid(
                "grouping_strength_threshold",
                "must be within [0, 1]",
            ));
        }
        if !(self.hero_ratio > 0.0 && self.hero_ratio < 1.0) {
            return Err(ConfigError::invalid("hero_ratio", "must be within (0, 1)"));
        }
        if !(self.dashboard_width.is_finite() && self.dashboard_width > 0.0) {
            return Err(ConfigError::invalid("dashboard_width", "must be positive"));
        }
        if !(self.min_kpi_width.is_finite() && self.min_kpi_width > 0.0) {
            return Err(ConfigError::invalid("min_kpi_width", "must be positive"));
        }
        for (key, size) in [
            ("chart_size", self.chart_size),
            ("kpi_size", self.kpi_size),
            ("table_size", self.table_size),
            ("textbox_size", self.textbox_size),
        ] {
            if !size.is_valid() {
                return Err(ConfigError::invalid(key, "must be finite and non-negative"));
            }
        }
        for (key, value) in [
            ("gap", self.gap),
            ("hero_height", self.hero_height),
            ("pair_row_height", self.pair_row_height),
            ("dashboard_padding", self.dashboard_padding),
            ("comparison_offset", self.comparison_offset),
            ("placement_margin", self.placement_margin),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(key, "must be finite and non-negative"));
            }
        }
        Ok(())
    }

    /// Default size for an element of the given type
    pub fn default_size(&self, element_type: ElementType) -> Size {
        match element_type {
            ElementType::Chart => self.chart_size,
            ElementType::Kpi => self.kpi_size,
            ElementType::Table => self.table_size,
            ElementType::Textbox => self.textbox_size,
        }
    }

    /// Set the empty-region scan cell size
    pub fn with_grid_cell_size(mut self, size: f64) -> Self {
        self.grid_cell_size = size;
        self
    }

    /// Set the scan cap per axis
    pub fn with_max_grid_dimension(mut self, cells: usize) -> Self {
        self.max_grid_dimension = cells;
        self
    }

    /// Set the clustering distance threshold
    pub fn with_cluster_distance(mut self, distance: f64) -> Self {
        self.cluster_distance = distance;
        self
    }

    /// Set the spacing between arranged elements
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Set the narrowest KPI card before the KPI row wraps
    pub fn with_min_kpi_width(mut self, width: f64) -> Self {
        self.min_kpi_width = width;
        self
    }

    /// Set the default number of grid columns
    pub fn with_grid_columns(mut self, cols: usize) -> Self {
        self.grid_columns = cols;
        self
    }

    /// Set the default chart size
    pub fn with_chart_size(mut self, width: f64, height: f64) -> Self {
        self.chart_size = Size::new(width, height);
        self
    }

    /// Set the dashboard width used by hero and KPI layouts
    pub fn with_dashboard_width(mut self, width: f64) -> Self {
        self.dashboard_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.grid_cell_size, 100.0);
        assert_eq!(config.max_grid_dimension, 100);
        assert_eq!(config.cluster_distance, 900.0);
        assert_eq!(config.grouping_strength_threshold, 0.3);
        assert_eq!(config.chart_size, Size::new(800.0, 400.0));
        assert_eq!(config.grid_columns, 2);
        assert_eq!(config.gap, 50.0);
        assert_eq!(config.dashboard_width, 1200.0);
        assert_eq!(config.dashboard_padding, 12.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_grid_cell_size(50.0)
            .with_gap(20.0)
            .with_chart_size(600.0, 300.0);

        assert_eq!(config.grid_cell_size, 50.0);
        assert_eq!(config.gap, 20.0);
        assert_eq!(config.default_size(ElementType::Chart), Size::new(600.0, 300.0));
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
grid_cell_size = 50
cluster_distance = 400.5

[kpi_size]
width = 300
height = 100
"#;
        let config = LayoutConfig::from_toml(toml_str).expect("Should parse");
        assert_eq!(config.grid_cell_size, 50.0);
        assert_eq!(config.cluster_distance, 400.5);
        assert_eq!(config.kpi_size, Size::new(300.0, 100.0));
        // Untouched keys keep their defaults
        assert_eq!(config.gap, 50.0);
        assert_eq!(config.chart_size, Size::new(800.0, 400.0));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = LayoutConfig::from_toml("this is not valid toml {{{{");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = LayoutConfig::from_toml("grid_cell_size = 0");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = LayoutConfig::from_toml("max_grid_dimension = 0");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = LayoutConfig::from_toml("hero_ratio = 1.5");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
