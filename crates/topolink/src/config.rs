//! Configuration types for the Topolink editor.
//!
//! All types implement [`serde::Deserialize`] so they can be embedded in an
//! application's TOML configuration. Missing fields fall back to their
//! defaults.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`EditorConfig`] - Gesture, alignment and history settings.
//!
//! # Example
//!
//! ```
//! # use topolink::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.editor().auto_align());
//! assert_eq!(config.editor().align_ratio(), 0.2);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Editor configuration section.
    #[serde(default)]
    editor: EditorConfig,
}

impl AppConfig {
    pub fn new(editor: EditorConfig) -> Self {
        Self { editor }
    }

    /// Returns the editor configuration.
    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }
}

/// Behaviour of the [`Editor`](crate::Editor) during gestures and alignment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid step applied to dragged positions. Zero disables snapping.
    grid_step: f32,

    /// Align moved vertices and their neighbours after each gesture.
    auto_align: bool,

    /// Maximum ratio between the minor and major axis deltas for endpoint
    /// alignment to straighten a segment.
    align_ratio: f32,

    /// Minimum pointer travel before a press becomes a drag.
    drag_threshold: f32,

    /// Number of committed operations kept for undo.
    history_depth: usize,

    /// Maximum number of cascade batches processed by one settle.
    settle_rounds: usize,

    /// Margin added around the content when a drawing has no explicit canvas.
    bounds_margin: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_step: 0.0,
            auto_align: true,
            align_ratio: 0.2,
            drag_threshold: 3.0,
            history_depth: 100,
            settle_rounds: 8,
            bounds_margin: 200.0,
        }
    }
}

impl EditorConfig {
    pub fn grid_step(&self) -> f32 {
        self.grid_step
    }

    pub fn auto_align(&self) -> bool {
        self.auto_align
    }

    pub fn align_ratio(&self) -> f32 {
        self.align_ratio
    }

    pub fn drag_threshold(&self) -> f32 {
        self.drag_threshold
    }

    pub fn history_depth(&self) -> usize {
        self.history_depth
    }

    pub fn settle_rounds(&self) -> usize {
        self.settle_rounds
    }

    pub fn bounds_margin(&self) -> f32 {
        self.bounds_margin
    }

    /// Returns a copy with a different grid step.
    pub fn with_grid_step(mut self, grid_step: f32) -> Self {
        self.grid_step = grid_step;
        self
    }

    /// Returns a copy with auto-alignment switched on or off.
    pub fn with_auto_align(mut self, auto_align: bool) -> Self {
        self.auto_align = auto_align;
        self
    }

    pub fn with_align_ratio(mut self, align_ratio: f32) -> Self {
        self.align_ratio = align_ratio;
        self
    }

    pub fn with_drag_threshold(mut self, drag_threshold: f32) -> Self {
        self.drag_threshold = drag_threshold;
        self
    }

    pub fn with_history_depth(mut self, history_depth: usize) -> Self {
        self.history_depth = history_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_approx_eq!(f32, config.grid_step(), 0.0);
        assert_approx_eq!(f32, config.drag_threshold(), 3.0);
        assert_eq!(config.history_depth(), 100);
        assert_eq!(config.settle_rounds(), 8);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EditorConfig = toml::from_str(
            r#"
            grid_step = 10.0
            auto_align = false
            "#,
        )
        .unwrap();

        assert_approx_eq!(f32, config.grid_step(), 10.0);
        assert!(!config.auto_align());
        assert_approx_eq!(f32, config.align_ratio(), 0.2);
    }

    #[test]
    fn test_app_config_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [editor]
            history_depth = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.editor().history_depth(), 12);
        assert_eq!(toml::from_str::<AppConfig>("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = EditorConfig::default()
            .with_auto_align(false)
            .with_history_depth(5);
        assert!(!config.auto_align());
        assert_eq!(config.history_depth(), 5);
    }
}
