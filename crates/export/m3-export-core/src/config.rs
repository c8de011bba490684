//! Exporter configuration.

use serde::{Deserialize, Serialize};

/// Tunables of one export run. Format constants that the game relies on are
/// not configurable and live beside the types they belong to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Frame rate the game expects. Scenes running at another rate still
    /// export but raise [`ExportWarning::FrameRate`](crate::ExportWarning::FrameRate).
    pub expected_frame_rate: u32,

    /// Radius of the placeholder bounding sphere of the model and of each sequence.
    pub bounding_radius: f32,

    pub model_flags: u32,
    /// Vertex flags of a model that carries no vertices.
    pub vertex_flags: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            expected_frame_rate: 30,
            bounding_radius: 2.0,
            model_flags: 0x80d53,
            vertex_flags: 0x0180_007d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ExportConfig = serde_json::from_str(r#"{ "bounding_radius": 5.0 }"#).unwrap();
        assert_eq!(cfg.bounding_radius, 5.0);
        assert_eq!(cfg.expected_frame_rate, 30);
        assert_eq!(cfg.vertex_flags, 0x180007d);
    }
}
