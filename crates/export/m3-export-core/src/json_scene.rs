//! A [`HostScene`] backed by JSON, for tools that dump their scene instead of
//! linking against the exporter, and for fixtures.
//!
//! Notes:
//! - Key names follow the authoring tool (`m3_animations`, `fps`, `dataPath`, ...).
//! - F-curves hold `[frame, value]` points sorted by frame.
//! - `linear` curves interpolate between points, `constant` curves hold the left
//!   point; both hold the end values outside the keyed range.

use serde::{Deserialize, Serialize};

use crate::scene::{Action, Clip, Curve, HostScene, MaterialProps, OwnerType, ParticleSystemProps};

/// Parse a scene dump. Fails on malformed JSON or unsorted curve points.
pub fn parse_scene_json(s: &str) -> Result<JsonScene, String> {
    let scene: JsonScene = serde_json::from_str(s).map_err(|e| format!("parse error: {e}"))?;
    scene.validate_basic()?;
    Ok(scene)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonScene {
    pub name: String,
    pub fps: u32,
    #[serde(default, rename = "m3_animations")]
    pub clips: Vec<Clip>,
    #[serde(default, rename = "m3_particle_systems")]
    pub particle_systems: Vec<ParticleSystemProps>,
    #[serde(default, rename = "m3_materials")]
    pub materials: Vec<MaterialProps>,
    #[serde(default)]
    pub actions: Vec<JsonAction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAction {
    pub name: String,
    pub id_root: OwnerType,
    #[serde(default)]
    pub fcurves: Vec<FCurve>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Linear,
    Constant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FCurve {
    pub data_path: String,
    #[serde(default)]
    pub array_index: usize,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// `[frame, value]` pairs.
    pub keyframes: Vec<[f32; 2]>,
}

impl JsonScene {
    /// Validate basic invariants (finite, non-decreasing keyframe frames).
    pub fn validate_basic(&self) -> Result<(), String> {
        for action in &self.actions {
            for curve in &action.fcurves {
                let mut last = -f32::INFINITY;
                for [frame, value] in &curve.keyframes {
                    if !frame.is_finite() || !value.is_finite() {
                        return Err(format!(
                            "keyframes must be finite for '{}[{}]' in action '{}'",
                            curve.data_path, curve.array_index, action.name
                        ));
                    }
                    if *frame < last {
                        return Err(format!(
                            "keyframe frames must be non-decreasing for '{}[{}]' in action '{}'",
                            curve.data_path, curve.array_index, action.name
                        ));
                    }
                    last = *frame;
                }
            }
        }
        Ok(())
    }
}

impl HostScene for JsonScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn frame_rate(&self) -> u32 {
        self.fps
    }

    fn clips(&self) -> &[Clip] {
        &self.clips
    }

    fn particle_systems(&self) -> &[ParticleSystemProps] {
        &self.particle_systems
    }

    fn materials(&self) -> &[MaterialProps] {
        &self.materials
    }

    fn action(&self, name: &str) -> Option<&dyn Action> {
        self.actions
            .iter()
            .find(|a| a.name == name)
            .map(|a| a as &dyn Action)
    }
}

impl Action for JsonAction {
    fn id_root(&self) -> OwnerType {
        self.id_root.clone()
    }

    fn curve(&self, data_path: &str, array_index: usize) -> Option<&dyn Curve> {
        self.fcurves
            .iter()
            .find(|c| c.data_path == data_path && c.array_index == array_index)
            .map(|c| c as &dyn Curve)
    }
}

/// Find the segment [i, i+1] containing `frame` and the local t in [0, 1].
/// Before the first point returns (0, 0, 0); after the last, (last, last, 0).
fn find_segment(points: &[[f32; 2]], frame: f32) -> (usize, usize, f32) {
    let n = points.len();
    if n <= 1 || frame <= points[0][0] {
        return (0, 0, 0.0);
    }
    if frame >= points[n - 1][0] {
        return (n - 1, n - 1, 0.0);
    }
    let i = points.partition_point(|p| p[0] <= frame).saturating_sub(1);
    let (f0, f1) = (points[i][0], points[i + 1][0]);
    let denom = (f1 - f0).max(f32::EPSILON);
    (i, i + 1, ((frame - f0) / denom).clamp(0.0, 1.0))
}

impl Curve for FCurve {
    fn evaluate(&self, frame: f32) -> f32 {
        let points = &self.keyframes;
        if points.is_empty() {
            return 0.0;
        }
        let (i0, i1, t) = find_segment(points, frame);
        let left = points[i0][1];
        if i0 == i1 {
            return left;
        }
        match self.interpolation {
            Interpolation::Constant => left,
            Interpolation::Linear => left + (points[i1][1] - left) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(interpolation: Interpolation, keyframes: Vec<[f32; 2]>) -> FCurve {
        FCurve {
            data_path: "m3_particle_systems[0].emissRate".into(),
            array_index: 0,
            interpolation,
            keyframes,
        }
    }

    #[test]
    fn linear_curve_interpolates_and_holds_ends() {
        let c = curve(Interpolation::Linear, vec![[0.0, 1.0], [10.0, 11.0]]);
        assert_eq!(c.evaluate(-5.0), 1.0);
        assert_eq!(c.evaluate(0.0), 1.0);
        assert!((c.evaluate(5.0) - 6.0).abs() < 1e-6);
        assert_eq!(c.evaluate(10.0), 11.0);
        assert_eq!(c.evaluate(20.0), 11.0);
    }

    #[test]
    fn constant_curve_holds_left_point() {
        let c = curve(
            Interpolation::Constant,
            vec![[0.0, 1.0], [2.0, 5.0], [4.0, 9.0]],
        );
        assert_eq!(c.evaluate(1.0), 1.0);
        assert_eq!(c.evaluate(2.0), 5.0);
        assert_eq!(c.evaluate(3.9), 5.0);
    }

    #[test]
    fn empty_curve_evaluates_to_zero() {
        assert_eq!(curve(Interpolation::Linear, vec![]).evaluate(3.0), 0.0);
    }

    #[test]
    fn unsorted_keyframes_fail_validation() {
        let scene = JsonScene {
            name: "Scene".into(),
            fps: 30,
            actions: vec![JsonAction {
                name: "A".into(),
                id_root: OwnerType::Scene,
                fcurves: vec![curve(Interpolation::Linear, vec![[3.0, 0.0], [1.0, 0.0]])],
            }],
            ..JsonScene::default()
        };
        let err = scene.validate_basic().unwrap_err();
        assert!(err.contains("non-decreasing"), "{err}");
    }

    #[test]
    fn actions_resolve_curves_by_path_and_index() {
        let json = r#"{
            "name": "Scene",
            "fps": 30,
            "actions": [{
                "name": "SceneAction",
                "idRoot": "SCENE",
                "fcurves": [
                    { "dataPath": "m3_particle_systems[0].pemitScale", "arrayIndex": 2, "keyframes": [[0, 1], [1, 2]] }
                ]
            }]
        }"#;
        let scene = parse_scene_json(json).expect("parse scene");
        let action = scene.action("SceneAction").expect("action");
        assert_eq!(action.id_root(), OwnerType::Scene);
        assert!(action.curve("m3_particle_systems[0].pemitScale", 2).is_some());
        assert!(action.curve("m3_particle_systems[0].pemitScale", 0).is_none());
        assert!(scene.action("Missing").is_none());
    }
}
