//! Keyframe sampling: turn authored curves into one key per integer frame of a clip.
//!
//! Model:
//! - A field of arity N looks up curves `(data_path, 0..N)` in the clip's action.
//! - No curve at all means the field is not animated in that clip.
//! - Otherwise every frame in `[start, end)` is evaluated per component; components
//!   without a curve repeat the field's current value.
//! - Components are then zipped into one key per frame.

use crate::scene::{Action, Curve};
use crate::time::ClipFrames;
use crate::track::{AnimData, KeyframeTrack};
use crate::value::{Vec2, Vec3};

/// Most components any sampled value has.
const MAX_COMPONENTS: usize = 4;

/// A field value the sampler can split into float components and rebuild.
pub trait Animatable: Copy {
    const ARITY: usize;

    fn component(&self, index: usize) -> f32;

    fn from_components(components: &[f32]) -> Self;

    /// Tag a finished track with its container kind.
    fn into_anim_data(track: KeyframeTrack<Self>) -> AnimData;
}

impl Animatable for f32 {
    const ARITY: usize = 1;

    fn component(&self, _index: usize) -> f32 {
        *self
    }

    fn from_components(components: &[f32]) -> Self {
        components[0]
    }

    fn into_anim_data(track: KeyframeTrack<Self>) -> AnimData {
        AnimData::Float(track)
    }
}

impl Animatable for Vec2 {
    const ARITY: usize = 2;

    fn component(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            _ => self.y,
        }
    }

    fn from_components(c: &[f32]) -> Self {
        Vec2::new(c[0], c[1])
    }

    fn into_anim_data(track: KeyframeTrack<Self>) -> AnimData {
        AnimData::Vec2(track)
    }
}

impl Animatable for Vec3 {
    const ARITY: usize = 3;

    fn component(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn from_components(c: &[f32]) -> Self {
        Vec3::new(c[0], c[1], c[2])
    }

    fn into_anim_data(track: KeyframeTrack<Self>) -> AnimData {
        AnimData::Vec3(track)
    }
}

/// u16 fields are stored in the signed 16-bit container, so keys are rounded and
/// clamped to `0..=i16::MAX`.
impl Animatable for u16 {
    const ARITY: usize = 1;

    fn component(&self, _index: usize) -> f32 {
        f32::from(*self)
    }

    fn from_components(components: &[f32]) -> Self {
        components[0].round().clamp(0.0, f32::from(i16::MAX)) as u16
    }

    fn into_anim_data(track: KeyframeTrack<Self>) -> AnimData {
        AnimData::Int16(track.map_keys(|k| i16::try_from(k).unwrap_or(i16::MAX)))
    }
}

/// Sample each component of `data_path` over the clip's frames.
///
/// Returns `None` when no component has a curve; otherwise one value sequence per
/// component, with `constants[i]` repeated for components that have no curve.
pub fn sample_components(
    action: &dyn Action,
    data_path: &str,
    constants: &[f32],
    frames: &ClipFrames,
) -> Option<Vec<Vec<f32>>> {
    let curves: Vec<Option<&dyn Curve>> = (0..constants.len())
        .map(|index| action.curve(data_path, index))
        .collect();
    if curves.iter().all(Option::is_none) {
        return None;
    }

    let components = curves
        .iter()
        .zip(constants)
        .map(|(curve, constant)| match curve {
            Some(curve) => frames
                .frames
                .clone()
                .map(|frame| curve.evaluate(frame as f32))
                .collect(),
            None => vec![*constant; frames.len()],
        })
        .collect();
    Some(components)
}

/// Sample a field of type `V` into a keyframe track, or `None` if it has no curves.
pub fn sample_track<V: Animatable>(
    action: &dyn Action,
    data_path: &str,
    current: V,
    frames: &ClipFrames,
) -> Option<KeyframeTrack<V>> {
    debug_assert!(V::ARITY <= MAX_COMPONENTS);
    let constants: Vec<f32> = (0..V::ARITY).map(|i| current.component(i)).collect();
    let components = sample_components(action, data_path, &constants, frames)?;

    let mut buf = [0.0_f32; MAX_COMPONENTS];
    let keys = (0..frames.len())
        .map(|k| {
            for (slot, component) in buf.iter_mut().zip(&components) {
                *slot = component[k];
            }
            V::from_components(&buf[..V::ARITY])
        })
        .collect();

    Some(KeyframeTrack {
        frames_ms: frames.times_ms.clone(),
        flags: 0,
        end_ms: frames.end_ms,
        keys,
    })
}
