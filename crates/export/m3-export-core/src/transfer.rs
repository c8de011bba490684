//! Data transfer: copy authored properties onto model records, registering a
//! sampled track for every animatable field that has curves in a clip.
//!
//! Each record kind declares its fields once, as a table of [`FieldTransfer`]
//! entries (see [`crate::fields`]). [`DataTransferer`] walks such a table in
//! order; the order matters because every animatable field draws a fresh
//! [`AnimId`](crate::AnimId) from the run's allocator.

use crate::anim_ref::AnimRef;
use crate::error::{ExportError, ExportWarning, Result};
use crate::ids::IdAllocator;
use crate::sampling::{sample_track, Animatable};
use crate::scene::{Action, Clip, HostScene, OwnerType};
use crate::sequence::ClipAccumulator;
use crate::time::{ClipFrames, FrameTime};
use crate::value::{Color, Vec3};

/// How one authored field of `S` reaches its counterpart on the record `T`.
pub enum FieldTransfer<S, T> {
    /// Sampled into Float tracks.
    AnimatableFloat {
        name: &'static str,
        get: fn(&S) -> f32,
        set: fn(&mut T, AnimRef<f32>),
    },
    /// Sampled into Vec3 tracks.
    AnimatableVec3 {
        name: &'static str,
        get: fn(&S) -> [f32; 3],
        set: fn(&mut T, AnimRef<Vec3>),
    },
    /// Constant reference only; color tracks have no container.
    AnimatableColor {
        name: &'static str,
        get: fn(&S) -> [f32; 4],
        set: fn(&mut T, AnimRef<Color>),
    },
    /// Sampled into Int16 tracks.
    AnimatableUInt16 {
        name: &'static str,
        get: fn(&S) -> u16,
        set: fn(&mut T, AnimRef<u16>),
    },
    Float {
        name: &'static str,
        get: fn(&S) -> f32,
        set: fn(&mut T, f32),
    },
    Int {
        name: &'static str,
        get: fn(&S) -> u32,
        set: fn(&mut T, u32),
    },
    BoolToInt {
        name: &'static str,
        get: fn(&S) -> bool,
        set: fn(&mut T, u32),
    },
    Enum {
        name: &'static str,
        get: fn(&S) -> u32,
        set: fn(&mut T, u32),
    },
}

impl<S, T> FieldTransfer<S, T> {
    /// Authored field name; also the last segment of the field's animation path.
    pub fn name(&self) -> &'static str {
        match self {
            FieldTransfer::AnimatableFloat { name, .. }
            | FieldTransfer::AnimatableVec3 { name, .. }
            | FieldTransfer::AnimatableColor { name, .. }
            | FieldTransfer::AnimatableUInt16 { name, .. }
            | FieldTransfer::Float { name, .. }
            | FieldTransfer::Int { name, .. }
            | FieldTransfer::BoolToInt { name, .. }
            | FieldTransfer::Enum { name, .. } => *name,
        }
    }

    /// Whether the field carries an animation reference.
    pub fn is_animatable(&self) -> bool {
        matches!(
            self,
            FieldTransfer::AnimatableFloat { .. }
                | FieldTransfer::AnimatableVec3 { .. }
                | FieldTransfer::AnimatableColor { .. }
                | FieldTransfer::AnimatableUInt16 { .. }
        )
    }
}

/// State shared by every transfer of one export run.
#[derive(Debug)]
pub struct ExportContext {
    pub ids: IdAllocator,
    time: FrameTime,
    clips: Vec<ClipState>,
}

#[derive(Debug)]
struct ClipState {
    frames: ClipFrames,
    accumulator: ClipAccumulator,
}

impl ExportContext {
    /// Fresh allocator plus one seeded accumulator per clip, in clip order.
    pub fn new(time: FrameTime, clips: &[Clip]) -> Self {
        let clips = clips
            .iter()
            .map(|clip| ClipState {
                frames: time.clip_frames(clip.start_frame, clip.end_frame),
                accumulator: ClipAccumulator::new(clip, &time),
            })
            .collect();
        Self {
            ids: IdAllocator::new(),
            time,
            clips,
        }
    }

    pub fn time(&self) -> &FrameTime {
        &self.time
    }

    pub fn accumulator(&self, clip_index: usize) -> Option<&ClipAccumulator> {
        self.clips.get(clip_index).map(|c| &c.accumulator)
    }

    /// Hand the accumulators over for assembly, in clip order.
    pub fn into_accumulators(self) -> Vec<ClipAccumulator> {
        self.clips.into_iter().map(|c| c.accumulator).collect()
    }
}

/// An action that animates the current owner during one clip.
#[derive(Clone, Copy)]
pub struct ActionBinding<'s> {
    pub clip_index: usize,
    pub action: &'s dyn Action,
}

/// Collect the (clip, action) pairs assigned to `owner_name` whose action was
/// authored for `owner_type`. Assigned actions that no longer exist are
/// skipped and reported through `warnings`.
pub fn resolve_action_bindings<'s, S: HostScene + ?Sized>(
    scene: &'s S,
    owner_name: &str,
    owner_type: &OwnerType,
    warnings: &mut Vec<ExportWarning>,
) -> Vec<ActionBinding<'s>> {
    let mut bindings = Vec::new();
    for (clip_index, clip) in scene.clips().iter().enumerate() {
        for assigned in clip
            .assigned_actions
            .iter()
            .filter(|a| a.target_name == owner_name)
        {
            let Some(action) = scene.action(&assigned.action_name) else {
                let warning = ExportWarning::MissingAction {
                    action: assigned.action_name.clone(),
                    clip: clip.name.clone(),
                };
                log::warn!("{warning}");
                warnings.push(warning);
                continue;
            };
            if action.id_root() == *owner_type {
                bindings.push(ActionBinding { clip_index, action });
            }
        }
    }
    bindings
}

/// Index of the only item named `name`.
///
/// `kind` and `referenced_by` only feed the error message.
pub fn resolve_unique_by_name<T>(
    items: &[T],
    name_of: impl Fn(&T) -> &str,
    kind: &'static str,
    name: &str,
    referenced_by: &str,
) -> Result<usize> {
    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| name_of(item) == name)
        .map(|(index, _)| index)
        .collect();
    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(ExportError::ReferencedEntityNotFound {
            kind,
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        }),
        _ => Err(ExportError::AmbiguousReference {
            kind,
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
            matches: matches.len(),
        }),
    }
}

/// Transfers the fields of one authored object.
pub struct DataTransferer<'a, 's> {
    ctx: &'a mut ExportContext,
    bindings: &'a [ActionBinding<'s>],
    anim_path_prefix: String,
}

impl<'a, 's> DataTransferer<'a, 's> {
    /// `anim_path_prefix` is prepended to field names to form the data path
    /// curves are looked up under, e.g. `m3_particle_systems[0].`.
    pub fn new(
        ctx: &'a mut ExportContext,
        bindings: &'a [ActionBinding<'s>],
        anim_path_prefix: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            bindings,
            anim_path_prefix: anim_path_prefix.into(),
        }
    }

    /// The run's allocator, for references that are not field transfers.
    pub fn ids(&mut self) -> &mut IdAllocator {
        &mut self.ctx.ids
    }

    /// Transfer every entry of `fields`, in table order.
    pub fn transfer_all<S, T>(
        &mut self,
        fields: &[FieldTransfer<S, T>],
        source: &S,
        target: &mut T,
    ) {
        for field in fields {
            self.transfer(field, source, target);
        }
    }

    pub fn transfer<S, T>(&mut self, field: &FieldTransfer<S, T>, source: &S, target: &mut T) {
        match field {
            FieldTransfer::AnimatableFloat { name, get, set } => {
                set(target, self.animatable(name, get(source)))
            }
            FieldTransfer::AnimatableVec3 { name, get, set } => {
                set(target, self.animatable(name, Vec3::from(get(source))))
            }
            FieldTransfer::AnimatableColor { get, set, .. } => set(
                target,
                AnimRef::null(&mut self.ctx.ids, Color::from_unit_rgba(get(source))),
            ),
            FieldTransfer::AnimatableUInt16 { name, get, set } => {
                set(target, self.animatable(name, get(source)))
            }
            FieldTransfer::Float { get, set, .. } => set(target, get(source)),
            FieldTransfer::Int { get, set, .. } | FieldTransfer::Enum { get, set, .. } => {
                set(target, get(source))
            }
            FieldTransfer::BoolToInt { get, set, .. } => set(target, u32::from(get(source))),
        }
    }

    /// Null reference for `current`, upgraded to animated once any bound
    /// action produces a track for it.
    pub fn animatable<V: Animatable>(&mut self, field_name: &str, current: V) -> AnimRef<V> {
        let mut anim_ref = AnimRef::null(&mut self.ctx.ids, current);
        if self.bindings.is_empty() {
            return anim_ref;
        }

        let path = format!("{}{}", self.anim_path_prefix, field_name);
        for binding in self.bindings {
            let Some(clip) = self.ctx.clips.get_mut(binding.clip_index) else {
                continue;
            };
            let Some(track) = sample_track(binding.action, &path, current, &clip.frames) else {
                continue;
            };
            log::trace!(
                "{path}: {} keys in clip '{}'",
                track.len(),
                clip.accumulator.clip_name()
            );
            clip
                .accumulator
                .insert(anim_ref.anim_id(), V::into_anim_data(track));
            anim_ref.mark_animated();
        }
        anim_ref
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AnimId;
    use crate::json_scene::{FCurve, Interpolation, JsonAction, JsonScene};
    use crate::scene::AssignedAction;
    use crate::track::AnimData;

    #[derive(Default)]
    struct Source {
        rate: f32,
        area: [f32; 3],
        tint: [f32; 4],
        count: u32,
        on: bool,
    }

    #[derive(Default)]
    struct Target {
        rate: AnimRef<f32>,
        area: AnimRef<Vec3>,
        tint: AnimRef<Color>,
        count: u32,
        on: u32,
    }

    const FIELDS: &[FieldTransfer<Source, Target>] = &[
        FieldTransfer::AnimatableFloat {
            name: "rate",
            get: |s| s.rate,
            set: |t, v| t.rate = v,
        },
        FieldTransfer::AnimatableVec3 {
            name: "area",
            get: |s| s.area,
            set: |t, v| t.area = v,
        },
        FieldTransfer::AnimatableColor {
            name: "tint",
            get: |s| s.tint,
            set: |t, v| t.tint = v,
        },
        FieldTransfer::Int {
            name: "count",
            get: |s| s.count,
            set: |t, v| t.count = v,
        },
        FieldTransfer::BoolToInt {
            name: "on",
            get: |s| s.on,
            set: |t, v| t.on = v,
        },
    ];

    fn curve(path: &str, index: usize, points: &[[f32; 2]]) -> FCurve {
        FCurve {
            data_path: path.into(),
            array_index: index,
            interpolation: Interpolation::Linear,
            keyframes: points.to_vec(),
        }
    }

    fn scene(id_root: OwnerType) -> JsonScene {
        JsonScene {
            name: "Scene".into(),
            fps: 30,
            clips: vec![
                Clip {
                    name: "Stand".into(),
                    start_frame: 0,
                    end_frame: 2,
                    assigned_actions: vec![AssignedAction {
                        target_name: "Scene".into(),
                        action_name: "StandAction".into(),
                    }],
                    ..Clip::default()
                },
                Clip {
                    name: "Walk".into(),
                    start_frame: 0,
                    end_frame: 4,
                    assigned_actions: vec![
                        AssignedAction {
                            target_name: "Scene".into(),
                            action_name: "Gone".into(),
                        },
                        AssignedAction {
                            target_name: "Other".into(),
                            action_name: "StandAction".into(),
                        },
                    ],
                    ..Clip::default()
                },
            ],
            actions: vec![JsonAction {
                name: "StandAction".into(),
                id_root,
                fcurves: vec![
                    curve("obj.rate", 0, &[[0.0, 1.0], [1.0, 2.0]]),
                    curve("obj.area", 2, &[[0.0, 9.0]]),
                ],
            }],
            ..JsonScene::default()
        }
    }

    #[test]
    fn bindings_filter_owner_and_report_missing_actions() {
        let scene = scene(OwnerType::Scene);
        let mut warnings = Vec::new();
        let bindings = resolve_action_bindings(&scene, "Scene", &OwnerType::Scene, &mut warnings);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].clip_index, 0);
        assert_eq!(
            warnings,
            vec![ExportWarning::MissingAction {
                action: "Gone".into(),
                clip: "Walk".into()
            }]
        );
    }

    #[test]
    fn actions_for_other_owner_types_are_ignored() {
        let scene = scene(OwnerType::Object);
        let mut warnings = Vec::new();
        let bindings = resolve_action_bindings(&scene, "Scene", &OwnerType::Scene, &mut warnings);
        assert!(bindings.is_empty());
    }

    #[test]
    fn table_transfer_allocates_in_order_and_samples_curves() {
        let scene = scene(OwnerType::Scene);
        let time = FrameTime::new(30).unwrap();
        let mut ctx = ExportContext::new(time, &scene.clips);
        let mut warnings = Vec::new();
        let bindings = resolve_action_bindings(&scene, "Scene", &OwnerType::Scene, &mut warnings);

        let source = Source {
            rate: 5.0,
            area: [1.0, 2.0, 3.0],
            tint: [1.0, 0.5, 0.0, 1.0],
            count: 7,
            on: true,
        };
        let mut target = Target::default();
        DataTransferer::new(&mut ctx, &bindings, "obj.").transfer_all(FIELDS, &source, &mut target);

        assert_eq!(target.rate.anim_id(), AnimId(1));
        assert_eq!(target.area.anim_id(), AnimId(2));
        assert_eq!(target.tint.anim_id(), AnimId(3));
        assert_eq!(ctx.ids.allocated(), 3);
        assert_eq!(target.count, 7);
        assert_eq!(target.on, 1);

        assert!(target.rate.header.is_animated());
        assert_eq!(target.rate.init_value, 5.0);
        assert!(target.area.header.is_animated());
        assert!(!target.tint.header.is_animated());
        assert_eq!(target.tint.init_value, Color::from_unit_rgba([1.0, 0.5, 0.0, 1.0]));

        let stand = ctx.accumulator(0).unwrap();
        match stand.get(AnimId(1)) {
            Some(AnimData::Float(t)) => {
                assert_eq!(t.keys, vec![1.0, 2.0]);
                assert_eq!(t.frames_ms, vec![0, 33]);
            }
            other => panic!("expected float track, got {other:?}"),
        }
        match stand.get(AnimId(2)) {
            Some(AnimData::Vec3(t)) => {
                assert_eq!(t.keys, vec![Vec3::new(1.0, 2.0, 9.0); 2]);
            }
            other => panic!("expected vec3 track, got {other:?}"),
        }
        // Walk has no usable binding: only its end event.
        assert_eq!(ctx.accumulator(1).unwrap().len(), 1);
    }

    #[test]
    fn unanimated_field_keeps_null_reference() {
        let time = FrameTime::new(30).unwrap();
        let clips = [Clip {
            name: "Stand".into(),
            end_frame: 30,
            ..Clip::default()
        }];
        let mut ctx = ExportContext::new(time, &clips);
        let r = DataTransferer::new(&mut ctx, &[], "obj.").animatable("rate", 5.0_f32);
        assert_eq!(r.init_value, 5.0);
        assert_eq!(r.null_value, 5.0);
        assert_eq!(r.header.flags, 0);
        assert_eq!(ctx.accumulator(0).unwrap().len(), 1);
    }

    #[test]
    fn unique_name_resolution() {
        let names = ["Rock", "Metal", "Metal"];
        assert_eq!(
            resolve_unique_by_name(&names, |n| *n, "material", "Rock", "Dust").unwrap(),
            0
        );
        assert_eq!(
            resolve_unique_by_name(&names, |n| *n, "material", "Wood", "Dust").unwrap_err(),
            ExportError::ReferencedEntityNotFound {
                kind: "material",
                name: "Wood".into(),
                referenced_by: "Dust".into()
            }
        );
        assert_eq!(
            resolve_unique_by_name(&names, |n| *n, "material", "Metal", "Dust").unwrap_err(),
            ExportError::AmbiguousReference {
                kind: "material",
                name: "Metal".into(),
                referenced_by: "Dust".into(),
                matches: 2
            }
        );
    }
}
