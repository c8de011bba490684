//! Per-clip accumulation of tracks and assembly into sequence records.

use std::collections::HashMap;

use crate::collection::SequenceTransformationCollection;
use crate::error::Result;
use crate::ids::{AnimId, ANIM_END_EVENT_ID};
use crate::model::{
    Model, Sequence, SequenceFlags, SequenceTransformationGroup, SequenceTransformationState,
};
use crate::scene::Clip;
use crate::time::FrameTime;
use crate::track::{clip_end_event, AnimData};
use crate::value::Boundings;

/// Suffix of the single transformation collection built per clip.
pub const FULL_COLLECTION_SUFFIX: &str = "_full";

/// Tracks produced for one clip, keyed by the identity of the field they animate.
#[derive(Clone, Debug)]
pub struct ClipAccumulator {
    clip_name: String,
    map: HashMap<AnimId, AnimData>,
}

impl ClipAccumulator {
    /// New accumulator seeded with the clip-end event under [`ANIM_END_EVENT_ID`].
    pub fn new(clip: &Clip, time: &FrameTime) -> Self {
        let mut map = HashMap::new();
        map.insert(ANIM_END_EVENT_ID, clip_end_event(time.to_ms(clip.end_frame)));
        Self {
            clip_name: clip.name.clone(),
            map,
        }
    }

    pub fn clip_name(&self) -> &str {
        &self.clip_name
    }

    /// Register a track; a later track for the same id replaces the earlier one.
    pub fn insert(&mut self, anim_id: AnimId, data: AnimData) -> Option<AnimData> {
        self.map.insert(anim_id, data)
    }

    pub fn get(&self, anim_id: AnimId) -> Option<&AnimData> {
        self.map.get(&anim_id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Registered ids, ascending.
    pub fn sorted_ids(&self) -> Vec<AnimId> {
        let mut ids: Vec<AnimId> = self.map.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Consume into (id, track) pairs ordered by id.
    pub fn into_sorted(self) -> Vec<(AnimId, AnimData)> {
        let mut entries: Vec<(AnimId, AnimData)> = self.map.into_iter().collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }
}

/// Sequence record for a clip.
pub fn build_sequence(clip: &Clip, time: &FrameTime, bounding_radius: f32) -> Sequence {
    let mut flags = SequenceFlags::empty();
    flags.set(SequenceFlags::NOT_LOOPING, clip.not_looping);
    flags.set(SequenceFlags::ALWAYS_GLOBAL, clip.always_global);
    flags.set(SequenceFlags::GLOBAL_IN_PREVIEWER, clip.global_in_previewer);
    Sequence {
        name: clip.name.clone(),
        anim_start_ms: time.to_ms(clip.start_frame),
        anim_end_ms: time.to_ms(clip.end_frame),
        movement_speed: clip.movement_speed,
        flags,
        frequency: clip.frequency,
        bounding_sphere: Boundings::almost_empty_with_radius(bounding_radius),
    }
}

/// Drain a clip's accumulator into a sequence, a group, a collection and an STS record.
///
/// Tracks are routed to their typed containers in ascending id order, so the
/// collection's `anim_ids` are sorted and `anim_refs` run parallel to them.
pub fn assemble_clip(
    model: &mut Model,
    clip: &Clip,
    accumulator: ClipAccumulator,
    time: &FrameTime,
    bounding_radius: f32,
) -> Result<()> {
    let seq_index = model.sequences.len() as u32;
    let stg_index = model.sequence_transformation_groups.len() as u32;
    let stc_index = model.sequence_transformation_collections.len() as u32;

    let mut stc = SequenceTransformationCollection::new(
        format!("{}{}", clip.name, FULL_COLLECTION_SUFFIX),
        seq_index,
        stg_index,
    );
    for (anim_id, data) in accumulator.into_sorted() {
        stc.add_anim_data(anim_id, data)?;
    }
    log::debug!(
        "assembled clip '{}': {} ids, {} tracks",
        clip.name,
        stc.anim_ids.len(),
        stc.track_count()
    );

    let sts = SequenceTransformationState {
        anim_ids: stc.anim_ids.clone(),
    };
    model
        .sequences
        .push(build_sequence(clip, time, bounding_radius));
    model
        .sequence_transformation_groups
        .push(SequenceTransformationGroup {
            name: clip.name.clone(),
            stc_indices: vec![stc_index],
        });
    model.sequence_transformation_collections.push(stc);
    model.sts.push(sts);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{CompositeRef, KeyframeTrack, TrackKind};

    fn clip(name: &str, start: i32, end: i32) -> Clip {
        Clip {
            name: name.into(),
            start_frame: start,
            end_frame: end,
            movement_speed: 1.5,
            not_looping: true,
            global_in_previewer: true,
            frequency: 3,
            ..Clip::default()
        }
    }

    fn float(v: f32) -> AnimData {
        AnimData::Float(KeyframeTrack {
            frames_ms: vec![0],
            flags: 0,
            end_ms: 33,
            keys: vec![v],
        })
    }

    #[test]
    fn accumulator_is_seeded_with_end_event() {
        let time = FrameTime::new(30).unwrap();
        let acc = ClipAccumulator::new(&clip("Stand", 0, 30), &time);
        assert_eq!(acc.len(), 1);
        match acc.get(ANIM_END_EVENT_ID) {
            Some(AnimData::Event(t)) => assert_eq!(t.frames_ms, vec![1000]),
            other => panic!("expected end event, got {other:?}"),
        }
    }

    #[test]
    fn sorted_ids_ignore_insertion_order() {
        let time = FrameTime::new(30).unwrap();
        let mut acc = ClipAccumulator::new(&clip("Stand", 0, 30), &time);
        acc.insert(AnimId(12), float(2.0));
        acc.insert(AnimId(7), float(1.0));
        assert_eq!(
            acc.sorted_ids(),
            vec![AnimId(7), AnimId(12), ANIM_END_EVENT_ID]
        );
    }

    #[test]
    fn assemble_emits_sequence_group_collection_and_sts() {
        let time = FrameTime::new(30).unwrap();
        let c = clip("Birth", 10, 40);
        let mut acc = ClipAccumulator::new(&c, &time);
        acc.insert(AnimId(12), float(2.0));
        acc.insert(AnimId(7), float(1.0));

        let mut model = Model::new("test.m3", 0, 0);
        assemble_clip(&mut model, &c, acc, &time, 2.0).unwrap();

        let seq = &model.sequences[0];
        assert_eq!(seq.name, "Birth");
        assert_eq!(seq.anim_start_ms, 333);
        assert_eq!(seq.anim_end_ms, 1333);
        assert_eq!(seq.movement_speed, 1.5);
        assert_eq!(seq.frequency, 3);
        assert_eq!(
            seq.flags,
            SequenceFlags::NOT_LOOPING | SequenceFlags::GLOBAL_IN_PREVIEWER
        );
        assert_eq!(seq.bounding_sphere.radius, 2.0);

        let stg = &model.sequence_transformation_groups[0];
        assert_eq!(stg.name, "Birth");
        assert_eq!(stg.stc_indices, vec![0]);

        let stc = &model.sequence_transformation_collections[0];
        assert_eq!(stc.name, "Birth_full");
        assert_eq!(stc.seq_index, 0);
        assert_eq!(stc.stg_index, 0);
        assert_eq!(
            stc.anim_ids,
            vec![AnimId(7), AnimId(12), ANIM_END_EVENT_ID]
        );
        assert_eq!(
            stc.anim_refs,
            vec![CompositeRef(0x50000), CompositeRef(0x50001), CompositeRef(0)]
        );
        assert_eq!(stc.sdr3[0].keys, vec![1.0]);
        assert_eq!(stc.container_len(TrackKind::Event), Some(1));

        assert_eq!(model.sts[0].anim_ids, stc.anim_ids);
    }

    #[test]
    fn reversed_bounds_still_assemble() {
        let time = FrameTime::new(30).unwrap();
        let c = clip("Broken", 20, 10);
        let acc = ClipAccumulator::new(&c, &time);
        let mut model = Model::new("test.m3", 0, 0);
        assemble_clip(&mut model, &c, acc, &time, 2.0).unwrap();
        let stc = &model.sequence_transformation_collections[0];
        assert_eq!(stc.anim_ids, vec![ANIM_END_EVENT_ID]);
        assert_eq!(stc.sdev.len(), 1);
    }

    #[test]
    fn second_clip_indexes_follow_first() {
        let time = FrameTime::new(30).unwrap();
        let mut model = Model::new("test.m3", 0, 0);
        for name in ["Stand", "Walk"] {
            let c = clip(name, 0, 10);
            let acc = ClipAccumulator::new(&c, &time);
            assemble_clip(&mut model, &c, acc, &time, 2.0).unwrap();
        }
        let walk = &model.sequence_transformation_collections[1];
        assert_eq!(walk.seq_index, 1);
        assert_eq!(walk.stg_index, 1);
        assert_eq!(model.sequence_transformation_groups[1].stc_indices, vec![1]);
    }
}
