//! Transformation collections and the typed track partitioner.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::ids::AnimId;
use crate::track::{type_base, AnimData, CompositeRef, Event, KeyframeTrack, TrackKind};
use crate::value::{Quat, Vec2, Vec3};

/// STC: every track one clip uses, split by kind, plus the sorted id → reference table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceTransformationCollection {
    pub name: String,
    pub seq_index: u32,
    pub stg_index: u32,
    /// Strictly ascending.
    pub anim_ids: Vec<AnimId>,
    /// `anim_refs[i]` locates the track registered for `anim_ids[i]`.
    pub anim_refs: Vec<CompositeRef>,
    pub sdev: Vec<KeyframeTrack<Event>>,
    pub sd2v: Vec<KeyframeTrack<Vec2>>,
    pub sd3v: Vec<KeyframeTrack<Vec3>>,
    pub sd4q: Vec<KeyframeTrack<Quat>>,
    pub sdr3: Vec<KeyframeTrack<f32>>,
    pub sds6: Vec<KeyframeTrack<i16>>,
}

impl SequenceTransformationCollection {
    pub fn new(name: impl Into<String>, seq_index: u32, stg_index: u32) -> Self {
        Self {
            name: name.into(),
            seq_index,
            stg_index,
            ..Self::default()
        }
    }

    /// Number of tracks currently held in the container for `kind`.
    pub fn container_len(&self, kind: TrackKind) -> Option<usize> {
        match kind {
            TrackKind::Event => Some(self.sdev.len()),
            TrackKind::Vec2 => Some(self.sd2v.len()),
            TrackKind::Vec3 => Some(self.sd3v.len()),
            TrackKind::Quat => Some(self.sd4q.len()),
            TrackKind::Float => Some(self.sdr3.len()),
            TrackKind::Int16 => Some(self.sds6.len()),
            TrackKind::Color => None,
        }
    }

    /// Append `data` to its typed container and record its composite reference.
    ///
    /// The caller registers ids in ascending order; `anim_ids` and `anim_refs`
    /// stay parallel because both are appended here.
    pub fn add_anim_data(&mut self, anim_id: AnimId, data: AnimData) -> Result<CompositeRef> {
        let kind = data.kind();
        let (Some(base), Some(local_index)) = (type_base(kind), self.container_len(kind)) else {
            return Err(self.unsupported(kind));
        };
        let local_index = local_index as u32;

        match data {
            AnimData::Event(t) => self.sdev.push(t),
            AnimData::Vec2(t) => self.sd2v.push(t),
            AnimData::Vec3(t) => self.sd3v.push(t),
            AnimData::Quat(t) => self.sd4q.push(t),
            AnimData::Float(t) => self.sdr3.push(t),
            AnimData::Int16(t) => self.sds6.push(t),
            AnimData::Color(_) => return Err(self.unsupported(kind)),
        }

        let anim_ref = CompositeRef(base + local_index);
        self.anim_ids.push(anim_id);
        self.anim_refs.push(anim_ref);
        log::trace!(
            "{}: {:?} {:?} -> {:#07x}",
            self.name,
            anim_id,
            kind,
            anim_ref.0
        );
        Ok(anim_ref)
    }

    fn unsupported(&self, kind: TrackKind) -> ExportError {
        ExportError::UnsupportedTrackKind {
            kind,
            collection: self.name.clone(),
        }
    }

    /// Number of tracks over all containers.
    pub fn track_count(&self) -> usize {
        self.sdev.len()
            + self.sd2v.len()
            + self.sd3v.len()
            + self.sd4q.len()
            + self.sdr3.len()
            + self.sds6.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Color;

    fn float_track(keys: &[f32]) -> AnimData {
        AnimData::Float(KeyframeTrack {
            frames_ms: (0..keys.len() as i32).map(|f| f * 33).collect(),
            flags: 0,
            end_ms: 100,
            keys: keys.to_vec(),
        })
    }

    #[test]
    fn float_tracks_get_consecutive_refs() {
        let mut stc = SequenceTransformationCollection::new("Stand_full", 0, 0);
        let r1 = stc.add_anim_data(AnimId(7), float_track(&[1.0])).unwrap();
        let r2 = stc.add_anim_data(AnimId(12), float_track(&[2.0])).unwrap();
        assert_eq!(r1, CompositeRef(0x50000));
        assert_eq!(r2, CompositeRef(0x50001));
        assert_eq!(r2.local_index(), 1);
        assert_eq!(stc.anim_ids, vec![AnimId(7), AnimId(12)]);
        assert_eq!(stc.sdr3.len(), 2);
    }

    #[test]
    fn local_index_is_per_container() {
        let mut stc = SequenceTransformationCollection::new("Walk_full", 0, 0);
        stc.add_anim_data(AnimId(1), float_track(&[1.0])).unwrap();
        let v = stc
            .add_anim_data(
                AnimId(2),
                AnimData::Vec3(KeyframeTrack {
                    frames_ms: vec![0],
                    flags: 0,
                    end_ms: 33,
                    keys: vec![Vec3::ONE],
                }),
            )
            .unwrap();
        let q = stc
            .add_anim_data(
                AnimId(3),
                AnimData::Quat(KeyframeTrack {
                    frames_ms: vec![0],
                    flags: 0,
                    end_ms: 33,
                    keys: vec![Quat::IDENTITY],
                }),
            )
            .unwrap();
        let s = stc
            .add_anim_data(
                AnimId(4),
                AnimData::Int16(KeyframeTrack {
                    frames_ms: vec![0],
                    flags: 0,
                    end_ms: 33,
                    keys: vec![3],
                }),
            )
            .unwrap();
        assert_eq!(v, CompositeRef(0x20000));
        assert_eq!(q, CompositeRef(0x30000));
        // Int16 shares the Float base; its own container is still empty.
        assert_eq!(s, CompositeRef(0x50000));
        assert_eq!(stc.track_count(), 4);
        assert_eq!(stc.anim_refs.len(), stc.anim_ids.len());
    }

    #[test]
    fn vec2_tracks_fill_their_own_container() {
        let vec2_track = |y: f32| {
            AnimData::Vec2(KeyframeTrack {
                frames_ms: vec![0],
                flags: 0,
                end_ms: 33,
                keys: vec![Vec2::new(0.0, y)],
            })
        };
        let mut stc = SequenceTransformationCollection::new("Stand_full", 0, 0);
        let first = stc.add_anim_data(AnimId(3), vec2_track(1.0)).unwrap();
        stc.add_anim_data(AnimId(4), float_track(&[1.0])).unwrap();
        let second = stc.add_anim_data(AnimId(5), vec2_track(2.0)).unwrap();
        assert_eq!(first, CompositeRef(0x10000));
        assert_eq!(second, CompositeRef(0x10001));
        assert_eq!(stc.sd2v.len(), 2);
        assert_eq!(stc.sd2v[1].keys, vec![Vec2::new(0.0, 2.0)]);
        assert_eq!(stc.container_len(TrackKind::Vec2), Some(2));
    }

    #[test]
    fn color_tracks_are_rejected() {
        let mut stc = SequenceTransformationCollection::new("Stand_full", 0, 0);
        let err = stc
            .add_anim_data(
                AnimId(1),
                AnimData::Color(KeyframeTrack {
                    frames_ms: vec![0],
                    flags: 0,
                    end_ms: 33,
                    keys: vec![Color::default()],
                }),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ExportError::UnsupportedTrackKind {
                kind: TrackKind::Color,
                collection: "Stand_full".into()
            }
        );
        assert!(stc.anim_ids.is_empty());
        assert!(stc.anim_refs.is_empty());
    }
}
