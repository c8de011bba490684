//! Keyframe tracks, the closed set of track kinds and the composite reference encoding.

use serde::{Deserialize, Serialize};

use crate::value::{Color, Matrix44, Quat, Vec2, Vec3};

/// Sampled values of one field in one clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack<T> {
    /// Ascending timestamps, one per key.
    pub frames_ms: Vec<i32>,
    pub flags: u32,
    pub end_ms: i32,
    pub keys: Vec<T>,
}

impl<T> KeyframeTrack<T> {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Same timing, converted keys.
    pub fn map_keys<U>(self, f: impl FnMut(T) -> U) -> KeyframeTrack<U> {
        KeyframeTrack {
            frames_ms: self.frames_ms,
            flags: self.flags,
            end_ms: self.end_ms,
            keys: self.keys.into_iter().map(f).collect(),
        }
    }
}

/// Key of an event track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub matrix: Matrix44,
}

/// Name of the event that marks the end of every clip.
pub const SEQUENCE_END_EVENT_NAME: &str = "Evt_SeqEnd";

/// Kind of a keyframe track. Closed over what the format defines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// SDEV
    Event,
    /// SD2V
    Vec2,
    /// SD3V
    Vec3,
    /// SD4Q
    Quat,
    /// SDCC
    Color,
    /// SDR3
    Float,
    /// SDS6
    Int16,
}

/// Composite reference bases. Float and Int16 share 0x50000 and 0x40000 is unused;
/// keep this as-is for compatibility with existing files until the format is verified.
const TYPE_BASES: [(TrackKind, u32); 6] = [
    (TrackKind::Event, 0x00000),
    (TrackKind::Vec2, 0x10000),
    (TrackKind::Vec3, 0x20000),
    (TrackKind::Quat, 0x30000),
    (TrackKind::Float, 0x50000),
    (TrackKind::Int16, 0x50000),
];

/// Base of the composite reference for a kind, `None` if the kind has no container.
pub fn type_base(kind: TrackKind) -> Option<u32> {
    TYPE_BASES
        .iter()
        .find_map(|(k, base)| (*k == kind).then_some(*base))
}

/// `type_base(kind) + local index`: locates a track within its typed container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeRef(pub u32);

impl CompositeRef {
    pub fn local_index(self) -> u32 {
        self.0 & 0xffff
    }
}

/// A produced track, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnimData {
    Event(KeyframeTrack<Event>),
    Vec2(KeyframeTrack<Vec2>),
    Vec3(KeyframeTrack<Vec3>),
    Quat(KeyframeTrack<Quat>),
    Color(KeyframeTrack<Color>),
    Float(KeyframeTrack<f32>),
    Int16(KeyframeTrack<i16>),
}

impl AnimData {
    #[inline]
    pub fn kind(&self) -> TrackKind {
        match self {
            AnimData::Event(_) => TrackKind::Event,
            AnimData::Vec2(_) => TrackKind::Vec2,
            AnimData::Vec3(_) => TrackKind::Vec3,
            AnimData::Quat(_) => TrackKind::Quat,
            AnimData::Color(_) => TrackKind::Color,
            AnimData::Float(_) => TrackKind::Float,
            AnimData::Int16(_) => TrackKind::Int16,
        }
    }
}

/// The end-of-clip event track: a single `Evt_SeqEnd` key at the clip's end.
pub fn clip_end_event(end_ms: i32) -> AnimData {
    AnimData::Event(KeyframeTrack {
        frames_ms: vec![end_ms],
        flags: 1,
        end_ms,
        keys: vec![Event {
            name: SEQUENCE_END_EVENT_NAME.to_string(),
            matrix: Matrix44::IDENTITY,
        }],
    })
}
