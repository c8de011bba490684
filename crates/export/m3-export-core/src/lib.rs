//! M3 Export Core (host-agnostic)
//!
//! Turns an authored scene (clips, particle systems, materials and the actions
//! animating them) into the in-memory M3 object model: animation references on
//! every exported field, per-clip keyframe tracks, and the sequence /
//! transformation-collection records that tie them together. Writing the
//! binary file is left to a [`ModelSink`].

pub mod anim_ref;
pub mod collection;
pub mod config;
pub mod error;
pub mod exporter;
pub mod fields;
pub mod ids;
pub mod json_scene;
pub mod model;
pub mod sampling;
pub mod scene;
pub mod sequence;
pub mod time;
pub mod track;
pub mod transfer;
pub mod value;

// Re-exports for hosts and adapters
pub use anim_ref::{AnimRef, AnimRefHeader};
pub use collection::SequenceTransformationCollection;
pub use config::ExportConfig;
pub use error::{ExportError, ExportWarning, Result};
pub use exporter::{Exporter, ModelSink};
pub use ids::{AnimId, IdAllocator};
pub use json_scene::{parse_scene_json, JsonScene};
pub use model::{export_model_json, Model};
pub use scene::{
    Action, AssignedAction, Clip, Curve, HostScene, LayerProps, MaterialProps, OwnerType,
    ParticleSystemProps,
};
pub use time::FrameTime;
pub use track::{AnimData, CompositeRef, KeyframeTrack, TrackKind};
