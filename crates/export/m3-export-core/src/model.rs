//! In-memory object model handed to the binary writer.
//!
//! Only what the animation export touches is modelled; offsets and chunk
//! headers are the writer's business.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::anim_ref::AnimRef;
use crate::collection::SequenceTransformationCollection;
use crate::ids::AnimId;
use crate::value::{Boundings, Color, Matrix44, Quat, Vec2, Vec3, Vec4U8};

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SequenceFlags: u32 {
        const NOT_LOOPING = 0x1;
        const ALWAYS_GLOBAL = 0x2;
        const GLOBAL_IN_PREVIEWER = 0x8;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ParticleFlags: u32 {
        const SORT = 0x1;
        const COLLIDE_TERRAIN = 0x2;
        const COLLIDE_OBJECTS = 0x4;
        const SPAWN_ON_BOUNCE = 0x8;
        const USE_INNER_SHAPE = 0x10;
        const INHERIT_EMISSION_PARAMS = 0x20;
        const INHERIT_PARENT_VEL = 0x40;
        const SORT_BY_Z_HEIGHT = 0x80;
        const REVERSE_ITERATION = 0x100;
        const SMOOTH_ROTATION = 0x200;
        const BEZ_SMOOTH_ROTATION = 0x400;
        const SMOOTH_SIZE = 0x800;
        const BEZ_SMOOTH_SIZE = 0x1000;
        const SMOOTH_COLOR = 0x2000;
        const BEZ_SMOOTH_COLOR = 0x4000;
        const LIT_PARTS = 0x8000;
        const RAND_FLIP_BOOK_START = 0x10000;
        const MULTIPLY_BY_GRAVITY = 0x20000;
        const CLAMP_TAIL_PARTS = 0x40000;
        const SPAWN_TRAILING_PARTS = 0x80000;
        const USE_VERTEX_ALPHA = 0x200000;
        const MODEL_PARTS = 0x400000;
        const SWAP_YZ_ON_MODEL_PARTS = 0x800000;
        const SCALE_TIME_BY_PARENT = 0x1000000;
        const USE_LOCAL_TIME = 0x2000000;
        const SIMULATE_ON_INIT = 0x4000000;
        const COPY = 0x8000000;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MaterialFlags: u32 {
        const UNFOGGED = 0x4;
        const TWO_SIDED = 0x8;
        const UNSHADED = 0x10;
        const NO_SHADOWS_CAST = 0x20;
        const NO_HIT_TEST = 0x40;
        const NO_SHADOWS_RECEIVED = 0x80;
        const DEPTH_PREPASS = 0x100;
        const USE_TERRAIN_HDR = 0x200;
        const SPLAT_UV_FIX = 0x800;
        const SOFT_BLENDING = 0x1000;
        const FOR_PARTICLES = 0x4000;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LayerFlags: u32 {
        const TEXTURE_WRAP_X = 0x4;
        const TEXTURE_WRAP_Y = 0x8;
        const COLOR_ENABLED = 0x200;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LayerAlphaFlags: u32 {
        const ALPHA_AS_TEAM_COLOR = 0x1;
        const ALPHA_ONLY = 0x2;
        const ALPHA_BASED_SHADING = 0x4;
    }
}

/// SEQS: timing and playback flags of one clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub anim_start_ms: i32,
    pub anim_end_ms: i32,
    pub movement_speed: f32,
    pub flags: SequenceFlags,
    pub frequency: u32,
    pub bounding_sphere: Boundings,
}

/// STG: groups the transformation collections of one sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceTransformationGroup {
    pub name: String,
    pub stc_indices: Vec<u32>,
}

/// STS: the ids a sequence animates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceTransformationState {
    pub anim_ids: Vec<AnimId>,
}

/// IREF: inverse rest matrix of a bone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RestPosition {
    pub matrix: Matrix44,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub flags: u32,
    pub parent: i16,
    pub location: AnimRef<Vec3>,
    pub rotation: AnimRef<Quat>,
    pub scale: AnimRef<Vec3>,
    pub ar1: AnimRef<u32>,
}

/// PAR_: a particle emitter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub bone: u32,
    pub material_index: u32,
    pub init_emiss_speed: AnimRef<f32>,
    pub speed_var: AnimRef<f32>,
    pub speed_var_enabled: u32,
    pub angle_y: AnimRef<f32>,
    pub angle_x: AnimRef<f32>,
    pub speed_x: AnimRef<f32>,
    pub speed_y: AnimRef<f32>,
    pub lifespan: AnimRef<f32>,
    pub decay: AnimRef<f32>,
    pub decay_enabled: u32,
    pub emiss_speed2: f32,
    pub scale_ratio: f32,
    pub unknown_float1a: f32,
    pub unknown_float1b: f32,
    pub unknown_float1c: f32,
    pub pemit_scale: AnimRef<Vec3>,
    pub speed_unk1: AnimRef<Vec3>,
    pub color1a: AnimRef<Color>,
    pub color1b: AnimRef<Color>,
    pub color1c: AnimRef<Color>,
    pub emiss_speed3: f32,
    pub unknown_float2a: f32,
    pub unknown_float2b: f32,
    pub unknown_float2c: f32,
    pub trailing_enabled: u32,
    pub index_plus_highest_index: u32,
    pub max_particles: u32,
    pub emiss_rate: AnimRef<f32>,
    pub emission_type: u32,
    pub emiss_area: AnimRef<Vec3>,
    pub tail_unk1: AnimRef<Vec3>,
    pub pivot_spread: AnimRef<f32>,
    pub spread_unk: AnimRef<f32>,
    pub radial_emission_enabled: u32,
    pub pemit_scale2_enabled: u32,
    pub pemit_scale2: AnimRef<Vec3>,
    pub pemit_rotate_enabled: u32,
    pub pemit_rotate: AnimRef<Vec3>,
    pub color2_enabled: u32,
    pub color2a: AnimRef<Color>,
    pub color2b: AnimRef<Color>,
    pub color2c: AnimRef<Color>,
    pub part_emit: AnimRef<u16>,
    pub speed_unk2: Vec4U8,
    pub lifespan_ratio: f32,
    pub columns: u32,
    pub rows: u32,
    pub flags: ParticleFlags,
    pub ar1: AnimRef<f32>,
}

/// Layer slots of a standard material, in storage order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialLayerSlot {
    Diffuse,
    Decal,
    Specular,
    SelfIllumination,
    Emissive,
    Reflection,
    Evio,
    EvioMask,
    AlphaMask,
    Bump,
    Height,
}

impl MaterialLayerSlot {
    pub const ALL: [MaterialLayerSlot; 11] = [
        MaterialLayerSlot::Diffuse,
        MaterialLayerSlot::Decal,
        MaterialLayerSlot::Specular,
        MaterialLayerSlot::SelfIllumination,
        MaterialLayerSlot::Emissive,
        MaterialLayerSlot::Reflection,
        MaterialLayerSlot::Evio,
        MaterialLayerSlot::EvioMask,
        MaterialLayerSlot::AlphaMask,
        MaterialLayerSlot::Bump,
        MaterialLayerSlot::Height,
    ];
}

/// LAYR
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayer {
    pub image_path: String,
    pub color: AnimRef<Color>,
    pub flags: LayerFlags,
    pub uv_channel: u32,
    pub alpha_flags: LayerAlphaFlags,
    pub bright_mult: AnimRef<f32>,
    pub bright_mult2: AnimRef<f32>,
    pub unknown6: AnimRef<u32>,
    pub unknown7: AnimRef<Vec2>,
    pub unknown8: AnimRef<u16>,
    pub uv_offset: AnimRef<Vec2>,
    pub uv_angle: AnimRef<Vec3>,
    pub uv_tiling: AnimRef<Vec2>,
    pub unknown9: AnimRef<u32>,
    pub unknown10: AnimRef<f32>,
    pub brightness: AnimRef<f32>,
}

/// MAT_: standard material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub unknown0: u32,
    pub flags: MaterialFlags,
    pub blend_mode: u32,
    pub priority: i32,
    pub specularity: f32,
    pub spec_mult: f32,
    pub emis_mult: f32,
    pub layers: Vec<(MaterialLayerSlot, MaterialLayer)>,
    pub layer_blend_type: u32,
    pub emis_blend_type: u32,
    pub spec_type: u32,
    pub unknown_anim_ref1: AnimRef<u32>,
    pub unknown_anim_ref2: AnimRef<u32>,
}

impl Material {
    pub fn layer(&self, slot: MaterialLayerSlot) -> Option<&MaterialLayer> {
        self.layers
            .iter()
            .find_map(|(s, layer)| (*s == slot).then_some(layer))
    }
}

/// Material type of a standard material.
pub const MATERIAL_TYPE_STANDARD: u32 = 1;

/// MATM: typed index into one of the material lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialReference {
    pub material_type: u32,
    pub material_index: u32,
}

/// MSEC
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshSection {
    pub boundings_animation: AnimRef<Boundings>,
}

/// DIV_: geometry container; always empty here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub faces: Vec<u16>,
    pub sections: Vec<MeshSection>,
}

/// MODL: root of the exported object graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub model_name: String,
    pub flags: u32,
    pub vertex_flags: u32,
    pub skin_bone_count: u32,
    pub divisions: Vec<Division>,
    pub boundings: Boundings,
    pub bones: Vec<Bone>,
    pub absolute_inverse_bone_rest_positions: Vec<RestPosition>,
    pub sequences: Vec<Sequence>,
    pub sequence_transformation_collections: Vec<SequenceTransformationCollection>,
    pub sequence_transformation_groups: Vec<SequenceTransformationGroup>,
    pub sts: Vec<SequenceTransformationState>,
    pub particles: Vec<ParticleSystem>,
    pub standard_materials: Vec<Material>,
    pub material_references: Vec<MaterialReference>,
    pub matrix: Matrix44,
    pub unique_unknown_number: u32,
}

impl Model {
    /// Empty model with the header fields set; lists are filled by the exporter.
    pub fn new(model_name: impl Into<String>, flags: u32, vertex_flags: u32) -> Self {
        Self {
            model_name: model_name.into(),
            flags,
            vertex_flags,
            skin_bone_count: 0,
            divisions: Vec::new(),
            boundings: Boundings::empty(),
            bones: Vec::new(),
            absolute_inverse_bone_rest_positions: Vec::new(),
            sequences: Vec::new(),
            sequence_transformation_collections: Vec::new(),
            sequence_transformation_groups: Vec::new(),
            sts: Vec::new(),
            particles: Vec::new(),
            standard_materials: Vec::new(),
            material_references: Vec::new(),
            matrix: Matrix44::IDENTITY,
            unique_unknown_number: 0,
        }
    }
}

/// Export the model as serde_json::Value (inspection and debugging).
pub fn export_model_json(model: &Model) -> serde_json::Value {
    serde_json::to_value(model).unwrap_or(serde_json::Value::Null)
}
