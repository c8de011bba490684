//! Host scene interface: what the authoring tool supplies to the exporter.
//!
//! Adapters implement [`HostScene`], [`Action`] and [`Curve`] over the tool's own
//! scene graph. The per-object property structs are plain data copied out of the tool.

use serde::{Deserialize, Serialize};

/// Authored f-curve for one component of one property.
pub trait Curve {
    fn evaluate(&self, frame: f32) -> f32;
}

/// Datablock type an action was authored for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerType {
    Scene,
    Object,
    Material,
    #[serde(untagged)]
    Other(String),
}

/// A set of curves keyed by (data path, array index).
pub trait Action {
    fn id_root(&self) -> OwnerType;
    fn curve(&self, data_path: &str, array_index: usize) -> Option<&dyn Curve>;
}

/// Trait for the authoring-tool scene the exporter walks.
pub trait HostScene {
    fn name(&self) -> &str;
    fn frame_rate(&self) -> u32;
    fn clips(&self) -> &[Clip];
    fn particle_systems(&self) -> &[ParticleSystemProps];
    fn materials(&self) -> &[MaterialProps];
    fn action(&self, name: &str) -> Option<&dyn Action>;
}

/// Binds an action to a target (by name) for one clip.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedAction {
    pub target_name: String,
    pub action_name: String,
}

/// A named, frame-bounded animation clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Clip {
    pub name: String,
    pub start_frame: i32,
    /// Exclusive.
    pub end_frame: i32,
    pub movement_speed: f32,
    pub not_looping: bool,
    pub always_global: bool,
    pub global_in_previewer: bool,
    pub frequency: u32,
    pub assigned_actions: Vec<AssignedAction>,
}

impl Default for Clip {
    fn default() -> Self {
        Self {
            name: String::new(),
            start_frame: 0,
            end_frame: 0,
            movement_speed: 0.0,
            not_looping: false,
            always_global: false,
            global_in_previewer: false,
            frequency: 1,
            assigned_actions: Vec::new(),
        }
    }
}

/// Particle system properties as authored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleSystemProps {
    pub name: String,
    pub bone_suffix: String,
    pub material_name: String,

    pub init_emiss_speed: f32,
    pub speed_var: f32,
    pub speed_var_enabled: bool,
    pub angle_y: f32,
    pub angle_x: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub lifespan: f32,
    pub decay: f32,
    pub decay_enabled: bool,
    pub emiss_speed2: f32,
    pub scale_ratio: f32,
    pub unknown_float1a: f32,
    pub unknown_float1b: f32,
    pub unknown_float1c: f32,
    pub pemit_scale: [f32; 3],
    pub speed_unk1: [f32; 3],
    pub color1a: [f32; 4],
    pub color1b: [f32; 4],
    pub color1c: [f32; 4],
    pub emiss_speed3: f32,
    pub unknown_float2a: f32,
    pub unknown_float2b: f32,
    pub unknown_float2c: f32,
    pub trailing_enabled: bool,
    pub max_particles: u32,
    pub emiss_rate: f32,
    #[serde(rename = "type")]
    pub emission_type: u32,
    pub emiss_area: [f32; 3],
    pub tail_unk1: [f32; 3],
    pub pivot_spread: f32,
    pub spread_unk: f32,
    pub radial_emission_enabled: bool,
    pub pemit_scale2_enabled: bool,
    pub pemit_scale2: [f32; 3],
    pub pemit_rotate_enabled: bool,
    pub pemit_rotate: [f32; 3],
    pub color2_enabled: bool,
    pub color2a: [f32; 4],
    pub color2b: [f32; 4],
    pub color2c: [f32; 4],
    pub part_emit: u16,
    pub lifespan_ratio: f32,
    pub columns: u32,
    pub rows: u32,

    pub sort: bool,
    pub collide_terrain: bool,
    pub collide_objects: bool,
    pub spawn_on_bounce: bool,
    pub use_inner_shape: bool,
    pub inherit_emission_params: bool,
    pub inherit_parent_vel: bool,
    pub sort_by_z_height: bool,
    pub reverse_iteration: bool,
    pub smooth_rotation: bool,
    pub bez_smooth_rotation: bool,
    pub smooth_size: bool,
    pub bez_smooth_size: bool,
    pub smooth_color: bool,
    pub bez_smooth_color: bool,
    pub lit_parts: bool,
    pub rand_flip_book_start: bool,
    pub multiply_by_gravity: bool,
    pub clamp_tail_parts: bool,
    pub spawn_trailing_parts: bool,
    pub use_vertex_alpha: bool,
    pub model_parts: bool,
    #[serde(rename = "swapYZonModelParts")]
    pub swap_yz_on_model_parts: bool,
    pub scale_time_by_parent: bool,
    pub use_local_time: bool,
    pub simulate_on_init: bool,
    pub copy: bool,
}

impl Default for ParticleSystemProps {
    fn default() -> Self {
        const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
        Self {
            name: String::new(),
            bone_suffix: String::new(),
            material_name: String::new(),
            init_emiss_speed: 0.0,
            speed_var: 0.0,
            speed_var_enabled: false,
            angle_y: 0.0,
            angle_x: 0.0,
            speed_x: 0.0,
            speed_y: 0.0,
            lifespan: 0.5,
            decay: 0.0,
            decay_enabled: false,
            emiss_speed2: 0.0,
            scale_ratio: 2.0,
            unknown_float1a: 0.0,
            unknown_float1b: 1.0,
            unknown_float1c: 1.0,
            pemit_scale: [1.0, 1.0, 1.0],
            speed_unk1: [1.0, 1.0, 1.0],
            color1a: WHITE,
            color1b: WHITE,
            color1c: WHITE,
            emiss_speed3: 1.0,
            unknown_float2a: 0.0,
            unknown_float2b: 0.0,
            unknown_float2c: 0.0,
            trailing_enabled: false,
            max_particles: 20,
            emiss_rate: 10.0,
            emission_type: 0,
            emiss_area: [0.1, 0.1, 0.1],
            tail_unk1: [0.0, 0.0, 0.0],
            pivot_spread: 0.0,
            spread_unk: 0.0,
            radial_emission_enabled: false,
            pemit_scale2_enabled: false,
            pemit_scale2: [1.0, 1.0, 1.0],
            pemit_rotate_enabled: false,
            pemit_rotate: [0.0, 0.0, 0.0],
            color2_enabled: false,
            color2a: WHITE,
            color2b: WHITE,
            color2c: WHITE,
            part_emit: 0,
            lifespan_ratio: 1.0,
            columns: 0,
            rows: 0,
            sort: false,
            collide_terrain: false,
            collide_objects: false,
            spawn_on_bounce: false,
            use_inner_shape: false,
            inherit_emission_params: false,
            inherit_parent_vel: false,
            sort_by_z_height: false,
            reverse_iteration: false,
            smooth_rotation: false,
            bez_smooth_rotation: false,
            smooth_size: false,
            bez_smooth_size: false,
            smooth_color: false,
            bez_smooth_color: false,
            lit_parts: false,
            rand_flip_book_start: false,
            multiply_by_gravity: false,
            clamp_tail_parts: false,
            spawn_trailing_parts: false,
            use_vertex_alpha: false,
            model_parts: false,
            swap_yz_on_model_parts: false,
            scale_time_by_parent: false,
            use_local_time: false,
            simulate_on_init: false,
            copy: false,
        }
    }
}

/// Material properties as authored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialProps {
    pub name: String,
    pub unfogged: bool,
    pub two_sided: bool,
    pub unshaded: bool,
    pub no_shadows_cast: bool,
    pub no_hit_test: bool,
    pub no_shadows_received: bool,
    pub depth_prepass: bool,
    #[serde(rename = "useTerrainHDR")]
    pub use_terrain_hdr: bool,
    #[serde(rename = "splatUVfix")]
    pub splat_uv_fix: bool,
    pub soft_blending: bool,
    pub for_particles: bool,
    pub blend_mode: u32,
    pub priority: i32,
    pub specularity: f32,
    pub spec_mult: f32,
    pub emis_mult: f32,
    /// In slot order; extra layers beyond the format's slots are ignored.
    pub layers: Vec<LayerProps>,
    pub layer_blend_type: u32,
    pub emis_blend_type: u32,
    pub spec_type: u32,
}

/// Material layer properties as authored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerProps {
    pub image_path: String,
    pub color: [f32; 4],
    pub texture_wrap_x: bool,
    pub texture_wrap_y: bool,
    pub color_enabled: bool,
    pub uv_channel: u32,
    pub alpha_as_team_color: bool,
    pub alpha_only: bool,
    pub alpha_based_shading: bool,
    pub bright_mult: f32,
    pub bright_mult2: f32,
    pub brightness: f32,
}

impl Default for LayerProps {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            color: [1.0, 1.0, 1.0, 1.0],
            texture_wrap_x: true,
            texture_wrap_y: true,
            color_enabled: false,
            uv_channel: 0,
            alpha_as_team_color: false,
            alpha_only: false,
            alpha_based_shading: false,
            bright_mult: 1.0,
            bright_mult2: 1.0,
            brightness: 1.0,
        }
    }
}
