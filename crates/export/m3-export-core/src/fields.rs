//! Field tables and flag words of the exported record kinds.
//!
//! Table order is the order identities are allocated in, so it is part of the
//! output format; append new fields where the game expects them, not alphabetically.

use crate::model::{
    LayerAlphaFlags, LayerFlags, MaterialFlags, MaterialLayer, ParticleFlags, ParticleSystem,
};
use crate::scene::{LayerProps, MaterialProps, ParticleSystemProps};
use crate::transfer::FieldTransfer;

macro_rules! field {
    ($kind:ident, $name:literal, $field:ident) => {
        FieldTransfer::$kind {
            name: $name,
            get: |s| s.$field,
            set: |t, v| t.$field = v,
        }
    };
}

pub const PARTICLE_SYSTEM_FIELDS: &[FieldTransfer<ParticleSystemProps, ParticleSystem>] = &[
    field!(AnimatableFloat, "initEmissSpeed", init_emiss_speed),
    field!(AnimatableFloat, "speedVar", speed_var),
    field!(BoolToInt, "speedVarEnabled", speed_var_enabled),
    field!(AnimatableFloat, "angleY", angle_y),
    field!(AnimatableFloat, "angleX", angle_x),
    field!(AnimatableFloat, "speedX", speed_x),
    field!(AnimatableFloat, "speedY", speed_y),
    field!(AnimatableFloat, "lifespan", lifespan),
    field!(AnimatableFloat, "decay", decay),
    field!(BoolToInt, "decayEnabled", decay_enabled),
    field!(Float, "emissSpeed2", emiss_speed2),
    field!(Float, "scaleRatio", scale_ratio),
    field!(Float, "unknownFloat1a", unknown_float1a),
    field!(Float, "unknownFloat1b", unknown_float1b),
    field!(Float, "unknownFloat1c", unknown_float1c),
    field!(AnimatableVec3, "pemitScale", pemit_scale),
    field!(AnimatableVec3, "speedUnk1", speed_unk1),
    field!(AnimatableColor, "color1a", color1a),
    field!(AnimatableColor, "color1b", color1b),
    field!(AnimatableColor, "color1c", color1c),
    field!(Float, "emissSpeed3", emiss_speed3),
    field!(Float, "unknownFloat2a", unknown_float2a),
    field!(Float, "unknownFloat2b", unknown_float2b),
    field!(Float, "unknownFloat2c", unknown_float2c),
    field!(BoolToInt, "trailingEnabled", trailing_enabled),
    field!(Int, "maxParticles", max_particles),
    field!(AnimatableFloat, "emissRate", emiss_rate),
    field!(Enum, "type", emission_type),
    field!(AnimatableVec3, "emissArea", emiss_area),
    field!(AnimatableVec3, "tailUnk1", tail_unk1),
    field!(AnimatableFloat, "pivotSpread", pivot_spread),
    field!(AnimatableFloat, "spreadUnk", spread_unk),
    field!(BoolToInt, "radialEmissionEnabled", radial_emission_enabled),
    field!(BoolToInt, "pemitScale2Enabled", pemit_scale2_enabled),
    field!(AnimatableVec3, "pemitScale2", pemit_scale2),
    field!(BoolToInt, "pemitRotateEnabled", pemit_rotate_enabled),
    field!(AnimatableVec3, "pemitRotate", pemit_rotate),
    field!(BoolToInt, "color2Enabled", color2_enabled),
    field!(AnimatableColor, "color2a", color2a),
    field!(AnimatableColor, "color2b", color2b),
    field!(AnimatableColor, "color2c", color2c),
    field!(AnimatableUInt16, "partEmit", part_emit),
    field!(Float, "lifespanRatio", lifespan_ratio),
    field!(Int, "columns", columns),
    field!(Int, "rows", rows),
];

/// Layer fields transferred before the layer's constant references.
pub const LAYER_FIELDS: &[FieldTransfer<LayerProps, MaterialLayer>] = &[
    field!(AnimatableColor, "color", color),
    field!(Int, "uvChannel", uv_channel),
    field!(AnimatableFloat, "brightMult", bright_mult),
    field!(AnimatableFloat, "brightMult2", bright_mult2),
];

/// Layer fields transferred after the constant references.
pub const LAYER_TRAILING_FIELDS: &[FieldTransfer<LayerProps, MaterialLayer>] =
    &[field!(AnimatableFloat, "brightness", brightness)];

pub fn particle_flags(p: &ParticleSystemProps) -> ParticleFlags {
    let mut flags = ParticleFlags::empty();
    for (flag, on) in [
        (ParticleFlags::SORT, p.sort),
        (ParticleFlags::COLLIDE_TERRAIN, p.collide_terrain),
        (ParticleFlags::COLLIDE_OBJECTS, p.collide_objects),
        (ParticleFlags::SPAWN_ON_BOUNCE, p.spawn_on_bounce),
        (ParticleFlags::USE_INNER_SHAPE, p.use_inner_shape),
        (ParticleFlags::INHERIT_EMISSION_PARAMS, p.inherit_emission_params),
        (ParticleFlags::INHERIT_PARENT_VEL, p.inherit_parent_vel),
        (ParticleFlags::SORT_BY_Z_HEIGHT, p.sort_by_z_height),
        (ParticleFlags::REVERSE_ITERATION, p.reverse_iteration),
        (ParticleFlags::SMOOTH_ROTATION, p.smooth_rotation),
        (ParticleFlags::BEZ_SMOOTH_ROTATION, p.bez_smooth_rotation),
        (ParticleFlags::SMOOTH_SIZE, p.smooth_size),
        (ParticleFlags::BEZ_SMOOTH_SIZE, p.bez_smooth_size),
        (ParticleFlags::SMOOTH_COLOR, p.smooth_color),
        (ParticleFlags::BEZ_SMOOTH_COLOR, p.bez_smooth_color),
        (ParticleFlags::LIT_PARTS, p.lit_parts),
        (ParticleFlags::RAND_FLIP_BOOK_START, p.rand_flip_book_start),
        (ParticleFlags::MULTIPLY_BY_GRAVITY, p.multiply_by_gravity),
        (ParticleFlags::CLAMP_TAIL_PARTS, p.clamp_tail_parts),
        (ParticleFlags::SPAWN_TRAILING_PARTS, p.spawn_trailing_parts),
        (ParticleFlags::USE_VERTEX_ALPHA, p.use_vertex_alpha),
        (ParticleFlags::MODEL_PARTS, p.model_parts),
        (ParticleFlags::SWAP_YZ_ON_MODEL_PARTS, p.swap_yz_on_model_parts),
        (ParticleFlags::SCALE_TIME_BY_PARENT, p.scale_time_by_parent),
        (ParticleFlags::USE_LOCAL_TIME, p.use_local_time),
        (ParticleFlags::SIMULATE_ON_INIT, p.simulate_on_init),
        (ParticleFlags::COPY, p.copy),
    ] {
        flags.set(flag, on);
    }
    flags
}

pub fn material_flags(m: &MaterialProps) -> MaterialFlags {
    let mut flags = MaterialFlags::empty();
    for (flag, on) in [
        (MaterialFlags::UNFOGGED, m.unfogged),
        (MaterialFlags::TWO_SIDED, m.two_sided),
        (MaterialFlags::UNSHADED, m.unshaded),
        (MaterialFlags::NO_SHADOWS_CAST, m.no_shadows_cast),
        (MaterialFlags::NO_HIT_TEST, m.no_hit_test),
        (MaterialFlags::NO_SHADOWS_RECEIVED, m.no_shadows_received),
        (MaterialFlags::DEPTH_PREPASS, m.depth_prepass),
        (MaterialFlags::USE_TERRAIN_HDR, m.use_terrain_hdr),
        (MaterialFlags::SPLAT_UV_FIX, m.splat_uv_fix),
        (MaterialFlags::SOFT_BLENDING, m.soft_blending),
        (MaterialFlags::FOR_PARTICLES, m.for_particles),
    ] {
        flags.set(flag, on);
    }
    flags
}

pub fn layer_flags(l: &LayerProps) -> LayerFlags {
    let mut flags = LayerFlags::empty();
    flags.set(LayerFlags::TEXTURE_WRAP_X, l.texture_wrap_x);
    flags.set(LayerFlags::TEXTURE_WRAP_Y, l.texture_wrap_y);
    flags.set(LayerFlags::COLOR_ENABLED, l.color_enabled);
    flags
}

pub fn layer_alpha_flags(l: &LayerProps) -> LayerAlphaFlags {
    let mut flags = LayerAlphaFlags::empty();
    flags.set(LayerAlphaFlags::ALPHA_AS_TEAM_COLOR, l.alpha_as_team_color);
    flags.set(LayerAlphaFlags::ALPHA_ONLY, l.alpha_only);
    flags.set(LayerAlphaFlags::ALPHA_BASED_SHADING, l.alpha_based_shading);
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn field_names_are_unique_per_table() {
        let names: HashSet<&str> = PARTICLE_SYSTEM_FIELDS.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), PARTICLE_SYSTEM_FIELDS.len());
        let layer: HashSet<&str> = LAYER_FIELDS
            .iter()
            .chain(LAYER_TRAILING_FIELDS)
            .map(|f| f.name())
            .collect();
        assert_eq!(layer.len(), 5);
    }

    #[test]
    fn particle_table_animatable_count() {
        let animatable = PARTICLE_SYSTEM_FIELDS
            .iter()
            .filter(|f| f.is_animatable())
            .count();
        // 11 floats, 6 vectors, 6 colors, partEmit.
        assert_eq!(animatable, 24);
    }

    #[test]
    fn flag_words_follow_bools() {
        let p = ParticleSystemProps {
            sort: true,
            swap_yz_on_model_parts: true,
            copy: true,
            ..ParticleSystemProps::default()
        };
        assert_eq!(
            particle_flags(&p),
            ParticleFlags::SORT | ParticleFlags::SWAP_YZ_ON_MODEL_PARTS | ParticleFlags::COPY
        );

        let l = LayerProps {
            texture_wrap_y: false,
            alpha_only: true,
            ..LayerProps::default()
        };
        assert_eq!(layer_flags(&l), LayerFlags::TEXTURE_WRAP_X);
        assert_eq!(layer_alpha_flags(&l), LayerAlphaFlags::ALPHA_ONLY);

        let m = MaterialProps {
            unshaded: true,
            for_particles: true,
            ..MaterialProps::default()
        };
        assert_eq!(
            material_flags(&m),
            MaterialFlags::UNSHADED | MaterialFlags::FOR_PARTICLES
        );
    }
}
