//! Export entry point: walks a [`HostScene`] once and builds the [`Model`].
//!
//! Order of one run:
//! 1. model header, empty division, placeholder boundings
//! 2. materials (and their layers)
//! 3. particle systems, each with a stub bone
//! 4. one sequence per clip, assembled from the tracks registered in 2 and 3
//!
//! Identities are allocated in exactly this order, so two runs over the same
//! scene produce identical models.

use std::path::Path;

use crate::anim_ref::AnimRef;
use crate::config::ExportConfig;
use crate::error::{ExportError, ExportWarning, Result};
use crate::fields::{
    layer_alpha_flags, layer_flags, material_flags, particle_flags, LAYER_FIELDS,
    LAYER_TRAILING_FIELDS, PARTICLE_SYSTEM_FIELDS,
};
use crate::ids::{IdAllocator, BOUNDINGS_ANIM_ID};
use crate::model::{
    Bone, Division, Material, MaterialLayer, MaterialLayerSlot, MaterialReference, MeshSection,
    Model, ParticleSystem, RestPosition, MATERIAL_TYPE_STANDARD,
};
use crate::scene::{HostScene, LayerProps, MaterialProps, OwnerType, ParticleSystemProps};
use crate::sequence::assemble_clip;
use crate::time::FrameTime;
use crate::transfer::{
    resolve_action_bindings, resolve_unique_by_name, ActionBinding, DataTransferer, ExportContext,
};
use crate::value::{Boundings, Quat, Vec2, Vec3, Vec4U8};

/// Prefix of the stub bone every particle system is attached to.
pub const PARTICLE_BONE_PREFIX: &str = "Star2Part";

/// `unknown0` of materials written by this exporter.
pub const MATERIAL_UNKNOWN0: u32 = 13;

/// Receives the finished model; the binary writer lives behind this.
pub trait ModelSink {
    type Error: std::fmt::Display;

    fn write_model(&mut self, model: &Model, path: &Path) -> std::result::Result<(), Self::Error>;
}

/// Builds models from host scenes.
///
/// Each call to [`Exporter::export`] is an independent run with its own
/// identity allocator; only the warnings of the last run are kept.
#[derive(Debug, Default)]
pub struct Exporter {
    config: ExportConfig,
    warnings: Vec<ExportWarning>,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Warnings raised by the last export.
    pub fn warnings(&self) -> &[ExportWarning] {
        &self.warnings
    }

    /// Build the model for `scene`. `path` only names the model.
    pub fn export<S: HostScene + ?Sized>(
        &mut self,
        scene: &S,
        path: impl AsRef<Path>,
    ) -> Result<Model> {
        self.warnings.clear();
        let time = FrameTime::new(scene.frame_rate())?;
        if time.fps() != self.config.expected_frame_rate {
            self.warn(ExportWarning::FrameRate {
                expected: self.config.expected_frame_rate,
                actual: time.fps(),
            });
        }

        let radius = self.config.bounding_radius;
        let mut model = Model::new(
            model_name(path.as_ref()),
            self.config.model_flags,
            self.config.vertex_flags,
        );
        model.divisions.push(empty_division());
        model.boundings = Boundings::almost_empty_with_radius(radius);

        let mut ctx = ExportContext::new(time, scene.clips());
        let bindings =
            resolve_action_bindings(scene, scene.name(), &OwnerType::Scene, &mut self.warnings);

        init_materials(&mut model, scene.materials(), &mut ctx, &bindings);
        init_particle_systems(&mut model, scene, &mut ctx, &bindings)?;

        let allocated = ctx.ids.allocated();
        for (clip, accumulator) in scene.clips().iter().zip(ctx.into_accumulators()) {
            assemble_clip(&mut model, clip, accumulator, &time, radius)?;
        }

        log::debug!(
            "exported '{}': {} materials, {} particle systems, {} sequences, {} ids",
            model.model_name,
            model.standard_materials.len(),
            model.particles.len(),
            model.sequences.len(),
            allocated
        );
        Ok(model)
    }

    /// Build the model and hand it to `sink`.
    pub fn export_to<S, K>(
        &mut self,
        scene: &S,
        path: impl AsRef<Path>,
        sink: &mut K,
    ) -> Result<Model>
    where
        S: HostScene + ?Sized,
        K: ModelSink + ?Sized,
    {
        let path = path.as_ref();
        let model = self.export(scene, path)?;
        sink.write_model(&model, path)
            .map_err(|e| ExportError::Sink(e.to_string()))?;
        Ok(model)
    }

    fn warn(&mut self, warning: ExportWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}

fn model_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn empty_division() -> Division {
    Division {
        faces: Vec::new(),
        sections: vec![MeshSection {
            boundings_animation: AnimRef::fixed(
                BOUNDINGS_ANIM_ID,
                Boundings::empty(),
                Boundings::empty(),
            ),
        }],
    }
}

fn static_bone_at_origin(ids: &mut IdAllocator, name: String) -> Bone {
    Bone {
        name,
        flags: 0,
        parent: -1,
        location: AnimRef::null(ids, Vec3::ZERO),
        rotation: AnimRef::null(ids, Quat::IDENTITY),
        scale: AnimRef::null(ids, Vec3::ONE),
        ar1: AnimRef::null(ids, 1),
    }
}

fn init_materials(
    model: &mut Model,
    materials: &[MaterialProps],
    ctx: &mut ExportContext,
    bindings: &[ActionBinding<'_>],
) {
    for (material_index, props) in materials.iter().enumerate() {
        model.material_references.push(MaterialReference {
            material_type: MATERIAL_TYPE_STANDARD,
            material_index: material_index as u32,
        });
        let material = create_material(material_index, props, ctx, bindings);
        model.standard_materials.push(material);
    }
}

fn create_material(
    material_index: usize,
    props: &MaterialProps,
    ctx: &mut ExportContext,
    bindings: &[ActionBinding<'_>],
) -> Material {
    if props.layers.len() > MaterialLayerSlot::ALL.len() {
        log::debug!(
            "material '{}': ignoring {} layers beyond the last slot",
            props.name,
            props.layers.len() - MaterialLayerSlot::ALL.len()
        );
    }
    let layers = MaterialLayerSlot::ALL
        .iter()
        .zip(&props.layers)
        .enumerate()
        .map(|(layer_index, (slot, layer))| {
            let prefix = format!("m3_materials[{material_index}].layers[{layer_index}].");
            (*slot, create_layer(layer, prefix, ctx, bindings))
        })
        .collect();

    Material {
        name: props.name.clone(),
        unknown0: MATERIAL_UNKNOWN0,
        flags: material_flags(props),
        blend_mode: props.blend_mode,
        priority: props.priority,
        specularity: props.specularity,
        spec_mult: props.spec_mult,
        emis_mult: props.emis_mult,
        layers,
        layer_blend_type: props.layer_blend_type,
        emis_blend_type: props.emis_blend_type,
        spec_type: props.spec_type,
        unknown_anim_ref1: AnimRef::null(&mut ctx.ids, 0),
        unknown_anim_ref2: AnimRef::null(&mut ctx.ids, 0),
    }
}

fn create_layer(
    props: &LayerProps,
    anim_path_prefix: String,
    ctx: &mut ExportContext,
    bindings: &[ActionBinding<'_>],
) -> MaterialLayer {
    let mut layer = MaterialLayer {
        image_path: props.image_path.clone(),
        flags: layer_flags(props),
        alpha_flags: layer_alpha_flags(props),
        ..MaterialLayer::default()
    };
    let mut transferer = DataTransferer::new(ctx, bindings, anim_path_prefix);
    transferer.transfer_all(LAYER_FIELDS, props, &mut layer);

    let ids = transferer.ids();
    layer.unknown6 = AnimRef::null(ids, 0);
    layer.unknown7 = AnimRef::null(ids, Vec2::new(0.0, 0.0));
    layer.unknown8 = AnimRef::null(ids, 0);
    layer.uv_offset = AnimRef::null(ids, Vec2::new(0.0, 0.0));
    layer.uv_angle = AnimRef::null(ids, Vec3::ZERO);
    layer.uv_tiling = AnimRef::null(ids, Vec2::new(1.0, 1.0));
    layer.unknown9 = AnimRef::null(ids, 0);
    layer.unknown10 = AnimRef::null(ids, 1.0);

    transferer.transfer_all(LAYER_TRAILING_FIELDS, props, &mut layer);
    layer
}

fn init_particle_systems<S: HostScene + ?Sized>(
    model: &mut Model,
    scene: &S,
    ctx: &mut ExportContext,
    bindings: &[ActionBinding<'_>],
) -> Result<()> {
    let systems = scene.particle_systems();
    for (index, props) in systems.iter().enumerate() {
        let bone = model.bones.len() as u32;
        let bone_name = format!("{PARTICLE_BONE_PREFIX}{}", props.bone_suffix);
        model.bones.push(static_bone_at_origin(&mut ctx.ids, bone_name));
        model
            .absolute_inverse_bone_rest_positions
            .push(RestPosition::default());

        let particle = create_particle_system(index, systems.len(), bone, props, ctx, bindings);
        let material_index = resolve_unique_by_name(
            scene.materials(),
            |m| m.name.as_str(),
            "material",
            &props.material_name,
            &props.name,
        )?;
        model.particles.push(ParticleSystem {
            material_index: material_index as u32,
            ..particle
        });
    }
    Ok(())
}

fn create_particle_system(
    index: usize,
    count: usize,
    bone: u32,
    props: &ParticleSystemProps,
    ctx: &mut ExportContext,
    bindings: &[ActionBinding<'_>],
) -> ParticleSystem {
    let mut particle = ParticleSystem {
        bone,
        index_plus_highest_index: (count - 1 + index) as u32,
        speed_unk2: Vec4U8::default(),
        flags: particle_flags(props),
        ..ParticleSystem::default()
    };
    DataTransferer::new(ctx, bindings, format!("m3_particle_systems[{index}]."))
        .transfer_all(PARTICLE_SYSTEM_FIELDS, props, &mut particle);
    particle.ar1 = AnimRef::with_null_value(&mut ctx.ids, 1.0, 0.0);
    particle
}
