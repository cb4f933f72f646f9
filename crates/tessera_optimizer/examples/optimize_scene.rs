// Builds a small scene, optimizes it, packs a handful of textures and then
// restores everything, logging each step.  An optional first argument is a
// TOML file with optimizer settings.
//
//     cargo run -p tessera_optimizer --example optimize_scene -- tessera.toml

use tessera_optimizer::glam::{Quat, Vec3};
use tessera_optimizer::{
    primitives, Geometry, GeometryBuffer, Material, MeshOptimizer, OptimizerConfig, Scene,
    TextureImage, Vertex,
};

fn init_logging() -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

/// Logs what a front-end would upload for `buffer`: one interleaved vertex
/// stream plus an optional index stream.
fn log_upload(name: &str, buffer: &GeometryBuffer) {
    let vertices = buffer.interleaved();
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
    log::debug!(
        "{name}: {} vertices x {} B = {} B interleaved ({} B positions), {} B indices, {} B on the CPU",
        vertices.len(),
        Vertex::STRIDE,
        vertex_bytes.len(),
        buffer.position_bytes().len(),
        buffer.index_bytes().map_or(0, <[u8]>::len),
        buffer.byte_size()
    );
}

fn build_scene(textures: &[TextureImage]) -> Scene {
    let mut scene = Scene::new();
    let crate_mesh = Geometry::new(primitives::cube(1.0));
    let tile = Geometry::new(primitives::quad(2.0, 2.0));
    let wood = Material::new("wood").with_texture(textures[0].id());
    let stone = Material::new("stone").with_texture(textures[1].id());

    // a stack of crates: one instanced draw
    for i in 0..12 {
        scene
            .spawn(format!("crate{i}"), crate_mesh.clone(), wood.clone())
            .with_position(Vec3::new((i % 4) as f32 * 1.5, (i / 4) as f32, 0.0))
            .with_rotation(Quat::from_rotation_y(i as f32 * 0.2))
            .build();
    }
    // two floor tiles: one merged draw
    for i in 0..2 {
        scene
            .spawn(format!("tile{i}"), tile.clone(), stone.clone())
            .with_position(Vec3::new(i as f32 * 2.0, -0.5, 0.0))
            .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
            .build();
    }
    // a lone marker stays as it is
    scene
        .spawn("marker", Geometry::new(primitives::triangle()), Material::new("debug"))
        .build();
    scene
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = match std::env::args().nth(1) {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default().with_atlas_size(512),
    };

    let textures = vec![
        TextureImage::solid(256, 256, [150, 100, 50, 255])?,
        TextureImage::solid(128, 128, [120, 120, 120, 255])?,
        TextureImage::solid(200, 60, [255, 0, 0, 255])?,
        TextureImage::solid(600, 10, [0, 0, 255, 255])?,
    ];

    let mut optimizer = MeshOptimizer::with_config(build_scene(&textures), config)?;

    let atlas = optimizer.build_texture_atlas(&textures);
    for (id, rect) in atlas.regions() {
        log::info!(
            "{id}: uv ({:.3}, {:.3}) size ({:.3}, {:.3})",
            rect.u,
            rect.v,
            rect.width,
            rect.height
        );
    }

    let report = optimizer.optimize_all();
    log::info!(
        "saved {} draw calls; {} merged, {} instanced",
        report.stats.draw_calls_saved(),
        report.stats.batched_objects,
        report.stats.instanced_objects
    );
    for group in &report.instances {
        let buffer = group.instance_buffer(optimizer.config().instance_stride_alignment);
        log::info!(
            "{}: {} instances, {} bytes of instance data",
            group.id,
            buffer.len(),
            buffer.as_bytes().len()
        );
    }
    for object in optimizer.scene().visible() {
        log_upload(&object.name, object.geometry.buffer());
    }
    for warning in optimizer.warnings() {
        log::warn!("{warning}");
    }

    optimizer.restore_original_meshes();
    log::info!(
        "restored: {} objects, {} visible",
        optimizer.scene().len(),
        optimizer.scene().visible().count()
    );
    Ok(())
}
