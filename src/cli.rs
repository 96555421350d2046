use anyhow::Context as _;
use log::{LevelFilter, info};
use rayfield::{
    Scene,
    geometry::{WorldPoint, WorldTransform, WorldVector},
    place_primitives,
    scene::{Mesh, MeshRegistry, PlacementSettings},
};
use simplelog::{ColorChoice, Config, TerminalMode, TermLogger};

/// Rolling terrain patch in the XZ plane, `cells` x `cells` quads of size 1.
fn height_field(cells: u32) -> anyhow::Result<Mesh> {
    let row = cells + 1;
    let vertices = (0..row)
        .flat_map(|z| {
            (0..row).map(move |x| {
                let (fx, fz) = (x as f32, z as f32);
                WorldPoint::new(fx, 0.5 * (0.4 * fx).sin() * (0.3 * fz).cos(), fz)
            })
        })
        .collect();
    let indices = (0..cells)
        .flat_map(|z| (0..cells).map(move |x| z * row + x))
        .flat_map(|i| [i, i + row, i + 1, i + 1, i + row, i + row + 1])
        .collect();

    Mesh::new(vertices, indices).context("Generating height field")
}

fn main() -> anyhow::Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let settings = PlacementSettings::builder().build()?;
    let primitives = place_primitives(&settings);
    info!(
        "Placed {} spheres and {} cubes",
        primitives.spheres().len(),
        primitives.cubes().len()
    );

    let mut meshes = MeshRegistry::new();
    let terrain = height_field(24)?;
    meshes.register(terrain.clone().with_transform(WorldTransform::new_translation(
        &WorldVector::new(-60.0, 0.0, -60.0),
    )));
    meshes.register(terrain.with_transform(WorldTransform::new_translation(
        &WorldVector::new(40.0, 0.0, 30.0),
    )));

    let batch = meshes
        .take_rebuild()
        .context("Mesh registry reported no changes")?;
    let scene = Scene::new(primitives, batch)?;
    if let Some(bvh) = scene.bvh() {
        bvh.log_statistics();
        bvh.log_tree();
    }
    if let Some(bounds) = scene.bounding_box() {
        info!("Scene bounds: {:?} - {:?}", bounds.min, bounds.max);
    }

    let data = scene.gpu_data();
    info!("Spheres: {} B", data.spheres_bytes().len());
    info!("Cubes: {} B", data.cubes_bytes().len());
    info!("Mesh objects: {} B", data.mesh_objects_bytes().len());
    info!("Vertices: {} B", data.vertices_bytes().len());
    info!("Indices: {} B", data.indices_bytes().len());
    info!("BVH nodes: {} B", data.bvh_nodes_bytes().len());
    info!("Total: {} B", data.total_bytes());

    Ok(())
}
