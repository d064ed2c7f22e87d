use nav_octree::prelude::*;

use std::error::Error;

/// Writes a value into a fresh in-memory field and reads it back.
///
/// Usage: `probe_field [SETTINGS.toml]`. Set `RUST_LOG=debug` to see the octree's subdivisions.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading settings from {}", path);
            OctreeSettings::from_path(&path)?
        }
        None => OctreeSettings::default(),
    };

    let mut octree = SparseOctree::new(settings, SlabAddressSpace::new())?;
    println!(
        "field size = {}, step = {}, max depth = {}\n",
        settings.field_size,
        settings.step,
        octree.max_depth()
    );

    let probe = PointN([14.0, 0.25, 50.4]);
    octree.set(probe, 1234)?;
    tracing::info!(%probe, "wrote probe value");

    let far = PointN([-1000.0, -1000.0, -1000.0]);
    println!("get {} = {:?}", probe, octree.get(probe)?);
    println!("get {} = {:?}", far, octree.get(far)?);
    println!("nodes in use = {}", octree.address_space().num_nodes());

    Ok(())
}
