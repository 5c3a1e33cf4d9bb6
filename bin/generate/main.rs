use grotto::{Cave, Config};

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match Config::read_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No config file given, using defaults");
            Config::default()
        }
    };

    let mut cave = Cave::new(config);
    let stats = cave.generate();

    println!("chunks: {} kept of {} candidates ({} culled, {} empty)", stats.kept, stats.candidates, stats.culled, stats.empty);
    println!("triangles: {}", stats.triangles);
    println!("elapsed: {:?}", stats.elapsed);
    if let Some(skeleton) = cave.skeleton() {
        println!("skeleton: {} branches, {} points", skeleton.branches().len(), skeleton.num_points());
    }
    let rays = cave.plan_decorations();
    if !rays.is_empty() {
        println!("decoration rays: {}", rays.len());
    }
}
