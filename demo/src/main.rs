use std::fs::File;
use std::path::PathBuf;

use gerber_composer::testing::scenes;
use gerber_composer::{import_reader, GerberWriter, Group, Node, PlotError, spacial::Coordinate};
use log::{info, warn};

fn main() -> Result<(), PlotError> {
    init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let writer = GerberWriter::default();

    let scenes: [(&str, Vec<Node>); 3] = [
        ("group_export.gbr", scenes::rosette()),
        ("primitives.gbr", scenes::primitive_sheet()),
        ("ring.gbr", scenes::ring()),
    ];

    for (name, nodes) in scenes {
        let path = output.join(name);
        writer.write_file(&path, &nodes)?;
        profiling::finish_frame!();
    }

    // read one back and place it twice, side by side
    let imported = import_reader(File::open(output.join("primitives.gbr"))?)?;
    for diagnostic in &imported.diagnostics {
        warn!("import diagnostic: {:?}", diagnostic);
    }
    info!("imported nodes: {}", imported.nodes.len());

    let panel: Vec<Node> = vec![
        Group::new(Coordinate::new(0, 0), 0.0, imported.nodes.clone()).into(),
        Group::new(Coordinate::new(20_000_000, 0), 90.0, imported.nodes).into(),
    ];
    writer.write_file(output.join("panel.gbr"), &panel)?;

    Ok(())
}

pub fn init() {
    env_logger::init(); // Log to stderr (optional).

    #[cfg(feature = "profile-with-puffin")]
    {
        start_puffin_server();
    }
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() {
    use log::error;

    profiling::puffin::set_scopes_on(true); // tell puffin to collect data

    match puffin_http::Server::new("127.0.0.1:8585") {
        Ok(puffin_server) => {
            info!("Run:  cargo install puffin_viewer && puffin_viewer --url 127.0.0.1:8585");

            // keep the server alive for the lifetime of the process
            std::mem::forget(puffin_server);
        }
        Err(err) => {
            error!("Failed to start puffin server: {err}");
        }
    };
}
