// Meadow-3D: a small pastoral 3D scene in Rust
//
// A cow in a fenced meadow with a farmhouse, a lake, a forest and a wheat
// field, lit by a sweeping point light and an adjustable spotlight. Arrow
// keys steer the cow, w/s/a/d move the camera, and a control panel exposes
// the scene's knobs.

// Module declarations
mod camera;
mod cow;
mod draw;
mod forest;
mod lights;
mod math;
mod panel;
mod renderer;
mod scene;
mod scenery;
mod wheat;

use winit::event_loop::EventLoop;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");

    // Create renderer
    let renderer = renderer::Renderer::new(&event_loop).await;

    // Run the renderer
    renderer.run(event_loop);
}
