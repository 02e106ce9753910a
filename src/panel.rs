// Control panel for Meadow-3D
//
// An egui window bound directly onto the scene state: view-mode switch,
// cow pose sliders, light controls, and a help section.

use crate::scene::{SceneState, ViewMode};

/// What the panel asks the host loop to do after this frame.
#[derive(Default)]
pub struct PanelResponse {
    pub exit: bool,
}

pub fn show(ctx: &egui::Context, scene: &mut SceneState) -> PanelResponse {
    let mut response = PanelResponse::default();

    egui::Window::new("Properties").show(ctx, |ui| {
        ui.radio_value(&mut scene.view_mode, ViewMode::Above, "Above mode");
        ui.radio_value(&mut scene.view_mode, ViewMode::CowEye, "Eye mode");

        ui.collapsing("Cow properties", |ui| {
            ui.add(
                egui::Slider::new(&mut scene.cow.head_horizontal_angle, -30.0..=30.0)
                    .text("head horizontal"),
            );
            ui.add(
                egui::Slider::new(&mut scene.cow.head_vertical_angle, -5.0..=50.0)
                    .text("head vertical"),
            );
            ui.add(
                egui::Slider::new(&mut scene.cow.tail_horizontal_angle, -25.0..=25.0)
                    .text("tail horizontal"),
            );
            ui.add(
                egui::Slider::new(&mut scene.cow.tail_vertical_angle, -14.0..=50.0)
                    .text("tail vertical"),
            );
        });

        ui.collapsing("Lights", |ui| {
            ui.add(
                egui::Slider::new(&mut scene.global_ambient, 0.0..=1.0)
                    .text("ambient light adjust"),
            );

            let mut pointlight_on = scene.pointlight.enabled;
            ui.checkbox(&mut pointlight_on, "Enable pointlight");
            if pointlight_on {
                scene.pointlight.enable();
            } else {
                scene.pointlight.disable();
            }
            ui.horizontal(|ui| {
                ui.color_edit_button_rgb(&mut scene.pointlight.color);
                ui.label("pointlight color");
            });
            ui.add(
                egui::Slider::new(&mut scene.pointlight.position.x, -10.0..=10.0)
                    .text("pointlight source x"),
            );
            ui.add(
                egui::Slider::new(&mut scene.pointlight.position.y, -10.0..=10.0)
                    .text("pointlight source y"),
            );
            ui.add(
                egui::Slider::new(&mut scene.pointlight.position.z, -10.0..=10.0)
                    .text("pointlight source z"),
            );

            let mut spotlight_on = scene.spotlight.enabled;
            ui.checkbox(&mut spotlight_on, "Enable spotlight");
            if spotlight_on {
                scene.spotlight.enable();
            } else {
                scene.spotlight.disable();
            }
            ui.horizontal(|ui| {
                ui.color_edit_button_rgb(&mut scene.spotlight.color);
                ui.label("spotlight color");
            });
            ui.add(
                egui::Slider::new(&mut scene.spotlight.position.x, -10.0..=10.0)
                    .text("spotlight source x"),
            );
            ui.add(
                egui::Slider::new(&mut scene.spotlight.position.y, -10.0..=10.0)
                    .text("spotlight source y"),
            );
            ui.add(
                egui::Slider::new(&mut scene.spotlight.position.z, -10.0..=10.0)
                    .text("spotlight source z"),
            );
            ui.add(
                egui::Slider::new(&mut scene.spotlight.target.x, -10.0..=10.0)
                    .text("spotlight target x"),
            );
            ui.add(
                egui::Slider::new(&mut scene.spotlight.target.y, -10.0..=10.0)
                    .text("spotlight target y"),
            );
            ui.add(
                egui::Slider::new(&mut scene.spotlight.target.z, -10.0..=10.0)
                    .text("spotlight target z"),
            );
            ui.add(egui::Slider::new(&mut scene.spotlight.cutoff, 0.0..=90.0).text("spotlight cutoff"));
            ui.add(
                egui::Slider::new(&mut scene.spotlight.exponent, 0.0..=90.0)
                    .text("spotlight exponent"),
            );
        });

        ui.collapsing("Help (Change views, Movement & adjust lights)", |ui| {
            ui.label("Viewing modes:");
            ui.label(
                "Two viewing modes exist: 'Above mode' and 'Eye mode'. The camera \
                 governs the external above view, whereas the cow's head position \
                 and rotation control the eye view.",
            );
            ui.separator();

            ui.label("Keyboard control:");
            ui.label("Arrow keys move the cow, 'w'/'s'/'a'/'d' move the camera:");
            ui.label("• UP Arrow: move the cow forward.");
            ui.label("• DOWN Arrow: move the cow backward.");
            ui.label("• LEFT Arrow: rotate the cow to the left.");
            ui.label("• RIGHT Arrow: rotate the cow to the right.");
            ui.label("• 'W': move the camera upward.");
            ui.label("• 'S': move the camera downward.");
            ui.label("• 'A': rotate the camera counterclockwise.");
            ui.label("• 'D': rotate the camera clockwise.");
            ui.label(
                "Note: the cow cannot move through the lake or the farmhouse. \
                 The camera's maximum height is 30 units and it cannot move \
                 below ground level.",
            );
            ui.separator();

            ui.label("Lights section:");
            ui.label(
                "The pointlight and spotlight can be toggled on or off, \
                 recolored and repositioned; the spotlight also exposes its \
                 target, cutoff and exponent. Global ambient intensity is \
                 adjusted with 'ambient light adjust'.",
            );
        });

        if ui.button("Exit").clicked() {
            response.exit = true;
        }
    });

    response
}
