//! Bevy test app builders.

use bevy::prelude::*;
use weldlab_core::config::LabConfig;
use weldlab_sim::LabCommand;

/// Full lab app built from `config`.
pub fn lab_test_app(config: LabConfig) -> App {
    let mut app = App::new();
    app.insert_resource(config);
    app.add_plugins(weldlab_sim::WeldLabSimPlugin);
    app.finish();
    app.cleanup();
    app
}

/// Queue a command for the next update.
pub fn send(app: &mut App, command: LabCommand) {
    app.world_mut().send_event(command);
}

/// Run `n` updates.
pub fn step_n(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}
