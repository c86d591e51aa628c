mod script;

use canvas::config::DemoConfig;
use canvas::demo::{mount_cursor_demo, mount_layout_demo};
use canvas::engine::EngineCore;

fn main() {
    tracing_subscriber::fmt::init();

    let config = DemoConfig::from_env().expect("invalid demo configuration");
    let mut core = EngineCore::new(&config);

    let demo = mount_layout_demo(&mut core.editor, &config.layout).expect("layout demo mount failed");
    let target = mount_cursor_demo(&mut core.editor).expect("cursor demo mount failed");
    core.editor.take_changes();
    tracing::info!(container_id = %demo.container_id, target_id = %target, "demos mounted");

    let steps = match &config.script {
        Some(path) => script::load(path).expect("failed to load script"),
        None => script::default_script(),
    };
    let totals = script::replay(&mut core, &steps);
    tracing::info!(
        steps = totals.steps,
        shape_writes = totals.shape_writes,
        binding_writes = totals.binding_writes,
        renders = totals.renders,
        "script finished"
    );

    let json = core.editor.snapshot().to_json().expect("snapshot serialization failed");
    println!("{json}");
}
