//! Hearth 无窗口运行器
//!
//! 加载配置与模型，构建场景，然后用命令记录渲染器模拟若干帧。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用 config.toml / scene.toml
//! cargo run
//!
//! # 命令行覆盖
//! cargo run -- --model assets/models/cube.obj --frames 300 --fov 75
//! ```
//!
//! # 命令行参数
//!
//! - `--model <path>`: 要加载的模型
//! - `--frames <n>`: 模拟的帧数
//! - `--width <value>` / `--height <value>`: 用于计算宽高比的窗口尺寸
//! - `--fov <value>`: 垂直视场角（度数）

use std::path::Path;

use anyhow::Context;
use hearth::core::{log, Config, KeyboardState, SceneConfig};
use hearth::import::import_scene;
use hearth::module::ModuleCamera;
use hearth::renderer::{CommandRecorder, TextureRegistry};
use hearth::scene::Scene;
use hearth::app_info;

fn main() -> anyhow::Result<()> {
    // 1. 加载配置（在初始化日志之前）
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(&args);
    config.validate().context("Invalid configuration")?;

    // 2. 初始化日志系统
    log::init_from_config(&config.logging);
    app_info!(version = env!("CARGO_PKG_VERSION"), "Hearth starting...");

    // 3. 场景配置
    let mut scene_config = SceneConfig::from_file_or_default("scene.toml");
    scene_config.apply_args(&args);
    app_info!(
        model = %scene_config.model.path,
        frames = scene_config.frames,
        delta_time = scene_config.delta_time,
        "Scene configuration"
    );

    // 4. 导入模型并构建场景
    let model_path = Path::new(&scene_config.model.path);
    let imported = import_scene(model_path)
        .with_context(|| format!("Failed to import '{}'", model_path.display()))?;
    let folder = model_path.parent().unwrap_or(Path::new("."));

    let mut scene = Scene::new();
    let mut textures = TextureRegistry::new();
    let model = scene
        .load_model(&imported, folder, &mut textures)
        .context("Failed to build scene")?;

    let transform = &scene_config.model.transform;
    if let Some(obj) = scene.get_mut(model) {
        obj.set_local_transform(transform.position(), transform.scale(), transform.rotation());
    }
    scene.update_global_transforms(model)?;

    // 5. 相机
    let mut camera = ModuleCamera::from_config(&config);
    camera.on_window_resized(config.window.width, config.window.height);
    let keyboard = KeyboardState::new();

    // 6. 帧循环
    let mut recorder = CommandRecorder::new();
    let mut draw_calls = 0;

    for frame in 0..scene_config.frames {
        let _span = hearth::span_frame!(frame).entered();

        camera.update(&keyboard, scene_config.delta_time);
        scene.update(scene_config.delta_time)?;

        recorder.clear();
        scene.draw(&mut recorder, camera.frustum());
        draw_calls += recorder.draw_call_count();
    }

    app_info!(
        objects = scene.len(),
        textures = textures.len(),
        frames = scene_config.frames,
        draw_calls,
        "Simulation finished"
    );

    Ok(())
}
