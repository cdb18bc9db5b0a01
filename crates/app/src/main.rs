//! Entry point for the shader demo.
//! Loads the scene and shaders, reports what was loaded and optionally
//! uploads everything to the GPU headlessly.

use anyhow::{Context, Result};
use asset::{DataRoot, Scene};
use corelib::{DemoState, lights::LightType, shader::ShaderLibrary};
use renderer::{GpuContext, GpuScene};

#[derive(Clone, Debug, PartialEq)]
struct AppConfig {
    data_root: String,
    scene: String,
    shaders: String,
    backends: wgpu::Backends,
    upload: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: "data".into(),
            scene: "sponza.obj".into(),
            shaders: "shaders".into(),
            backends: wgpu::Backends::all(),
            upload: false,
        }
    }
}

impl AppConfig {
    fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if let Some(val) = arg.strip_prefix("--data=") {
                cfg.data_root = val.to_owned();
            } else if let Some(val) = arg.strip_prefix("--scene=") {
                cfg.scene = val.to_owned();
            } else if let Some(val) = arg.strip_prefix("--shaders=") {
                cfg.shaders = val.to_owned();
            } else if let Some(val) = arg.strip_prefix("--gpu-backend=") {
                cfg.backends = parse_backend(val);
            } else if arg == "--upload" {
                cfg.upload = true;
            }
        }
        cfg
    }
}

// Accept: auto|vulkan|dx12|metal|gl
fn parse_backend(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn load_scene(cfg: &AppConfig) -> Result<Scene> {
    let mut scene = Scene::with_source(DataRoot::new(cfg.data_root.clone()));
    scene.set_error_callback(|code, msg| log::error!("Scene error {}: {}", code, msg));
    scene
        .load_file(&cfg.scene)
        .with_context(|| format!("loading scene '{}'", cfg.scene))?;
    log::info!("Loaded '{}': {}", cfg.scene, scene.stats());
    Ok(scene)
}

fn run(cfg: &AppConfig) -> Result<()> {
    let scene = load_scene(cfg)?;

    match ShaderLibrary::load(&cfg.shaders) {
        Ok(lib) => log::info!("Shaders ready in {}", lib.root().display()),
        Err(err) => log::warn!("Shaders unavailable: {:#}", anyhow::Error::from(err)),
    }

    let state = DemoState::default();
    for light in LightType::ALL {
        log::debug!("{} uses {}", light.label(), light.shader_kind().file_name());
    }
    log::info!(
        "Light: {} -> {:?}",
        state.light_type.label(),
        state.lighting().shader_kind()
    );

    if cfg.upload {
        let ctx = GpuContext::headless(cfg.backends)?;
        let gpu = GpuScene::upload(&ctx, &scene)?;
        gpu.destroy();
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::from_args(std::env::args().skip(1));
    log::info!(
        "Starting shader demo. Data: '{}', scene: '{}', backend: {:?}",
        cfg.data_root,
        cfg.scene,
        cfg.backends
    );

    run(&cfg)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let cfg = AppConfig::from_args(Vec::<String>::new());
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.data_root, "data");
        assert_eq!(cfg.scene, "sponza.obj");
        assert!(!cfg.upload);
    }

    #[test]
    fn parses_all_flags() {
        let cfg = AppConfig::from_args([
            "--data=assets/",
            "--scene=box.obj",
            "--shaders=glsl",
            "--gpu-backend=Vulkan",
            "--upload",
            "--ignored",
        ]);
        assert_eq!(cfg.data_root, "assets/");
        assert_eq!(cfg.scene, "box.obj");
        assert_eq!(cfg.shaders, "glsl");
        assert_eq!(cfg.backends, wgpu::Backends::VULKAN);
        assert!(cfg.upload);
    }

    #[test]
    fn unknown_backend_is_auto() {
        assert_eq!(parse_backend("glide"), wgpu::Backends::all());
        assert_eq!(parse_backend("dx12"), wgpu::Backends::DX12);
    }

    #[test]
    fn missing_scene_is_an_error() {
        let dir = std::env::temp_dir().join("shaderdemo-missing-scene");
        let cfg = AppConfig {
            data_root: dir.to_string_lossy().into_owned(),
            scene: "nope.obj".into(),
            ..AppConfig::default()
        };
        let err = load_scene(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.obj"));
    }
}
