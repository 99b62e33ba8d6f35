use crate::config::ShaderConfig;
use crate::render::device::GraphicsDevice;
use crate::render::mesh::Mesh;
use crate::render::pipeline::RenderPipeline;
use crate::render::shader_source::ShaderSources;
use crate::render::shaders::{build_program_from_sources, ProgramBuild};
use log::{info, warn};

pub const COLOR_UNIFORM: &str = "uColor";

/// Everything created on the GPU before the first frame.
pub struct Scene {
    pub build: ProgramBuild,
    pub pipeline: RenderPipeline,
}

/// Loads the shader file, builds and activates the program, sets its color
/// and uploads the quad.
pub fn prepare<D: GraphicsDevice>(device: &D, shader: &ShaderConfig) -> Scene {
    let sources = ShaderSources::load(&shader.path);
    prepare_with_sources(device, &sources, shader.color)
}

pub fn prepare_with_sources<D: GraphicsDevice>(
    device: &D,
    sources: &ShaderSources,
    color: [f32; 4],
) -> Scene {
    match device.version() {
        Some(version) => info!("{}", version),
        None => warn!("GL_VERSION unavailable"),
    }

    info!("Vertex Shader Source:\n{}\n", sources.vertex_source);
    info!("Fragment Shader Source:\n{}\n", sources.fragment_source);

    let build = build_program_from_sources(device, sources);
    device.use_program(build.program);

    match device.uniform_location(build.program, COLOR_UNIFORM) {
        Some(location) => device.set_uniform_4f(location, color),
        None => warn!("Uniform '{}' not found in shader", COLOR_UNIFORM),
    }

    let mesh = Mesh::quad(device);
    let pipeline = RenderPipeline::new(mesh);

    Scene { build, pipeline }
}
