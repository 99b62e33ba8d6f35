use crate::render::device::{GraphicsDevice, ProgramId, ShaderId, ShaderStage};
use crate::render::shader_source::ShaderSources;
use log::{error, warn};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    #[error("Failed to compile {stage} shader: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
}

/// Result of a best-effort program build.
///
/// `program` is always a valid handle value, even when `errors` is not empty;
/// a broken program simply draws nothing useful.
#[derive(Debug)]
pub struct ProgramBuild {
    pub program: ProgramId,
    pub errors: Vec<ShaderError>,
}

impl ProgramBuild {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiles both stages, links and validates them into a program, then
/// releases the intermediate shader objects. Failures are logged and
/// collected, never fatal.
pub fn build_program<D: GraphicsDevice>(
    device: &D,
    vertex_source: &str,
    fragment_source: &str,
) -> ProgramBuild {
    let mut errors = Vec::new();

    let program = device.create_program();
    let vertex_shader = compile_shader(device, ShaderStage::Vertex, vertex_source, &mut errors);
    let fragment_shader =
        compile_shader(device, ShaderStage::Fragment, fragment_source, &mut errors);

    device.attach_shader(program, vertex_shader);
    device.attach_shader(program, fragment_shader);

    device.link_program(program);
    if !device.link_status(program) {
        let log = device.program_info_log(program);
        warn!("Program linking failed: {}", log.trim_end());
        errors.push(ShaderError::Linking(log));
    }
    device.validate_program(program);

    device.delete_shader(vertex_shader);
    device.delete_shader(fragment_shader);

    ProgramBuild { program, errors }
}

pub fn build_program_from_sources<D: GraphicsDevice>(
    device: &D,
    sources: &ShaderSources,
) -> ProgramBuild {
    build_program(device, &sources.vertex_source, &sources.fragment_source)
}

fn compile_shader<D: GraphicsDevice>(
    device: &D,
    stage: ShaderStage,
    source: &str,
    errors: &mut Vec<ShaderError>,
) -> ShaderId {
    let shader = device.create_shader(stage);
    device.shader_source(shader, source);
    device.compile_shader(shader);

    if !device.compile_status(shader) {
        let log = device.shader_info_log(shader);
        error!("Failed to compile {} shader", stage);
        if !log.trim().is_empty() {
            error!("{}", log.trim_end());
        }
        errors.push(ShaderError::Compilation { stage, log });
    }

    shader
}
