pub mod device;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod shader_source;
pub mod shaders;

pub use device::{GlDevice, GraphicsDevice};
pub use mesh::Mesh;
pub use pipeline::{LoopState, RenderPipeline};
pub use shader_source::ShaderSources;
pub use shaders::{build_program, ProgramBuild, ShaderError};
