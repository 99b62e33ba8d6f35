pub mod app;
pub mod config;
pub mod render;

// Re-export commonly used types
pub use app::{Host, HostError};
pub use config::AppConfig;
pub use render::{GlDevice, GraphicsDevice, Mesh, ProgramBuild, RenderPipeline, ShaderSources};
