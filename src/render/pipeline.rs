use crate::render::device::GraphicsDevice;
use crate::render::mesh::Mesh;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closed,
}

/// Redraws the same quad every frame until the host asks it to close.
pub struct RenderPipeline {
    mesh: Mesh,
    state: LoopState,
    frames: u64,
}

impl RenderPipeline {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            state: LoopState::Running,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Clears and draws one frame. Presenting is left to the host. Returns
    /// `false` without touching the device once closed.
    pub fn render_frame<D: GraphicsDevice>(&mut self, device: &D) -> bool {
        if !self.is_running() {
            return false;
        }

        device.clear_color_buffer();
        device.draw_quads(0, self.mesh.vertex_count);
        self.frames += 1;
        true
    }

    pub fn close(&mut self) {
        if self.state == LoopState::Running {
            info!("Window closed after {} frames", self.frames);
        }
        self.state = LoopState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::fake::{Call, RecordingDevice};
    use crate::render::device::BufferId;

    fn pipeline() -> RenderPipeline {
        RenderPipeline::new(Mesh {
            buffer: BufferId(2),
            vertex_count: 4,
        })
    }

    #[test]
    fn test_frame_clears_then_draws() {
        let device = RecordingDevice::default();
        let mut pipeline = pipeline();

        assert!(pipeline.render_frame(&device));
        assert!(pipeline.render_frame(&device));

        let frame = vec![Call::ClearColorBuffer, Call::DrawQuads { first: 0, count: 4 }];
        assert_eq!(device.calls(), [frame.clone(), frame].concat());
    }

    #[test]
    fn test_closed_pipeline_renders_nothing() {
        let device = RecordingDevice::default();
        let mut pipeline = pipeline();

        pipeline.close();
        assert_eq!(pipeline.state(), LoopState::Closed);
        assert!(!pipeline.render_frame(&device));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_close_is_terminal() {
        let mut pipeline = pipeline();
        pipeline.close();
        pipeline.close();
        assert!(!pipeline.is_running());
    }
}
