use crate::render::device::{BufferId, GraphicsDevice};

/// Corner positions of the centred quad, two floats per vertex.
pub const QUAD_POSITIONS: [f32; 8] = [
    -0.5, -0.5, //
    0.5, -0.5, //
    0.5, 0.5, //
    -0.5, 0.5,
];

pub const POSITION_ATTRIBUTE: u32 = 0;
pub const POSITION_COMPONENTS: usize = 2;

/// Static 2D positions living in one GPU array buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mesh {
    pub buffer: BufferId,
    pub vertex_count: i32,
}

impl Mesh {
    /// Uploads `positions` once and binds them to attribute slot 0.
    pub fn upload<D: GraphicsDevice>(device: &D, positions: &[f32]) -> Self {
        let buffer = device.create_buffer();
        device.bind_array_buffer(buffer);
        device.upload_static(positions);

        let stride = (POSITION_COMPONENTS * std::mem::size_of::<f32>()) as i32;
        device.vertex_attrib(POSITION_ATTRIBUTE, POSITION_COMPONENTS as i32, stride);

        Self {
            buffer,
            vertex_count: (positions.len() / POSITION_COMPONENTS) as i32,
        }
    }

    pub fn quad<D: GraphicsDevice>(device: &D) -> Self {
        Self::upload(device, &QUAD_POSITIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::fake::{Call, RecordingDevice};

    #[test]
    fn test_quad_upload_sequence() {
        let device = RecordingDevice::default();
        let mesh = Mesh::quad(&device);

        assert_eq!(mesh.vertex_count, 4);
        assert_eq!(
            device.calls(),
            vec![
                Call::CreateBuffer(mesh.buffer),
                Call::BindArrayBuffer(mesh.buffer),
                Call::UploadStatic(QUAD_POSITIONS.to_vec()),
                Call::VertexAttrib {
                    index: 0,
                    components: 2,
                    stride: 8,
                },
            ]
        );
    }

    #[test]
    fn test_vertex_count_ignores_trailing_component() {
        let device = RecordingDevice::default();
        let mesh = Mesh::upload(&device, &[0.0, 0.0, 1.0, 1.0, 2.0]);
        assert_eq!(mesh.vertex_count, 2);
    }
}
