use gl::types::*;
use std::ffi::{c_void, CStr, CString};
use std::marker::PhantomData;
use std::ptr;

/// `GL_QUADS` only exists in the compatibility profile, which the `gl`
/// crate's core registry does not generate.
const QUADS: GLenum = 0x0007;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit handle to the current graphics context.
///
/// Every drawing operation takes one of these instead of reaching for the
/// ambient GL state, so the builder, uploader and frame loop can run against
/// a recording fake in tests.
pub trait GraphicsDevice {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> ProgramId;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn validate_program(&self, program: ProgramId);
    fn use_program(&self, program: ProgramId);

    /// `None` when the uniform is absent or optimised out.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<i32>;
    fn set_uniform_4f(&self, location: i32, value: [f32; 4]);

    fn create_buffer(&self) -> BufferId;
    fn bind_array_buffer(&self, buffer: BufferId);
    /// Uploads to the bound array buffer with the static usage hint.
    fn upload_static(&self, data: &[f32]);
    /// Enables `index` and describes it as tightly packed float components
    /// starting at offset 0 of the bound array buffer.
    fn vertex_attrib(&self, index: u32, components: i32, stride: i32);

    fn clear_color_buffer(&self);
    fn draw_quads(&self, first: i32, count: i32);

    fn version(&self) -> Option<String>;
}

/// `GraphicsDevice` over the global entry points of the `gl` crate.
///
/// Only obtainable through [`GlDevice::load`], after a context has been made
/// current, and pinned to that thread.
pub struct GlDevice {
    _not_send: PhantomData<*const ()>,
}

impl GlDevice {
    pub fn load<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self {
            _not_send: PhantomData,
        }
    }

    /// Whether the entry points this program relies on were resolved.
    pub fn is_loaded(&self) -> bool {
        gl::CreateShader::is_loaded()
            && gl::CreateProgram::is_loaded()
            && gl::BufferData::is_loaded()
            && gl::VertexAttribPointer::is_loaded()
            && gl::DrawArrays::is_loaded()
            && gl::GetString::is_loaded()
    }

    fn read_info_log(len: GLint, fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
        if len <= 0 {
            return String::new();
        }
        let mut buffer = vec![0u8; len as usize];
        let mut written: GLsizei = 0;
        fetch(len, &mut written, buffer.as_mut_ptr() as *mut GLchar);
        buffer.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl GraphicsDevice for GlDevice {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId {
        ShaderId(unsafe { gl::CreateShader(stage.gl_enum()) })
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe {
            gl::ShaderSource(shader.0, 1, &ptr, &len);
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { gl::CompileShader(shader.0) };
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, &mut len);
        }
        Self::read_info_log(len, |len, written, buf| unsafe {
            gl::GetShaderInfoLog(shader.0, len, written, buf);
        })
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { gl::DeleteShader(shader.0) };
    }

    fn create_program(&self) -> ProgramId {
        ProgramId(unsafe { gl::CreateProgram() })
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::AttachShader(program.0, shader.0) };
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { gl::LinkProgram(program.0) };
    }

    fn link_status(&self, program: ProgramId) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, &mut len);
        }
        Self::read_info_log(len, |len, written, buf| unsafe {
            gl::GetProgramInfoLog(program.0, len, written, buf);
        })
    }

    fn validate_program(&self, program: ProgramId) {
        unsafe { gl::ValidateProgram(program.0) };
    }

    fn use_program(&self, program: ProgramId) {
        unsafe { gl::UseProgram(program.0) };
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<i32> {
        let cname = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program.0, cname.as_ptr()) };
        (location != -1).then_some(location)
    }

    fn set_uniform_4f(&self, location: i32, value: [f32; 4]) {
        let [r, g, b, a] = value;
        unsafe { gl::Uniform4f(location, r, g, b, a) };
    }

    fn create_buffer(&self) -> BufferId {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer) };
        BufferId(buffer)
    }

    fn bind_array_buffer(&self, buffer: BufferId) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer.0) };
    }

    fn upload_static(&self, data: &[f32]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(data) as GLsizeiptr,
                data.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );
        }
    }

    fn vertex_attrib(&self, index: u32, components: i32, stride: i32) {
        unsafe {
            gl::EnableVertexAttribArray(index);
            gl::VertexAttribPointer(index, components, gl::FLOAT, gl::FALSE, stride, ptr::null());
        }
    }

    fn clear_color_buffer(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };
    }

    fn draw_quads(&self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(QUADS, first, count) };
    }

    fn version(&self) -> Option<String> {
        let raw = unsafe { gl::GetString(gl::VERSION) };
        if raw.is_null() {
            return None;
        }
        let version = unsafe { CStr::from_ptr(raw as *const GLchar) };
        Some(version.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        CreateShader(ShaderStage, ShaderId),
        ShaderSource(ShaderId, String),
        CompileShader(ShaderId),
        DeleteShader(ShaderId),
        CreateProgram(ProgramId),
        AttachShader(ProgramId, ShaderId),
        LinkProgram(ProgramId),
        ValidateProgram(ProgramId),
        UseProgram(ProgramId),
        Uniform4f(i32, [f32; 4]),
        CreateBuffer(BufferId),
        BindArrayBuffer(BufferId),
        UploadStatic(Vec<f32>),
        VertexAttrib { index: u32, components: i32, stride: i32 },
        ClearColorBuffer,
        DrawQuads { first: i32, count: i32 },
    }

    /// Records every call and "compiles" a source only when it defines
    /// `main` and its braces balance.
    #[derive(Default)]
    pub struct RecordingDevice {
        pub calls: RefCell<Vec<Call>>,
        sources: RefCell<Vec<(ShaderId, String)>>,
        next_id: Cell<u32>,
        pub uniforms: Vec<&'static str>,
    }

    impl RecordingDevice {
        pub fn with_uniforms(uniforms: &[&'static str]) -> Self {
            Self {
                uniforms: uniforms.to_vec(),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn next(&self) -> u32 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            id
        }

        fn record(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }

        fn source_of(&self, shader: ShaderId) -> String {
            self.sources
                .borrow()
                .iter()
                .rev()
                .find(|(id, _)| *id == shader)
                .map(|(_, src)| src.clone())
                .unwrap_or_default()
        }

        fn accepts(source: &str) -> bool {
            let opened = source.matches('{').count();
            let closed = source.matches('}').count();
            source.contains("void main") && opened == closed
        }
    }

    impl GraphicsDevice for RecordingDevice {
        fn create_shader(&self, stage: ShaderStage) -> ShaderId {
            let id = ShaderId(self.next());
            self.record(Call::CreateShader(stage, id));
            id
        }

        fn shader_source(&self, shader: ShaderId, source: &str) {
            self.sources.borrow_mut().push((shader, source.to_string()));
            self.record(Call::ShaderSource(shader, source.to_string()));
        }

        fn compile_shader(&self, shader: ShaderId) {
            self.record(Call::CompileShader(shader));
        }

        fn compile_status(&self, shader: ShaderId) -> bool {
            Self::accepts(&self.source_of(shader))
        }

        fn shader_info_log(&self, shader: ShaderId) -> String {
            format!("0:1(1): error: syntax error in shader {}", shader.0)
        }

        fn delete_shader(&self, shader: ShaderId) {
            self.record(Call::DeleteShader(shader));
        }

        fn create_program(&self) -> ProgramId {
            let id = ProgramId(self.next());
            self.record(Call::CreateProgram(id));
            id
        }

        fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
            self.record(Call::AttachShader(program, shader));
        }

        fn link_program(&self, program: ProgramId) {
            self.record(Call::LinkProgram(program));
        }

        fn link_status(&self, _program: ProgramId) -> bool {
            self.sources
                .borrow()
                .iter()
                .all(|(_, src)| Self::accepts(src))
        }

        fn program_info_log(&self, _program: ProgramId) -> String {
            "error: linking with uncompiled shader".to_string()
        }

        fn validate_program(&self, program: ProgramId) {
            self.record(Call::ValidateProgram(program));
        }

        fn use_program(&self, program: ProgramId) {
            self.record(Call::UseProgram(program));
        }

        fn uniform_location(&self, _program: ProgramId, name: &str) -> Option<i32> {
            self.uniforms
                .iter()
                .position(|u| *u == name)
                .map(|i| i as i32)
        }

        fn set_uniform_4f(&self, location: i32, value: [f32; 4]) {
            self.record(Call::Uniform4f(location, value));
        }

        fn create_buffer(&self) -> BufferId {
            let id = BufferId(self.next());
            self.record(Call::CreateBuffer(id));
            id
        }

        fn bind_array_buffer(&self, buffer: BufferId) {
            self.record(Call::BindArrayBuffer(buffer));
        }

        fn upload_static(&self, data: &[f32]) {
            self.record(Call::UploadStatic(data.to_vec()));
        }

        fn vertex_attrib(&self, index: u32, components: i32, stride: i32) {
            self.record(Call::VertexAttrib {
                index,
                components,
                stride,
            });
        }

        fn clear_color_buffer(&self) {
            self.record(Call::ClearColorBuffer);
        }

        fn draw_quads(&self, first: i32, count: i32) {
            self.record(Call::DrawQuads { first, count });
        }

        fn version(&self) -> Option<String> {
            Some("3.3 (Compatibility Profile) Fake".to_string())
        }
    }
}
