use crate::render::device::ShaderStage;
use log::error;
use std::fs;
use std::path::Path;

const MARKER: &str = "#shader";

/// Vertex and fragment text split out of one sectioned shader file.
///
/// ```text
/// #shader vertex
/// ...vertex source...
/// #shader fragment
/// ...fragment source...
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex_source: String,
    pub fragment_source: String,
}

impl ShaderSources {
    /// Reads and splits `path`. An unreadable file is logged and yields two
    /// empty sources. Bytes that are not valid UTF-8 are replaced, not
    /// rejected.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(bytes) => Self::parse(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                error!("Failed to open shader file: {} ({})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Lines seen before the first recognised marker are dropped.
    pub fn parse(text: &str) -> Self {
        let mut sources = Self::default();
        let mut current: Option<ShaderStage> = None;

        for line in text.lines() {
            if line.contains(MARKER) {
                if line.contains("vertex") {
                    current = Some(ShaderStage::Vertex);
                } else if line.contains("fragment") {
                    current = Some(ShaderStage::Fragment);
                }
                continue;
            }

            if let Some(stage) = current {
                let block = sources.block_mut(stage);
                block.push_str(line);
                block.push('\n');
            }
        }

        sources
    }

    fn block_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Vertex => &mut self.vertex_source,
            ShaderStage::Fragment => &mut self.fragment_source,
        }
    }
}
