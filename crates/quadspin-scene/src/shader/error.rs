use std::fmt;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// Failure to build a shader program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A stage failed to parse or validate.
    Compile { stage: Stage, message: String },
    /// Both stages compiled but don't fit together (or don't fit the mesh).
    Link { message: String },
}

impl ShaderError {
    pub(crate) fn compile(stage: Stage, message: impl Into<String>) -> Self {
        Self::Compile { stage, message: message.into() }
    }

    pub(crate) fn link(message: impl Into<String>) -> Self {
        Self::Link { message: message.into() }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Compile { stage, message } => {
                write!(f, "{stage} shader failed to compile: {message}")
            }
            ShaderError::Link { message } => write!(f, "shader program failed to link: {message}"),
        }
    }
}

impl std::error::Error for ShaderError {}
