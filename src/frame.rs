use std::fmt::Debug;

/// Size of a surface in logical UI units, before the device scale factor is
/// applied. Hosts report fractional sizes, so both axes are floats.
#[derive(Clone, Copy, PartialEq)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl Debug for LogicalSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogicalSize {{ width: {}, height: {} }}", self.width, self.height)
    }
}

impl LogicalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Size of a render target in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Physical pixel size for a logical size at the given scale factor.
    /// Truncates, never rounds up; fractional pixels are not drawable.
    pub fn from_logical(logical: LogicalSize, scale_factor: f64) -> Self {
        Self {
            width: (logical.width * scale_factor) as u32,
            height: (logical.height * scale_factor) as u32,
        }
    }
}

/// Handle of a host-provided framebuffer object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

/// Everything the engine needs for one render call. Ephemeral: recomputed
/// from the host geometry every paint cycle, never cached between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDescriptor {
    pub width: u32,
    pub height: u32,
    pub framebuffer: FramebufferId,
    pub flip_y: bool,
}

impl FrameDescriptor {
    pub fn compute(
        logical: LogicalSize,
        scale_factor: f64,
        framebuffer: FramebufferId,
        flip_y: bool,
    ) -> Self {
        let pixels = SurfaceSize::from_logical(logical, scale_factor);
        Self {
            width: pixels.width,
            height: pixels.height,
            framebuffer,
            flip_y,
        }
    }
}
