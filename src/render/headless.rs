use crate::render::{RenderFrame, RenderSurface};

/// A render target without a GPU.
///
/// Counts draws and remembers the shape of the last frame, so the frame
/// driver can be exercised in tests and on machines without an adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    pub draw_count: u64,
    pub resize_count: u64,
    pub last_item_count: usize,
    pub last_vertex_count: u64,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.resize_count += 1;
    }

    fn draw(&mut self, frame: &RenderFrame<'_>) {
        self.draw_count += 1;
        self.last_item_count = frame.item_count();
        self.last_vertex_count = frame.vertex_count();
    }
}
