use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless hosts.
///
/// Frames are still validated, and the last one is kept so tests can assert
/// on the exact primitives handed to the surface.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_frame: Option<RenderFrame>,
}

impl NullRenderer {
    #[must_use]
    pub fn last_rect_count(&self) -> usize {
        self.last_frame.as_ref().map_or(0, |frame| frame.rects.len())
    }

    #[must_use]
    pub fn last_polyline_count(&self) -> usize {
        self.last_frame
            .as_ref()
            .map_or(0, |frame| frame.polylines.len())
    }

    #[must_use]
    pub fn last_text_count(&self) -> usize {
        self.last_frame.as_ref().map_or(0, |frame| frame.texts.len())
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
