mod frame;
mod null_renderer;
mod primitives;

pub use crate::core::Color;
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{LinePrimitive, PolylinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

use crate::error::ChartResult;

/// Contract implemented by the host's drawing surface.
///
/// The surface receives a fully computed `RenderFrame`; diffing against the
/// previous frame and incremental updates are its responsibility.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
