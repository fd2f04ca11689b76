//! Rendering helpers for producing PNG previews of printed sheets.

mod paint;

pub use paint::{ImageRenderOptions, SheetImageStyle, render_page_image};
