//! Renderer abstraction and implementations for statemap.

pub mod path;
pub mod renderer;

#[cfg(feature = "vello-renderer")]
pub mod vello_impl;

pub use path::{PathGenerator, ProjectedLayers};
pub use renderer::{MapStyle, RenderContext, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::MapScene;
