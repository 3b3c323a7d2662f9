//! Rendering adapters - the external QR rendering collaborator.

mod http_renderer;

pub use http_renderer::{HttpCredentialRenderer, RendererConfig};
