pub mod canvas;
pub mod export;
pub mod painter;
pub mod primitives;
pub mod scene;

// Re-export specific items to keep the API clean for the rest of the app
pub use canvas::Canvas;
pub use export::{export, resolve_output, ExportError};
pub use scene::Scene;
