//! A scratch card widget.
//!
//! A foreground image covers a surface mounted in a container; dragging over
//! it erases the foreground and reveals the container's background. Once
//! enough of the surface is gone the panel removes itself and reports
//! completion.
//!
//! ```no_run
//! use std::time::Instant;
//! use scratch_panel::{Callbacks, Document, FileLoader, PanelOptions, ScratchPanel};
//!
//! let mut doc = Document::new();
//! doc.create_container("scratch-panel", 300, 200);
//!
//! let options = PanelOptions {
//!     foreground: "front.png".into(),
//!     background: "#224466".into(),
//!     ..PanelOptions::default()
//! };
//! let callbacks = Callbacks::new().on_complete(|| println!("revealed!"));
//! let mut panel = ScratchPanel::new(&doc, options, callbacks)?;
//! panel.load_foreground(&FileLoader::new(), Instant::now());
//! # Ok::<(), scratch_panel::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod input;
pub mod loader;
pub mod options;
pub mod panel;
pub mod surface;
pub mod types;

pub use document::{Container, ContainerHandle, Document, NodeId};
pub use error::{Error, Result};
pub use input::{EventResponse, InputEvent, Phase, Source};
pub use loader::{FileLoader, ImageLoader, ImageRequest, LoadPhase};
pub use options::{Background, CrossOrigin, OptionKey, OptionValue, PanelOptions};
pub use panel::{Callbacks, ScratchPanel};
pub use surface::Surface;
pub use types::{FrameBuffer, Point, Rgba};
