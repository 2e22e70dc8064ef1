//! The scratch card widget.
//!
//! [`ScratchPanel`] owns the surface mounted in its container, the typed
//! options, the stroke tracker and the load/ready state. The host drives it
//! with four kinds of events: the foreground image result
//! ([`ScratchPanel::foreground_loaded`]), timer ticks ([`ScratchPanel::tick`]),
//! input ([`ScratchPanel::handle_input`]) and viewport resizes
//! ([`ScratchPanel::handle_resize`]).

use std::time::Instant;

use image::RgbaImage;

use crate::document::{ContainerHandle, Document, NodeId};
use crate::error::{Error, Result};
use crate::input::{Brush, EventResponse, InputEvent, InputTracker, Phase};
use crate::loader::{ImageLoader, ImageRequest, LoadPhase};
use crate::options::{Background, OptionKey, OptionValue, PanelOptions};
use crate::surface::Surface;

pub type Callback = Box<dyn FnMut()>;

#[derive(Default)]
pub struct Callbacks {
    on_ready: Option<Callback>,
    on_complete: Option<Callback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs once, when images are in place and input is enabled.
    pub fn on_ready(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_ready = Some(Box::new(f));
        self
    }

    /// Runs once, when the card has been scratched off.
    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

pub struct ScratchPanel {
    options: PanelOptions,
    callbacks: Callbacks,
    container: ContainerHandle,
    node: NodeId,
    surface: Surface,
    foreground: Option<RgbaImage>,
    phase: LoadPhase,
    tracker: InputTracker,
    resize_listening: bool,
    completed: bool,
}

impl ScratchPanel {
    /// Mount a new panel in the container named by `options.element_id`.
    ///
    /// Fails only when the container does not exist. A missing foreground is
    /// logged and leaves the panel permanently inert.
    pub fn new(document: &Document, options: PanelOptions, callbacks: Callbacks) -> Result<Self> {
        let container = document
            .get_element_by_id(&options.element_id)
            .ok_or_else(|| Error::MountNotFound(options.element_id.clone()))?;

        let (width, height) = container.borrow().client_size();
        let surface = Surface::new(width, height);
        let node = document.allocate_node();
        container.borrow_mut().append_child(node);

        let phase = if options.foreground.trim().is_empty() {
            tracing::error!("{}", Error::MissingForeground);
            LoadPhase::Inert
        } else {
            LoadPhase::AwaitingForeground
        };

        tracing::debug!("mounted {}x{} surface in '{}'", width, height, options.element_id);

        Ok(Self {
            options,
            callbacks,
            container,
            node,
            surface,
            foreground: None,
            phase,
            tracker: InputTracker::new(),
            resize_listening: true,
            completed: false,
        })
    }

    /* ---------- image loading / readiness ---------- */

    /// The foreground load the panel is waiting on, if any.
    pub fn image_request(&self) -> Option<ImageRequest> {
        match self.phase {
            LoadPhase::AwaitingForeground => Some(ImageRequest {
                reference: self.options.foreground.clone(),
                cross_origin: self.options.cross_origin,
            }),
            _ => None,
        }
    }

    /// Load the pending foreground with `loader` and feed the result back.
    pub fn load_foreground(&mut self, loader: &dyn ImageLoader, now: Instant) {
        if let Some(request) = self.image_request() {
            let result = loader.load(&request);
            self.foreground_loaded(result, now);
        }
    }

    /// Deliver the outcome of the foreground load.
    pub fn foreground_loaded(&mut self, result: Result<RgbaImage>, now: Instant) {
        if self.completed {
            tracing::debug!("foreground arrived after completion, dropped");
            return;
        }
        if self.phase != LoadPhase::AwaitingForeground {
            tracing::warn!("unexpected foreground delivery in phase {:?}", self.phase);
            return;
        }

        let img = match result {
            Ok(img) => img,
            Err(e) => {
                tracing::error!("foreground failed to load: {}", e);
                self.phase = LoadPhase::Failed;
                return;
            }
        };

        self.foreground = Some(img);
        self.redraw_foreground();

        if Background::parse(&self.options.background).is_some() {
            let due = now + self.options.background_delay();
            tracing::debug!("background reveal in {:?}", self.options.background_delay());
            self.phase = LoadPhase::BackgroundPending { due };
            self.tick(now);
        } else {
            self.mark_ready();
        }
    }

    /// Fire the pending background reveal once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        let LoadPhase::BackgroundPending { due } = self.phase else {
            return;
        };
        if now < due || self.completed {
            return;
        }
        let backdrop = Background::parse(&self.options.background);
        self.container.borrow_mut().set_backdrop(backdrop);
        self.mark_ready();
    }

    /// When the next `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            LoadPhase::BackgroundPending { due } if !self.completed => Some(due),
            _ => None,
        }
    }

    fn mark_ready(&mut self) {
        self.phase = LoadPhase::Ready;
        tracing::info!("scratch panel '{}' ready", self.options.element_id);
        if let Some(cb) = self.callbacks.on_ready.as_mut() {
            cb();
        }
    }

    /* ---------- input ---------- */

    fn can_scratch(&self) -> bool {
        // A completed panel is out of the document and receives nothing.
        self.options.enabled && self.phase.is_ready() && !self.completed
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> EventResponse {
        if !self.can_scratch() {
            return EventResponse::Ignored;
        }

        let origin = self.container.borrow().origin();
        match event.phase {
            Phase::Start => {
                if let Some(at) = event.local_position(origin) {
                    let brush = Brush { width: self.options.scratch_size };
                    self.tracker.press(&mut self.surface, at, brush);
                }
            }
            Phase::Move => {
                if let Some(to) = event.local_position(origin) {
                    if self.tracker.drag(&mut self.surface, to) {
                        let percent = self.surface.percent_scratched();
                        tracing::trace!("scratched {:.1}%", percent);
                        if percent >= self.options.threshold {
                            self.complete();
                        }
                    }
                }
            }
            Phase::End => self.tracker.release(),
        }
        EventResponse::Consumed
    }

    /// Viewport resize notification.
    pub fn handle_resize(&mut self) {
        if !self.resize_listening || !self.options.auto_resize {
            return;
        }
        self.resize();
    }

    /// Re-fit the surface to the container and repaint the foreground.
    pub fn resize(&mut self) {
        let (width, height) = self.container.borrow().client_size();
        self.surface.resize(width, height);
        self.redraw_foreground();
        tracing::debug!("surface resized to {}x{}", width, height);
    }

    pub fn redraw_foreground(&mut self) {
        if let Some(img) = &self.foreground {
            self.surface.draw_image(img);
        }
    }

    /* ---------- completion ---------- */

    /// Finish the card: clear the surface, stop listening for resizes, remove
    /// the surface from its container and run the completion callback.
    /// Only the first call has any effect.
    pub fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;

        self.surface.clear();
        self.resize_listening = false;
        self.tracker.release();
        self.container.borrow_mut().remove_child(self.node);

        tracing::info!("scratch panel '{}' completed", self.options.element_id);
        if let Some(cb) = self.callbacks.on_complete.as_mut() {
            cb();
        }
    }

    /* ---------- accessors ---------- */

    pub fn percent_scratched(&self) -> f32 {
        self.surface.percent_scratched()
    }

    /// Make the whole surface transparent. Reads as 100% scratched.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    pub fn get_option(&self, key: OptionKey) -> OptionValue {
        self.options.get(key)
    }

    pub fn set_option(&mut self, key: OptionKey, value: OptionValue) -> Result<()> {
        tracing::debug!("set option {} = {:?}", key, value);
        self.options.set(key, value)
    }

    pub fn set_option_str(&mut self, name: &str, raw: &str) -> Result<()> {
        self.options.set_str(name, raw)
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn set_callback(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.on_complete = Some(Box::new(f));
    }

    pub fn set_ready_callback(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.on_ready = Some(Box::new(f));
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase.is_ready()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_scratching(&self) -> bool {
        self.tracker.is_scratching()
    }

    pub fn move_count(&self) -> u64 {
        self.tracker.move_count()
    }

    /// Whether the surface is still a child of its container.
    pub fn is_mounted(&self) -> bool {
        self.container.borrow().contains(self.node)
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn container(&self) -> &ContainerHandle {
        &self.container
    }
}
