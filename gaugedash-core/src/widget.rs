// gaugedash-core/src/widget.rs
use ratatui::{buffer::Buffer, layout::Rect};
use std::time::{Duration, Instant};

/// Panel widget hosted by the dashboard, with lifecycle hooks
pub trait Widget: Send + Sync {
    /// Called once when the widget is placed on the dashboard
    fn on_mount(&mut self) {}

    /// Called on every tick with the time since the previous one
    fn on_update(&mut self, _delta: Duration) {}

    fn on_event(&mut self, _event: Event) -> EventResult {
        EventResult::Ignored
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer);

    fn render_focused(&mut self, area: Rect, buf: &mut Buffer, _focused: bool) {
        self.render(area, buf);
    }

    /// Whether `on_update` should run on ticks
    fn needs_update(&self) -> bool {
        false
    }

    fn on_unmount(&mut self) {}
}

/// Input delivered to the focused widget
#[derive(Debug, Clone)]
pub enum Event {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed, // Stop propagation
    Ignored,
}

/// Owns a widget and drives its mount/update/unmount hooks
pub struct WidgetContainer {
    name: String,
    widget: Box<dyn Widget>,
    last_update: Instant,
    mounted: bool,
}

impl WidgetContainer {
    pub fn new(name: impl Into<String>, widget: Box<dyn Widget>) -> Self {
        Self {
            name: name.into(),
            widget,
            last_update: Instant::now(),
            mounted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self) {
        if !self.mounted {
            self.widget.on_mount();
            self.mounted = true;
            tracing::debug!(widget = %self.name, "mounted");
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        if self.widget.needs_update() {
            self.widget.on_update(now.duration_since(self.last_update));
        }
        self.last_update = now;
    }

    pub fn handle_event(&mut self, event: Event) -> EventResult {
        self.widget.on_event(event)
    }

    pub fn render_focused(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        self.widget.render_focused(area, buf, focused);
    }

    pub fn unmount(&mut self) {
        if self.mounted {
            self.widget.on_unmount();
            self.mounted = false;
            tracing::debug!(widget = %self.name, "unmounted");
        }
    }
}
