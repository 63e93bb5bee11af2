// gaugedash-widgets/src/gauge.rs
use crossbeam::channel::Receiver;
use gaugedash_core::{
    BusEvent, Event, EventBus, EventResult, PanelEvent, PanelOptions, Subscription, Widget,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    prelude::Widget as RatatuiWidget,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use std::time::Duration;

use crate::common::{
    DEFAULT_PALETTE, format_gauge_value, format_threshold_value, ratio_in_range, threshold_color,
};

/// Number of `[`/`]` presses to sweep the whole range
const SAMPLE_STEPS: f64 = 20.0;

/// Live preview of a gauge panel, colored by its thresholds
///
/// Follows `panel.<name>.options` on the event bus so edits made in the
/// threshold editor show up on the next tick.
///
/// # Keyboard Shortcuts
/// - `[` / `]` - move the sample reading down / up
pub struct GaugeWidget {
    panel: String,
    options: PanelOptions,
    value: f64,
    event_bus: EventBus,
    subscription: Option<(Subscription, Receiver<BusEvent>)>,
}

impl GaugeWidget {
    pub fn new(event_bus: EventBus, panel: impl Into<String>, options: PanelOptions) -> Self {
        // Start halfway so the preview shows a color other than Min's
        let value = (options.min_value + options.max_value) / 2.0;

        Self {
            panel: panel.into(),
            options,
            value,
            event_bus,
            subscription: None,
        }
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        let (low, high) = (self.options.min_value, self.options.max_value);
        self.value = if high > low { value.clamp(low, high) } else { low };
    }

    fn step(&self) -> f64 {
        (self.options.max_value - self.options.min_value).abs() / SAMPLE_STEPS
    }

    /// Apply queued option changes for this panel
    fn drain_events(&mut self) {
        let Some((_, rx)) = &self.subscription else {
            return;
        };

        let latest = rx
            .try_iter()
            .filter_map(|event| match event.payload {
                PanelEvent::OptionsChanged { panel, options } if panel == self.panel => {
                    Some(options)
                }
                PanelEvent::OptionsChanged { .. } => None,
            })
            .last();

        if let Some(options) = latest {
            tracing::debug!(
                panel = %self.panel,
                rows = options.thresholds.len(),
                "gauge options refreshed"
            );
            self.options = options;
            self.set_value(self.value);
        }
    }

    fn marker_line(&self, width: u16) -> Line<'static> {
        let width = width as usize;
        let mut cells = vec![Span::raw(" "); width];

        for row in &self.options.thresholds {
            let ratio = ratio_in_range(row.value, self.options.min_value, self.options.max_value);
            let column = ((ratio * width as f64) as usize).min(width.saturating_sub(1));
            if let Some(cell) = cells.get_mut(column) {
                *cell = Span::styled(
                    "▲",
                    Style::default().fg(threshold_color(row.color.as_deref())),
                );
            }
        }

        Line::from(cells)
    }

    fn label_line(&self) -> Line<'static> {
        let labels = self
            .options
            .thresholds
            .iter()
            .map(|row| {
                let value = format_threshold_value(row.value);
                if row.label.is_empty() {
                    value
                } else {
                    format!("{} {}", row.label, value)
                }
            })
            .collect::<Vec<_>>()
            .join(" · ");

        Line::raw(labels)
    }
}

impl Widget for GaugeWidget {
    fn on_mount(&mut self) {
        self.subscription = Some(self.event_bus.subscribe("panel.*"));
    }

    fn on_update(&mut self, _delta: Duration) {
        self.drain_events();
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        use crossterm::event::KeyCode;

        if let Event::Key(key) = event {
            match key.code {
                KeyCode::Char('[') => {
                    self.set_value(self.value - self.step());
                    return EventResult::Consumed;
                }
                KeyCode::Char(']') => {
                    self.set_value(self.value + self.step());
                    return EventResult::Consumed;
                }
                _ => {}
            }
        }

        EventResult::Ignored
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.render_focused(area, buf, true);
    }

    fn render_focused(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Gauge: {} ", self.panel))
            .border_style(Style::default().fg(DEFAULT_PALETTE.focus_color(focused)));
        let inner = block.inner(area);
        RatatuiWidget::render(block, area, buf);

        let [gauge_area, marker_area, label_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let color = threshold_color(self.options.thresholds.color_for(self.value));
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(ratio_in_range(
                self.value,
                self.options.min_value,
                self.options.max_value,
            ))
            .label(format_gauge_value(self.value, &self.options));
        RatatuiWidget::render(gauge, gauge_area, buf);

        if self.options.show_threshold_markers {
            RatatuiWidget::render(
                Paragraph::new(self.marker_line(marker_area.width)),
                marker_area,
                buf,
            );
        }
        if self.options.show_threshold_labels {
            RatatuiWidget::render(Paragraph::new(self.label_line()), label_area, buf);
        }
    }

    fn needs_update(&self) -> bool {
        true
    }

    fn on_unmount(&mut self) {
        self.subscription = None;
    }
}
