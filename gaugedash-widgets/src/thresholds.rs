// gaugedash-widgets/src/thresholds.rs
use crossterm::event::KeyCode;
use gaugedash_core::{
    BusEvent, Event, EventBus, EventResult, PanelOptions, ThresholdError, ThresholdListEditor,
    ThresholdRow, Widget,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    prelude::Widget as RatatuiWidget,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget},
};

use crate::common::{DEFAULT_PALETTE, format_threshold_value, threshold_color};

/// Interactive editor for the threshold rows of one gauge panel
///
/// Rows are listed Min first. Every accepted edit goes through
/// [`ThresholdListEditor`], so the list stays sorted and reindexed.
///
/// # Keyboard Shortcuts
/// - `j`/`k` or arrows - select a row
/// - `a` - add a threshold between the selected row and the one before it
///   (right after Min when Min is selected)
/// - `d` - remove the selected row, interior rows only
/// - `+`/`-` - nudge the selected value by one step
/// - `Enter` - type a new value; `Enter` applies it, `Esc` cancels
///
/// # Event Publishing
/// - Publishes `panel.<name>.options` with the full options after every accepted edit
pub struct ThresholdsWidget {
    panel: String,
    editor: ThresholdListEditor,
    list_state: ListState,

    // Typed value while in input mode
    input: Option<String>,
    // Last rejected edit
    status: Option<String>,
    step: f64,
}

impl ThresholdsWidget {
    pub fn new(event_bus: EventBus, panel: impl Into<String>, options: PanelOptions) -> Self {
        let panel = panel.into();
        let publish_as = panel.clone();
        let editor = ThresholdListEditor::new(
            options,
            Box::new(move |options: &PanelOptions| {
                event_bus.publish(BusEvent::options_changed(&publish_as, options));
            }),
        );

        Self {
            panel,
            editor,
            list_state: ListState::default().with_selected(Some(0)),
            input: None,
            status: None,
            step: 1.0,
        }
    }

    /// Amount `+`/`-` move a value by
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn panel(&self) -> &str {
        &self.panel
    }

    pub fn options(&self) -> &PanelOptions {
        self.editor.options()
    }

    pub fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn selected_row(&self) -> Option<ThresholdRow> {
        self.editor.thresholds().rows().get(self.selected()).cloned()
    }

    fn select(&mut self, position: usize) {
        let last = self.editor.thresholds().len().saturating_sub(1);
        self.list_state.select(Some(position.min(last)));
    }

    fn apply<T>(
        &mut self,
        transition: impl FnOnce(&mut ThresholdListEditor) -> Result<T, ThresholdError>,
    ) -> Option<T> {
        match transition(&mut self.editor) {
            Ok(outcome) => {
                self.status = None;
                Some(outcome)
            }
            Err(err) => {
                self.status = Some(err.to_string());
                None
            }
        }
    }

    fn add_before_selected(&mut self) {
        let after_index = self.selected().max(1);
        let position = self.editor.insert_at_index(after_index);

        if self.apply(|editor| editor.on_add_threshold(after_index)).is_some() {
            self.select(position);
        }
    }

    fn remove_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };

        if self.apply(|editor| editor.on_remove_threshold(&row)).is_some() {
            self.select(self.selected());
        }
    }

    fn set_selected_value(&mut self, value: f64) {
        let Some(row) = self.selected_row() else {
            return;
        };

        // Follow the edited row to its sorted position
        if let Some(landed) =
            self.apply(|editor| editor.on_change_threshold_value(value.into(), &row))
        {
            self.select(landed);
        }
    }

    fn nudge(&mut self, steps: f64) {
        if let Some(row) = self.selected_row() {
            self.set_selected_value(row.value + steps * self.step);
        }
    }

    fn commit_input(&mut self) {
        let Some(text) = self.input.take() else {
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        match text.parse::<f64>() {
            Ok(value) => self.set_selected_value(value),
            Err(_) => self.status = Some(format!("'{}' is not a number", text)),
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) -> EventResult {
        match code {
            KeyCode::Enter => self.commit_input(),
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                if let Some(input) = self.input.as_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E') => {
                if let Some(input) = self.input.as_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }

        // Input mode swallows everything so typing never triggers shortcuts
        EventResult::Consumed
    }
}

impl Widget for ThresholdsWidget {
    fn on_event(&mut self, event: Event) -> EventResult {
        let Event::Key(key) = event else {
            return EventResult::Ignored;
        };

        if self.input.is_some() {
            return self.handle_input_key(key.code);
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected() + 1),
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected().saturating_sub(1)),
            KeyCode::Char('a') => self.add_before_selected(),
            KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge(1.0),
            KeyCode::Char('-') => self.nudge(-1.0),
            KeyCode::Enter => {
                self.status = None;
                self.input = Some(String::new());
            }
            _ => return EventResult::Ignored,
        }

        EventResult::Consumed
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.render_focused(area, buf, true);
    }

    fn render_focused(&mut self, area: Rect, buf: &mut Buffer, focused: bool) {
        let palette = DEFAULT_PALETTE;

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " Thresholds: {} [{}] ",
                self.panel,
                self.editor.thresholds().len()
            ))
            .border_style(Style::default().fg(palette.focus_color(focused)));
        let inner = block.inner(area);
        RatatuiWidget::render(block, area, buf);

        let [list_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let items: Vec<ListItem> = self
            .editor
            .thresholds()
            .iter()
            .map(|row| {
                let label_style = if row.is_boundary() {
                    Style::default().fg(palette.boundary)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        "██ ",
                        Style::default().fg(threshold_color(row.color.as_deref())),
                    ),
                    Span::styled(format!("{:<4}", row.label), label_style),
                    Span::raw(format!(" {}", format_threshold_value(row.value))),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(palette.selected)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");
        StatefulWidget::render(list, list_area, buf, &mut self.list_state);

        let status = match (&self.input, &self.status) {
            (Some(input), _) => Line::styled(
                format!("value: {}_", input),
                Style::default().fg(palette.input),
            ),
            (None, Some(message)) => {
                Line::styled(message.clone(), Style::default().fg(palette.error))
            }
            (None, None) => Line::styled(
                "a add  d remove  +/- nudge  Enter edit",
                Style::default().fg(palette.unfocus),
            ),
        };
        RatatuiWidget::render(Paragraph::new(status), status_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use gaugedash_core::{PanelEvent, ThresholdColor, Thresholds};

    fn press(widget: &mut ThresholdsWidget, code: KeyCode) -> EventResult {
        widget.on_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(widget: &mut ThresholdsWidget, text: &str) {
        for c in text.chars() {
            press(widget, KeyCode::Char(c));
        }
    }

    fn values(widget: &ThresholdsWidget) -> Vec<f64> {
        widget.options().thresholds.iter().map(|r| r.value).collect()
    }

    fn color_of_selected(widget: &ThresholdsWidget) -> Option<String> {
        widget.options().thresholds.rows()[widget.selected()].color.clone()
    }

    fn four_rows() -> PanelOptions {
        PanelOptions {
            thresholds: Thresholds::from(vec![
                ThresholdRow::new(0, "Min", 0.0, false, Some(ThresholdColor::Ok)),
                ThresholdRow::new(1, "", 50.0, true, Some(ThresholdColor::Warning)),
                ThresholdRow::new(2, "", 75.0, true, Some(ThresholdColor::Warning)),
                ThresholdRow::new(3, "Max", 100.0, false, None),
            ]),
            ..PanelOptions::default()
        }
    }

    #[test]
    fn test_add_publishes_options() {
        let bus = EventBus::new();
        let (_sub, rx) = bus.subscribe("panel.*");
        let mut widget = ThresholdsWidget::new(bus, "cpu", PanelOptions::default());

        assert_eq!(press(&mut widget, KeyCode::Char('a')), EventResult::Consumed);

        assert_eq!(values(&widget), vec![0.0, 50.0, 100.0]);
        assert_eq!(widget.selected(), 1);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.topic, "panel.cpu.options");
        let PanelEvent::OptionsChanged { panel, options } = event.payload;
        assert_eq!(panel, "cpu");
        assert_eq!(&options, widget.options());
    }

    #[test]
    fn test_add_keeps_bisecting_before_selection() {
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", PanelOptions::default());

        press(&mut widget, KeyCode::Char('a'));
        press(&mut widget, KeyCode::Char('a'));

        assert_eq!(values(&widget), vec![0.0, 25.0, 50.0, 100.0]);
        assert_eq!(widget.selected(), 1);
    }

    #[test]
    fn test_typed_value_resorts_and_follows_row() {
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", four_rows());

        press(&mut widget, KeyCode::Down);
        press(&mut widget, KeyCode::Enter);
        type_text(&mut widget, "78");
        assert_eq!(widget.input(), Some("78"));
        press(&mut widget, KeyCode::Enter);

        assert_eq!(values(&widget), vec![0.0, 75.0, 78.0, 100.0]);
        assert_eq!(widget.selected(), 2);
        assert_eq!(widget.input(), None);
        assert_eq!(widget.status(), None);
    }

    #[test]
    fn test_typed_duplicate_value_keeps_selection_on_edited_row() {
        let options = PanelOptions {
            thresholds: Thresholds::from(vec![
                ThresholdRow::new(0, "Min", 0.0, false, Some(ThresholdColor::Ok)),
                ThresholdRow::new(1, "", 50.0, true, Some(ThresholdColor::Warning)),
                ThresholdRow::new(2, "", 75.0, true, Some(ThresholdColor::Critical)),
                ThresholdRow::new(3, "Max", 100.0, false, None),
            ]),
            ..PanelOptions::default()
        };
        let critical = Some(ThresholdColor::Critical.as_str().to_string());
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", options);

        press(&mut widget, KeyCode::Down);
        press(&mut widget, KeyCode::Down);
        press(&mut widget, KeyCode::Enter);
        type_text(&mut widget, "50");
        press(&mut widget, KeyCode::Enter);

        assert_eq!(values(&widget), vec![0.0, 50.0, 50.0, 100.0]);
        assert_eq!(widget.selected(), 2);
        assert_eq!(color_of_selected(&widget), critical);

        // Later edits still hit the same row
        press(&mut widget, KeyCode::Char('+'));
        assert_eq!(values(&widget), vec![0.0, 50.0, 51.0, 100.0]);
        assert_eq!(color_of_selected(&widget), critical);
    }

    #[test]
    fn test_input_mode_swallows_shortcuts() {
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", four_rows());

        press(&mut widget, KeyCode::Enter);
        press(&mut widget, KeyCode::Char('a'));
        press(&mut widget, KeyCode::Char('d'));
        press(&mut widget, KeyCode::Esc);

        assert_eq!(values(&widget), vec![0.0, 50.0, 75.0, 100.0]);
        assert_eq!(widget.input(), None);
    }

    #[test]
    fn test_bad_input_reports_status() {
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", four_rows());

        press(&mut widget, KeyCode::Down);
        press(&mut widget, KeyCode::Enter);
        type_text(&mut widget, "-");
        press(&mut widget, KeyCode::Enter);

        assert_eq!(widget.status(), Some("'-' is not a number"));
        assert_eq!(values(&widget), vec![0.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_rejected_edits_report_status() {
        let bus = EventBus::new();
        let (_sub, rx) = bus.subscribe("panel.*");
        let mut widget = ThresholdsWidget::new(bus, "cpu", four_rows());

        // Min cannot be removed
        press(&mut widget, KeyCode::Char('d'));
        assert_eq!(
            widget.status(),
            Some(ThresholdError::NotRemovable(0).to_string().as_str())
        );

        // Interior row cannot pass Max
        press(&mut widget, KeyCode::Down);
        press(&mut widget, KeyCode::Enter);
        type_text(&mut widget, "150");
        press(&mut widget, KeyCode::Enter);
        assert!(widget.status().is_some());

        assert_eq!(values(&widget), vec![0.0, 50.0, 75.0, 100.0]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_remove_and_nudge() {
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", four_rows()).with_step(5.0);

        press(&mut widget, KeyCode::Char('j'));
        press(&mut widget, KeyCode::Char('+'));
        assert_eq!(values(&widget), vec![0.0, 55.0, 75.0, 100.0]);

        press(&mut widget, KeyCode::Char('d'));
        assert_eq!(values(&widget), vec![0.0, 75.0, 100.0]);
        assert_eq!(widget.selected(), 1);

        press(&mut widget, KeyCode::Char('-'));
        assert_eq!(values(&widget), vec![0.0, 70.0, 100.0]);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", PanelOptions::default());

        press(&mut widget, KeyCode::Up);
        assert_eq!(widget.selected(), 0);
        for _ in 0..5 {
            press(&mut widget, KeyCode::Down);
        }
        assert_eq!(widget.selected(), 1);
        assert_eq!(press(&mut widget, KeyCode::Char('x')), EventResult::Ignored);
    }

    #[test]
    fn test_render_lists_rows() {
        let mut widget = ThresholdsWidget::new(EventBus::new(), "cpu", four_rows());
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);

        widget.render_focused(area, &mut buf, true);

        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Thresholds: cpu [4]"));
        assert!(text.contains("Min"));
        assert!(text.contains("75"));
        assert!(text.contains("Max"));
    }
}
