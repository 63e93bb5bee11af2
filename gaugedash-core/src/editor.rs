// gaugedash-core/src/editor.rs
use crate::options::PanelOptions;
use crate::threshold::{ThresholdError, ThresholdRow, Thresholds};

/// Host callback receiving the full options after every edit
pub type OnChange = Box<dyn FnMut(&PanelOptions) + Send + Sync>;

/// Value carried by a threshold input change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdValueChange {
    pub value: f64,
}

impl From<f64> for ThresholdValueChange {
    fn from(value: f64) -> Self {
        Self { value }
    }
}

/// State container for the threshold list of one gauge panel.
///
/// The transition methods are the only way to change the list. Each one
/// computes a new list, swaps it in and hands the full options to the
/// host callback. A rejected transition leaves state alone and does not
/// notify the host.
pub struct ThresholdListEditor {
    options: PanelOptions,
    on_change: OnChange,
}

impl ThresholdListEditor {
    pub fn new(options: PanelOptions, on_change: OnChange) -> Self {
        Self { options, on_change }
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.options.thresholds
    }

    pub fn insert_at_index(&self, position: usize) -> usize {
        self.options.thresholds.insert_at_index(position)
    }

    pub fn on_add_threshold(&mut self, after_index: usize) -> Result<(), ThresholdError> {
        let next = self.options.thresholds.add_threshold(after_index);
        self.commit("add", next)
    }

    /// Apply an edited value to the row with the same `index` as `row`.
    ///
    /// Returns the index the row landed at once the list is re-sorted.
    pub fn on_change_threshold_value(
        &mut self,
        change: ThresholdValueChange,
        row: &ThresholdRow,
    ) -> Result<usize, ThresholdError> {
        let next = self.options.thresholds.change_value_at(row.index, change.value);
        let landed = next.as_ref().map_or(row.index, |(_, landed)| *landed);
        self.commit("change_value", next.map(|(thresholds, _)| thresholds))?;
        Ok(landed)
    }

    pub fn on_remove_threshold(&mut self, row: &ThresholdRow) -> Result<(), ThresholdError> {
        let next = self.options.thresholds.remove_threshold(row.index);
        self.commit("remove", next)
    }

    fn commit(
        &mut self,
        action: &'static str,
        next: Result<Thresholds, ThresholdError>,
    ) -> Result<(), ThresholdError> {
        match next {
            Ok(thresholds) => {
                self.options.thresholds = thresholds;
                tracing::debug!(action, rows = self.options.thresholds.len(), "thresholds updated");
                (self.on_change)(&self.options);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(action, error = %err, "threshold edit rejected");
                Err(err)
            }
        }
    }
}
