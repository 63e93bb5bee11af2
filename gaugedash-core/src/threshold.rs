// gaugedash-core/src/threshold.rs
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("no threshold row with index {0}")]
    RowNotFound(usize),
    #[error("cannot add a threshold after index {after_index} in a list of {len} rows")]
    AddOutOfRange { after_index: usize, len: usize },
    #[error("threshold row {0} is a boundary and cannot be removed")]
    NotRemovable(usize),
    #[error("threshold value {0} is not a finite number")]
    InvalidValue(f64),
    #[error("value {value} would move row {index} past a boundary row")]
    CrossesBoundary { index: usize, value: f64 },
    #[error("a threshold list needs at least 2 rows, got {0}")]
    TooFewRows(usize),
    #[error("row at position {0} has the wrong boundary flag")]
    InvalidBoundary(usize),
    #[error("row at position {position} has index {index}")]
    NonContiguousIndex { position: usize, index: usize },
    #[error("row {0} is out of order")]
    Unsorted(usize),
}

/// Fixed palette used when coloring threshold rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdColor {
    /// Default color of the Min row
    Ok,
    /// Color given to newly added rows
    Warning,
    Critical,
}

impl ThresholdColor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "rgba(50, 172, 45, 0.97)",
            Self::Warning => "rgba(237, 129, 40, 0.89)",
            Self::Critical => "rgba(245, 54, 54, 0.9)",
        }
    }
}

impl fmt::Display for ThresholdColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value boundary used to colorize a gauge
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdRow {
    pub index: usize,
    #[serde(default)]
    pub label: String,
    pub value: f64,
    pub can_remove: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ThresholdRow {
    pub fn new(
        index: usize,
        label: impl Into<String>,
        value: f64,
        can_remove: bool,
        color: Option<ThresholdColor>,
    ) -> Self {
        Self {
            index,
            label: label.into(),
            value,
            can_remove,
            color: color.map(|c| c.to_string()),
        }
    }

    /// Min/Max rows are structural and never removable
    pub fn is_boundary(&self) -> bool {
        !self.can_remove
    }
}

/// Ordered threshold rows, Min first and Max last.
///
/// Every transition returns a new list; the receiver is never modified.
/// Rows handed over by a host are accepted as-is through `From`, while
/// [`Thresholds::new`] checks the ordering and boundary invariants.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Vec<ThresholdRow>", into = "Vec<ThresholdRow>")]
pub struct Thresholds {
    rows: Vec<ThresholdRow>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rows: vec![
                ThresholdRow::new(0, "Min", 0.0, false, Some(ThresholdColor::Ok)),
                ThresholdRow::new(1, "Max", 100.0, false, None),
            ],
        }
    }
}

impl From<Vec<ThresholdRow>> for Thresholds {
    fn from(rows: Vec<ThresholdRow>) -> Self {
        Self { rows }
    }
}

impl From<Thresholds> for Vec<ThresholdRow> {
    fn from(thresholds: Thresholds) -> Self {
        thresholds.rows
    }
}

impl Thresholds {
    pub fn new(rows: Vec<ThresholdRow>) -> Result<Self, ThresholdError> {
        let thresholds = Self { rows };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn rows(&self) -> &[ThresholdRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThresholdRow> {
        self.rows.iter()
    }

    /// Look up a row by its `index` field
    pub fn get(&self, index: usize) -> Option<&ThresholdRow> {
        self.rows.iter().find(|row| row.index == index)
    }

    fn find(&self, index: usize) -> Result<&ThresholdRow, ThresholdError> {
        self.get(index).ok_or(ThresholdError::RowNotFound(index))
    }

    fn position(&self, index: usize) -> Result<usize, ThresholdError> {
        self.rows
            .iter()
            .position(|row| row.index == index)
            .ok_or(ThresholdError::RowNotFound(index))
    }

    /// Check the list invariants: at least two rows, contiguous indices,
    /// ascending values, and removable rows only between Min and Max.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let len = self.rows.len();
        if len < 2 {
            return Err(ThresholdError::TooFewRows(len));
        }

        for (position, row) in self.rows.iter().enumerate() {
            if row.index != position {
                return Err(ThresholdError::NonContiguousIndex {
                    position,
                    index: row.index,
                });
            }
            if !row.value.is_finite() {
                return Err(ThresholdError::InvalidValue(row.value));
            }
            let boundary = position == 0 || position == len - 1;
            if row.can_remove == boundary {
                return Err(ThresholdError::InvalidBoundary(position));
            }
        }

        match self.rows.windows(2).find(|pair| pair[1].value < pair[0].value) {
            Some(pair) => Err(ThresholdError::Unsorted(pair[1].index)),
            None => Ok(()),
        }
    }

    /// Splice point for a row requested at logical slot `position`.
    ///
    /// One past Min, shifted by every interior row that sits before the
    /// slot, and never past Max.
    pub fn insert_at_index(&self, position: usize) -> usize {
        let interior_before = self
            .rows
            .iter()
            .filter(|row| row.can_remove && row.index < position)
            .count();

        (1 + interior_before).min(self.rows.len().saturating_sub(1))
    }

    /// Insert a row halfway between row `after_index - 1` and row `after_index`
    pub fn add_threshold(&self, after_index: usize) -> Result<Self, ThresholdError> {
        let len = self.rows.len();
        if after_index == 0 || after_index >= len {
            return Err(ThresholdError::AddOutOfRange { after_index, len });
        }

        let current = self.find(after_index)?;
        let previous = self.find(after_index - 1)?;

        let row = ThresholdRow::new(
            after_index,
            "",
            (previous.value + current.value) / 2.0,
            true,
            Some(ThresholdColor::Warning),
        );

        let mut rows = self.rows.clone();
        rows.insert(self.insert_at_index(after_index), row);

        Ok(Self::reindexed(rows))
    }

    /// Set the value of row `index`, then re-sort and reindex.
    ///
    /// Labels, colors and boundary flags are carried over untouched. An edit
    /// that would move an interior row outside Min..=Max, or a boundary row
    /// past an interior one, is rejected instead of promoting rows.
    pub fn change_value(&self, index: usize, value: f64) -> Result<Self, ThresholdError> {
        self.change_value_at(index, value).map(|(thresholds, _)| thresholds)
    }

    /// Like [`Thresholds::change_value`], also returning the index the
    /// edited row landed at. Rows can share a value, so this is the only
    /// reliable way to find the edited row again.
    pub fn change_value_at(
        &self,
        index: usize,
        value: f64,
    ) -> Result<(Self, usize), ThresholdError> {
        if !value.is_finite() {
            return Err(ThresholdError::InvalidValue(value));
        }

        let edited = self.position(index)?;
        let mut rows = self.rows.clone();
        rows[edited].value = value;

        if Self::crosses_boundary(&rows, edited) {
            return Err(ThresholdError::CrossesBoundary { index, value });
        }

        // Stable, so equal values keep their relative order
        let mut tagged: Vec<(usize, ThresholdRow)> = rows.into_iter().enumerate().collect();
        tagged.sort_by(|(_, a), (_, b)| a.value.total_cmp(&b.value));

        let landed = tagged
            .iter()
            .position(|(from, _)| *from == edited)
            .unwrap_or(edited);
        let rows = tagged.into_iter().map(|(_, row)| row).collect();

        Ok((Self::reindexed(rows), landed))
    }

    fn crosses_boundary(rows: &[ThresholdRow], edited: usize) -> bool {
        let last = rows.len() - 1;
        let value = rows[edited].value;

        if edited == 0 {
            rows[1..].iter().any(|row| row.value < value)
        } else if edited == last {
            rows[..last].iter().any(|row| row.value > value)
        } else {
            value < rows[0].value || value > rows[last].value
        }
    }

    /// Drop an interior row and reindex
    pub fn remove_threshold(&self, index: usize) -> Result<Self, ThresholdError> {
        let position = self.position(index)?;
        if self.rows[position].is_boundary() {
            return Err(ThresholdError::NotRemovable(index));
        }

        let mut rows = self.rows.clone();
        rows.remove(position);

        Ok(Self::reindexed(rows))
    }

    /// Color for a gauge reading: the last colored row at or below `value`.
    /// Readings below Min take the first available color.
    pub fn color_for(&self, value: f64) -> Option<&str> {
        let mut color = self.rows.iter().find_map(|row| row.color.as_deref());

        for row in self.rows.iter().take_while(|row| row.value <= value) {
            if let Some(row_color) = row.color.as_deref() {
                color = Some(row_color);
            }
        }

        color
    }

    fn reindexed(mut rows: Vec<ThresholdRow>) -> Self {
        for (index, row) in rows.iter_mut().enumerate() {
            row.index = index;
        }
        Self { rows }
    }
}

impl<'a> IntoIterator for &'a Thresholds {
    type Item = &'a ThresholdRow;
    type IntoIter = std::slice::Iter<'a, ThresholdRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
