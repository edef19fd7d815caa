//! Row selection rules
//!
//! The selected flag lives on each [`RowState`]; this type decides how
//! flags change for single or multiple selection.

use evdash_domain::{DashError, Result, RowState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionModel {
    enabled: bool,
    multiple: bool,
}

impl SelectionModel {
    pub fn new(enabled: bool, multiple: bool) -> Self {
        Self { enabled, multiple }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_multiple(&self) -> bool {
        self.enabled && self.multiple
    }

    fn row_mut<'a, R>(&self, rows: &'a mut [RowState<R>], index: usize) -> Result<&'a mut RowState<R>> {
        if !self.enabled {
            return Err(DashError::InvalidInput("row selection is disabled".into()));
        }
        let len = rows.len();
        rows.get_mut(index)
            .ok_or_else(|| DashError::InvalidInput(format!("row {index} out of range ({len} rows)")))
    }

    /// Select a row; in single mode every other row is deselected.
    pub fn select<R>(&self, rows: &mut [RowState<R>], index: usize) -> Result<()> {
        self.row_mut(rows, index)?;
        if !self.multiple {
            Self::clear(rows);
        }
        rows[index].selected = true;
        Ok(())
    }

    pub fn deselect<R>(&self, rows: &mut [RowState<R>], index: usize) -> Result<()> {
        self.row_mut(rows, index)?.selected = false;
        Ok(())
    }

    /// Returns the new selected state of the row.
    pub fn toggle<R>(&self, rows: &mut [RowState<R>], index: usize) -> Result<bool> {
        if self.row_mut(rows, index)?.selected {
            rows[index].selected = false;
            Ok(false)
        } else {
            self.select(rows, index)?;
            Ok(true)
        }
    }

    /// Select every row unless all are already selected, in which case
    /// clear. Only meaningful in multiple mode.
    pub fn master_toggle<R>(&self, rows: &mut [RowState<R>]) -> Result<()> {
        if !self.is_multiple() {
            return Err(DashError::InvalidInput("master toggle needs multiple selection".into()));
        }
        if Self::all_selected(rows) {
            Self::clear(rows);
        } else {
            for row in rows.iter_mut() {
                row.selected = true;
            }
        }
        Ok(())
    }

    /// An empty page counts as fully selected, matching the header checkbox.
    pub fn all_selected<R>(rows: &[RowState<R>]) -> bool {
        rows.iter().all(|row| row.selected)
    }

    pub fn selected_indices<R>(rows: &[RowState<R>]) -> Vec<usize> {
        rows.iter().enumerate().filter(|(_, row)| row.selected).map(|(index, _)| index).collect()
    }

    pub fn clear<R>(rows: &mut [RowState<R>]) {
        for row in rows.iter_mut() {
            row.selected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<RowState<usize>> {
        (0..n).map(RowState::new).collect()
    }

    #[test]
    fn single_mode_keeps_one_row() {
        let model = SelectionModel::new(true, false);
        let mut rows = rows(3);
        model.select(&mut rows, 0).unwrap();
        model.select(&mut rows, 2).unwrap();
        assert_eq!(SelectionModel::selected_indices(&rows), vec![2]);
        assert!(model.master_toggle(&mut rows).is_err());
    }

    #[test]
    fn multiple_mode_accumulates() {
        let model = SelectionModel::new(true, true);
        let mut rows = rows(3);
        model.select(&mut rows, 0).unwrap();
        assert!(model.toggle(&mut rows, 2).unwrap());
        assert_eq!(SelectionModel::selected_indices(&rows), vec![0, 2]);
        assert!(!model.toggle(&mut rows, 0).unwrap());
        assert_eq!(SelectionModel::selected_indices(&rows), vec![2]);
    }

    #[test]
    fn master_toggle_selects_then_clears() {
        let model = SelectionModel::new(true, true);
        let mut rows = rows(3);
        model.select(&mut rows, 1).unwrap();
        model.master_toggle(&mut rows).unwrap();
        assert!(SelectionModel::all_selected(&rows));
        model.master_toggle(&mut rows).unwrap();
        assert!(SelectionModel::selected_indices(&rows).is_empty());
    }

    #[test]
    fn disabled_or_out_of_range_is_rejected() {
        let mut rows = rows(2);
        assert!(SelectionModel::new(false, true).select(&mut rows, 0).is_err());
        assert!(SelectionModel::new(true, true).deselect(&mut rows, 5).is_err());
    }
}
