
use serde::Serialize;

use std::fmt::{self, Display, Formatter};
use std::slice;

/// One row of the iteration table: the estimate after step `index`,
/// the function and derivative values there, and the error relative
/// to the previous estimate. The record at index 0 is the initial
/// guess and always carries an infinite error, since there is no
/// previous point to compare against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationRecord {
  pub index: usize,
  pub x: f64,
  pub fx: f64,
  pub fprime_x: f64,
  pub error_percent: f64,
}

/// The ordered sequence of records produced by one solve call. Owned
/// exclusively by the caller once returned; the solver keeps no
/// reference to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trace {
  records: Vec<IterationRecord>,
}

impl IterationRecord {
  /// The error column as the UI displays it: `"---"` for the initial
  /// record, a percentage to four decimals otherwise.
  pub fn error_cell(&self) -> String {
    if self.index == 0 {
      "---".to_owned()
    } else {
      format!("{:.4}%", self.error_percent)
    }
  }

  /// The five table cells for this record, formatted for display.
  pub fn table_row(&self) -> [String; 5] {
    [
      self.index.to_string(),
      format!("{:.4}", self.x),
      format!("{:.4}", self.fx),
      format!("{:.4}", self.fprime_x),
      self.error_cell(),
    ]
  }
}

impl Trace {
  pub(crate) fn push(&mut self, record: IterationRecord) {
    self.records.push(record);
  }

  pub fn records(&self) -> &[IterationRecord] {
    &self.records
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn last(&self) -> Option<&IterationRecord> {
    self.records.last()
  }

  /// The last estimate, i.e. the root candidate this solve produced.
  pub fn final_estimate(&self) -> Option<f64> {
    self.last().map(|record| record.x)
  }
}

impl Display for IterationRecord {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.table_row().join("  "))
  }
}

impl<'a> IntoIterator for &'a Trace {
  type Item = &'a IterationRecord;
  type IntoIter = slice::Iter<'a, IterationRecord>;

  fn into_iter(self) -> Self::IntoIter {
    self.records.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_initial_record_formatting() {
    let record = IterationRecord {
      index: 0,
      x: 1.0,
      fx: -1.0,
      fprime_x: 2.0,
      error_percent: f64::INFINITY,
    };
    assert_eq!(
      record.table_row(),
      ["0", "1.0000", "-1.0000", "2.0000", "---"],
    );
  }

  #[test]
  fn test_step_record_formatting() {
    let record = IterationRecord {
      index: 3,
      x: 1.41666667,
      fx: 0.00694444,
      fprime_x: 2.83333333,
      error_percent: 2.4509803,
    };
    assert_eq!(
      record.table_row(),
      ["3", "1.4167", "0.0069", "2.8333", "2.4510%"],
    );
    assert_eq!(record.to_string(), "3  1.4167  0.0069  2.8333  2.4510%");
  }

  #[test]
  fn test_final_estimate() {
    let mut trace = Trace::default();
    assert_eq!(trace.final_estimate(), None);
    assert!(trace.is_empty());

    trace.push(IterationRecord { index: 0, x: 1.0, fx: -1.0, fprime_x: 2.0, error_percent: f64::INFINITY });
    trace.push(IterationRecord { index: 1, x: 1.5, fx: 0.25, fprime_x: 3.0, error_percent: 33.3 });
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.final_estimate(), Some(1.5));
  }
}
