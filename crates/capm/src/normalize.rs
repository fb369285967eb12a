//! Rescaling prices to a common starting value for relative-performance charts.

use crate::{AlignedTable, CapmError, NormalizedTable, Result};

/// Divide every column by its first-row value so each column starts at 1.0.
///
/// An empty table normalizes to an empty table.
///
/// # Errors
///
/// Returns [`CapmError::DivisionByZero`] if any column's first value is zero.
pub fn normalize(table: &AlignedTable) -> Result<NormalizedTable> {
    let Some(&first_date) = table.dates().first() else {
        return Ok(NormalizedTable::from_parts(
            Vec::new(),
            table.benchmark().to_string(),
            table.symbols().to_vec(),
            vec![Vec::new(); table.width()],
        ));
    };

    let columns = table
        .columns()
        .map(|(name, values)| {
            let base = values[0];
            if base == 0.0 {
                return Err(CapmError::DivisionByZero {
                    column: name.to_string(),
                    date: first_date,
                });
            }
            Ok(values.iter().map(|v| v / base).collect())
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(NormalizedTable::from_parts(
        table.dates().to_vec(),
        table.benchmark().to_string(),
        table.symbols().to_vec(),
        columns,
    ))
}
