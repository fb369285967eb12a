//! Daily percentage returns from closing prices.
//!
//! `r_t = (p_t - p_{t-1}) / p_{t-1}`

use crate::{AlignedTable, CapmError, Result, ReturnTable};

/// Convert a price table with `N` rows into a return table with `N - 1` rows.
///
/// The first price row only serves as the base for the second row's return.
/// Tables with fewer than two rows produce an empty return table.
///
/// # Errors
///
/// Returns [`CapmError::DivisionByZero`] if a price used as a base is zero.
pub fn daily_returns(table: &AlignedTable) -> Result<ReturnTable> {
    let dates = table.dates();
    let out_dates = dates.get(1..).unwrap_or_default().to_vec();

    let columns = table
        .columns()
        .map(|(name, prices)| {
            prices
                .windows(2)
                .enumerate()
                .map(|(i, w)| {
                    if w[0] == 0.0 {
                        return Err(CapmError::DivisionByZero {
                            column: name.to_string(),
                            date: dates[i],
                        });
                    }
                    Ok((w[1] - w[0]) / w[0])
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(ReturnTable::from_parts(
        out_dates,
        table.benchmark().to_string(),
        table.symbols().to_vec(),
        columns,
    ))
}

/// Rebuild a price path from a base price and the returns that followed it.
///
/// The output has one more element than `returns`, starting with `base`.
pub fn compound(base: f64, returns: &[f64]) -> Vec<f64> {
    let mut prices = Vec::with_capacity(returns.len() + 1);
    prices.push(base);
    let mut price = base;
    for r in returns {
        price *= 1.0 + r;
        prices.push(price);
    }
    prices
}
