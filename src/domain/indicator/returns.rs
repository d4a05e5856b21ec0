//! Log returns of the close price.
//!
//! LR[i] = ln(C[i] / C[i-1]); index 0 is undefined.

use crate::domain::indicator::UNDEFINED;

pub fn calculate_log_returns(closes: &[f64]) -> Vec<f64> {
    let mut values = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return values;
    }

    values.push(UNDEFINED);
    values.extend(closes.windows(2).map(|pair| (pair[1] / pair[0]).ln()));
    values
}
