/// Exponential moving average over `period` values, SMA-seeded.
///
/// The first defined slot is at index `period - 1` (the SMA of the first
/// `period` values); earlier slots are `None`. Smoothing factor is the
/// standard `2 / (period + 1)`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    assert!(period >= 1, "EMA period must be >= 1");

    let mut out = vec![None; values.len()];
    if values.len() < period {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(seed);

    let mut prev = seed;
    for (i, &v) in values.iter().enumerate().skip(period) {
        prev = alpha * v + (1.0 - alpha) * prev;
        out[i] = Some(prev);
    }
    out
}
