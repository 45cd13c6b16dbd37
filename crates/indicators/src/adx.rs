/// ADX (Average Directional Index), full series, Wilder smoothing throughout
/// — the same recurrence TradingView uses. Directional movement and true
/// range need a previous candle, so the series warms up over roughly
/// `di_period + adx_period` candles before the first defined slot.
pub fn adx_series(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    di_period: usize,
    adx_period: usize,
) -> Vec<Option<f64>> {
    assert!(di_period >= 1 && adx_period >= 1, "ADX periods must be >= 1");
    assert!(
        high.len() == low.len() && low.len() == close.len(),
        "ADX inputs must be equal length"
    );

    let n = high.len();
    let mut tr = vec![None; n];
    let mut plus_dm = vec![None; n];
    let mut minus_dm = vec![None; n];

    for i in 1..n {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        plus_dm[i] = Some(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm[i] = Some(if down > up && down > 0.0 { down } else { 0.0 });

        let range = (high[i] - low[i])
            .max((high[i] - close[i - 1]).abs())
            .max((low[i] - close[i - 1]).abs());
        tr[i] = Some(range);
    }

    let tr_rma = rma(&tr, di_period);
    let plus_rma = rma(&plus_dm, di_period);
    let minus_rma = rma(&minus_dm, di_period);

    // DX in percent; flat markets (zero true range / zero DI sum) count as 0
    let mut dx = vec![None; n];
    for i in 0..n {
        if let (Some(t), Some(p), Some(m)) = (tr_rma[i], plus_rma[i], minus_rma[i]) {
            let (plus_di, minus_di) = if t > 0.0 {
                (100.0 * p / t, 100.0 * m / t)
            } else {
                (0.0, 0.0)
            };
            let sum = plus_di + minus_di;
            dx[i] = Some(if sum > 0.0 {
                100.0 * (plus_di - minus_di).abs() / sum
            } else {
                0.0
            });
        }
    }

    rma(&dx, adx_period)
}

/// Wilder's moving average over a partially-defined series: seeded with the
/// simple mean of the first `period` consecutive defined values, then
/// `(prev * (period - 1) + x) / period`.
fn rma(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let mut run = 0usize;
    let mut prev: Option<f64> = None;

    for (i, slot) in values.iter().enumerate() {
        let Some(v) = *slot else {
            run = 0;
            continue;
        };
        match prev {
            Some(p) => {
                let next = (p * (period - 1) as f64 + v) / period as f64;
                out[i] = Some(next);
                prev = Some(next);
            }
            None => {
                run += 1;
                if run == period {
                    let seed: f64 = values[i + 1 - period..=i]
                        .iter()
                        .map(|x| x.unwrap_or(0.0))
                        .sum::<f64>()
                        / period as f64;
                    out[i] = Some(seed);
                    prev = Some(seed);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_series(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * 0.5).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 0.4).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.4).collect();
        (high, low, close)
    }

    #[test]
    fn adx_warmup_is_none_then_defined() {
        let (high, low, close) = trending_series(100);
        let adx = adx_series(&high, &low, &close, 14, 14);
        assert_eq!(adx.len(), 100);
        // DM/TR start at index 1, DI needs 14 values, ADX another 14
        assert!(adx[..20].iter().all(|v| v.is_none()));
        assert!(adx.last().unwrap().is_some());
    }

    #[test]
    fn adx_stays_in_range() {
        let (high, low, close) = trending_series(120);
        for v in adx_series(&high, &low, &close, 14, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "ADX out of range: {v}");
        }
    }

    #[test]
    fn adx_high_in_steady_trend() {
        // A clean one-directional trend should read as strong (> 25)
        let (high, low, close) = trending_series(150);
        let adx = adx_series(&high, &low, &close, 14, 14);
        let last = adx.last().unwrap().unwrap();
        assert!(last > 25.0, "steady trend should give high ADX, got {last}");
    }

    #[test]
    fn adx_flat_market_is_zero() {
        let high = vec![100.0; 80];
        let low = vec![100.0; 80];
        let close = vec![100.0; 80];
        let adx = adx_series(&high, &low, &close, 14, 14);
        let last = adx.last().unwrap().unwrap();
        assert!(last.abs() < 1e-9, "flat market should give ADX 0, got {last}");
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn adx_rejects_mismatched_inputs() {
        adx_series(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 14, 14);
    }
}
