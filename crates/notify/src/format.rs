use common::SignalDecision;

/// Render the confirmed-signal alert text. Every numeric feature can be
/// unavailable in principle (a confirmed signal implies the compulsory ones
/// are present, but the formatter never assumes it).
pub fn format_signal_alert(d: &SignalDecision) -> String {
    format!(
        "✅ CONFIRMED SIGNAL — {symbol} ({timeframe})\n\
         \n\
         💰 Price: ${price} | EMA200: ${ema200}\n\
         🚀 EMA Expansion: {expansion}\n\
         📈 EMA200 Change: +{slope} since cross\n\
         💪 ADX 15m: {adx_15m} | 1h: {adx_1h}\n\
         📊 RSI 15m: {rsi_15m} | 1h: {rsi_1h}\n\
         📊 Volume at Cross: {volume}\n\
         \n\
         💎 ALL CRITERIA MET",
        symbol = d.symbol,
        timeframe = d.cross.timeframe,
        price = opt(d.price, 2),
        ema200 = opt(d.ema200, 2),
        expansion = pct(d.features.expansion_pct),
        slope = pct(d.features.ema200_slope_pct),
        adx_15m = opt(d.features.adx_15m, 1),
        adx_1h = opt(d.features.adx_1h, 1),
        rsi_15m = opt(d.features.rsi_15m, 1),
        rsi_1h = opt(d.features.rsi_1h, 1),
        volume = d
            .features
            .volume_ratio
            .map(|v| format!("{v:.1}x"))
            .unwrap_or_else(|| "n/a".into()),
    )
}

fn opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".into(),
    }
}

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".into(),
    }
}
