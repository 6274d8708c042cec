use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec, TextEncoder,
};

pub static TOKENS_GENERATED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "jwtgen_tokens_generated_total",
        "Total number of tokens written",
        &["kind"]
    )
    .unwrap()
});

pub static BATCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "jwtgen_batch_duration_seconds",
        "Wall time of one batch generation",
        &["kind"],
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]
    )
    .unwrap()
});

pub static ERROR_COUNT: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "jwtgen_errors_total",
        "Total number of failed stages",
        &["stage"]
    )
    .unwrap()
});

/// Prometheus text exposition of every registered metric.
pub fn render() -> prometheus::Result<String> {
    TextEncoder::new().encode_to_string(&prometheus::gather())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_metrics() {
        TOKENS_GENERATED.with_label_values(&["HS256"]).inc_by(3);
        BATCH_DURATION.with_label_values(&["HS256"]).observe(0.2);
        ERROR_COUNT.with_label_values(&["sink"]).inc();

        let text = render().unwrap();
        assert!(text.contains("jwtgen_tokens_generated_total{kind=\"HS256\"}"));
        assert!(text.contains("jwtgen_batch_duration_seconds_bucket"));
        assert!(text.contains("jwtgen_errors_total{stage=\"sink\"}"));
    }
}
