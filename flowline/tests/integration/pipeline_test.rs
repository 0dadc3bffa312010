use flowline::config::PipelineConfig;
use flowline::error::ErrorKind;
use flowline::pipeline::Pipeline;
use flowline::stages::{merge, source, transform};
use futures::StreamExt;
use telemetry::tracing::init_test_tracing;

use crate::common::{drain_bounded, recv_bounded};

#[tokio::test(flavor = "multi_thread")]
async fn transform_preserves_order() {
    init_test_tracing();

    let out = transform(source(vec![2, 3]), |n| n * n);

    assert_eq!(recv_bounded(&out).await, Some(4));
    assert_eq!(recv_bounded(&out).await, Some(9));
    assert_eq!(recv_bounded(&out).await, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn chained_transforms_preserve_order() {
    init_test_tracing();

    let out = transform(transform(source(vec![2, 3]), |n| n * n), |n| n * n);

    assert_eq!(drain_bounded(&out).await, vec![16, 81]);
}

#[tokio::test(flavor = "multi_thread")]
async fn close_propagates_through_a_deep_chain() {
    init_test_tracing();

    let mut out = source(Vec::<u64>::new());
    for _ in 0..8 {
        out = transform(out, |n| n);
    }

    // Upstream exhaustion must reach the end of the chain within the bound.
    assert_eq!(recv_bounded(&out).await, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn merge_emits_every_input_value_exactly_once() {
    init_test_tracing();

    let out = merge(vec![
        source(0..50i64),
        source(50..75i64),
        source(75..100i64),
    ]);

    let mut values = drain_bounded(&out).await;
    values.sort_unstable();
    assert_eq!(values, (0..100i64).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread")]
async fn fan_out_distributes_without_duplication_or_loss() {
    init_test_tracing();

    // Two transforms share one upstream; each value reaches exactly one of them.
    let input = source(0..100i64);
    let out = merge(vec![
        transform(input.clone(), |n| n * n),
        transform(input, |n| n * n),
    ]);

    let mut values = drain_bounded(&out).await;
    values.sort_unstable();
    assert_eq!(values, (0..100i64).map(|n| n * n).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread")]
async fn fan_out_of_squares_yields_expected_multiset() {
    init_test_tracing();

    let input = source(vec![2i64, 3]);
    let out = merge(vec![
        transform(input.clone(), |n| n * n),
        transform(input, |n| n * n),
    ]);

    let mut values = drain_bounded(&out).await;
    values.sort_unstable();
    assert_eq!(values, vec![4, 9]);
}

#[tokio::test(flavor = "multi_thread")]
async fn stage_output_consumes_as_a_stream() {
    init_test_tracing();

    let out = transform(source(vec![1i64, 2, 3]), |n| n * 10);

    let values: Vec<_> = out.into_stream().collect().await;
    assert_eq!(values, vec![10, 20, 30]);
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_fan_out_uses_configured_worker_count() {
    init_test_tracing();

    let config: PipelineConfig = serde_json::from_str(r#"{ "id": 42 }"#).unwrap();
    let pipeline = Pipeline::new(config).unwrap();
    assert_eq!(pipeline.id(), 42);

    let out = pipeline.fan_out(pipeline.source(vec![2i64, 3]), |n| n * n);

    let mut values = drain_bounded(&out).await;
    values.sort_unstable();
    assert_eq!(values, vec![4, 9]);
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_rejects_invalid_configuration() {
    init_test_tracing();

    let config: PipelineConfig =
        serde_json::from_str(r#"{ "id": 42, "fan_out_workers": 0 }"#).unwrap();

    let err = Pipeline::new(config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigError);
}
