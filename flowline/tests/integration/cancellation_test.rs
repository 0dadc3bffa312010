use flowline::concurrency::shutdown::create_shutdown_channel;
use flowline::concurrency::stream::ShutdownStream;
use flowline::config::PipelineConfig;
use flowline::pipeline::Pipeline;
use flowline::stages::{
    fan_out_with_shutdown, merge_with_shutdown, source_with_shutdown, transform_with_shutdown,
};
use futures::StreamExt;
use telemetry::tracing::init_test_tracing;
use tokio::time::timeout;

use crate::common::{BOUNDED_WAIT, drain_bounded, recv_bounded};

// Per stage edge at most one value sits in the handoff slot, so only a small fixed
// number of in-flight values may still arrive after cancellation.
const IN_FLIGHT_BOUND: usize = 16;

#[tokio::test(flavor = "multi_thread")]
async fn cancellation_unwinds_an_infinite_pipeline() {
    init_test_tracing();

    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
    let input = source_with_shutdown(shutdown_rx.clone(), 0u64..);
    let out = fan_out_with_shutdown(shutdown_rx, input, 2, |n| n * n);

    assert!(recv_bounded(&out).await.is_some());

    shutdown_tx.shutdown();

    // Every stage terminates: the merged output closes within the bound even though
    // the source is infinite.
    let mut remaining = 0;
    while recv_bounded(&out).await.is_some() {
        remaining += 1;
        assert!(
            remaining <= IN_FLIGHT_BOUND,
            "cancelled pipeline kept producing"
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_before_any_read_terminates_all_stages() {
    init_test_tracing();

    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
    let input = source_with_shutdown(shutdown_rx.clone(), 0u64..);
    let out = merge_with_shutdown(
        shutdown_rx.clone(),
        vec![
            transform_with_shutdown(shutdown_rx.clone(), input.clone(), |n| n + 1),
            transform_with_shutdown(shutdown_rx, input, |n| n + 1),
        ],
    );

    // No read is required to succeed; the output must still close within the bound.
    shutdown_tx.shutdown();

    let drained = drain_bounded(&out).await;
    assert!(
        drained.len() <= IN_FLIGHT_BOUND,
        "cancelled pipeline kept producing"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn bounded_read_through_a_shutdown_stream() {
    init_test_tracing();

    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
    let out = source_with_shutdown(shutdown_rx.clone(), 0u64..);
    let mut stream = Box::pin(ShutdownStream::wrap(out.into_stream(), shutdown_rx));

    // Read a bounded prefix, then cancel and discard the rest.
    for _ in 0..3 {
        assert!(stream.next().await.is_some());
    }
    shutdown_tx.shutdown();

    let mut remaining = 0;
    while timeout(BOUNDED_WAIT, stream.next())
        .await
        .expect("stream did not end after shutdown")
        .is_some()
    {
        remaining += 1;
        assert!(remaining <= IN_FLIGHT_BOUND, "stream kept producing");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_the_pipeline_unwinds_its_stages() {
    init_test_tracing();

    let config: PipelineConfig = serde_json::from_str(r#"{ "id": 7 }"#).unwrap();
    let pipeline = Pipeline::new(config).unwrap();
    let out = pipeline.fan_out(pipeline.source(0u64..), |n| n * n);

    assert!(recv_bounded(&out).await.is_some());

    // The driver abandons the pipeline without draining it.
    drop(pipeline);

    let mut remaining = 0;
    while recv_bounded(&out).await.is_some() {
        remaining += 1;
        assert!(
            remaining <= IN_FLIGHT_BOUND,
            "abandoned pipeline kept producing"
        );
    }
}
