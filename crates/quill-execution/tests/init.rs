use quill_execution::{LogFormat, init_tracing};

#[test]
fn test_init_streams_events_and_refuses_second_install() {
    let mut receiver = init_tracing("quill=debug", LogFormat::Json).unwrap();

    tracing::info!(target: "quill::action", kind = "respond", "action started");
    tracing::trace!(target: "quill::action", "filtered out");

    let event = receiver.try_recv().unwrap();
    assert_eq!(event.message, "action started");
    assert!(receiver.try_recv().is_err());

    assert!(init_tracing("info", LogFormat::Pretty).is_err());
}
