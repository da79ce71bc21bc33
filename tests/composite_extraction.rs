//! Ordered fallback behavior of the composite extractor.

use std::sync::{Arc, Mutex};
use std::thread;

use axum::http::{HeaderMap, HeaderValue};
use stackdriver_trace::propagation::{
    stackdriver_extractor, CompositeExtractor, PropagationError, TraceContextOrSamplingFlags,
};

mod common;
use common::{context, erased, CallLog, ScriptedExtractor};

fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn test_construction_requires_extractors() {
    assert!(matches!(
        CompositeExtractor::<HeaderMap>::from_optional(None),
        Err(PropagationError::InvalidArgument(_))
    ));
    assert!(matches!(
        CompositeExtractor::<HeaderMap>::new(&[]),
        Err(PropagationError::InvalidArgument(_))
    ));
}

#[test]
fn test_stops_at_first_valid_context() {
    let log = call_log();
    let e1 = ScriptedExtractor::new("e1", Ok(TraceContextOrSamplingFlags::EMPTY), &log);
    let e2 = ScriptedExtractor::new("e2", Ok(TraceContextOrSamplingFlags::EMPTY), &log);
    let e3 = ScriptedExtractor::new("e3", Ok(context(3, 3)), &log);
    let e4 = ScriptedExtractor::new("e4", Ok(context(4, 4)), &log);
    let composite =
        CompositeExtractor::new(&[erased(&e1), erased(&e2), erased(&e3), erased(&e4)]).unwrap();

    let result = composite.extract(&HeaderMap::new()).unwrap();

    assert_eq!(result, context(3, 3));
    assert_eq!(*log.lock().unwrap(), vec!["e1", "e2", "e3"]);
    assert_eq!(
        (e1.calls(), e2.calls(), e3.calls(), e4.calls()),
        (1, 1, 1, 0)
    );
}

#[test]
fn test_exhausted_chain_is_empty() {
    let log = call_log();
    let e1 = ScriptedExtractor::new("e1", Ok(TraceContextOrSamplingFlags::EMPTY), &log);
    let composite = CompositeExtractor::new(&[erased(&e1)]).unwrap();

    assert_eq!(
        composite.extract(&HeaderMap::new()).unwrap(),
        TraceContextOrSamplingFlags::EMPTY
    );
    assert_eq!(e1.calls(), 1);
}

#[test]
fn test_error_propagates_without_fallback() {
    let log = call_log();
    let failure = PropagationError::MalformedHeader {
        header: "x-test",
        reason: "unreadable".to_string(),
    };
    let e1 = ScriptedExtractor::new("e1", Err(failure.clone()), &log);
    let e2 = ScriptedExtractor::new("e2", Ok(context(2, 2)), &log);
    let composite = CompositeExtractor::new(&[erased(&e1), erased(&e2)]).unwrap();

    assert_eq!(composite.extract(&HeaderMap::new()), Err(failure));
    assert_eq!(e1.calls(), 1);
    assert_eq!(e2.calls(), 0);
}

#[test]
fn test_caller_list_mutation_is_isolated() {
    let log = call_log();
    let e1 = ScriptedExtractor::new("e1", Ok(TraceContextOrSamplingFlags::EMPTY), &log);
    let mut extractors = vec![erased(&e1)];
    let composite = CompositeExtractor::new(&extractors).unwrap();

    let replacement = ScriptedExtractor::new("replacement", Ok(context(9, 9)), &log);
    let appended = ScriptedExtractor::new("appended", Ok(context(8, 8)), &log);
    extractors[0] = erased(&replacement);
    extractors.push(erased(&appended));

    assert!(composite.extract(&HeaderMap::new()).unwrap().is_empty());
    assert_eq!(*log.lock().unwrap(), vec!["e1"]);
    assert_eq!(replacement.calls() + appended.calls(), 0);
}

#[test]
fn test_shared_across_threads() {
    let composite = Arc::new(stackdriver_extractor::<HeaderMap>());

    let handles: Vec<_> = (1..=8u64)
        .map(|span_id| {
            let composite = composite.clone();
            thread::spawn(move || {
                let value = format!("105445aa7843bc8bf206b12000100000/{};o=1", span_id);
                let mut headers = HeaderMap::new();
                headers.insert(
                    "x-cloud-trace-context",
                    HeaderValue::from_str(&value).unwrap(),
                );
                let result = composite.extract(&headers).unwrap();
                assert_eq!(result.context().unwrap().span_id, span_id);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_malformed_cloud_header_falls_back_to_b3() {
    let composite = stackdriver_extractor::<HeaderMap>();
    let mut headers = HeaderMap::new();
    headers.insert("x-cloud-trace-context", HeaderValue::from_static("not-a-trace"));
    headers.insert("x-b3-traceid", HeaderValue::from_static("48485a3953bb6124"));
    headers.insert("x-b3-spanid", HeaderValue::from_static("a2fb4a1d1a96d312"));

    let result = composite.extract(&headers).unwrap();
    let ctx = result.context().unwrap();
    assert_eq!(ctx.trace_id, 0x48485a3953bb6124);
    assert_eq!(ctx.span_id, 0xa2fb4a1d1a96d312);
}
