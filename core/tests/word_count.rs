//! End-to-end word count runs.

mod common;

use common::*;
use futures::StreamExt;
use mapflow_core::{Engine, EngineConfig, Tuple, WordCount, run};
use std::sync::Arc;

#[tokio::test]
async fn test_word_count_two_records() {
    let output = run(Arc::new(WordCount), ["the cat sat", "the dog ran"]);
    let (tuples, stats) = within_timeout(output.finish()).await.unwrap();

    assert_eq!(
        to_map(tuples),
        counts(&[("the", 2), ("cat", 1), ("sat", 1), ("dog", 1), ("ran", 1)])
    );
    assert_eq!(stats.map_tasks, 2);
    assert_eq!(stats.intermediate_tuples, 6);
    assert_eq!(stats.reduce_tasks, 5);
    assert_eq!(stats.output_tuples, 5);
}

#[tokio::test]
async fn test_empty_input_closes_without_output() {
    let mut output = run(Arc::new(WordCount), Vec::<String>::new());

    assert_eq!(within_timeout(output.recv()).await, None);
    let stats = within_timeout(output.join()).await.unwrap();
    assert_eq!(stats.map_tasks, 0);
    assert_eq!(stats.reduce_tasks, 0);
    assert_eq!(stats.output_tuples, 0);
}

#[tokio::test]
async fn test_blank_records_produce_no_words() {
    let output = run(Arc::new(WordCount), ["", "   ", "\t"]);
    let (tuples, stats) = within_timeout(output.finish()).await.unwrap();
    assert!(tuples.is_empty());
    assert_eq!(stats.map_tasks, 3);
    assert_eq!(stats.reduce_tasks, 0);
}

#[tokio::test]
async fn test_output_is_a_stream() {
    let output = run(Arc::new(WordCount), ["a b a", "b a"]);
    let tuples: Vec<Tuple> = within_timeout(output.collect::<Vec<_>>()).await;

    assert_same_elements(tuples, vec![Tuple::new("a", "3"), Tuple::new("b", "2")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_records_small_buffer() {
    let lines: Vec<String> = (0..500)
        .map(|i| format!("alpha beta w{} w{}", i % 7, i % 3))
        .collect();
    let engine = Engine::try_new(EngineConfig::new().with_buffer_capacity(1)).unwrap();

    let (tuples, stats) = within_timeout(engine.run(Arc::new(WordCount), lines).finish())
        .await
        .unwrap();
    let result = to_map(tuples);

    assert_eq!(stats.map_tasks, 500);
    assert_eq!(stats.intermediate_tuples, 2000);
    // alpha, beta, w0..w6
    assert_eq!(result.len(), 9);
    assert_eq!(result["alpha"], "500");
    assert_eq!(result["beta"], "500");
    // w0 comes from i % 7 == 0 (72 times) and i % 3 == 0 (167 times)
    assert_eq!(result["w0"], "239");
    assert_eq!(result["w6"], "71");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounded_concurrency_gives_same_result() {
    let lines = vec!["x y z".to_string(); 64];
    let unbounded = within_timeout(run(Arc::new(WordCount), lines.clone()).finish())
        .await
        .unwrap()
        .0;

    let engine = Engine::try_new(EngineConfig::new().with_max_concurrent_tasks(2)).unwrap();
    let bounded = within_timeout(engine.run(Arc::new(WordCount), lines).finish())
        .await
        .unwrap()
        .0;

    assert_eq!(to_map(unbounded), to_map(bounded));
}
