//! End-to-end runs of the anagram strategy through the scheduler

mod common;

use anagram_pipeline::anagrams::AnagramStrategy;
use anagram_pipeline::error::ErrorCode;
use anagram_pipeline::pipeline::{FailurePolicy, Scheduler, SchedulerOptions};
use common::{read_counts, CorpusBuilder};
use std::collections::HashMap;
use std::fs;

fn counts(entries: &[(&str, usize)]) -> HashMap<String, usize> {
    entries.iter().map(|&(k, n)| (k.to_string(), n)).collect()
}

#[tokio::test]
async fn test_anagrams_across_two_files() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("first.txt", "tier alpha")
        .with_file("second.txt", "rite")
        .build()
        .unwrap();
    let out = corpus.scratch("output/count_anagrams.txt");

    let report = Scheduler::new(AnagramStrategy::new(corpus.root(), &out))
        .run()
        .await
        .unwrap();

    assert_eq!(report.jobs_emitted, 2);
    assert!(report.is_clean());
    assert_eq!(
        read_counts(&out).unwrap(),
        counts(&[("eirt", 2), ("aahlp", 1)])
    );
}

#[tokio::test]
async fn test_counts_every_occurrence() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("a.txt", "listen silent enlist\nlisten")
        .with_file("nested/b.txt", "Silent TINSEL")
        .build()
        .unwrap();
    let out = corpus.scratch("out.txt");

    Scheduler::new(AnagramStrategy::new(corpus.root(), &out))
        .run()
        .await
        .unwrap();

    assert_eq!(read_counts(&out).unwrap(), counts(&[("eilnst", 6)]));
}

#[tokio::test]
async fn test_filtered_tokens_never_appear() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("a.txt", "the cat sat on a mat, well-known words: dog's fine")
        .build()
        .unwrap();
    let out = corpus.scratch("out.txt");

    Scheduler::new(AnagramStrategy::new(corpus.root(), &out))
        .run()
        .await
        .unwrap();

    // "fine" is the only purely alphanumeric word longer than three characters
    assert_eq!(read_counts(&out).unwrap(), counts(&[("efin", 1)]));
}

#[tokio::test]
async fn test_empty_corpus_produces_empty_output() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("readme.md", "listen silent")
        .build()
        .unwrap();
    let out = corpus.scratch("output/count_anagrams.txt");

    let report = Scheduler::new(AnagramStrategy::new(corpus.root(), &out))
        .run()
        .await
        .unwrap();

    assert_eq!(report.jobs_emitted, 0);
    assert!(out.exists());
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[tokio::test]
async fn test_missing_root_still_writes_output() {
    let corpus = CorpusBuilder::new().unwrap().build().unwrap();
    let out = corpus.scratch("out.txt");

    let report = Scheduler::new(AnagramStrategy::new(corpus.scratch("nowhere"), &out))
        .run()
        .await
        .unwrap();

    assert!(report.emission_error.is_some());
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[tokio::test]
async fn test_unreadable_file_is_skipped() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("a.txt", "tier")
        .with_unreadable_file("b.txt")
        .with_file("c.txt", "rite alpha")
        .build()
        .unwrap();
    let out = corpus.scratch("out.txt");

    let report = Scheduler::new(AnagramStrategy::new(corpus.root(), &out))
        .run()
        .await
        .unwrap();

    assert_eq!(report.jobs_succeeded, 2);
    assert_eq!(report.jobs_failed, 1);
    assert!(report.failures[0].job.ends_with("b.txt"));
    assert_eq!(
        read_counts(&out).unwrap(),
        counts(&[("eirt", 2), ("aahlp", 1)])
    );
}

#[tokio::test]
async fn test_unreadable_file_aborts_with_fail_fast() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("a.txt", "tier")
        .with_unreadable_file("b.txt")
        .build()
        .unwrap();
    let out = corpus.scratch("out.txt");

    let options = SchedulerOptions {
        failure_policy: FailurePolicy::Abort,
        ..SchedulerOptions::default()
    };
    let err = Scheduler::new(AnagramStrategy::new(corpus.root(), &out))
        .with_options(options)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::JOB_READ_FAILED);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("a.txt", "evil live veil vile\nstop pots tops")
        .with_file("b/c.txt", "spot opts post")
        .build()
        .unwrap();
    let out = corpus.scratch("out.txt");
    let scheduler = Scheduler::new(AnagramStrategy::new(corpus.root(), &out));

    scheduler.run().await.unwrap();
    let first = fs::read_to_string(&out).unwrap();
    scheduler.run().await.unwrap();
    let second = fs::read_to_string(&out).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        read_counts(&out).unwrap(),
        counts(&[("eilv", 4), ("opst", 6)])
    );
}

#[tokio::test]
async fn test_parallel_run_matches_sequential_output() {
    let mut builder = CorpusBuilder::new().unwrap();
    for i in 0..12 {
        builder = builder.with_file(
            format!("dir{}/file{}.txt", i % 3, i),
            &format!("listen silent stone notes onset tones {}", "alpha ".repeat(i)),
        );
    }
    let corpus = builder.build().unwrap();

    let sequential_out = corpus.scratch("sequential.txt");
    Scheduler::new(AnagramStrategy::new(corpus.root(), &sequential_out))
        .run()
        .await
        .unwrap();

    let parallel_out = corpus.scratch("parallel.txt");
    let options = SchedulerOptions {
        workers: 4,
        ..SchedulerOptions::default()
    };
    Scheduler::new(AnagramStrategy::new(corpus.root(), &parallel_out))
        .with_options(options)
        .run()
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&sequential_out).unwrap(),
        fs::read_to_string(&parallel_out).unwrap()
    );
    assert_eq!(read_counts(&parallel_out).unwrap()["aahlp"], 66);
}

#[tokio::test]
async fn test_higher_threshold_drops_short_words() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("a.txt", "tier rite alpha")
        .build()
        .unwrap();
    let out = corpus.scratch("out.txt");

    Scheduler::new(AnagramStrategy::new(corpus.root(), &out).with_min_token_length(4))
        .run()
        .await
        .unwrap();

    assert_eq!(read_counts(&out).unwrap(), counts(&[("aahlp", 1)]));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_file_is_counted() {
    let corpus = CorpusBuilder::new()
        .unwrap()
        .with_file("a.txt", "tier")
        .build()
        .unwrap();
    let shared = corpus.scratch("shared.txt");
    fs::write(&shared, "rite alpha").unwrap();
    std::os::unix::fs::symlink(&shared, corpus.root().join("b.txt")).unwrap();
    let out = corpus.scratch("out.txt");

    let report = Scheduler::new(AnagramStrategy::new(corpus.root(), &out))
        .run()
        .await
        .unwrap();

    assert_eq!(report.jobs_emitted, 2);
    assert_eq!(
        read_counts(&out).unwrap(),
        counts(&[("eirt", 2), ("aahlp", 1)])
    );
}
