//! Integration tests for the oov CLI.

use clap::Parser;
use oov_cli::cli::{Cli, run_cli};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a Kaldi-style test set of 30 words (`wN` occurring `N % 5 + 1`
/// times, 90 tokens) and a text corpus using the same characters.
fn write_corpora(dir: &Path) -> (PathBuf, PathBuf) {
    let test_set = dir.join("text");
    let lines: Vec<String> = (0..30)
        .map(|i| format!("utt{i} {}", vec![format!("w{i}"); i % 5 + 1].join(" ")))
        .collect();
    fs::write(&test_set, lines.join("\n") + "\n").unwrap();

    let text_corpus = dir.join("corpus");
    let corpus: Vec<String> = (0..30).map(|i| format!("w{i} w{} w0", i + 100)).collect();
    fs::write(&text_corpus, corpus.join("\n") + "\n").unwrap();

    (test_set, text_corpus)
}

fn setup_cli(test_set: &Path, text_corpus: &Path, data_dir: &Path, extra: &[&str]) -> Cli {
    setup_cli_with_rates(test_set, text_corpus, data_dir, ("0.05", "0.05"), extra)
}

fn setup_cli_with_rates(
    test_set: &Path,
    text_corpus: &Path,
    data_dir: &Path,
    (starting_oov_rate, increase): (&str, &str),
    extra: &[&str],
) -> Cli {
    let mut argv = vec![
        "oov",
        "setup",
        "--test_set",
        test_set.to_str().unwrap(),
        "--text_corpus",
        text_corpus.to_str().unwrap(),
        "--data_dir",
        data_dir.to_str().unwrap(),
        "--starting_oov_rate",
        starting_oov_rate,
        "--increase",
        increase,
        "--num_groups",
        "2",
        "--num_sets_in_group",
        "3",
        "--min_occurrence",
        "1",
        "--max_occurrence",
        "10",
        "--seed",
        "7",
    ];
    argv.extend_from_slice(extra);
    Cli::parse_from(argv)
}

fn read_tree(dir: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for group in fs::read_dir(dir).unwrap() {
        let group = group.unwrap().path();
        if !group.is_dir() {
            continue;
        }
        for set in fs::read_dir(&group).unwrap() {
            let set = set.unwrap().path();
            let name = set.strip_prefix(dir).unwrap().display().to_string();
            files.push((name, fs::read_to_string(&set).unwrap()));
        }
    }
    files.sort();
    files
}

#[test]
fn setup_writes_frequency_files_and_groups() {
    let dir = tempfile::tempdir().unwrap();
    let (test_set, text_corpus) = write_corpora(dir.path());
    let data_dir = dir.path().join("exp");

    run_cli(setup_cli(&test_set, &text_corpus, &data_dir, &[])).expect("setup failed");

    let test_freq = fs::read_to_string(data_dir.join("word_frequency_files/test_corpus")).unwrap();
    assert_eq!(test_freq.lines().count(), 30);
    assert!(test_freq.starts_with("w4 5\n"));
    assert!(!test_freq.contains("utt"));
    assert!(data_dir.join("word_frequency_files/text_corpus").is_file());

    let candidates = data_dir.join("candidate_output");
    for group in ["group_1_0.05", "group_2_0.1"] {
        for set in ["1", "2", "3"] {
            let path = candidates.join(group).join(set);
            let content = fs::read_to_string(&path).unwrap();
            assert!(content.lines().all(|l| l.split('\t').count() == 2), "{}", path.display());
        }
    }
    assert!(candidates.join("summary.json").is_file());
}

#[test]
fn same_seed_reproduces_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let (test_set, text_corpus) = write_corpora(dir.path());

    let first = dir.path().join("first");
    let second = dir.path().join("second");
    run_cli(setup_cli(&test_set, &text_corpus, &first, &[])).unwrap();
    run_cli(setup_cli(&test_set, &text_corpus, &second, &["--n_jobs", "4"])).unwrap();

    let a = read_tree(&first.join("candidate_output"));
    let b = read_tree(&second.join("candidate_output"));
    assert_eq!(a.len(), 6);
    assert_eq!(a, b);

    // Rerun over the existing cache without prompting.
    run_cli(setup_cli(&test_set, &text_corpus, &first, &["--force"])).unwrap();
    assert_eq!(read_tree(&first.join("candidate_output")), a);
}

#[test]
fn foreign_characters_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let (test_set, text_corpus) = write_corpora(dir.path());
    fs::write(&test_set, "utt1 wð w1\n").unwrap();
    let data_dir = dir.path().join("exp");

    let err = run_cli(setup_cli(&test_set, &text_corpus, &data_dir, &[])).unwrap_err();
    assert!(err.chain().any(|e| e.to_string().contains("not in train: ð")), "{err:?}");
    assert!(!data_dir.join("candidate_output/group_1_0.05").exists());
}

#[test]
fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let (_, text_corpus) = write_corpora(dir.path());
    let missing = dir.path().join("missing");

    let err = run_cli(setup_cli(&missing, &text_corpus, &dir.path().join("exp"), &[])).unwrap_err();
    assert!(err.to_string().contains("missing"), "{err}");
}

#[test]
fn unreachable_quota_fails_after_all_groups() {
    let dir = tempfile::tempdir().unwrap();
    let (test_set, text_corpus) = write_corpora(dir.path());
    let data_dir = dir.path().join("exp");

    let cli = setup_cli_with_rates(&test_set, &text_corpus, &data_dir, ("0.6", "0"), &[]);
    let err = run_cli(cli).unwrap_err();
    assert!(err.to_string().contains("could not reach their quota"), "{err}");

    let summary = fs::read_to_string(data_dir.join("candidate_output/summary.json")).unwrap();
    assert!(summary.contains("\"failures\""));
}

#[test]
fn corpora_hold_out_candidate_words() {
    let dir = tempfile::tempdir().unwrap();
    let (test_set, text_corpus) = write_corpora(dir.path());
    let data_dir = dir.path().join("exp");
    run_cli(setup_cli(&test_set, &text_corpus, &data_dir, &[])).unwrap();

    let candidates = data_dir.join("candidate_output");
    let outdir = dir.path().join("corpora");
    let cli = Cli::parse_from([
        "oov",
        "corpora",
        "--candidates_dir",
        candidates.to_str().unwrap(),
        "--outdir",
        outdir.to_str().unwrap(),
        "--text_corpus",
        text_corpus.to_str().unwrap(),
        "--group",
        "1",
    ]);
    run_cli(cli).expect("corpora failed");

    assert!(!outdir.join("group_2_0.1").exists());
    for set in ["1", "2", "3"] {
        let held_out: Vec<String> = fs::read_to_string(candidates.join("group_1_0.05").join(set))
            .unwrap()
            .lines()
            .map(|l| l.split('\t').next().unwrap().to_owned())
            .collect();
        let corpus = fs::read_to_string(outdir.join("group_1_0.05").join(set)).unwrap();
        for line in corpus.lines() {
            assert!(line.split_whitespace().all(|t| !held_out.iter().any(|w| w == t)));
        }
    }

    let bad_group = Cli::parse_from([
        "oov",
        "corpora",
        "--candidates_dir",
        candidates.to_str().unwrap(),
        "--outdir",
        outdir.to_str().unwrap(),
        "--text_corpus",
        text_corpus.to_str().unwrap(),
        "--group",
        "9",
    ]);
    let err = run_cli(bad_group).unwrap_err();
    assert!(err.to_string().contains("available groups: 1, 2"), "{err}");
}
