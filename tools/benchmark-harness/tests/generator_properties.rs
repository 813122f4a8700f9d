//! Properties of the deterministic instance generator.

use schemabench_harness::config::DEFAULT_SEED;
use schemabench_harness::{Corpus, Instance, InstanceGenerator, generate_corpus};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use tempfile::TempDir;

/// Hand-written conformance check for the realistic schema, independent of
/// both the generator and every validation engine.
fn reference_is_valid(doc: &Value) -> bool {
    let is_str = |v: Option<&Value>| v.is_some_and(Value::is_string);
    let is_num = |v: Option<&Value>| v.is_some_and(Value::is_number);
    let is_int = |v: Option<&Value>| v.is_some_and(|v| v.is_i64() || v.is_u64());

    let Some(root) = doc.as_object() else {
        return false;
    };
    if !is_str(root.get("event")) || !is_str(root.get("userId")) {
        return false;
    }

    let Some(properties) = root.get("properties").and_then(Value::as_object) else {
        return false;
    };
    if !is_str(properties.get("coupon")) || !is_num(properties.get("total")) {
        return false;
    }

    let Some(products) = properties.get("products").and_then(Value::as_array) else {
        return false;
    };
    products.iter().all(|product| {
        product.as_object().is_some_and(|p| {
            is_str(p.get("id")) && is_str(p.get("variant")) && is_int(p.get("quantity")) && is_num(p.get("price"))
        })
    })
}

fn texts_and_truth(corpus: &Corpus) -> Vec<(String, bool)> {
    corpus.iter().map(|i| (i.text().to_string(), i.is_valid())).collect()
}

#[test]
fn test_generation_is_deterministic() {
    for seed in [0, 1, 42, DEFAULT_SEED] {
        for count in [0, 1, 50] {
            let first = generate_corpus(seed, count);
            let second = generate_corpus(seed, count);
            assert_eq!(first.len(), count);
            assert_eq!(texts_and_truth(&first), texts_and_truth(&second), "seed {seed}, count {count}");
        }
    }
}

#[test]
fn test_shorter_corpus_is_prefix_of_longer() {
    for seed in [7, DEFAULT_SEED] {
        let long = generate_corpus(seed, 60);
        for n in [0, 1, 10, 59] {
            let short = generate_corpus(seed, n);
            assert_eq!(texts_and_truth(&short)[..], texts_and_truth(&long)[..n], "seed {seed}, n {n}");
        }
    }
}

#[test]
fn test_streaming_matches_batch() {
    let streamed: Vec<Instance> = InstanceGenerator::new(DEFAULT_SEED).take(30).collect();
    let batch = generate_corpus(DEFAULT_SEED, 30);
    assert_eq!(streamed.as_slice(), batch.instances());
}

#[test]
fn test_ground_truth_matches_reference_check() {
    for seed in [3, 99, DEFAULT_SEED] {
        let corpus = generate_corpus(seed, 200);
        for (index, instance) in corpus.iter().enumerate() {
            assert_eq!(
                reference_is_valid(instance.value()),
                instance.is_valid(),
                "seed {seed}, index {index}: {}",
                instance.text()
            );
        }
    }
}

#[test]
fn test_ground_truth_matches_reference_check_with_valid_instances() {
    let corpus = InstanceGenerator::new(DEFAULT_SEED).with_max_products(4).corpus(2000);
    assert!(corpus.valid_count() > 0);

    for (index, instance) in corpus.iter().enumerate() {
        assert_eq!(reference_is_valid(instance.value()), instance.is_valid(), "index {index}");
    }
}

#[test]
fn test_text_and_value_agree() {
    for instance in generate_corpus(DEFAULT_SEED, 100).iter() {
        let reparsed: Value = serde_json::from_str(instance.text()).unwrap();
        assert_eq!(&reparsed, instance.value());
    }
}

#[test]
fn test_corpus_jsonl_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corpus.jsonl");
    let corpus = InstanceGenerator::new(DEFAULT_SEED).with_max_products(4).corpus(400);

    corpus.write_jsonl(BufWriter::new(File::create(&path).unwrap())).unwrap();
    let loaded = Corpus::read_jsonl(BufReader::new(File::open(&path).unwrap())).unwrap();

    assert_eq!(texts_and_truth(&loaded), texts_and_truth(&corpus));
}
