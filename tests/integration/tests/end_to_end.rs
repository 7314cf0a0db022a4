//! End-to-end storage and retrieval scenarios.

use clap::Parser;
use std::ffi::OsString;
use tempfile::TempDir;
use unga_core::config::{Config, EmbeddingsProvider};
use unga_integration_tests::{semantic_store, WordEmbeddings};
use unga_storage::{
    cosine_similarity, select_provider, AnalysisFilter, EmbeddingProvider, HashEmbeddings, Ingestor, NewAnalysis,
    NewSpeech, SpeechFilter, SpeechStore, StoreOptions,
};

const USA_TEXT: &str = "We call for peace and sustainable development.";

fn hash_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.db_path = Some(dir.path().join("unga.db"));
    config.embeddings.provider = EmbeddingsProvider::Hash;
    config
}

#[test]
fn test_usa_example_with_semantic_embeddings() {
    let store = semantic_store();
    store
        .save_speech(&NewSpeech::from_code("USA", 79, 2024, USA_TEXT))
        .unwrap();

    let found = store
        .search_speeches(
            &SpeechFilter::new().with_countries(["USA"]).with_years([2024]),
            10,
        )
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].word_count, 7);
    assert_eq!(found[0].speech_text, USA_TEXT);

    let hits = store
        .semantic_search("peace", &SpeechFilter::new().with_countries(["USA"]), 10, 0.0)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].speech.id, found[0].id);
    assert!(hits[0].similarity > 0.0);
}

#[test]
fn test_usa_example_with_hash_fallback() {
    let dir = TempDir::new().unwrap();
    let store = SpeechStore::from_config(&hash_config(&dir)).unwrap();
    assert!(!store.embeddings().is_semantic());

    store
        .save_speech(&NewSpeech::from_code("USA", 79, 2024, USA_TEXT))
        .unwrap();
    let hits = store
        .semantic_search("peace", &SpeechFilter::new().with_countries(["USA"]), 10, 0.0)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].speech.word_count, 7);
}

#[test]
fn test_kenya_filter_conjunction() {
    let store = semantic_store();
    for (code, year) in [("KEN", 2020), ("KEN", 2021), ("UGA", 2020), ("USA", 2020)] {
        store
            .save_speech(&NewSpeech::from_code(code, year - 1945, year, "Statement."))
            .unwrap();
    }

    for limit in [1, 10] {
        let found = store
            .search_speeches(
                &SpeechFilter::new().with_countries(["Kenya"]).with_years([2020]),
                limit,
            )
            .unwrap();
        assert!(found.len() <= limit);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].country_name, "Kenya");
        assert_eq!(found[0].year, 2020);
    }
}

#[test]
fn test_threshold_never_violated() {
    let store = semantic_store();
    let texts = [
        "peace and security for all nations",
        "climate change threatens small island states",
        "peace through sustainable development",
        "trade and investment in Africa",
        "peace",
    ];
    for (i, text) in texts.iter().enumerate() {
        store
            .save_speech(&NewSpeech::from_code("GHA", 70 + i as i64, 2015 + i as i64, *text))
            .unwrap();
    }

    let query = WordEmbeddings { dimension: 384 }.embed("peace").unwrap();
    for threshold in [0.0, 0.3, 0.5, 0.9] {
        let hits = store
            .semantic_search("peace", &SpeechFilter::new(), 100, threshold)
            .unwrap();
        for hit in &hits {
            assert!(hit.similarity >= threshold);
            let stored = WordEmbeddings { dimension: 384 }
                .embed(&hit.speech.speech_text)
                .unwrap();
            assert!((cosine_similarity(&query, &stored) - hit.similarity).abs() < 1e-5);
        }
    }

    let exact = store
        .semantic_search("peace", &SpeechFilter::new(), 100, 0.9)
        .unwrap();
    assert!(exact.iter().any(|hit| hit.speech.speech_text == "peace"));
}

#[test]
fn test_schema_idempotent_and_persistent_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("unga.db");

    let first = SpeechStore::open(&path, Box::new(HashEmbeddings::new(384)), StoreOptions::default())
        .unwrap();
    first
        .save_speech(&NewSpeech::from_code("KEN", 79, 2024, "Harambee."))
        .unwrap();
    first.ensure_schema().unwrap();
    first.ensure_schema().unwrap();
    drop(first);

    let reopened =
        SpeechStore::open(&path, Box::new(HashEmbeddings::new(384)), StoreOptions::default())
            .unwrap();
    let stats = reopened.get_statistics().unwrap();
    assert_eq!(stats.total_speeches, 1);
    assert_eq!(reopened.available_years().unwrap(), vec![2024]);
}

#[test]
fn test_empty_database_operations() {
    let dir = TempDir::new().unwrap();
    let store = SpeechStore::from_config(&hash_config(&dir)).unwrap();

    assert!(store.search_speeches(&SpeechFilter::new(), 10).unwrap().is_empty());
    assert!(store
        .semantic_search("peace", &SpeechFilter::new(), 10, 0.0)
        .unwrap()
        .is_empty());
    assert!(store.find_similar_speeches(1, 10, 0.8).unwrap().is_empty());
    assert!(store.list_analyses(&AnalysisFilter::default(), 10, 0).unwrap().is_empty());
    assert!(store
        .cross_year_trends(&SpeechFilter::new(), &[])
        .unwrap()
        .is_empty());
    let stats = store.get_speech_statistics().unwrap();
    assert_eq!(stats.total_speeches, 0);
    assert!(stats.speeches_by_year.is_empty());
}

#[test]
fn test_ingest_then_analyse() {
    let corpus = TempDir::new().unwrap();
    std::fs::write(
        corpus.path().join("GHA_79_2024.txt"),
        "Ghana calls on the African Union to lead on climate change.",
    )
    .unwrap();
    std::fs::write(corpus.path().join("JPN_79_2024.txt"), "Japan supports peace.").unwrap();
    std::fs::write(corpus.path().join("README.txt"), "corpus notes").unwrap();

    let store = semantic_store();
    let stats = Ingestor::new(&store).ingest_directory(corpus.path()).unwrap();
    assert_eq!((stats.total_files, stats.successful, stats.skipped), (3, 2, 1));

    let regions = store.countries_by_region(2024).unwrap();
    assert_eq!(regions["Africa"][0].country_code, "GHA");
    assert!(regions["Africa"][0].is_african_member);

    let ghana = &store
        .search_speeches(&SpeechFilter::new().with_countries(["GHA"]), 1)
        .unwrap()[0];
    let analysis = NewAnalysis::derive(
        &ghana.country_name,
        &ghana.speech_text,
        "Summarise the speech",
        "Ghana urged the African Union to address climate change.",
    );
    let id = store.save_analysis(&analysis).unwrap();
    let stored = store.get_analysis(id).unwrap().unwrap();
    assert_eq!(stored.sdgs, vec![13]);
    assert!(stored.africa_mentioned);
    assert_eq!(stored.classification.as_str(), "African Member State");

    assert!(store.delete_analysis(id).unwrap());
    assert!(store.get_analysis(id).unwrap().is_none());
}

#[test]
fn test_select_provider_from_config() {
    let dir = TempDir::new().unwrap();
    let provider = select_provider(&hash_config(&dir).embeddings);
    assert_eq!(provider.embed("").unwrap().len(), 384);
    assert_eq!(provider.embed(&"a".repeat(6000)).unwrap().len(), 384);
}

#[test]
fn test_cli_commands_against_temp_database() {
    let dir = TempDir::new().unwrap();
    let corpus = TempDir::new().unwrap();
    std::fs::write(corpus.path().join("KEN_79_2024.txt"), "Kenya speaks for peace.").unwrap();
    let config = hash_config(&dir);

    let ingest = unga_cli::Cli::try_parse_from([
        OsString::from("unga"),
        OsString::from("ingest"),
        corpus.path().as_os_str().to_owned(),
    ])
    .unwrap();
    unga_cli::run(ingest, config.clone()).unwrap();

    for args in [
        vec!["unga", "search", "-c", "KEN"],
        vec!["unga", "semantic", "peace", "--json"],
        vec!["unga", "stats"],
        vec!["unga", "trends", "--from", "2020", "--to", "2024"],
        vec!["unga", "regions", "2024"],
        vec!["unga", "analyses", "list"],
        vec!["unga", "classify", "Cape Verde"],
        vec!["unga", "similar", "1"],
    ] {
        let cli = unga_cli::Cli::try_parse_from(args).unwrap();
        unga_cli::run(cli, config.clone()).unwrap();
    }

    let store = SpeechStore::from_config(&config).unwrap();
    assert_eq!(store.get_statistics().unwrap().total_speeches, 1);

    let refused = unga_cli::Cli::try_parse_from(["unga", "reset"]).unwrap();
    assert!(unga_cli::run(refused, config.clone()).is_err());
    let reset = unga_cli::Cli::try_parse_from(["unga", "reset", "--yes"]).unwrap();
    unga_cli::run(reset, config.clone()).unwrap();
    assert_eq!(store.get_statistics().unwrap().total_speeches, 0);
}
