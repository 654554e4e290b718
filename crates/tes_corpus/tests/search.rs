use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tes_corpus::error::Result;
use tes_corpus::ingest::{load_directory, IngestOptions};
use tes_corpus::search::{SearchEngine, SearchQuery, SearchRequest};
use tes_corpus::store::{StoreOptions, TranslationStore};
use tracing_test::traced_test;

fn loaded_store() -> Result<TranslationStore> {
    let pairs = PathBuf::from(format!(
        "{}/../tes_strings/resources/pairs",
        env!("CARGO_MANIFEST_DIR")
    ));
    let store = TranslationStore::open_in_memory(StoreOptions::default())?;
    load_directory(&store, pairs, &IngestOptions::default())?;
    Ok(store)
}

#[traced_test]
#[test]
fn search_ranks_short_originals_first() -> Result<()> {
    let store = loaded_store()?;
    let page = SearchEngine::new(&store).search(&SearchQuery::builder().text("DRAGON").build())?;

    assert_eq!(page.total_matches, 2);
    assert_eq!(page.total_in_corpus, 4);

    let originals = page
        .results
        .iter()
        .map(|result| result.record.original_text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        originals,
        vec!["Dragon Priest", "An ancient dragon cult priest."]
    );
    assert!(page.results.iter().all(|result| result.match_priority == 0));

    Ok(())
}

#[traced_test]
#[test]
fn search_matches_translations() -> Result<()> {
    let store = loaded_store()?;
    let page = SearchEngine::new(&store).search(&SearchQuery::builder().text("драконов").build())?;

    assert_eq!(page.total_matches, 2);
    assert!(page.results.iter().all(|result| result.match_priority == 1));
    assert_eq!(page.results[0].record.original_text, "Dragon Priest");

    Ok(())
}

#[traced_test]
#[test]
fn respond_serializes_page() -> Result<()> {
    let store = loaded_store()?;
    let request: SearchRequest = serde_json::from_str(r#"{"query": "vampire", "limit": 1}"#)?;

    let response = SearchEngine::new(&store).respond(&request);
    let json = serde_json::to_value(&response)?;

    assert_eq!(json["stats"]["matches"], 1);
    assert_eq!(json["stats"]["total"], 4);
    assert_eq!(json["results"][0]["original_text"], "Vampire Lord");
    assert_eq!(json["results"][0]["translated_text"], "Лорд-вампир");
    assert_eq!(json["results"][0]["match_priority"], 0);
    assert!(json.get("error").is_none());

    Ok(())
}

#[traced_test]
#[test]
fn fuzzy_search_over_loaded_corpus() -> Result<()> {
    let store = loaded_store()?;
    let matches = SearchEngine::new(&store).fuzzy_search("vampire lords", 80)?;

    assert_eq!(matches.len(), 1);
    assert_eq!(matches.get("Vampire Lord").map(String::as_str), Some("Лорд-вампир"));

    Ok(())
}
