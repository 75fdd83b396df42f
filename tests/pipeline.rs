//! End-to-end pipeline tests: note text -> extraction ->
//! normalization -> index -> full analysis report.

use tag_corpus_analyzer::{
    extract_raw_tags, run_analysis, AnalyzerConfig, DocumentError, DocumentRecord, TagIndex,
    TrendClass,
};

fn doc(id: &str, tags: &[&str]) -> Result<DocumentRecord, DocumentError> {
    Ok(DocumentRecord::new(
        id,
        tags.iter().map(|t| t.to_string()).collect(),
    ))
}

/// The three-document scenario: every pair co-occurs exactly once and
/// nobody has enough partners to seed a cluster.
#[test]
fn small_corpus_co_occurrence_and_empty_clusters() {
    let records = [
        doc("a.md", &["ai", "chatgpt"]),
        doc("b.md", &["ai", "pedagogy"]),
        doc("c.md", &["chatgpt", "pedagogy"]),
    ];
    let config = AnalyzerConfig::default();
    let index = TagIndex::build(records, &config);

    // "ai" expands through the replacement table at ingestion
    let ai = "artificial_intelligence";
    let matrix = index.cooccurrence();
    assert_eq!(matrix.count(ai, "chatgpt"), 1);
    assert_eq!(matrix.count(ai, "pedagogy"), 1);
    assert_eq!(matrix.count("chatgpt", "pedagogy"), 1);
    assert_eq!(matrix.count("chatgpt", ai), 1);

    let report = run_analysis(&index, &config).expect("default config is valid");
    assert!(report.clusters.is_empty(), "two partners each, no seed qualifies");
}

#[test]
fn extraction_feeds_the_index() {
    let note_a = "---\ntitle: Generative AI in the classroom\ntags:\n  - AI\n  - online-learning\n---\n\n## Abstract\n\nThe study looks at #ChatGPT use.\n";
    let note_b = "# Reading notes\n\nInline only: #online_learning and #pedagogy.\n";

    let records = [
        Ok(DocumentRecord::new("a_2024.md", extract_raw_tags(note_a))
            .with_body(note_a)
            .with_year_from_id()),
        Ok(DocumentRecord::new("b_2023.md", extract_raw_tags(note_b))
            .with_body(note_b)
            .with_year_from_id()),
    ];
    let config = AnalyzerConfig::default();
    let index = TagIndex::build(records, &config);

    // "AI" -> artificial_intelligence, "online-learning" and
    // "#online_learning" converge on the same canonical tag
    assert_eq!(index.usage("artificial_intelligence"), 1);
    assert_eq!(index.usage("online_learning"), 2);
    assert_eq!(index.usage("chatgpt"), 1);
    assert_eq!(index.usage("pedagogy"), 1);

    // index invariant: buckets only list documents whose normalized
    // tag set contains the tag
    for (tag, docs) in index.tag_docs() {
        for id in docs {
            assert!(index.documents()[id].tags.contains(tag));
        }
    }

    let report = run_analysis(&index, &config).expect("default config is valid");
    assert_eq!(report.scan.documents_scanned, 2);
    assert_eq!(report.vocabulary.unique_tags, 4);
    // only online_learning spans both years; single-year tags are
    // reported as insufficient history, not forced into a class
    assert!(report.trends.records.iter().all(|r| r.years_active >= 2));
    assert!(!report.trends.insufficient.is_empty());
}

#[test]
fn fragmented_vocabulary_is_surfaced_for_review() {
    let mut records = vec![
        doc("typo.md", &["online_learing", "assessment"]),
        doc("plural.md", &["assessments", "online_learning"]),
    ];
    for i in 0..6 {
        records.push(doc(
            &format!("bulk_{i}.md"),
            &["online_learning", "assessment", "higher_ed"],
        ));
    }
    let config = AnalyzerConfig::default();
    let index = TagIndex::build(records, &config);
    let report = run_analysis(&index, &config).expect("default config is valid");

    // the typo and the plural both surface as similarity pairs
    assert!(report
        .similar_pairs
        .iter()
        .any(|p| p.a == "online_learing" && p.b == "online_learning"));
    assert!(report
        .similar_pairs
        .iter()
        .any(|p| p.a == "assessment" && p.b == "assessments"));

    // the curated merge table proposes folding higher_ed away
    assert!(report
        .rename_suggestions
        .iter()
        .any(|s| s.current == "higher_ed" && s.suggested == "higher_education"));

    // quality scores stay bounded for every tag and document
    for quality in &report.tag_quality {
        assert!((0.0..=100.0).contains(&quality.score));
    }
    for quality in &report.document_quality {
        assert!((0.0..=100.0).contains(&quality.score));
    }
}

#[test]
fn trend_classes_follow_the_recent_window() {
    let mut records = Vec::new();
    // fading topic: all uses years before the window
    for (i, year) in [(0, 2015), (1, 2015), (2, 2016), (3, 2017)] {
        records.push(Ok(DocumentRecord::new(
            format!("old_{i}.md"),
            vec!["learning_objects".to_string()],
        )
        .with_year(year)));
    }
    // rising topic: most uses inside the window
    for (i, year) in [(0, 2022), (1, 2023), (2, 2023), (3, 2024), (4, 2024)] {
        records.push(Ok(DocumentRecord::new(
            format!("new_{i}.md"),
            vec!["generative_ai".to_string()],
        )
        .with_year(year)));
    }
    let config = AnalyzerConfig::default();
    let index = TagIndex::build(records, &config);
    let report = run_analysis(&index, &config).expect("default config is valid");

    assert_eq!(report.trends.reference_year, Some(2024));
    let trend_of = |tag: &str| {
        &report
            .trends
            .records
            .iter()
            .find(|r| r.tag == tag)
            .expect("classified")
            .trend
    };
    assert!(matches!(
        trend_of("learning_objects"),
        TrendClass::Declining { decline_rate, .. } if *decline_rate > 0.99
    ));
    assert!(matches!(
        trend_of("generative_ai"),
        TrendClass::Emerging { strength, .. } if *strength > 0.70
    ));
}

#[test]
fn skipped_documents_do_not_abort_the_run() {
    let records = [
        doc("ok.md", &["pedagogy", "assessment"]),
        Err(DocumentError::Unreadable {
            id: "corrupt.md".to_string(),
            reason: "invalid utf-8".to_string(),
        }),
        doc("also_ok.md", &["pedagogy"]),
    ];
    let config = AnalyzerConfig::default();
    let index = TagIndex::build(records, &config);
    let report = run_analysis(&index, &config).expect("default config is valid");

    assert_eq!(report.scan.documents_scanned, 2);
    assert_eq!(report.scan.documents_skipped, 1);
    assert_eq!(report.scan.warnings.len(), 1);
    assert_eq!(index.usage("pedagogy"), 2);
}
