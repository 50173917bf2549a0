//! Property tests for the normalize → scan → aggregate pipeline.

use lecat_core::{
    Corpus, PatternTemplate, WideLexicon, aggregate, count_matches, normalize, scan, scan_parallel,
};
use proptest::prelude::*;

fn term() -> impl Strategy<Value = String> {
    "[a-c]{1,3}"
}

fn wide_lexicon() -> impl Strategy<Value = WideLexicon> {
    (1usize..4).prop_flat_map(|n_cols| {
        prop::collection::vec(
            prop::collection::vec(prop::option::of(term()), n_cols),
            0..6,
        )
        .prop_map(move |rows| {
            let columns = (1..=n_cols).map(|i| format!("Query{i}")).collect();
            let mut wide = WideLexicon::new(columns);
            for (i, queries) in rows.into_iter().enumerate() {
                wide.push_row(format!("type{i}"), format!("cat{i}"), queries);
            }
            wide
        })
    })
}

fn corpus() -> impl Strategy<Value = Corpus> {
    prop::collection::vec(
        prop::option::of(prop::collection::vec(term(), 0..8).prop_map(|w| w.join(" "))),
        0..6,
    )
    .prop_map(|texts| {
        let ids = (0..texts.len()).map(|i| format!("doc{i}")).collect();
        Corpus::new(ids).with_column("text", texts)
    })
}

// ── Normalizer ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn long_rows_equal_present_cells(wide in wide_lexicon()) {
        let present: usize = wide
            .rows()
            .iter()
            .map(|r| r.queries.iter().flatten().count())
            .sum();
        prop_assert_eq!(normalize(&wide).len(), present);
    }
}

// ── Matcher ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn bare_template_counts_each_character(n in 0usize..50) {
        let docs = [Some("a".repeat(n))];
        let bare = PatternTemplate::new("query").unwrap();
        prop_assert_eq!(count_matches(&docs, "a", &bare).unwrap(), vec![n]);
    }

    #[test]
    fn literal_mode_never_fails_to_compile(q in "\\PC{1,12}") {
        let docs = [Some("anything at all")];
        prop_assert!(count_matches(&docs, &q, &PatternTemplate::default()).is_ok());
    }
}

// ── Scanner + aggregator ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn matrix_shape_follows_inputs(wide in wide_lexicon(), corpus in corpus()) {
        let long = normalize(&wide);
        let matrix = scan(&long, &corpus, &PatternTemplate::default(), "text").unwrap();
        prop_assert_eq!(matrix.n_documents(), corpus.len());
        prop_assert_eq!(matrix.n_queries(), long.distinct_queries().len());
        for (_, counts) in matrix.columns() {
            prop_assert_eq!(counts.len(), corpus.len());
        }
    }

    #[test]
    fn unique_bounded_by_total_and_documents(wide in wide_lexicon(), corpus in corpus()) {
        let long = normalize(&wide);
        let matrix = scan(&long, &corpus, &PatternTemplate::default(), "text").unwrap();
        let table = aggregate(&long, &matrix).unwrap();
        prop_assert_eq!(table.len(), matrix.n_queries());
        for row in &table {
            let column = matrix.column(&row.query).unwrap();
            prop_assert!(row.unique <= row.total);
            prop_assert!(row.unique <= corpus.len());
            prop_assert_eq!(row.unique, column.iter().filter(|&&c| c != 0).count());
            prop_assert_eq!(row.total, column.iter().sum::<usize>());
        }
    }

    #[test]
    fn parallel_scan_equals_sequential(wide in wide_lexicon(), corpus in corpus()) {
        let long = normalize(&wide);
        let template = PatternTemplate::default();
        let sequential = scan(&long, &corpus, &template, "text").unwrap();
        let parallel = scan_parallel(&long, &corpus, &template, "text").unwrap();
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn rerun_is_bit_identical(wide in wide_lexicon(), corpus in corpus()) {
        let long = normalize(&wide);
        let template = PatternTemplate::default();
        let first = aggregate(&long, &scan(&long, &corpus, &template, "text").unwrap()).unwrap();
        let second = aggregate(&long, &scan(&long, &corpus, &template, "text").unwrap()).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
