//! Property tests for the model specification rewrite.

use std::path::Path;

use proptest::prelude::*;

use vaws::domain::entities::IMAGE_ARTIFACT_DIR;
use vaws::domain::services::rewrite_artifact_path;

fn artifact_dir() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z0-9_-]{1,10}").unwrap();
    proptest::collection::vec(segment, 0..=4).prop_map(|s| format!("/{}", s.join("/")))
}

fn file_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,12}\\.(hdf|h5)").unwrap()
}

fn comment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,.]{0,40}").unwrap()
}

fn document(
    header: &str,
    location: &str,
    dir: &str,
    name: &str,
    size: u32,
    indent: usize,
) -> String {
    let pad = " ".repeat(indent);
    format!(
        "# {header}\ncomponents:\n{pad}population:\n{pad}{pad}- BasePopulation()\n\nconfiguration:\n{pad}input_data:\n{pad}{pad}location: {location}\n{pad}{pad}artifact_path: {dir}/{name}\n{pad}population:\n{pad}{pad}population_size: {size}\n"
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: only the artifact line changes, and it points into the
    /// image directory with the original base name.
    #[test]
    fn property_rewrite_changes_only_artifact_line(
        header in comment(),
        location in "[A-Z][a-z]{2,10}",
        dir in artifact_dir(),
        name in file_name(),
        size in 1u32..1_000_000,
        indent in 2usize..=4,
    ) {
        let doc = document(&header, &location, &dir, &name, size, indent);
        let outcome = rewrite_artifact_path(&doc, Path::new("india.yaml")).unwrap();

        prop_assert_eq!(&outcome.artifact.file_name, &name);

        let expected = format!(
            "{}artifact_path: {}/{}",
            " ".repeat(indent * 2),
            IMAGE_ARTIFACT_DIR,
            name
        );
        let before: Vec<&str> = doc.split('\n').collect();
        let after: Vec<&str> = outcome.content.split('\n').collect();
        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            if b.trim_start().starts_with("artifact_path:") {
                prop_assert_eq!(*a, expected.as_str());
            } else {
                prop_assert_eq!(b, a);
            }
        }
    }

    /// PROPERTY: rewriting an already rewritten document is a no-op.
    #[test]
    fn property_rewrite_is_idempotent(
        dir in artifact_dir(),
        name in file_name(),
        indent in 2usize..=4,
    ) {
        let doc = document("x", "India", &dir, &name, 10, indent);
        let once = rewrite_artifact_path(&doc, Path::new("india.yaml")).unwrap();
        let twice = rewrite_artifact_path(&once.content, Path::new("india.yaml")).unwrap();

        prop_assert!(!twice.changed);
        prop_assert_eq!(once.content, twice.content);
    }

    /// PROPERTY: arbitrary input never panics; it either rewrites or errors.
    #[test]
    fn property_rewrite_never_panics(s in "(?s).{0,256}") {
        let _ = rewrite_artifact_path(&s, Path::new("fuzz.yaml"));
    }
}
