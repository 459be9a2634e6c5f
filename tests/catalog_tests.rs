use guesstech::{load_catalog_from_json, Catalog, Difficulty, GameError, TechItem};

fn item(id: u16, name: &str, aliases: &[&str], difficulty: Difficulty) -> TechItem {
    TechItem {
        id,
        name: name.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        difficulty,
        glyph: format!("test:{name}"),
    }
}

#[test]
fn builtin_matches_data_file() {
    let builtin = Catalog::builtin().expect("builtin catalog");
    let from_file = load_catalog_from_json("data/tech.json").expect("data/tech.json");
    assert_eq!(builtin.len(), 20);
    assert_eq!(from_file.len(), builtin.len());
    assert!(builtin.get(20).is_some() && builtin.get(21).is_none());
    assert_eq!(builtin.get(10).map(|t| t.name.as_str()), Some("Kubernetes"));
}

#[test]
fn tiers_partition_the_catalog() {
    let cat = Catalog::builtin().expect("builtin catalog");
    let total: usize = Difficulty::all()
        .iter()
        .map(|d| cat.by_difficulty(*d).len())
        .sum();
    assert_eq!(total, cat.len());
    assert_eq!(cat.by_difficulty(Difficulty::Hard).len(), 4);
    assert!(cat
        .by_difficulty(Difficulty::Easy)
        .iter()
        .all(|t| t.difficulty == Difficulty::Easy));
}

#[test]
fn answer_lookup_is_case_and_space_insensitive() {
    let cat = Catalog::builtin().expect("builtin catalog");
    assert!(cat.accepts(1, "  REACT "));
    assert!(cat.accepts(10, "k8s"));
    assert!(cat.accepts(14, "Amazon Web Services"));
    assert!(!cat.accepts(1, "reac"));
    assert!(!cat.accepts(2, "React"));
    assert!(!cat.accepts(1, "   "));
}

#[test]
fn rejects_duplicate_ids() {
    let err = Catalog::from_items(vec![
        item(1, "React", &[], Difficulty::Easy),
        item(1, "Vue", &[], Difficulty::Easy),
    ])
    .unwrap_err();
    assert!(matches!(err, GameError::InvalidCatalog(_)), "got {err:?}");
}

#[test]
fn rejects_ambiguous_aliases() {
    let err = Catalog::from_items(vec![
        item(1, "Node.js", &["node"], Difficulty::Easy),
        item(2, "Deno", &["NODE"], Difficulty::Medium),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("ambiguous"), "got {err}");
}

#[test]
fn alias_repeating_own_name_is_fine() {
    let cat = Catalog::from_items(vec![item(8, "Java", &["java"], Difficulty::Medium)])
        .expect("self alias is not ambiguous");
    assert!(cat.accepts(8, "JAVA"));
}

#[test]
fn rejects_empty_catalog_and_blank_names() {
    assert!(Catalog::from_items(Vec::new()).is_err());
    assert!(Catalog::from_items(vec![item(1, "  ", &[], Difficulty::Easy)]).is_err());
    assert!(Catalog::from_items(vec![item(1, "Go", &[""], Difficulty::Easy)]).is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = load_catalog_from_json("data/does-not-exist.json").unwrap_err();
    assert!(matches!(err, GameError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist.json"));
}
