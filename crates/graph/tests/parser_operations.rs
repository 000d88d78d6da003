//! Tests for ConfigurationClassParser resolution behavior

use config_graph::{
    CollectingProblemReporter, ConfigurationClassParser, LoaderKind, MemberInfo, ProblemKind,
    TypeDescriptor, TypeName, TypeRegistry, TypeSpec,
};
use pretty_assertions::assert_eq;

type Parser<'a> = ConfigurationClassParser<&'a TypeRegistry, CollectingProblemReporter>;

fn make_parser(registry: &TypeRegistry) -> Parser<'_> {
    ConfigurationClassParser::new(registry, CollectingProblemReporter::new())
}

fn circular_traces(parser: &Parser<'_>) -> Vec<Vec<String>> {
    parser
        .reporter()
        .problems()
        .iter()
        .filter_map(|p| p.kind.trace())
        .map(|trace| trace.into_iter().map(|t| t.to_string()).collect())
        .collect()
}

fn sorted_types(parser: &Parser<'_>) -> Vec<String> {
    let mut types: Vec<String> = parser
        .configuration_classes()
        .keys()
        .map(|t| t.to_string())
        .collect();
    types.sort();
    types
}

#[test]
fn test_same_type_parsed_twice_yields_one_entry() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.Root").imports(["App.Data"]))
        .with(TypeSpec::new("App.Data").definition(MemberInfo::new("dataSource")));

    let mut parser = make_parser(&registry);
    parser.parse("App.Root", None).unwrap();
    parser.parse("App.Data", None).unwrap();
    parser.parse("App.Data", None).unwrap();

    assert_eq!(parser.len(), 2);
    assert_eq!(sorted_types(&parser), vec!["App.Data", "App.Root"]);
}

#[test]
fn test_explicit_name_wins_over_import_discovery() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.Root").imports(["App.T"]))
        .with(TypeSpec::new("App.T").definition(MemberInfo::new("service")));

    let mut parser = make_parser(&registry);
    parser.parse("App.Root", None).unwrap();
    assert_eq!(parser.get("App.T").unwrap().explicit_name(), None);

    parser.parse("App.T", Some("foo".to_string())).unwrap();

    let resolved = parser.get("App.T").unwrap();
    assert_eq!(resolved.explicit_name(), Some("foo"));
    assert_eq!(resolved.definition_members().len(), 1);
    assert_eq!(parser.len(), 2);
}

#[test]
fn test_explicit_name_survives_later_import_discovery() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.Root").imports(["App.T"]))
        .with(TypeSpec::new("App.T"));

    let mut parser = make_parser(&registry);
    parser.parse("App.T", Some("foo".to_string())).unwrap();
    parser.parse("App.Root", None).unwrap();

    assert_eq!(parser.get("App.T").unwrap().explicit_name(), Some("foo"));
}

#[test]
fn test_cycle_is_reported_and_partial_graph_kept() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.A").imports(["App.B"]))
        .with(TypeSpec::new("App.B").imports(["App.A"]));

    let mut parser = make_parser(&registry);
    parser.parse("App.A", None).unwrap();

    assert_eq!(
        circular_traces(&parser),
        vec![vec!["App.A", "App.B", "App.A"]]
    );
    assert_eq!(sorted_types(&parser), vec!["App.A", "App.B"]);

    let problem = &parser.reporter().problems()[0];
    assert_eq!(
        problem.message,
        "A circular import has been detected: illegal attempt by configuration class 'B' \
         to import class 'A' as 'A' is already present in the current import stack [A->B]."
    );
}

#[test]
fn test_self_import_is_reported_once() {
    let registry = TypeRegistry::new().with(
        TypeSpec::new("App.Selfish")
            .imports(["App.Selfish"])
            .definition(MemberInfo::new("me")),
    );

    let mut parser = make_parser(&registry);
    parser.parse("App.Selfish", Some("selfish".into())).unwrap();

    assert_eq!(
        circular_traces(&parser),
        vec![vec!["App.Selfish", "App.Selfish"]]
    );
    let resolved = parser.get("App.Selfish").unwrap();
    assert_eq!(resolved.explicit_name(), Some("selfish"));
    assert_eq!(resolved.definition_members().len(), 1);
    assert!(resolved.imported_by().contains("App.Selfish"));
}

#[test]
fn test_cycle_does_not_stop_sibling_imports_or_other_roots() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.A").imports(["App.B", "App.C"]))
        .with(TypeSpec::new("App.B").imports(["App.A"]))
        .with(TypeSpec::new("App.C").definition(MemberInfo::new("clock")))
        .with(TypeSpec::new("App.Other").definition(MemberInfo::new("other")));

    let mut parser = make_parser(&registry);
    parser.parse("App.A", None).unwrap();
    parser.parse("App.Other", Some("other".into())).unwrap();

    assert_eq!(circular_traces(&parser).len(), 1);
    assert_eq!(
        sorted_types(&parser),
        vec!["App.A", "App.B", "App.C", "App.Other"]
    );
}

#[test]
fn test_resource_order_is_preserved() {
    let registry = TypeRegistry::new()
        .with(
            TypeSpec::new("App.Root")
                .imports(["App.Noise1", "App.Noise2"])
                .resources(["R1", "R2"], LoaderKind::new("xml")),
        )
        .with(TypeSpec::new("App.Noise1").resources(["N1"], LoaderKind::default()))
        .with(TypeSpec::new("App.Noise2").resources(["N2", "N3"], LoaderKind::default()));

    let mut parser = make_parser(&registry);
    parser.parse("App.Noise2", None).unwrap();
    parser.parse("App.Root", Some("root".into())).unwrap();
    parser.parse("App.Noise1", Some("noise".into())).unwrap();

    let locators: Vec<&str> = parser
        .get("App.Root")
        .unwrap()
        .imported_resources()
        .iter()
        .map(|r| r.locator.as_str())
        .collect();
    assert_eq!(locators, vec!["R1", "R2"]);
}

#[test]
fn test_diamond_import_resolves_shared_class_once() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.A").imports(["App.B", "App.C"]))
        .with(TypeSpec::new("App.B").imports(["App.D"]))
        .with(TypeSpec::new("App.C").imports(["App.D"]))
        .with(TypeSpec::new("App.D").definition(MemberInfo::new("shared")));

    let mut parser = make_parser(&registry);
    parser.parse("App.A", Some("a".into())).unwrap();

    assert!(parser.reporter().problems().is_empty());
    assert_eq!(parser.len(), 4);

    let d = parser.get("App.D").unwrap();
    let importers: Vec<&str> = d.imported_by().iter().map(TypeName::as_str).collect();
    assert_eq!(importers, vec!["App.B", "App.C"]);
}

#[test]
fn test_validation_failures_do_not_suppress_each_other() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.X").descriptor(TypeDescriptor {
            sealed: true,
            ..TypeDescriptor::default()
        }))
        .with(TypeSpec::new("App.Y").definition(MemberInfo::new("repo").sealed()));

    let mut parser = make_parser(&registry);
    parser.parse("App.X", None).unwrap();
    parser.parse("App.Y", None).unwrap();
    parser.validate_all();

    let mut sources: Vec<&str> = parser
        .reporter()
        .problems()
        .iter()
        .map(|p| p.location.source.as_str())
        .collect();
    sources.sort();
    assert_eq!(sources, vec!["App.X", "App.Y"]);
    assert!(parser.reporter().has_errors());
    assert_eq!(parser.len(), 2);
}

#[test]
fn test_unknown_import_target_is_fatal() {
    let registry = TypeRegistry::new().with(TypeSpec::new("App.Root").imports(["App.Ghost"]));

    let mut parser = make_parser(&registry);
    let err = parser.parse("App.Root", None).unwrap_err();

    assert!(matches!(err, config_graph::GraphError::Metadata(_)));
    assert!(parser.is_empty());
}

#[test]
fn test_into_parts_hands_over_resolved_set_and_problems() {
    let registry = TypeRegistry::new()
        .with(TypeSpec::new("App.A").imports(["App.A"]));

    let mut parser = make_parser(&registry);
    parser.parse("App.A", None).unwrap();
    let (classes, reporter) = parser.into_parts();

    assert_eq!(classes.len(), 1);
    assert!(matches!(
        reporter.problems()[0].kind,
        ProblemKind::CircularImport { .. }
    ));
}
