use std::fs;

use secviz_core::graph::NodeLinkGraph;
use secviz_core::output::{FileGraphSink, GraphSink, MemoryGraphSink, OutputError};
use secviz_core::pipeline::{PipelineError, TaxonomyPipeline};
use secviz_core::taxonomy::{AttackPattern, Collection, Cwe, CweAbstraction, TaxonomyError};
use tempfile::TempDir;

const CWE_JSON: &str = r#"{"CWEs": {
    "CWE-284": {"ID": "CWE-284", "Name": "Improper Access Control", "Number": 284, "Abstraction": "Pillar"},
    "CWE-285": {
        "ID": "CWE-285",
        "Name": "Improper Authorization",
        "Abstraction": "Class",
        "Related_CWEs": [{"CWE_ID": "CWE-284", "Nature": "ChildOf"}]
    },
    "CWE-862": {
        "ID": "CWE-862",
        "Name": "Missing Authorization",
        "Abstraction": "Base",
        "Related_CWEs": [
            {"CWE_ID": "CWE-285", "Nature": "ChildOf"},
            {"CWE_ID": "CWE-9000", "Nature": "ChildOf"}
        ]
    },
    "CWE-broken": {"Name": "No ID"}
}}"#;

fn create_test_pipeline() -> (TaxonomyPipeline<FileGraphSink>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let sink = FileGraphSink::new(temp_dir.path().join("graphs"));
    (TaxonomyPipeline::new(sink), temp_dir)
}

fn read_doc(dir: &TempDir, name: &str) -> NodeLinkGraph {
    let path = dir.path().join("graphs").join(format!("{}.json", name));
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_run_file_writes_all_documents() {
    let (mut pipeline, temp) = create_test_pipeline();
    let input = temp.path().join("cwe.json");
    fs::write(&input, CWE_JSON).unwrap();

    let report = pipeline.run_file::<Cwe>(&input).unwrap();

    assert_eq!(report.records, 3);
    assert_eq!(report.nodes, 4);
    assert_eq!(report.edges, 3);
    assert_eq!(report.dangling, vec!["CWE-9000".to_string()]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].key, "CWE-broken");

    let roots: Vec<&str> = report.subgraphs.iter().map(|s| s.root_id.as_str()).collect();
    assert_eq!(roots, vec!["CWE-284", "CWE-285"]);
    assert_eq!(report.subgraphs[0].file_name, "CWE-284.json");
    assert_eq!(report.subgraphs[0].nodes, 3);
    assert_eq!(
        report.subgraphs[0].root.as_ref().unwrap().url,
        "https://cwe.mitre.org/data/definitions/284.html"
    );

    assert_eq!(pipeline.sink().written().len(), 3);

    let full = read_doc(&temp, "CWE-FULL");
    assert!(full.directed);
    assert!(!full.multigraph);
    assert_eq!(full.nodes.len(), 4);
    assert_eq!(full.links.len(), 3);

    let class = read_doc(&temp, "CWE-285");
    let ids: Vec<&str> = class.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"CWE-285") && ids.contains(&"CWE-862"));
}

#[test]
fn test_document_attribute_keys() {
    let (mut pipeline, temp) = create_test_pipeline();
    let input = temp.path().join("cwe.json");
    fs::write(&input, CWE_JSON).unwrap();
    pipeline.run_file::<Cwe>(&input).unwrap();

    let raw = fs::read_to_string(temp.path().join("graphs").join("CWE-284.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let pillar = value["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "CWE-284")
        .unwrap();

    assert_eq!(pillar["color"], "#db0054");
    assert_eq!(pillar["size"], 30);
    assert_eq!(pillar["label"], "Improper Access Control");
    assert_eq!(pillar["label_class"], "node-label-big");
    assert_eq!(pillar["type"], "CWE");
    assert_eq!(pillar["abstraction"], "Pillar");
    assert!(pillar["Description"]
        .as_str()
        .unwrap()
        .starts_with("<b>CWE-284: Improper Access Control</b><br>"));
    assert_eq!(value["graph"], serde_json::json!({}));
}

#[test]
fn test_run_is_idempotent() {
    let (collection, _) = Collection::<Cwe>::from_json_str(CWE_JSON).unwrap();

    let mut first = TaxonomyPipeline::new(MemoryGraphSink::new());
    let mut second = TaxonomyPipeline::new(MemoryGraphSink::new());
    assert_eq!(first.run(&collection).unwrap(), second.run(&collection).unwrap());

    let (first, second) = (first.into_sink(), second.into_sink());
    for name in first.names() {
        let a = first.get(name).unwrap().to_json(false).unwrap();
        let b = second.get(name).unwrap().to_json(false).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_empty_collection_writes_empty_full_graph() {
    let (mut pipeline, temp) = create_test_pipeline();
    let report = pipeline.run(&Collection::<AttackPattern>::new()).unwrap();

    assert_eq!(report.documents(), 1);
    let full = read_doc(&temp, "CAPEC-FULL");
    assert!(full.nodes.is_empty());
    assert!(full.links.is_empty());
}

#[test]
fn test_collection_errors_are_fatal() {
    let (mut pipeline, temp) = create_test_pipeline();
    let input = temp.path().join("capec.json");
    fs::write(&input, r#"{"CWEs": {}}"#).unwrap();

    let err = pipeline.run_file::<AttackPattern>(&input).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Taxonomy(TaxonomyError::MissingCollection { .. })
    ));
    assert!(pipeline.sink().written().is_empty());
}

#[test]
fn test_compact_output() {
    let temp = TempDir::new().unwrap();
    let sink = FileGraphSink::new(temp.path()).with_pretty(false);
    let collection: Collection<Cwe> =
        std::iter::once(Cwe::new("CWE-1", "One", CweAbstraction::Pillar)).collect();

    let mut pipeline = TaxonomyPipeline::new(sink);
    pipeline.run(&collection).unwrap();
    let sink = pipeline.into_sink();

    let raw = fs::read_to_string(sink.path_for("CWE-1")).unwrap();
    assert!(!raw.contains('\n'));
}

#[test]
fn test_sink_rejects_unsafe_names() {
    let temp = TempDir::new().unwrap();
    let mut sink = FileGraphSink::new(temp.path());
    let doc = NodeLinkGraph::from_parts(std::iter::empty(), std::iter::empty());

    let err = sink.write_graph("../escape", &doc).unwrap_err();
    assert!(matches!(err, OutputError::InvalidName(_)));
    assert!(!temp.path().join("../escape.json").exists());
}

#[test]
fn test_documents_are_written_full_graph_first() {
    let (mut pipeline, temp) = create_test_pipeline();
    let input = temp.path().join("cwe.json");
    fs::write(&input, CWE_JSON).unwrap();
    pipeline.run_file::<Cwe>(&input).unwrap();

    let graphs = temp.path().join("graphs");
    assert_eq!(
        pipeline.sink().written(),
        &[
            graphs.join("CWE-FULL.json"),
            graphs.join("CWE-284.json"),
            graphs.join("CWE-285.json"),
        ]
    );
}

#[test]
fn test_unusable_id_is_excluded_without_stopping_the_run() {
    let (mut pipeline, temp) = create_test_pipeline();
    let input = temp.path().join("cwe.json");
    fs::write(
        &input,
        r#"{"CWEs": {
            "CWE-1": {"ID": "CWE-1", "Name": "Pillar", "Abstraction": "Pillar"},
            "CWE 2": {"ID": "CWE 2", "Name": "Spaced", "Abstraction": "Class"},
            "CWE-3": {"ID": "CWE-3", "Name": "Class", "Abstraction": "Class"}
        }}"#,
    )
    .unwrap();

    let report = pipeline.run_file::<Cwe>(&input).unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].key, "CWE 2");
    assert_eq!(report.issues[0].reason, "ID not usable as a document name");

    let roots: Vec<&str> = report.subgraphs.iter().map(|s| s.root_id.as_str()).collect();
    assert_eq!(roots, vec!["CWE-1", "CWE-3"]);
    assert_eq!(pipeline.sink().written().len(), 3);
    assert_eq!(read_doc(&temp, "CWE-3").nodes.len(), 1);
}
