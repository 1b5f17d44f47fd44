//! Tests for ForestService

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use rstree::application::services::ForestService;
use rstree::application::ApplicationError;
use rstree::domain::{BuildOptions, DomainError, DuplicatePolicy};
use rstree::infrastructure::traits::{FileSystem, RealFileSystem};

const MENU_JSON: &str = r#"[
    {"id": 1, "father_id": 0, "name": "Overview", "route": "/systemOverview"},
    {"id": 2, "father_id": 0, "name": "Config", "route": "/systemConfig"},
    {"id": 3, "father_id": 1, "name": "Asset", "route": "/asset"},
    {"id": 4, "father_id": 1, "name": "PE", "route": "/pe"},
    {"id": 5, "father_id": 2, "name": "MenuConfig", "route": "/menuConfig"},
    {"id": 6, "father_id": 3, "name": "Device", "route": "/device"},
    {"id": 7, "father_id": 3, "name": "Cabinet", "route": "/device"}
]"#;

/// In-memory filesystem keyed by path.
#[derive(Default)]
struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

fn memory_service(options: BuildOptions) -> ForestService {
    let fs = MemoryFileSystem::default().with_file("menu.json", MENU_JSON);
    ForestService::new(Arc::new(fs), options)
}

#[test]
fn given_json_file_when_building_tree_then_selects_requested_ids() {
    // Arrange
    let service = memory_service(BuildOptions::default());
    let records = service.load(Path::new("menu.json")).unwrap();

    // Act
    let forest = service.tree(&records, &[3, 99]).unwrap();

    // Assert
    assert_eq!(forest.len(), 2);
    let asset = forest[0].find(&3).unwrap();
    assert!(asset.selected);
    assert_eq!(asset.payload.route.as_deref(), Some("/asset"));
    let selected: usize = forest.iter().map(|t| t.selected_nodes().len()).sum();
    assert_eq!(selected, 1);
}

#[test]
fn given_target_when_resolving_ancestors_then_returns_chain_in_file_order() {
    // Arrange
    let service = memory_service(BuildOptions::default());
    let records = service.load(Path::new("menu.json")).unwrap();

    // Act
    let closure = service.ancestors(&records, &[7, 6]).unwrap();

    // Assert
    let ids: Vec<i64> = closure.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3, 6, 7]);
}

#[test]
fn given_ancestors_when_building_tree_then_yields_pruned_forest() {
    // Arrange
    let service = memory_service(BuildOptions::default());
    let records = service.load(Path::new("menu.json")).unwrap();

    // Act
    let closure = service.ancestors(&records, &[5]).unwrap();
    let forest = service.tree(&closure, &[5]).unwrap();

    // Assert
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].title, "Config");
    assert_eq!(forest[0].node_count(), 2);
    assert!(forest[0].children[0].selected);
}

#[test]
fn given_unknown_target_when_resolving_then_errors() {
    let service = memory_service(BuildOptions::default());
    let records = service.load(Path::new("menu.json")).unwrap();

    let err = service.ancestors(&records, &[42]).unwrap_err();

    assert!(matches!(err, ApplicationError::RecordNotFound(_)));
}

#[test]
fn given_missing_file_when_loading_then_errors_with_context() {
    let service = memory_service(BuildOptions::default());

    let err = service.load(Path::new("other.json")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("other.json"));
}

#[test]
fn given_unsupported_extension_when_loading_then_errors() {
    let service = memory_service(BuildOptions::default());

    let err = service.load(Path::new("menu.csv")).unwrap_err();

    assert!(matches!(err, ApplicationError::UnknownFormat(_)));
}

#[test]
fn given_duplicate_loop_when_building_then_surfaces_domain_error() {
    // Arrange
    let fs = MemoryFileSystem::default().with_file(
        "loop.json",
        r#"[
            {"id": 1, "parent_id": 0, "name": "Root"},
            {"id": 2, "parent_id": 1, "name": "Child"},
            {"id": 1, "parent_id": 2, "name": "Root again"}
        ]"#,
    );
    let options = BuildOptions {
        max_depth: 8,
        ..BuildOptions::default()
    };
    let service = ForestService::new(Arc::new(fs), options);
    let records = service.load(Path::new("loop.json")).unwrap();

    // Act
    let err = service.tree(&records, &[]).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DepthLimitExceeded { limit: 8, .. })
    ));

    // first-wins drops the second record with id 1 and the loop disappears
    let dedup = ForestService::new(
        Arc::new(MemoryFileSystem::default()),
        BuildOptions {
            duplicates: DuplicatePolicy::FirstWins,
            ..options
        },
    );
    let forest = dedup.tree(&records, &[]).unwrap();
    assert_eq!(forest[0].node_count(), 2);
}

#[test]
fn given_toml_file_on_disk_when_loading_then_reads_records() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("menu.toml");
    std::fs::write(
        &path,
        r#"
[[records]]
id = 1
parent_id = 0
name = "Overview"

[[records]]
id = 3
parent_id = 1
name = "Asset"
"#,
    )
    .unwrap();
    let service = ForestService::new(Arc::new(RealFileSystem), BuildOptions::default());

    // Act
    let records = service.load(&path).unwrap();
    let forest = service.tree(&records, &[]).unwrap();

    // Assert
    assert_eq!(records.len(), 2);
    assert_eq!(forest[0].children[0].title, "Asset");
}
