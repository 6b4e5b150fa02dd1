mod common;

use common::write_templates;
use pipeweave::io::{find_templates, TemplateWalker};
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper function to create a template tree
fn create_template_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_templates(
        temp_dir.path(),
        &[
            ("z-last.yml", "jobs: []"),
            ("a-first.yml", "jobs: []"),
            ("jobs/deploy.yml", "jobs: []"),
            ("jobs/nested/notify.yml", "jobs: []"),
            ("snippets/task.tpl", "platform: linux"),
        ],
    );
    temp_dir
}

fn relative(root: &TempDir, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(root.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_walk_finds_every_file_in_name_order() {
    let temp_dir = create_template_tree();

    let files = TemplateWalker::new()
        .with_dirs(vec![temp_dir.path().to_path_buf()])
        .walk()
        .unwrap();

    assert_eq!(
        relative(&temp_dir, &files),
        vec![
            "a-first.yml",
            "jobs/deploy.yml",
            "jobs/nested/notify.yml",
            "snippets/task.tpl",
            "z-last.yml",
        ]
    );
}

#[test]
fn test_explicit_files_come_first() {
    let temp_dir = create_template_tree();
    let explicit = temp_dir.path().join("z-last.yml");

    let files = find_templates(
        vec![explicit.clone()],
        vec![temp_dir.path().join("snippets")],
    )
    .unwrap();

    assert_eq!(files, vec![explicit, temp_dir.path().join("snippets/task.tpl")]);
}

#[test]
fn test_missing_directory_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = find_templates(vec![], vec![temp_dir.path().join("absent")]);

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("recursing directory tree"));
}

#[test]
fn test_no_inputs_yield_no_templates() {
    assert!(find_templates(vec![], vec![]).unwrap().is_empty());
}
