mod common;

use common::doc;
use indoc::indoc;
use pipeweave::{merge, ConflictSection, Document, Group};
use pretty_assertions::assert_eq;

#[test]
fn test_conflicting_resources_fail() {
    let base = doc("resources:\n- name: x\n  a: 1\n");
    let incoming = doc("resources:\n- name: x\n  a: 2\n");

    let err = merge(base, incoming).unwrap_err();
    assert_eq!(err.section(), ConflictSection::Resources);
    assert_eq!(err.resources.as_deref(), Some("x"));
    assert!(err
        .to_string()
        .contains("two or more items named the same are not identical"));
}

#[test]
fn test_identical_resources_collapse() {
    let base = doc("resources:\n- name: x\n  a: 1\n");
    let incoming = doc("resources:\n- name: x\n  a: 1\n");

    let merged = merge(base, incoming).unwrap();
    assert_eq!(merged.resources.len(), 1);
    assert_eq!(merged.resources[0].name(), "x");
}

#[test]
fn test_field_order_does_not_matter_for_equality() {
    let base = doc(indoc! {"
        resource_types:
        - name: slack
          type: docker-image
          source: {repository: cfcommunity/slack, tag: latest}
    "});
    let incoming = doc(indoc! {"
        resource_types:
        - source: {tag: latest, repository: cfcommunity/slack}
          type: docker-image
          name: slack
    "});

    let merged = merge(base, incoming).unwrap();
    assert_eq!(merged.resource_types.len(), 1);
}

#[test]
fn test_scalar_types_matter_for_equality() {
    let base = doc("resources:\n- name: x\n  version: 1\n");
    let incoming = doc("resources:\n- name: x\n  version: \"1\"\n");

    assert!(merge(base, incoming).is_err());
}

#[test]
fn test_conflict_in_both_sections() {
    let base = doc(indoc! {"
        resources:
        - name: repo
          uri: a
        resource_types:
        - name: git
          image: a
    "});
    let incoming = doc(indoc! {"
        resources:
        - name: repo
          uri: b
        resource_types:
        - name: git
          image: b
    "});

    let err = merge(base, incoming).unwrap_err();
    assert_eq!(err.section(), ConflictSection::Both);
}

#[test]
fn test_conflict_in_one_section_discards_the_other() {
    let base = doc(indoc! {"
        jobs:
        - name: build
        resource_types:
        - name: git
          image: a
    "});
    let incoming = doc(indoc! {"
        resources:
        - name: repo
        resource_types:
        - name: git
          image: b
    "});

    let err = merge(base, incoming).unwrap_err();
    assert_eq!(err.section(), ConflictSection::ResourceTypes);
    assert_eq!(err.resources, None);
}

#[test]
fn test_group_union() {
    let base = doc("groups:\n- name: g\n  jobs: [j1]\n");
    let incoming = doc("groups:\n- name: g\n  jobs: [j2]\n");

    let merged = merge(base, incoming).unwrap();
    assert_eq!(merged.groups, vec![Group::new("g", ["j1", "j2"])]);
}

#[test]
fn test_new_groups_are_appended() {
    let base = doc("groups:\n- name: build\n  jobs: [compile]\n");
    let incoming = doc(indoc! {"
        groups:
        - name: deploy
          jobs: [deploy-qa]
        - name: build
          jobs: [lint]
    "});

    let merged = merge(base, incoming).unwrap();
    assert_eq!(
        merged.groups,
        vec![
            Group::new("build", ["compile", "lint"]),
            Group::new("deploy", ["deploy-qa"]),
        ]
    );
}

#[test]
fn test_incoming_resources_come_first() {
    let base = doc(indoc! {"
        resources:
        - name: a
        - name: shared
    "});
    let incoming = doc(indoc! {"
        resources:
        - name: b
        - name: shared
    "});

    let merged = merge(base, incoming).unwrap();
    let names: Vec<&str> = merged.resources.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["b", "shared", "a"]);
}

#[test]
fn test_jobs_and_directives_concatenate() {
    let base = doc(indoc! {"
        merge:
        - template: one.yml
        jobs:
        - name: build
    "});
    let incoming = doc(indoc! {"
        merge:
        - template: two.yml
        jobs:
        - name: build
    "});

    let merged = merge(base, incoming).unwrap();
    assert_eq!(merged.jobs.len(), 2);
    let templates: Vec<&str> = merged.merge.iter().map(|m| m.template.as_str()).collect();
    assert_eq!(templates, vec!["one.yml", "two.yml"]);
}

#[test]
fn test_empty_document_is_identity() {
    let document = doc(indoc! {"
        groups:
        - name: all
          jobs: [build]
        resources:
        - name: repo
          type: git
        - name: image
          type: registry-image
        jobs:
        - name: build
    "});

    assert_eq!(
        merge(document.clone(), Document::default()).unwrap(),
        document
    );
    assert_eq!(
        merge(Document::default(), document.clone()).unwrap(),
        document
    );
}

#[test]
fn test_anchored_resource_matches_literal_equivalent() {
    let base = doc(indoc! {"
        defaults: &git
          type: git
        resources:
        - <<: *git
          name: repo
    "});
    let incoming = doc("resources:\n- name: repo\n  type: git\n");

    let merged = merge(base, incoming).unwrap();
    assert_eq!(merged.resources.len(), 1);
    assert!(!merged.resources[0].fields().contains_key("<<"));
}
