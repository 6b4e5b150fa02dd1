//! Policy-driven structural merge of two pipeline documents.
//!
//! Each section has its own policy:
//! - `groups`: same-named groups are unioned, jobs concatenated (base first)
//! - `resources` / `resource_types`: keyed by `name`; identical duplicates
//!   collapse, differing duplicates are a conflict. The incoming fragment's
//!   entries come first, followed by base entries it did not already carry.
//! - `jobs` / `merge`: plain concatenation
//!
//! The merge is all-or-nothing: a conflict in either keyed section fails the
//! whole call and no partial document is produced.

use crate::core::value::mappings_equal;
use crate::core::{Document, Group, MergeConflict, NamedRecord};

/// Fold `incoming` into `base`, producing a new document.
pub fn merge(base: Document, incoming: Document) -> Result<Document, MergeConflict> {
    let resource_types = merge_named(base.resource_types, incoming.resource_types);
    let resources = merge_named(base.resources, incoming.resources);

    let (resources, resource_types) = match (resources, resource_types) {
        (Ok(resources), Ok(resource_types)) => (resources, resource_types),
        (resources, resource_types) => {
            return Err(MergeConflict {
                resources: resources.err(),
                resource_types: resource_types.err(),
            })
        }
    };

    Ok(Document {
        merge: concat(base.merge, incoming.merge),
        groups: merge_groups(base.groups, incoming.groups),
        resources,
        resource_types,
        jobs: concat(base.jobs, incoming.jobs),
        templates: concat(base.templates, incoming.templates),
    })
}

/// Union groups by name, appending incoming jobs to an existing group's jobs.
pub fn merge_groups(base: Vec<Group>, incoming: Vec<Group>) -> Vec<Group> {
    incoming.into_iter().fold(base, |mut out, group| {
        match out.iter_mut().find(|existing| existing.name == group.name) {
            Some(existing) => existing.jobs.extend(group.jobs),
            None => out.push(group),
        }
        out
    })
}

/// Merge a keyed section. On conflict returns the offending name.
pub fn merge_named(
    base: Vec<NamedRecord>,
    incoming: Vec<NamedRecord>,
) -> Result<Vec<NamedRecord>, String> {
    let mut out = incoming;

    for record in base {
        match out.iter().find(|existing| existing.name() == record.name()) {
            Some(existing) if mappings_equal(existing.fields(), record.fields()) => {}
            Some(_) => return Err(record.name().to_string()),
            None => out.push(record),
        }
    }

    Ok(out)
}

fn concat<T>(mut a: Vec<T>, b: Vec<T>) -> Vec<T> {
    a.extend(b);
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConflictSection;
    use indoc::indoc;

    fn doc(text: &str) -> Document {
        Document::parse(text).unwrap()
    }

    fn names(records: &[NamedRecord]) -> Vec<&str> {
        records.iter().map(NamedRecord::name).collect()
    }

    #[test]
    fn test_merge_directives_concatenate() {
        let merged = merge(
            doc("merge:\n- template: test.d/job_simple.yaml\n"),
            doc("merge:\n- template: test.d/another_file.yaml\n"),
        )
        .unwrap();

        let templates: Vec<_> = merged.merge.iter().map(|m| m.template.as_str()).collect();
        assert_eq!(
            templates,
            vec!["test.d/job_simple.yaml", "test.d/another_file.yaml"]
        );
    }

    #[test]
    fn test_different_resources_incoming_first() {
        let merged = merge(
            doc("resources:\n- name: blah\n  other: blah\n"),
            doc("resources:\n- name: blah2\n  other: blah\n"),
        )
        .unwrap();

        assert_eq!(names(&merged.resources), vec!["blah2", "blah"]);
    }

    #[test]
    fn test_identical_resources_collapse() {
        let merged = merge(
            doc("resources:\n- name: blah\n  other: blah\n"),
            doc("resources:\n- other: blah\n  name: blah\n"),
        )
        .unwrap();

        assert_eq!(names(&merged.resources), vec!["blah"]);
    }

    #[test]
    fn test_differing_resources_conflict() {
        let err = merge(
            doc("resources:\n- name: blah\n  other: blah\n"),
            doc("resources:\n- name: blah\n  other: blah2\n"),
        )
        .unwrap_err();

        assert_eq!(err.section(), ConflictSection::Resources);
        assert_eq!(err.resources.as_deref(), Some("blah"));
    }

    #[test]
    fn test_differing_resource_types_conflict() {
        let err = merge(
            doc("resource_types:\n- name: slack\n  type: docker-image\n"),
            doc("resource_types:\n- name: slack\n  type: registry-image\n"),
        )
        .unwrap_err();

        assert_eq!(err.section(), ConflictSection::ResourceTypes);
    }

    #[test]
    fn test_both_sections_conflict() {
        let err = merge(
            doc(indoc! {"
                resources: [{name: r, v: 1}]
                resource_types: [{name: t, v: 1}]
            "}),
            doc(indoc! {"
                resources: [{name: r, v: 2}]
                resource_types: [{name: t, v: 2}]
            "}),
        )
        .unwrap_err();

        assert_eq!(err.section(), ConflictSection::Both);
    }

    #[test]
    fn test_groups_without_overlap_append() {
        let merged = merge(
            doc("groups:\n- name: blah\n  jobs: [job1]\n"),
            doc("groups:\n- name: blah_de_blah\n  jobs: [job2]\n"),
        )
        .unwrap();

        assert_eq!(
            merged.groups,
            vec![
                Group::new("blah", ["job1"]),
                Group::new("blah_de_blah", ["job2"])
            ]
        );
    }

    #[test]
    fn test_overlapping_groups_union_jobs_in_place() {
        let merged = merge(
            doc(indoc! {"
                groups:
                - name: blah
                  jobs: [job1]
                - name: blah_de_blah
                  jobs: [job1]
            "}),
            doc("groups:\n- name: blah\n  jobs: [job2]\n"),
        )
        .unwrap();

        assert_eq!(
            merged.groups,
            vec![
                Group::new("blah", ["job1", "job2"]),
                Group::new("blah_de_blah", ["job1"])
            ]
        );
    }

    #[test]
    fn test_group_jobs_are_not_deduplicated() {
        let merged = merge(
            doc("groups:\n- name: g\n  jobs: [j1]\n"),
            doc("groups:\n- name: g\n  jobs: [j1]\n"),
        )
        .unwrap();

        assert_eq!(merged.groups, vec![Group::new("g", ["j1", "j1"])]);
    }

    #[test]
    fn test_jobs_concatenate_without_dedup() {
        let merged = merge(
            doc("jobs:\n- name: a\n- name: b\n"),
            doc("jobs:\n- name: a\n"),
        )
        .unwrap();

        assert_eq!(merged.jobs.len(), 3);
        assert_eq!(merged.jobs[2]["name"].as_str(), Some("a"));
    }

    #[test]
    fn test_templates_travel_with_merge() {
        let base = Document::default().with_templates(vec!["a.tpl".into()]);
        let incoming = Document::default().with_templates(vec!["b.tpl".into(), "a.tpl".into()]);

        let merged = merge(base, incoming).unwrap();
        assert_eq!(merged.templates.len(), 3);
        assert_eq!(merged.templates[0].to_str(), Some("a.tpl"));
    }
}
