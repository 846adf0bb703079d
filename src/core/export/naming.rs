//! Output file naming

use crate::domain::{ExportScope, Project};

/// Base name shared by every file of a run, without extension
///
/// `Export - {project}` for a project export, `Export - {project} - {type}`
/// for a single type. Characters rejected by common file systems become `-`.
pub fn export_base_name(project: &Project, scope: &ExportScope) -> String {
    let name = match scope.type_name() {
        Some(type_name) => format!("Export - {} - {}", project.name, type_name),
        None => format!("Export - {}", project.name),
    };
    fix_file_name(&name)
}

/// Replaces `< > : / \ * ?` with `-`
pub fn fix_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '/' | '\\' | '*' | '?' => '-',
            other => other,
        })
        .collect()
}

/// Archive name for a ReqIF file: the same name with a trailing `z`
pub fn archive_name(reqif_file_name: &str) -> String {
    format!("{reqif_file_name}z")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_base_name() {
        let project = Project::new("Demo");
        assert_eq!(
            export_base_name(&project, &ExportScope::Project),
            "Export - Demo"
        );
        assert_eq!(
            export_base_name(&project, &ExportScope::SingleType("Feature".to_string())),
            "Export - Demo - Feature"
        );
    }

    #[test]
    fn test_fix_file_name() {
        assert_eq!(fix_file_name("A/B: C*?<x>\\"), "A-B- C---x--");
        assert_eq!(fix_file_name("plain name"), "plain name");
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name("Export - Demo.reqif"), "Export - Demo.reqifz");
    }
}
