//! Locating a distribution's top-level module source

use crate::domain::Distribution;
use std::fs;
use std::path::PathBuf;

/// Importable top-level names from `top_level.txt`, or the project name
pub fn top_level_names(dist: &Distribution) -> Vec<String> {
    let from_file = fs::read_to_string(dist.dist_info.join("top_level.txt"))
        .map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if from_file.is_empty() {
        vec![dist.normalized_name().replace('-', "_")]
    } else {
        from_file
    }
}

/// The source file of the first top-level module that exists on disk
///
/// Packages resolve to `name/__init__.py`, single modules to `name.py`.
pub fn locate_source(dist: &Distribution) -> Option<PathBuf> {
    top_level_names(dist).iter().find_map(|name| {
        let package = dist.site_packages.join(name).join("__init__.py");
        let module = dist.site_packages.join(format!("{}.py", name));
        [package, module].into_iter().find(|p| p.is_file())
    })
}

/// Extract the module docstring: the first statement, if it is a string literal
pub fn module_docstring(source: &str) -> Option<String> {
    let mut rest = source.trim_start_matches('\u{feff}');
    loop {
        rest = rest.trim_start();
        if rest.starts_with('#') {
            rest = rest.split_once('\n').map_or("", |(_, after)| after);
        } else {
            break;
        }
    }

    let rest = rest.trim_start_matches(['r', 'R', 'u', 'U']);
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(body) = rest.strip_prefix(quote) {
            let end = body.find(quote)?;
            let doc = dedent(&body[..end]);
            return Some(doc).filter(|d| !d.is_empty());
        }
    }
    None
}

/// Trim the docstring and strip the common indentation of continuation lines
fn dedent(doc: &str) -> String {
    let mut lines = doc.lines();
    let first = lines.next().unwrap_or_default().trim().to_string();
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = vec![first];
    out.extend(
        rest.iter()
            .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()).trim_end().to_string()),
    );
    out.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dist_in(site: &TempDir, name: &str) -> Distribution {
        let dist_info = site.path().join(format!("{}-1.0.dist-info", name));
        fs::create_dir_all(&dist_info).unwrap();
        Distribution::new(name, "1.0", dist_info, site.path())
    }

    #[test]
    fn test_locate_package_init() {
        let site = TempDir::new().unwrap();
        let dist = dist_in(&site, "Flask_Login");
        fs::create_dir_all(site.path().join("flask_login")).unwrap();
        fs::write(site.path().join("flask_login/__init__.py"), "").unwrap();

        assert_eq!(
            locate_source(&dist),
            Some(site.path().join("flask_login/__init__.py"))
        );
    }

    #[test]
    fn test_locate_via_top_level() {
        let site = TempDir::new().unwrap();
        let dist = dist_in(&site, "PyYAML");
        fs::write(dist.dist_info.join("top_level.txt"), "_yaml\nyaml\n").unwrap();
        fs::write(site.path().join("yaml.py"), "").unwrap();

        assert_eq!(top_level_names(&dist), vec!["_yaml", "yaml"]);
        assert_eq!(locate_source(&dist), Some(site.path().join("yaml.py")));
    }

    #[test]
    fn test_locate_missing() {
        let site = TempDir::new().unwrap();
        let dist = dist_in(&site, "ghost");
        assert!(locate_source(&dist).is_none());
    }

    #[test]
    fn test_module_docstring() {
        let source = "#!/usr/bin/env python\n# -*- coding: utf-8 -*-\n\n\"\"\"Requests HTTP Library\n    ~~~~~~~~~~~~~~~~~~~~~\n\n    Requests is an HTTP library.\n\"\"\"\n\nimport os\n";
        assert_eq!(
            module_docstring(source).as_deref(),
            Some("Requests HTTP Library\n~~~~~~~~~~~~~~~~~~~~~\n\nRequests is an HTTP library.")
        );
    }

    #[test]
    fn test_single_quoted_docstring() {
        assert_eq!(module_docstring("r'''Raw docs.'''").as_deref(), Some("Raw docs."));
        assert_eq!(module_docstring("'short'\n").as_deref(), Some("short"));
    }

    #[test]
    fn test_no_docstring() {
        assert!(module_docstring("import os\n\"\"\"late\"\"\"").is_none());
        assert!(module_docstring("").is_none());
        assert!(module_docstring("\"\"\"unterminated").is_none());
    }
}
