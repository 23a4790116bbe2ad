//! Schema ingestion from text, files, and directory trees.
//!
//! One record per logical line, `<keyword>: ( <definition> )`. Shell-style
//! `#` comments are stripped, a trailing `$` joins the next line with a
//! space, and a line that does not open with a `keyword:` prefix continues
//! the previous one. Only `.schema` files are picked up when a directory
//! is scanned; traversal is recursive and the stream order must respect
//! dependencies.

use std::path::Path;

use super::registry::SubschemaSubentry;
use crate::chars::strip_comment;
use crate::error::{SchemaError, SchemaResult};

fn io_error(path: &Path, error: std::io::Error) -> SchemaError {
    SchemaError::InvalidDefinition {
        kind: "schema file",
        detail: format!("{}: {error}", path.display()),
    }
}

/// Whether a line opens a new record: a keyword run followed by a colon.
fn opens_record(line: &str) -> bool {
    match line.split_once(':') {
        Some((keyword, _)) => {
            let keyword = keyword.trim_end();
            !keyword.is_empty()
                && keyword
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        }
        None => false,
    }
}

fn logical_lines(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in input.lines() {
        let line = strip_comment(raw).trim_end();
        if line.trim().is_empty() {
            continue;
        }

        let continuing = match lines.last() {
            Some(previous) => previous.trim_end().ends_with('$') || !opens_record(line.trim_start()),
            None => false,
        };
        if continuing {
            let previous = lines.last_mut().expect("continuation follows a line");
            previous.push(' ');
            previous.push_str(line.trim_start());
        } else {
            lines.push(line.trim_start().to_owned());
        }
    }
    lines
}

/// Case-insensitive keyword with optional plural suffix.
fn keyword_matches(keyword: &str, singular: &str) -> bool {
    let keyword = keyword.to_ascii_lowercase();
    let singular = singular.to_ascii_lowercase();
    keyword == singular || keyword == format!("{singular}s") || keyword == format!("{singular}es")
}

impl SubschemaSubentry {
    /// Registers every record in `input`, in stream order. Returns the
    /// number of records registered.
    pub fn read_str(&self, input: &str) -> SchemaResult<usize> {
        let mut registered = 0;
        for line in logical_lines(input) {
            let Some((keyword, body)) = line.split_once(':') else {
                return Err(SchemaError::InvalidDefinition {
                    kind: "schema stream",
                    detail: format!("no keyword in line '{line}'"),
                });
            };
            let keyword = keyword.trim();
            let body = body.trim();

            if keyword_matches(keyword, "ldapSyntax") {
                self.register_ldap_syntax(body)?;
            } else if keyword_matches(keyword, "matchingRule") {
                self.register_matching_rule(body)?;
            } else if keyword_matches(keyword, "attributeType") {
                self.register_attribute_type(body)?;
            } else if keyword_matches(keyword, "objectClass") {
                self.register_object_class(body)?;
            } else if keyword_matches(keyword, "dITContentRule") {
                self.register_dit_content_rule(body)?;
            } else if keyword_matches(keyword, "nameForm") {
                self.register_name_form(body)?;
            } else if keyword_matches(keyword, "dITStructureRule") {
                self.register_dit_structure_rule(body)?;
            } else {
                return Err(SchemaError::InvalidDefinition {
                    kind: "schema stream",
                    detail: format!("unknown keyword '{keyword}'"),
                });
            }
            registered += 1;
        }
        Ok(registered)
    }

    /// Reads one schema file.
    pub fn read_file(&self, path: impl AsRef<Path>) -> SchemaResult<usize> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|error| io_error(path, error))?;
        self.read_str(&contents)
    }

    /// Recursively reads every `.schema` file under `path`, in sorted
    /// name order within each directory.
    pub fn read_directory(&self, path: impl AsRef<Path>) -> SchemaResult<usize> {
        let path = path.as_ref();
        let mut entries: Vec<_> = std::fs::read_dir(path)
            .map_err(|error| io_error(path, error))?
            .collect::<Result<_, _>>()
            .map_err(|error| io_error(path, error))?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut registered = 0;
        for entry in entries {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                registered += self.read_directory(&entry_path)?;
            } else if entry_path.extension().is_some_and(|ext| ext == "schema") {
                registered += self.read_file(&entry_path)?;
            }
        }
        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STREAM: &str = "\
# A miniature schema.
attributeType: ( 2.5.4.41 NAME 'name' EQUALITY caseIgnoreMatch
   SUBSTR caseIgnoreSubstringsMatch
   SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )
attributeTypes: ( 2.5.4.3 NAME 'cn' SUP name )  # alias keyword form
objectClass: ( 2.5.6.0 NAME 'top' ABSTRACT MUST cn )
";

    #[test]
    fn continuation_and_comments() {
        let lines = logical_lines(STREAM);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("SUBSTR caseIgnoreSubstringsMatch"));
    }

    #[test]
    fn dollar_joins_lines() {
        let lines = logical_lines("objectClass: ( 2.5.6.0 NAME 'top' MUST ( cn $\ncn2 ) )");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("( cn $ cn2 )"));
    }

    #[test]
    fn stream_registers_in_order() {
        let subentry = SubschemaSubentry::new(true);
        let before = subentry.counters().total;
        assert_eq!(subentry.read_str(STREAM).unwrap(), 3);
        assert_eq!(subentry.counters().total, before + 3);
        assert!(subentry.attribute_type("cn").is_some());
    }

    #[test]
    fn unknown_keyword_fails() {
        let subentry = SubschemaSubentry::new(true);
        assert!(subentry.read_str("chutzpah: ( 1.2.3 )").is_err());
    }

    #[test]
    fn files_and_directories() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            root.path().join("00-core.schema"),
            "attributeType: ( 2.5.4.41 NAME 'name' EQUALITY caseIgnoreMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )\n",
        )
        .unwrap();
        std::fs::write(
            nested.join("10-more.schema"),
            "attributeType: ( 2.5.4.3 NAME 'cn' SUP name )\n",
        )
        .unwrap();
        std::fs::write(nested.join("ignored.txt"), "not schema\n").unwrap();

        let subentry = SubschemaSubentry::new(true);
        assert_eq!(subentry.read_directory(root.path()).unwrap(), 2);
        assert!(subentry.attribute_type("cn").is_some());
    }
}
