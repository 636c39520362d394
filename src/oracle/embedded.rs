//! In-process oracle backed by a language detection library
//!
//! [`EmbeddedOracle`] wraps any [`LanguageLibrary`] and reports through the
//! same result shape as the network oracle. [`BuiltinLibrary`] is a small
//! table-driven library good enough for common repositories and tests.

use super::{Oracle, normalize};
use crate::error::ClassifyResult;
use crate::filters::binary::is_binary_content_type;
use crate::filters::{base_name, extension, sniff_content_type};
use crate::rules::MatchRule;
use crate::static_data::languages::{self, BY_EXTENSION, LANGUAGE_TABLE};
use crate::static_data::DEFAULT_PATH_RULES;
use crate::types::{ClassificationResult, Detection, Language, OracleResponse};
use async_trait::async_trait;
use std::sync::LazyLock;

/// What an embedded detection library has to provide
pub trait LanguageLibrary: Send + Sync {
    /// Candidate languages for `path`, most likely first
    fn language_hints(&self, path: &str) -> Vec<String>;

    /// Pick a language from the body, guided by `hints`
    fn language_by_contents(&self, body: &[u8], hints: &[String]) -> Option<String>;

    fn is_vendored(&self, path: &str) -> bool;

    fn is_binary(&self, body: &[u8]) -> bool;

    fn is_generated(&self, _path: &str, _body: &[u8]) -> bool {
        false
    }

    /// Full details for a language name
    fn language(&self, name: &str) -> Option<Language>;
}

/// `(extension, detected language, replacement)`
pub type LanguageOverride = (&'static str, &'static str, &'static str);

/// Procedural SQL dialects detected in a `.sql` file are reported as plain SQL
pub static DEFAULT_OVERRIDES: &[LanguageOverride] = &[
    (".sql", "PLpgSQL", "SQL"),
    (".sql", "PLSQL", "SQL"),
    (".sql", "TSQL", "SQL"),
    (".sql", "SQLPL", "SQL"),
];

/// Oracle that runs a [`LanguageLibrary`] in process
pub struct EmbeddedOracle<L> {
    library: L,
    overrides: Vec<LanguageOverride>,
}

impl<L: LanguageLibrary> EmbeddedOracle<L> {
    pub fn new(library: L) -> Self {
        Self {
            library,
            overrides: DEFAULT_OVERRIDES.to_vec(),
        }
    }

    pub fn with_overrides(library: L, overrides: Vec<LanguageOverride>) -> Self {
        Self { library, overrides }
    }

    fn apply_overrides(&self, path: &str, detected: String) -> String {
        let ext = extension(path);
        self.overrides
            .iter()
            .find(|(e, from, _)| *e == ext && *from == detected)
            .map_or(detected, |(_, _, to)| to.to_string())
    }

    fn detect(&self, path: &str, body: &[u8]) -> Detection {
        let content_type = sniff_content_type(body);
        let is_image = content_type.starts_with("image/");
        let is_binary = is_binary_content_type(content_type) || self.library.is_binary(body);
        let kind = match (is_image, is_binary) {
            (true, _) => "image",
            (false, true) => "binary",
            (false, false) => "text",
        };
        let language = if is_binary {
            None
        } else {
            let hints = self.library.language_hints(path);
            self.library
                .language_by_contents(body, &hints)
                .map(|name| self.apply_overrides(path, name))
                .and_then(|name| self.library.language(&name))
        };

        let text = String::from_utf8_lossy(body);
        let loc = if is_binary { 0 } else { text.lines().count() as u64 };
        let sloc = if is_binary {
            0
        } else {
            text.lines().filter(|l| !l.trim().is_empty()).count() as u64
        };

        Detection {
            path: path.to_string(),
            loc,
            sloc,
            kind: kind.to_string(),
            extname: extension(path).to_string(),
            mime_type: content_type.split(';').next().unwrap_or(content_type).to_string(),
            content_type: content_type.to_string(),
            is_image,
            is_text: !is_binary,
            is_binary,
            is_vendored: self.library.is_vendored(path),
            is_generated: self.library.is_generated(path, body),
            is_viewable: !is_binary,
            is_safe_to_colorize: !is_binary,
            is_documentation: language.as_ref().is_some_and(|l| l.kind == "prose"),
            language,
            ..Default::default()
        }
    }
}

#[async_trait]
impl<L: LanguageLibrary> Oracle for EmbeddedOracle<L> {
    async fn classify(&self, path: &str, body: &[u8]) -> ClassifyResult<ClassificationResult> {
        let detection = self.detect(path, body);
        normalize(OracleResponse {
            success: true,
            message: None,
            results: vec![detection],
        })
    }

    fn name(&self) -> &'static str {
        "embedded"
    }
}

static VENDOR_RULES: LazyLock<Vec<MatchRule>> = LazyLock::new(|| {
    const VENDOR_RULE_NAMES: &[&str] = &[
        "vendor",
        "node_modules",
        "bower_components",
        "third_party",
        "godeps",
        "pods",
    ];
    DEFAULT_PATH_RULES
        .iter()
        .filter(|(name, _)| VENDOR_RULE_NAMES.contains(name))
        .filter_map(|(_, pattern)| MatchRule::matching(pattern).ok())
        .collect()
});

static GENERATED_RULES: LazyLock<Vec<MatchRule>> = LazyLock::new(|| {
    const GENERATED_RULE_NAMES: &[&str] =
        &["minified", "bundle", "protobuf_go", "protobuf_py", "generated", "designer"];
    DEFAULT_PATH_RULES
        .iter()
        .filter(|(name, _)| GENERATED_RULE_NAMES.contains(name))
        .filter_map(|(_, pattern)| MatchRule::matching(pattern).ok())
        .collect()
});

/// Table-driven library over [`LANGUAGE_TABLE`]
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLibrary;

impl BuiltinLibrary {
    fn interpreter(body: &[u8]) -> Option<String> {
        let first_line = body.split(|b| *b == b'\n').next()?;
        let line = std::str::from_utf8(first_line).ok()?.strip_prefix("#!")?;
        let mut parts = line.split_whitespace();
        let program = base_name(parts.next()?);
        let program = if program == "env" { parts.next()? } else { program };
        Some(program.to_string())
    }

    fn disambiguate(text: &str, hints: &[String]) -> Option<String> {
        let has = |name: &str| hints.iter().any(|h| h == name);

        if has("C") && has("C++") {
            if has("Objective-C")
                && (text.contains("@interface") || text.contains("@implementation") || text.contains("#import"))
            {
                return Some("Objective-C".to_string());
            }
            if ["class ", "namespace ", "template", "std::", "#include <iostream>"]
                .iter()
                .any(|marker| text.contains(marker))
            {
                return Some("C++".to_string());
            }
            return Some("C".to_string());
        }

        if has("SQL") {
            let lower = text.to_ascii_lowercase();
            if has("PLpgSQL") && (lower.contains("$$") || lower.contains("language plpgsql")) {
                return Some("PLpgSQL".to_string());
            }
            if has("PLSQL") && lower.contains("create or replace package") {
                return Some("PLSQL".to_string());
            }
            if has("TSQL") && (lower.contains("begin tran") || lower.contains("\ngo\n")) {
                return Some("TSQL".to_string());
            }
            return Some("SQL".to_string());
        }

        hints.first().cloned()
    }
}

impl LanguageLibrary for BuiltinLibrary {
    fn language_hints(&self, path: &str) -> Vec<String> {
        let name = base_name(path);
        let by_filename = LANGUAGE_TABLE
            .iter()
            .filter(|spec| spec.filenames.contains(&name))
            .map(|spec| spec.name.to_string());

        let by_extension = BY_EXTENSION
            .get(extension(path))
            .into_iter()
            .flatten()
            .map(|index| LANGUAGE_TABLE[*index].name.to_string());

        let mut hints: Vec<String> = by_filename.collect();
        for hint in by_extension {
            if !hints.contains(&hint) {
                hints.push(hint);
            }
        }
        hints
    }

    fn language_by_contents(&self, body: &[u8], hints: &[String]) -> Option<String> {
        match hints {
            [] => {
                let interpreter = Self::interpreter(body)?;
                LANGUAGE_TABLE
                    .iter()
                    .find(|spec| spec.interpreters.contains(&interpreter.as_str()))
                    .map(|spec| spec.name.to_string())
            }
            [only] => Some(only.clone()),
            _ => Self::disambiguate(&String::from_utf8_lossy(body), hints),
        }
    }

    fn is_vendored(&self, path: &str) -> bool {
        VENDOR_RULES.iter().any(|rule| rule.matches(path))
    }

    fn is_binary(&self, body: &[u8]) -> bool {
        content_inspector::inspect(body).is_binary()
    }

    fn is_generated(&self, path: &str, body: &[u8]) -> bool {
        if GENERATED_RULES.iter().any(|rule| rule.matches(path)) {
            return true;
        }
        let head = &body[..body.len().min(1024)];
        let head = String::from_utf8_lossy(head);
        head.lines().take(5).any(|line| {
            (line.contains("Code generated") && line.contains("DO NOT EDIT")) || line.contains("@generated")
        })
    }

    fn language(&self, name: &str) -> Option<Language> {
        languages::by_name(name).map(|spec| Language {
            name: spec.name.to_string(),
            kind: spec.kind.to_string(),
            group: spec.group.to_string(),
            ace_mode: spec.ace_mode.to_string(),
            is_popular: spec.popular,
            is_unpopular: !spec.popular,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> EmbeddedOracle<BuiltinLibrary> {
        EmbeddedOracle::new(BuiltinLibrary)
    }

    #[test]
    fn test_hints() {
        let library = BuiltinLibrary;
        assert_eq!(library.language_hints("src/main.go"), vec!["Go"]);
        assert_eq!(library.language_hints("Makefile"), vec!["Makefile"]);
        assert_eq!(library.language_hints("foo.h"), vec!["C++", "C", "Objective-C"]);
        assert!(library.language_hints("foo.unknown").is_empty());
    }

    #[test]
    fn test_contents_disambiguation() {
        let library = BuiltinLibrary;
        let hints = library.language_hints("foo.h");
        assert_eq!(library.language_by_contents(b"#include <stdlib.h>\n", &hints).as_deref(), Some("C"));
        assert_eq!(library.language_by_contents(b"class Foo {};\n", &hints).as_deref(), Some("C++"));
        assert_eq!(
            library.language_by_contents(b"@interface Foo\n@end\n", &hints).as_deref(),
            Some("Objective-C")
        );
    }

    #[test]
    fn test_shebang() {
        let library = BuiltinLibrary;
        assert_eq!(
            library.language_by_contents(b"#!/usr/bin/env python3\nprint(1)\n", &[]).as_deref(),
            Some("Python")
        );
        assert_eq!(library.language_by_contents(b"#!/bin/bash\n", &[]).as_deref(), Some("Shell"));
        assert_eq!(library.language_by_contents(b"just words", &[]), None);
    }

    #[tokio::test]
    async fn test_sql_override() {
        let body = b"CREATE FUNCTION f() RETURNS void AS $$ BEGIN END; $$ LANGUAGE plpgsql;";
        let library = BuiltinLibrary;
        let hints = library.language_hints("schema.sql");
        assert_eq!(library.language_by_contents(body, &hints).as_deref(), Some("PLpgSQL"));

        let result = oracle().classify("schema.sql", body).await.unwrap();
        assert_eq!(result.language_name(), Some("SQL"));

        let plain = EmbeddedOracle::with_overrides(BuiltinLibrary, Vec::new());
        let result = plain.classify("schema.sql", body).await.unwrap();
        assert_eq!(result.language_name(), Some("PLpgSQL"));
    }

    #[tokio::test]
    async fn test_detection_shape() {
        let result = oracle().classify("foo.js", b"var a\nvar b\n\n").await.unwrap();
        let detection = result.detection.unwrap();
        assert_eq!(detection.kind, "text");
        assert_eq!(detection.extname, ".js");
        assert_eq!(detection.loc, 3);
        assert_eq!(detection.sloc, 2);
        let language = detection.language.unwrap();
        assert_eq!(language.name, "JavaScript");
        assert!(language.is_popular);
    }

    #[tokio::test]
    async fn test_content_level_exclusion() {
        let result = oracle().classify("vendor/x/y.go", b"package y").await.unwrap();
        assert!(result.is_excluded);
        assert!(result.detection.is_none());

        let result = oracle()
            .classify("api.go", b"// Code generated by protoc-gen-go. DO NOT EDIT.\npackage api\n")
            .await
            .unwrap();
        assert!(result.is_excluded);

        let result = oracle().classify("blob.dat", b"\x00\x01\x02").await.unwrap();
        assert!(result.is_excluded);
        assert!(result.is_binary);
    }
}
