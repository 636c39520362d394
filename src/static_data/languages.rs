//! Language table backing the built-in embedded detector
//!
//! Deliberately small: it only needs to know the languages that show up in
//! day-to-day repositories. Anything else is left to the network oracle.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy)]
pub struct LanguageSpec {
    pub name: &'static str,
    pub kind: &'static str,
    pub group: &'static str,
    pub ace_mode: &'static str,
    pub popular: bool,
    pub extensions: &'static [&'static str],
    pub filenames: &'static [&'static str],
    pub interpreters: &'static [&'static str],
}

const fn lang(
    name: &'static str,
    kind: &'static str,
    ace_mode: &'static str,
    popular: bool,
    extensions: &'static [&'static str],
) -> LanguageSpec {
    LanguageSpec {
        name,
        kind,
        group: "",
        ace_mode,
        popular,
        extensions,
        filenames: &[],
        interpreters: &[],
    }
}

pub static LANGUAGE_TABLE: &[LanguageSpec] = &[
    LanguageSpec {
        interpreters: &["node", "nodejs"],
        ..lang("JavaScript", "programming", "javascript", true, &[".js", ".cjs", ".mjs"])
    },
    lang("TypeScript", "programming", "typescript", true, &[".ts", ".cts", ".mts"]),
    LanguageSpec {
        group: "JavaScript",
        ..lang("JSX", "programming", "javascript", false, &[".jsx"])
    },
    LanguageSpec {
        group: "HTML",
        ..lang("EJS", "markup", "ejs", false, &[".ejs"])
    },
    lang("Go", "programming", "golang", true, &[".go"]),
    LanguageSpec {
        filenames: &["Makefile", "GNUmakefile", "makefile"],
        ..lang("Makefile", "programming", "makefile", false, &[".mk", ".mak"])
    },
    lang("YAML", "data", "yaml", false, &[".yml", ".yaml"]),
    lang("JSON", "data", "json", true, &[".json"]),
    lang("JSON5", "data", "javascript", false, &[".json5"]),
    lang("Swift", "programming", "swift", true, &[".swift"]),
    lang("C++", "programming", "c_cpp", true, &[".cpp", ".cc", ".c++", ".cxx", ".hpp", ".hh", ".h"]),
    lang("C", "programming", "c_cpp", true, &[".c", ".h"]),
    lang("Objective-C", "programming", "objectivec", true, &[".m", ".h"]),
    lang("Objective-C++", "programming", "objectivec", false, &[".mm"]),
    lang("Handlebars", "markup", "handlebars", false, &[".hbs", ".handlebars"]),
    lang("HTML", "markup", "html", true, &[".html", ".htm", ".xhtml"]),
    lang("CSS", "markup", "css", true, &[".css"]),
    lang("SCSS", "markup", "scss", false, &[".scss"]),
    LanguageSpec {
        interpreters: &["sh", "bash", "zsh"],
        ..lang("Shell", "programming", "sh", true, &[".sh", ".bash", ".zsh"])
    },
    lang("Markdown", "prose", "markdown", true, &[".md", ".markdown"]),
    LanguageSpec {
        interpreters: &["ruby"],
        filenames: &["Gemfile", "Rakefile"],
        ..lang("Ruby", "programming", "ruby", true, &[".rb", ".rake", ".gemspec"])
    },
    LanguageSpec {
        interpreters: &["python", "python2", "python3"],
        ..lang("Python", "programming", "python", true, &[".py", ".pyw"])
    },
    lang("Protocol Buffer", "data", "protobuf", false, &[".proto"]),
    lang("Java", "programming", "java", true, &[".java"]),
    lang("C#", "programming", "csharp", true, &[".cs"]),
    lang("XML", "data", "xml", true, &[".xml", ".xsd", ".xsl"]),
    LanguageSpec {
        interpreters: &["lua"],
        ..lang("Lua", "programming", "lua", false, &[".lua"])
    },
    LanguageSpec {
        filenames: &["LICENSE", "COPYING", "README"],
        ..lang("Text", "prose", "text", false, &[".txt"])
    },
    lang("SQL", "data", "sql", false, &[".sql"]),
    lang("PLpgSQL", "programming", "pgsql", false, &[".pgsql", ".sql"]),
    lang("PLSQL", "programming", "sql", false, &[".pls", ".sql"]),
    lang("TSQL", "programming", "sql", false, &[".sql"]),
    lang("CoffeeScript", "programming", "coffee", false, &[".coffee"]),
    lang("INI", "data", "ini", false, &[".ini", ".properties", ".cfg"]),
    LanguageSpec {
        filenames: &["Dockerfile"],
        ..lang("Dockerfile", "programming", "dockerfile", false, &[".dockerfile"])
    },
    LanguageSpec {
        interpreters: &["perl"],
        ..lang("Perl", "programming", "perl", false, &[".pl", ".pm"])
    },
    lang("Rust", "programming", "rust", true, &[".rs"]),
    lang("TOML", "data", "toml", false, &[".toml"]),
];

/// Extension → indices into [`LANGUAGE_TABLE`], in table order
pub static BY_EXTENSION: LazyLock<HashMap<&'static str, Vec<usize>>> = LazyLock::new(|| {
    let mut map: HashMap<&'static str, Vec<usize>> = HashMap::new();
    for (index, spec) in LANGUAGE_TABLE.iter().enumerate() {
        for ext in spec.extensions {
            map.entry(*ext).or_default().push(index);
        }
    }
    map
});

/// Look up a language by its exact name
pub fn by_name(name: &str) -> Option<&'static LanguageSpec> {
    LANGUAGE_TABLE.iter().find(|spec| spec.name == name)
}
