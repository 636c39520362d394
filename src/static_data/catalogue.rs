//! Well-known samples used to warm up the preoptimization cache
//!
//! Order matters: it is the initial scan order of the cache until traffic
//! reorders it by popularity.

/// One warm-up sample: the rules an entry answers for plus the sample the
/// oracle is asked to classify once
#[derive(Debug, Clone, Copy)]
pub struct CatalogueEntry {
    /// `(pattern, invert)` pairs, all of which must match
    pub rules: &'static [(&'static str, bool)],
    pub sample_name: &'static str,
    pub sample_body: &'static str,
}

const fn sample(
    rules: &'static [(&'static str, bool)],
    sample_name: &'static str,
    sample_body: &'static str,
) -> CatalogueEntry {
    CatalogueEntry {
        rules,
        sample_name,
        sample_body,
    }
}

pub static WELL_KNOWN_SAMPLES: &[CatalogueEntry] = &[
    sample(&[(r"\.js$", false), (r"\.min\.js$", true)], "test.js", "var a"),
    sample(&[(r"\.ts$", false)], "test.ts", "interface Foo {\n}"),
    sample(&[(r"\.ejs$", false)], "test.ejs", "<% if (names.length) { %>foo<% } %>"),
    sample(&[(r"\.go$", false)], "test.go", "package main\nfunc main(){\n}\n"),
    sample(&[(r"Makefile$", false)], "Makefile", ".phony foo\n"),
    sample(&[(r"\.ya?ml$", false)], "test.yml", "---\nfoo: 1\n"),
    sample(&[(r"\.json$", false)], "test.json", "{\"a\":1}"),
    sample(&[(r"\.swift$", false)], "test.swift", "let a=0"),
    sample(&[(r"\.c(\+\+|pp|c)$", false)], "test.cpp", "class Foo{\n};\n"),
    sample(&[(r"\.hbs$", false)], "test.hbs", "<div>{{foo}}</div>"),
    sample(&[(r"\.html$", false)], "test.html", "<div>hi</div>"),
    sample(&[(r"\.css$", false), (r"\.min\.css$", true)], "test.css", ".rule {color:red}"),
    sample(&[(r"\.scss$", false)], "test.scss", ".rule {color:red}"),
    sample(&[(r"\.(ba|z)?sh$", false)], "test.sh", "#!/bin/sh\n"),
    sample(&[(r"\.md$", false)], "test.md", "# Foo\n"),
    sample(&[(r"\.json5$", false)], "test.json5", "{a:1}"),
    sample(&[(r"\.jsx$", false)], "test.jsx", "import a from 'foo'\n"),
    sample(&[(r"\.m$", false)], "test.m", "@implementation Foo\n@end\n"),
    sample(&[(r"\.mm$", false)], "test.mm", "@implementation Foo\n@end\n"),
    sample(&[(r"\.(c|h)$", false)], "test.c", "void main(){\n}\n"),
    sample(&[(r"\.rb$", false)], "test.rb", "print \"hello\""),
    sample(&[(r"\.py$", false)], "test.py", "def foo\nend\n"),
    sample(&[(r"\.proto$", false)], "test.proto", "package foo\nmessage Bar\n{\n}\n"),
    sample(&[(r"\.java$", false)], "test.java", "package foo\npublic class Bar\n{\n}\n"),
    sample(&[(r"\.cs$", false)], "test.cs", "class Bar\n{\n}\n"),
    sample(&[(r"\.xml$", false)], "test.xml", "<a>foo</a>"),
    sample(&[(r"\.lua$", false)], "test.lua", "x=0"),
    sample(&[(r"\.txt$", false)], "test.txt", "hi"),
    sample(&[(r"\.sql$", false)], "test.sql", "delete from foo"),
    sample(&[(r"\.coffee$", false)], "test.coffee", "a = 1"),
    sample(&[(r"\.properties$", false)], "test.properties", "a=1"),
    sample(&[(r"Dockerfile(\.*)$", false)], "Dockerfile", "FROM nodejs\n"),
    sample(&[(r"LICENSE$", false)], "LICENSE", "MIT License\n"),
];
