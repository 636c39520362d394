//! Default path exclusion rules
//!
//! Each entry is `(name, pattern)`. Patterns are regular expressions applied
//! to the full, `/`-separated path.

/// Vendored, build output, minified, source map and generated file patterns
pub static DEFAULT_PATH_RULES: &[(&str, &str)] = &[
    // Dependency directories
    ("vendor", r"(^|/)vendor/"),
    ("node_modules", r"(^|/)node_modules/"),
    ("bower_components", r"(^|/)bower_components/"),
    ("third_party", r"(^|/)third[_-]party/"),
    ("godeps", r"(^|/)Godeps/_workspace/"),
    ("pods", r"(^|/)Pods/"),
    // Build outputs
    ("dist", r"(^|/)dist/"),
    ("build", r"(^|/)build/"),
    ("target", r"(^|/)target/(debug|release)/"),
    ("out", r"(^|/)out/"),
    // VCS internals
    ("vcs", r"(^|/)\.(git|svn|hg)/"),
    // Minified assets and source maps
    ("minified", r"[.-]min\.(js|css)$"),
    ("bundle", r"\.bundle\.js$"),
    ("sourcemap", r"\.(js|css)\.map$"),
    // Generated code
    ("protobuf_go", r"\.pb\.go$"),
    ("protobuf_py", r"_pb2(_grpc)?\.py$"),
    ("generated", r"\.generated\.[A-Za-z0-9]+$"),
    ("designer", r"\.designer\.(cs|vb)$"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MatchRule;

    fn rule(name: &str) -> MatchRule {
        let (_, pattern) = DEFAULT_PATH_RULES
            .iter()
            .find(|(n, _)| *n == name)
            .unwrap();
        MatchRule::matching(pattern).unwrap()
    }

    #[test]
    fn test_all_default_rules_compile() {
        for (name, pattern) in DEFAULT_PATH_RULES {
            assert!(MatchRule::matching(pattern).is_ok(), "rule {name} failed to compile");
        }
    }

    #[test]
    fn test_vendor_rule() {
        let vendor = rule("vendor");
        assert!(vendor.matches("vendor/pkg/foo.go"));
        assert!(vendor.matches("src/vendor/pkg/foo.go"));
        assert!(!vendor.matches("src/vendors.go"));
        assert!(!vendor.matches("myvendor/foo.go"));
    }

    #[test]
    fn test_minified_and_sourcemaps() {
        assert!(rule("minified").matches("static/app.min.js"));
        assert!(rule("minified").matches("jquery-min.js"));
        assert!(!rule("minified").matches("static/admin.js"));
        assert!(rule("sourcemap").matches("static/app.js.map"));
        assert!(!rule("sourcemap").matches("src/map.js"));
    }

    #[test]
    fn test_generated_rules() {
        assert!(rule("protobuf_go").matches("api/service.pb.go"));
        assert!(rule("protobuf_py").matches("api/service_pb2.py"));
        assert!(rule("generated").matches("Models.generated.cs"));
        assert!(!rule("generated").matches("generator.cs"));
    }
}
