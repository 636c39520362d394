//! Default filename and extension denylists

use std::collections::HashSet;
use std::sync::LazyLock;

/// Extensions (with leading dot) that are never worth classifying
pub static EXCLUDED_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Editor and OS droppings
        ".swp",
        ".DS_Store",
        // Native binaries and libraries
        ".winmd",
        ".node",
        ".dll",
        ".a",
        ".lib",
        ".dylib",
        ".exe",
        // Images and design files
        ".gif",
        ".png",
        ".webp",
        ".svg",
        ".sketch",
        ".eps",
        ".pdf",
        ".psd",
        ".tif",
        ".tiff",
        ".bmp",
        ".ico",
        ".raw",
        // Audio and video
        ".wav",
        ".mpg",
        ".mpeg",
        ".mp3",
        ".mp4",
        ".3gp",
        ".aac",
        ".m4a",
        ".ogg",
        ".wma",
        ".avi",
        // Office documents
        ".ppt",
        ".doc",
        ".docx",
        // Archives
        ".zip",
        ".zipx",
        ".cab",
        ".7z",
        ".bkf",
        ".dmg",
        ".lz",
        ".rar",
        ".iso",
        ".lzma",
        ".tar",
        ".tgz",
        ".bz2",
        ".gz",
        ".gzip",
        // JVM artifacts
        ".jar",
        ".ear",
        ".aar",
        ".class",
        // Xcode project internals
        ".pbxproj",
        ".xcworkspace",
        ".nib",
        ".xib",
        ".plist",
        // Python bytecode
        ".pyc",
        // Tooling dotfiles and lockfiles
        ".gitignore",
        ".gitmodules",
        ".gitattributes",
        ".npmignore",
        ".lock",
        ".npmrc",
    ]
    .into_iter()
    .collect()
});

/// Exact base filenames that are never worth classifying
pub static EXCLUDED_FILENAMES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["npm-debug.log", "LICENSE", "LICENSE.md"].into_iter().collect());
