//! Binary content filtering

use super::{ExclusionReason, Filter, FilterDecision};

/// Number of leading bytes considered when sniffing
const SNIFF_LEN: usize = 512;

/// Content types treated as binary besides the image and video families
const BINARY_CONTENT_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/pdf",
    "application/ogg",
    "application/x-rar-compressed",
    "application/zip",
    "application/x-gzip",
];

/// `(signature, content type)`; `None` bytes in the signature are wildcards
type Signature = (&'static [Option<u8>], &'static str);

macro_rules! sig {
    ($($b:tt),* => $ct:expr) => {
        (&[$(sig!(@byte $b)),*], $ct)
    };
    (@byte _) => { None };
    (@byte $b:expr) => { Some($b) };
}

static SIGNATURES: &[Signature] = &[
    sig!(b'%', b'P', b'D', b'F', b'-' => "application/pdf"),
    sig!(b'G', b'I', b'F', b'8', b'7', b'a' => "image/gif"),
    sig!(b'G', b'I', b'F', b'8', b'9', b'a' => "image/gif"),
    sig!(0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A => "image/png"),
    sig!(0xFF, 0xD8, 0xFF => "image/jpeg"),
    sig!(b'B', b'M' => "image/bmp"),
    sig!(0x00, 0x00, 0x01, 0x00 => "image/x-icon"),
    sig!(0x00, 0x00, 0x02, 0x00 => "image/x-icon"),
    sig!(b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', b'V', b'P' => "image/webp"),
    sig!(b'R', b'I', b'F', b'F', _, _, _, _, b'A', b'V', b'I', b' ' => "video/avi"),
    sig!(b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E' => "audio/wave"),
    sig!(0x1A, 0x45, 0xDF, 0xA3 => "video/webm"),
    sig!(_, _, _, _, b'f', b't', b'y', b'p' => "video/mp4"),
    sig!(b'I', b'D', b'3' => "audio/mpeg"),
    sig!(b'O', b'g', b'g', b'S', 0x00 => "application/ogg"),
    sig!(b'P', b'K', 0x03, 0x04 => "application/zip"),
    sig!(0x1F, 0x8B, 0x08 => "application/x-gzip"),
    sig!(b'R', b'a', b'r', b'!', 0x1A, 0x07, 0x00 => "application/x-rar-compressed"),
    sig!(b'R', b'a', b'r', b'!', 0x1A, 0x07, 0x01, 0x00 => "application/x-rar-compressed"),
];

/// Sniff a content type from the leading bytes of `body`
///
/// Known magic numbers win; otherwise the body is reported as
/// `application/octet-stream` when it looks binary and as plain text when it
/// does not.
pub fn sniff_content_type(body: &[u8]) -> &'static str {
    let head = &body[..body.len().min(SNIFF_LEN)];

    let signature = SIGNATURES.iter().find(|(pattern, _)| {
        head.len() >= pattern.len()
            && pattern
                .iter()
                .zip(head)
                .all(|(expected, actual)| expected.is_none_or(|b| b == *actual))
    });
    if let Some((_, content_type)) = signature {
        return content_type;
    }

    if content_inspector::inspect(head).is_binary() {
        "application/octet-stream"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Whether a sniffed content type counts as binary
pub fn is_binary_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
        || content_type.starts_with("video/")
        || BINARY_CONTENT_TYPES.contains(&content_type)
}

/// Filter binary content by sniffing its leading bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryFilter;

impl BinaryFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Filter for BinaryFilter {
    type Input = [u8];

    fn filter(&self, body: &[u8]) -> FilterDecision {
        let content_type = sniff_content_type(body);
        if is_binary_content_type(content_type) {
            tracing::trace!("Binary content detected: {}", content_type);
            FilterDecision::Skip(ExclusionReason::Binary(content_type))
        } else {
            FilterDecision::Process
        }
    }

    fn name(&self) -> &'static str {
        "BinaryFilter"
    }
}
