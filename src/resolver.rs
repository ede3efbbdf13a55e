//! Embedded raster asset resolution for SVG markup
//!
//! SVG icon sources frequently reference remote bitmaps through
//! `<image href="...">` elements. Rasterizers cannot (or will not) fetch
//! those themselves, and some reject raster sub-formats such as WEBP
//! outright. This module finds every such reference, fetches the asset,
//! normalizes it to PNG through the codec, and splices the result back in
//! as an inline base64 data URI.
//!
//! Rewriting never mutates the source text in place: all match spans are
//! collected first, resolved concurrently, and the output is rebuilt once
//! from original segments interleaved with replacements, so completion
//! order and length drift cannot corrupt later spans.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::codec::{self, OutputFormat};
use crate::error::PipelineError;
use crate::fetch::Fetcher;

/// Matches the URL inside an `<image>` element's `href`/`xlink:href`
/// attribute. Vector sub-elements (`<path>`, `<use>`, ...) never match.
static IMAGE_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<image\b[^>]*?(?:xlink:)?href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// One discovered raster reference: the byte span of the URL text and the
/// URL itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRef {
    pub span: Range<usize>,
    pub url: String,
}

/// Find every remote raster reference in `svg`, in document order.
///
/// References that are already inline `data:` URIs are skipped; they need
/// no resolution.
pub fn discover_references(svg: &str) -> Vec<EmbeddedRef> {
    IMAGE_HREF
        .captures_iter(svg)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter(|m| {
            let inline = m.as_str().starts_with("data:");
            if inline {
                log::debug!("skipping already-inline image reference");
            }
            !inline
        })
        .map(|m| EmbeddedRef { span: m.range(), url: m.as_str().to_string() })
        .collect()
}

/// Replace every embedded raster reference in `svg` with an inline PNG
/// data URI, fetching and normalizing each referenced asset.
///
/// Fetches for multiple references run concurrently; each result is
/// associated with its span by position, never by completion order. Markup
/// without references is returned unchanged.
pub async fn resolve_embedded_images<F: Fetcher>(
    svg: &str,
    fetcher: &F,
) -> Result<String, PipelineError> {
    let refs = discover_references(svg);
    if refs.is_empty() {
        return Ok(svg.to_string());
    }

    log::info!("resolving {} embedded raster reference(s)", refs.len());
    let replacements =
        futures::future::try_join_all(refs.iter().map(|r| inline_reference(fetcher, &r.url)))
            .await?;

    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for (reference, replacement) in refs.iter().zip(replacements) {
        out.push_str(&svg[cursor..reference.span.start]);
        out.push_str(&replacement);
        cursor = reference.span.end;
    }
    out.push_str(&svg[cursor..]);
    Ok(out)
}

/// Fetch one referenced asset and normalize it to an inline PNG data URI.
async fn inline_reference<F: Fetcher>(fetcher: &F, url: &str) -> Result<String, PipelineError> {
    let bytes = fetcher.fetch(url).await?;
    let image = codec::decode_image(&bytes)?;
    let png = codec::encode_image(&image, OutputFormat::Png)?;
    Ok(codec::png_data_uri(&png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_no_references() {
        let svg = r##"<svg><path d="M0 0h8v8z" fill="#fff"/></svg>"##;
        assert!(discover_references(svg).is_empty());
    }

    #[test]
    fn test_discover_single_reference() {
        let svg = r#"<svg><image x="0" y="0" href="https://assets.test/a.webp" width="8"/></svg>"#;
        let refs = discover_references(svg);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url, "https://assets.test/a.webp");
        assert_eq!(&svg[refs[0].span.clone()], "https://assets.test/a.webp");
    }

    #[test]
    fn test_discover_xlink_and_single_quotes() {
        let svg = r#"<svg><image xlink:href='https://assets.test/b.png'/></svg>"#;
        let refs = discover_references(svg);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url, "https://assets.test/b.png");
    }

    #[test]
    fn test_discover_multiple_in_document_order() {
        let svg = concat!(
            r#"<svg><image href="https://assets.test/1.png"/>"#,
            r#"<rect width="4" height="4"/>"#,
            r#"<image href="https://assets.test/2.png"/></svg>"#,
        );
        let refs = discover_references(svg);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].url, "https://assets.test/1.png");
        assert_eq!(refs[1].url, "https://assets.test/2.png");
        assert!(refs[0].span.end <= refs[1].span.start);
    }

    #[test]
    fn test_discover_skips_data_uris() {
        let svg = r#"<svg><image href="data:image/png;base64,AAAA"/></svg>"#;
        assert!(discover_references(svg).is_empty());
    }

    #[test]
    fn test_discover_ignores_vector_hrefs() {
        // <use> also carries href but is not a raster reference.
        let svg = r##"<svg><use href="#icon"/><path d="M0 0"/></svg>"##;
        assert!(discover_references(svg).is_empty());
    }
}
