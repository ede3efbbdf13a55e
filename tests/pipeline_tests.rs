//! End-to-end pipeline tests with an in-memory asset fetcher
//!
//! These tests exercise the resolve -> rasterize -> upscale pipeline and
//! the crop-geometry path without touching the network: a stub fetcher
//! serves encoded assets from a map keyed by URL.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use iconforge::codec::{self, OutputFormat};
use iconforge::error::PipelineError;
use iconforge::fetch::Fetcher;
use iconforge::pipeline;
use iconforge::resolver;
use iconforge::upscale::UpscaleOptions;

/// Serves assets from memory; unknown URLs fail like a 404.
#[derive(Default)]
struct StubFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl StubFetcher {
    fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(url.to_string(), bytes);
        self
    }
}

impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        self.assets.get(url).cloned().ok_or_else(|| PipelineError::Fetch {
            url: url.to_string(),
            reason: "HTTP status 404".to_string(),
        })
    }
}

fn solid_image(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Extract every PNG data-URI payload from markup, decoded to pixels.
fn decode_inline_payloads(svg: &str) -> Vec<RgbaImage> {
    use base64::Engine;

    let mut images = Vec::new();
    let mut rest = svg;
    while let Some(start) = rest.find("data:image/png;base64,") {
        let payload = &rest[start + "data:image/png;base64,".len()..];
        let end = payload.find(['"', '\'']).expect("data URI must be quoted");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&payload[..end])
            .expect("payload must be valid base64");
        images.push(codec::decode_image(&bytes).expect("payload must decode"));
        rest = &payload[end..];
    }
    images
}

#[tokio::test]
async fn test_resolver_round_trip_two_references() {
    // One PNG asset and one WEBP asset: both must come out as inline PNG.
    let red = solid_image(2, 2, [255, 0, 0, 255]);
    let blue = solid_image(3, 1, [0, 0, 255, 255]);
    let fetcher = StubFetcher::default()
        .with("https://assets.test/red.png", codec::encode_image(&red, OutputFormat::Png).unwrap())
        .with("https://assets.test/blue.webp", codec::encode_image(&blue, OutputFormat::Webp).unwrap());

    let svg = concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8">"#,
        r#"<image x="0" y="0" width="4" height="4" href="https://assets.test/red.png"/>"#,
        r#"<image x="4" y="4" width="4" height="4" href="https://assets.test/blue.webp"/>"#,
        r#"</svg>"#,
    );

    let resolved = resolver::resolve_embedded_images(svg, &fetcher).await.unwrap();

    assert!(!resolved.contains("https://assets.test"), "no raw asset URL may remain");
    assert!(resolver::discover_references(&resolved).is_empty());

    let payloads = decode_inline_payloads(&resolved);
    assert_eq!(payloads.len(), 2);
    // Content matches the fetched assets (re-encoding is allowed, pixels must survive).
    assert_eq!(payloads[0], red);
    assert_eq!(payloads[1], blue);
}

#[tokio::test]
async fn test_resolver_missing_asset_fails_fast() {
    let fetcher = StubFetcher::default();
    let svg = r#"<svg><image href="https://assets.test/gone.png"/></svg>"#;

    let err = resolver::resolve_embedded_images(svg, &fetcher).await.unwrap_err();
    match err {
        PipelineError::Fetch { url, .. } => assert_eq!(url, "https://assets.test/gone.png"),
        other => panic!("expected Fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resolver_rejects_non_image_bytes() {
    let fetcher =
        StubFetcher::default().with("https://assets.test/page.html", b"<html></html>".to_vec());
    let svg = r#"<svg><image href="https://assets.test/page.html"/></svg>"#;

    let err = resolver::resolve_embedded_images(svg, &fetcher).await.unwrap_err();
    assert!(matches!(err, PipelineError::Decode(_)));
}

#[tokio::test]
async fn test_full_pipeline_with_embedded_asset() {
    let red = solid_image(2, 2, [255, 0, 0, 255]);
    let fetcher = StubFetcher::default()
        .with("https://assets.test/fill.png", codec::encode_image(&red, OutputFormat::Png).unwrap());

    let svg = concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16">"#,
        r#"<image x="0" y="0" width="16" height="16" href="https://assets.test/fill.png"/>"#,
        r#"</svg>"#,
    );

    let out = pipeline::resolve_and_upscale_with(
        &fetcher,
        svg,
        2,
        &UpscaleOptions::default(),
        Some(32),
    )
    .await
    .unwrap();

    assert_eq!(out.dimensions(), (64, 64));
    let center = out.get_pixel(32, 32);
    assert!(center[0] > 200 && center[3] == 255, "embedded asset should fill the canvas");
}

#[tokio::test]
async fn test_full_pipeline_without_references_needs_no_fetcher_hits() {
    let fetcher = StubFetcher::default();
    let svg = concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8">"#,
        r##"<rect x="0" y="0" width="8" height="8" fill="#00ff00"/>"##,
        r#"</svg>"#,
    );

    let out = pipeline::resolve_and_upscale_with(
        &fetcher,
        svg,
        3,
        &UpscaleOptions::default(),
        Some(24),
    )
    .await
    .unwrap();

    assert_eq!(out.dimensions(), (72, 72));
    assert_eq!(*out.get_pixel(36, 36), Rgba([0, 255, 0, 255]));
}

#[tokio::test]
async fn test_pipeline_invalid_factor_rejected_before_fetch() {
    // The stub would fail any fetch; InvalidFactor must win first.
    let fetcher = StubFetcher::default();
    let svg = r#"<svg><image href="https://assets.test/gone.png"/></svg>"#;

    let err =
        pipeline::resolve_and_upscale_with(&fetcher, svg, 9, &UpscaleOptions::default(), None)
            .await
            .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidFactor(9)));
}

#[tokio::test]
async fn test_bounding_box_from_url() {
    let mut canvas = solid_image(10, 8, [0, 0, 0, 0]);
    for y in 2..5 {
        for x in 4..9 {
            canvas.put_pixel(x, y, Rgba([80, 80, 80, 255]));
        }
    }
    let fetcher = StubFetcher::default()
        .with("https://assets.test/canvas.png", codec::encode_image(&canvas, OutputFormat::Png).unwrap());

    let bbox = pipeline::bounding_box_from_url(&fetcher, "https://assets.test/canvas.png")
        .await
        .unwrap();

    assert_eq!(bbox.top, 2);
    assert_eq!(bbox.left, 4);
    assert_eq!(bbox.width, 5);
    assert_eq!(bbox.height, 3);
}
