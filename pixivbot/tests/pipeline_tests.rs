// ABOUTME: End-to-end relay tests against a mock image host
// ABOUTME: Covers resolution, referer handling, pass-through, resize, and budget exhaustion

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use mockito::Matcher;
use pixivbot::RelayError;
use pixivbot::constants::{http, limits};
use pixivbot::relay::{
    BudgetEncoder, DeliveryMode, ImageReference, ImageRelay, ImageVariant, JpegRasterEncoder,
    Transcoder, UploadKind,
};
use std::io::Cursor;

fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("Should encode PNG fixture");
    out.into_inner()
}

/// Deterministic noise; compresses badly in any format.
fn noise(width: u32, height: u32) -> DynamicImage {
    let mut state = 0x2545_f491_u32;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
        let mut channel = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        };
        Rgb([channel(), channel(), channel()])
    }))
}

fn downloading(mode: DeliveryMode) -> ImageRelay {
    ImageRelay::new(mode)
        .expect("Should create relay")
        .with_upload(UploadKind::Download)
}

#[test]
fn test_large_png_is_resized_and_encoded_once() {
    let mut server = mockito::Server::new();
    let png = png_bytes(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
        5000,
        3000,
        Rgb([200, 120, 40]),
    )));

    let mock = server
        .mock("GET", "/img-original/92065303_p0.png")
        .match_header("referer", http::REFERER)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png)
        .create();

    let url = format!("{}/img-original/92065303_p0.png", server.url());
    let relay = downloading(DeliveryMode::Direct);
    let outcome = relay.fetch_and_transcode(&url).expect("Should relay PNG");

    mock.assert();
    assert_eq!(outcome.quality(), Some(100));
    assert!(outcome.bytes().len() <= limits::MAX_IMG_SIZE);

    let decoded = image::load_from_memory_with_format(outcome.bytes(), ImageFormat::Jpeg)
        .expect("Output should be a JPEG");
    assert_eq!((decoded.width(), decoded.height()), (2560, 1536));
}

#[test]
fn test_small_jpeg_passes_through_unchanged() {
    let mut server = mockito::Server::new();
    let body: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    server
        .mock("GET", "/img-master/1_p0_master1200.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(body.clone())
        .create();

    let source = ImageReference::new(
        format!("{}/img-master/1_p0_master1200.jpg", server.url()),
        format!("{}/img-original/1_p0.jpg", server.url()),
    );
    let file = downloading(DeliveryMode::Direct)
        .relay(&source)
        .expect("Should relay JPEG");

    assert_eq!(file.bytes(), Some(body.as_slice()));
}

#[test]
fn test_proxied_mode_fetches_from_proxy_host() {
    let mut server = mockito::Server::new();
    let body = vec![0xFF, 0xD8, 0xFF, 0xD9];

    let mock = server
        .mock("GET", "/img-original/img/2021/08/20/92065303_p0.jpg")
        .match_header("referer", http::REFERER)
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(body.clone())
        .create();

    // Upstream host and scheme would be unreachable; only the host is swapped
    let source = ImageReference::new(
        "http://i.pximg.net/img-master/img/2021/08/20/92065303_p0_master1200.jpg",
        "http://i.pximg.net/img-original/img/2021/08/20/92065303_p0.jpg",
    );
    let relay = downloading(DeliveryMode::proxied(server.host_with_port()))
        .with_variant(ImageVariant::Original);

    assert_eq!(
        relay.resolve_url(&source).expect("Should resolve"),
        format!(
            "http://{}/img-original/img/2021/08/20/92065303_p0.jpg",
            server.host_with_port()
        )
    );

    let file = relay.relay(&source).expect("Should relay through proxy");
    mock.assert();
    assert_eq!(file.bytes(), Some(body.as_slice()));
}

#[test]
fn test_link_upload_never_contacts_host() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", Matcher::Any).expect(0).create();

    let source = ImageReference::new(
        format!("{}/small.jpg", server.url()),
        format!("{}/original.png", server.url()),
    );
    let relay = ImageRelay::new(DeliveryMode::Direct).expect("Should create relay");
    let file = relay.relay(&source).expect("Should resolve link");

    mock.assert();
    assert_eq!(file.url(), Some(source.small.as_str()));
}

#[test]
fn test_error_status_is_network_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/missing.png")
        .with_status(403)
        .create();

    let err = downloading(DeliveryMode::Direct)
        .fetch_and_transcode(&format!("{}/missing.png", server.url()))
        .unwrap_err();

    assert!(matches!(err, RelayError::Network { .. }));
    assert!(err.to_string().contains("403"));
}

#[test]
fn test_corrupt_png_is_decode_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/broken.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body("\u{89}PNG but not really")
        .create();

    let err = downloading(DeliveryMode::Direct)
        .fetch_and_transcode(&format!("{}/broken.png", server.url()))
        .unwrap_err();

    assert!(matches!(err, RelayError::Decode(_)));
}

#[test]
fn test_incompressible_image_exhausts_budget() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/noise.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes(&noise(256, 256)))
        .create();

    let relay = downloading(DeliveryMode::Direct).with_transcoder(Transcoder::with_encoder(
        BudgetEncoder::with_encoder(JpegRasterEncoder, 1024),
    ));

    let err = relay
        .fetch_and_transcode(&format!("{}/noise.png", server.url()))
        .unwrap_err();

    match err {
        RelayError::EncodeExhausted { budget, floor } => {
            assert_eq!(budget, 1024);
            assert_eq!(floor, 10);
        }
        other => panic!("Expected exhausted budget, got {:?}", other),
    }
}

#[test]
fn test_tight_budget_lowers_quality() {
    let mut server = mockito::Server::new();
    let image = noise(192, 192);

    let full = {
        let budget = BudgetEncoder::with_encoder(JpegRasterEncoder, limits::MAX_IMG_SIZE);
        budget.encode(&image).expect("Should encode unconstrained")
    };
    assert_eq!(full.quality, 100);

    server
        .mock("GET", "/noise.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes(&image))
        .create();

    let relay = downloading(DeliveryMode::Direct).with_transcoder(Transcoder::with_encoder(
        BudgetEncoder::with_encoder(JpegRasterEncoder, full.bytes.len() - 1),
    ));
    let outcome = relay
        .fetch_and_transcode(&format!("{}/noise.png", server.url()))
        .expect("Should fit at a lower quality");

    let quality = outcome.quality().expect("Should be re-encoded");
    assert!(quality < 100);
    assert_eq!(quality % 10, 0);
    assert!(outcome.bytes().len() < full.bytes.len());
}
