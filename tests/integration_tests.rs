//! Integration tests for the grid engine
//!
//! These tests exercise the public library API end to end: painting,
//! quantizing a reference, stats, and both export formats.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use pixel_placer::export::{decode_text, encode_png, TextFormat};
use pixel_placer::palettes::{get_builtin, list_builtins, wplace};
use pixel_placer::reference::ReferenceImage;
use pixel_placer::{GridEngine, GridError, Session, Stats};

fn engine(size: usize) -> GridEngine {
    GridEngine::new(Arc::new(wplace()), size).expect("valid grid size")
}

#[test]
fn test_set_then_get_every_cell() {
    let mut engine = engine(6);
    let codes: Vec<String> = engine.palette().entries().iter().map(|e| e.code.clone()).collect();
    let opaque: Vec<&String> = codes.iter().filter(|c| c.as_str() != "E").collect();

    for y in 0..6 {
        for x in 0..6 {
            let code = opaque[(x + y * 6) % opaque.len()];
            engine.set_cell(x, y, Some(code.as_str())).unwrap();
            assert_eq!(engine.get_cell(x, y), Ok(Some(code.as_str())));
        }
    }
}

#[test]
fn test_last_write_wins() {
    let mut engine = engine(3);
    engine.set_cell(1, 1, Some("R")).unwrap();
    engine.set_cell(1, 1, Some("B")).unwrap();
    assert_eq!(engine.get_cell(1, 1), Ok(Some("B")));
    engine.set_cell(1, 1, Some("E")).unwrap();
    assert_eq!(engine.get_cell(1, 1), Ok(None));
}

#[test]
fn test_out_of_range_set_leaves_grid_unchanged() {
    let mut engine = engine(4);
    engine.set_cell(0, 0, Some("K")).unwrap();
    let before = engine.to_text(TextFormat::Concatenated);

    for (x, y) in [(4, 0), (0, 4), (100, 100)] {
        assert_eq!(engine.set_cell(x, y, Some("R")), Err(GridError::OutOfBounds { x, y, size: 4 }));
    }
    assert_eq!(engine.set_cell(1, 1, Some("NOPE")), Err(GridError::UnknownColorCode("NOPE".into())));
    assert_eq!(
        engine.set_cell(99, 99, Some("NOPE")),
        Err(GridError::OutOfBounds { x: 99, y: 99, size: 4 })
    );
    assert_eq!(engine.to_text(TextFormat::Concatenated), before);
}

#[test]
fn test_resize_yields_empty_grid() {
    let mut engine = engine(4);
    engine.set_cell(2, 2, Some("R")).unwrap();
    for n in [1, 2, 7, 40, 64] {
        engine.resize(n).unwrap();
        assert_eq!(engine.size(), n);
        assert_eq!(engine.compute_stats(), Stats { filled_count: 0, empty_count: n * n, fill_percent: 0 });
    }
    assert!(matches!(engine.resize(0), Err(GridError::InvalidSize { .. })));
    assert_eq!(engine.size(), 64);
}

#[test]
fn test_solid_black_image_quantizes_to_black() {
    let mut engine = engine(10);
    engine.quantize_from(&RgbaImage::from_pixel(37, 23, Rgba([0, 0, 0, 255])), 50);
    for y in 0..10 {
        for x in 0..10 {
            assert_eq!(engine.get_cell(x, y), Ok(Some("K")));
        }
    }
}

#[test]
fn test_transparent_image_quantizes_to_empty() {
    let mut engine = engine(10);
    engine.set_cell(3, 3, Some("R")).unwrap();
    engine.quantize_from(&RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 0])), 50);
    assert_eq!(engine.compute_stats().filled_count, 0);
}

#[test]
fn test_stats_values() {
    let mut engine = engine(10);
    assert_eq!(engine.compute_stats(), Stats { filled_count: 0, empty_count: 100, fill_percent: 0 });

    for i in 0..25 {
        engine.set_cell(i % 10, i / 10, Some("G")).unwrap();
    }
    assert_eq!(engine.compute_stats(), Stats { filled_count: 25, empty_count: 75, fill_percent: 25 });
}

#[test]
fn test_text_export_known_layout() {
    let mut engine = engine(3);
    engine.set_cell(0, 0, Some("K")).unwrap();
    engine.set_cell(2, 0, Some("R")).unwrap();
    engine.set_cell(2, 1, Some("B")).unwrap();
    engine.set_cell(0, 2, Some("W")).unwrap();
    assert_eq!(engine.to_text(TextFormat::Concatenated), "K R\n  B\nW  ");
}

#[test]
fn test_raster_of_single_red_cell() {
    let mut engine = engine(5);
    engine.set_cell(3, 1, Some("R")).unwrap();
    let raster = engine.to_image();
    assert_eq!(raster.dimensions(), (5, 5));
    for (x, y, pixel) in raster.enumerate_pixels() {
        if (x, y) == (3, 1) {
            assert_eq!(*pixel, Rgba([255, 0, 0, 255]));
        } else {
            assert_eq!(pixel[3], 0, "pixel ({}, {}) should be transparent", x, y);
        }
    }
}

#[test]
fn test_raster_requantizes_to_same_grid() {
    for name in list_builtins() {
        let palette = Arc::new(get_builtin(name).expect("builtin exists"));
        let size = 7;
        let mut source = GridEngine::new(Arc::clone(&palette), size).unwrap();
        let codes: Vec<String> = palette.opaque().map(|(_, e, _)| e.code.clone()).collect();
        for i in 0..size * size {
            // leave every fourth cell empty
            if i % 4 != 3 {
                source.set_cell(i % size, i / size, Some(codes[i % codes.len()].as_str())).unwrap();
            }
        }

        let mut copy = GridEngine::new(Arc::clone(&palette), size).unwrap();
        copy.quantize_from(&source.to_image(), 50);
        assert_eq!(copy.grid(), source.grid(), "palette {} did not round trip", name);
    }
}

#[test]
fn test_png_bytes_decode_to_raster() {
    let mut engine = engine(4);
    engine.set_cell(0, 3, Some("Y")).unwrap();
    let png = engine.to_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded, engine.to_image());
    assert_eq!(encode_png(&engine.to_image()).unwrap(), png);
}

#[test]
fn test_delimited_text_keeps_multi_char_codes() {
    let mut engine = engine(2);
    engine.set_cell(0, 0, Some("PI3")).unwrap();
    engine.set_cell(1, 1, Some("G1")).unwrap();
    let text = engine.to_text(TextFormat::Delimited(','));
    assert_eq!(text, "PI3,\n,G1");

    let decoded = decode_text(&text, engine.palette(), TextFormat::Delimited(',')).unwrap();
    assert_eq!(&decoded, engine.grid());
}

#[test]
fn test_session_conversion_from_encoded_image() {
    let mut image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
    for x in 0..4 {
        for y in 0..8 {
            image.put_pixel(x, y, Rgba([250, 5, 5, 255]));
        }
    }
    let png = encode_png(&image).unwrap();

    let mut session = Session::new(Arc::new(wplace()), 2).unwrap();
    session.load_reference(ReferenceImage::decode(&png).unwrap());
    session.request_conversion().unwrap();
    let stats = session.run_pending_conversion().unwrap().expect("conversion ran");

    assert_eq!(stats.fill_percent, 100);
    assert_eq!(session.export_text(TextFormat::Concatenated), "RW\nRW");
    let counts = session.color_counts();
    assert_eq!(counts.get("R"), 2);
    assert_eq!(counts.get("W"), 2);
    assert_eq!(counts.empty, 0);
}

#[test]
fn test_undecodable_reference_is_an_error() {
    assert!(matches!(ReferenceImage::decode(b"not an image"), Err(GridError::Decode(_))));
}
