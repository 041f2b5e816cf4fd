//! CLI integration tests for the placer binary
//!
//! These tests run the built binary against images written to a temp dir and
//! check exit codes, output files, and printed reports.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn placer(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_placer"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .args(args)
        .output()
        .expect("Failed to execute placer")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Left half black, right half transparent
fn write_half_black(path: &Path) {
    let mut image = RgbaImage::new(16, 16);
    for y in 0..16 {
        for x in 0..8 {
            image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    image.save(path).expect("should write test image");
}

#[test]
fn test_convert_to_text() {
    let temp = TempDir::new().unwrap();
    write_half_black(&temp.path().join("half.png"));

    let output = placer(temp.path(), &["convert", "half.png", "--size", "4", "--text"]);
    assert!(output.status.success(), "convert failed: {}", stderr(&output));

    let text = fs::read_to_string(temp.path().join("half.txt")).unwrap();
    assert_eq!(text, "KK  \nKK  \nKK  \nKK  ");
    assert!(String::from_utf8_lossy(&output.stdout).contains("50% filled"));
}

#[test]
fn test_convert_to_scaled_png_in_out_dir() {
    let temp = TempDir::new().unwrap();
    write_half_black(&temp.path().join("half.png"));

    let output =
        placer(temp.path(), &["convert", "half.png", "--size", "4", "--scale", "3", "-o", "dist"]);
    assert!(output.status.success(), "convert failed: {}", stderr(&output));

    let png = image::open(temp.path().join("dist/half.png")).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (12, 12));
    assert_eq!(*png.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(png.get_pixel(11, 11)[3], 0);
}

#[test]
fn test_convert_glob_many_inputs() {
    let temp = TempDir::new().unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        write_half_black(&temp.path().join(name));
    }

    let output = placer(temp.path(), &["convert", "*.png", "--size", "2", "--text"]);
    assert!(output.status.success(), "convert failed: {}", stderr(&output));
    for name in ["a.txt", "b.txt", "c.txt"] {
        assert_eq!(fs::read_to_string(temp.path().join(name)).unwrap(), "K \nK ");
    }
}

#[test]
fn test_convert_missing_input_fails() {
    let temp = TempDir::new().unwrap();
    let output = placer(temp.path(), &["convert", "missing.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error:"));
}

#[test]
fn test_convert_unknown_palette_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    write_half_black(&temp.path().join("half.png"));
    let output = placer(temp.path(), &["convert", "half.png", "--palette", "nope"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("nope"));
}

#[test]
fn test_config_file_sets_defaults() {
    let temp = TempDir::new().unwrap();
    write_half_black(&temp.path().join("half.png"));
    fs::write(
        temp.path().join("placer.toml"),
        "[editor]\ngrid_size = 2\n\n[export]\nout = \"grids\"\ntext_delimiter = \",\"\n",
    )
    .unwrap();

    let output = placer(temp.path(), &["convert", "half.png", "--text"]);
    assert!(output.status.success(), "convert failed: {}", stderr(&output));
    assert_eq!(fs::read_to_string(temp.path().join("grids/half.txt")).unwrap(), "K,\nK,");
}

#[test]
fn test_render_text_grid() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("grid.txt"), "K R\n  B\nW  ").unwrap();

    let output = placer(temp.path(), &["render", "grid.txt", "-o", "grid.png"]);
    assert!(output.status.success(), "render failed: {}", stderr(&output));
    let png = image::open(temp.path().join("grid.png")).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (3, 3));
    assert_eq!(*png.get_pixel(2, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(png.get_pixel(1, 1)[3], 0);

    let output =
        placer(temp.path(), &["render", "grid.txt", "-o", "preview.png", "--preview", "--cell-px", "10"]);
    assert!(output.status.success(), "preview failed: {}", stderr(&output));
    let preview = image::open(temp.path().join("preview.png")).unwrap().to_rgba8();
    assert_eq!(preview.dimensions(), (30, 30));
    assert_eq!(*preview.get_pixel(25, 5), Rgba([255, 0, 0, 255]));
}

#[test]
fn test_render_oversized_preview_is_invalid_args() {
    let temp = TempDir::new().unwrap();
    let rows = vec![" ".repeat(300); 300];
    fs::write(temp.path().join("big.txt"), rows.join("\n")).unwrap();

    let output = placer(
        temp.path(),
        &["render", "big.txt", "-o", "big.png", "--preview", "--cell-px", "128"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("exceeds 4096px"));
    assert!(!temp.path().join("big.png").exists());
}

#[test]
fn test_stats_accepts_trailing_newline() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("grid.txt"), "K R\n  B\nW  \n").unwrap();

    let output = placer(temp.path(), &["stats", "grid.txt"]);
    assert!(output.status.success(), "stats failed: {}", stderr(&output));
}

#[test]
fn test_render_bad_grid_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.txt"), "KQ\nKK").unwrap();
    let output = placer(temp.path(), &["render", "bad.txt", "-o", "bad.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line 1"));
}

#[test]
fn test_stats_json() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("grid.txt"), "KK\nR ").unwrap();

    let output = placer(temp.path(), &["stats", "grid.txt", "--json"]);
    assert!(output.status.success(), "stats failed: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["filled_count"], 3);
    assert_eq!(report["empty_count"], 1);
    assert_eq!(report["fill_percent"], 75);
    assert_eq!(report["colors"]["empty"], 1);
    let black = report["colors"]["colors"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["code"] == "K")
        .unwrap();
    assert_eq!(black["count"], 2);
}

#[test]
fn test_palettes_list_and_show() {
    let temp = TempDir::new().unwrap();
    let output = placer(temp.path(), &["palettes", "list", "--json"]);
    assert!(output.status.success());
    let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(names, vec!["wplace", "pico8", "grayscale", "1bit"]);

    let output = placer(temp.path(), &["palettes", "show", "1bit"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#000000"));
    assert!(stdout.contains("transparent"));

    let output = placer(temp.path(), &["palettes", "show", "nope"]);
    assert_eq!(output.status.code(), Some(1));
}
