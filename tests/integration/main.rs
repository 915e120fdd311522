//! Integration tests for docpreview

use image::{ImageBuffer, Rgb};
use std::path::{Path, PathBuf};

/// Write a 520x206 PNG with a horizontal gradient
fn sample_png(dir: &Path) -> PathBuf {
    let path = dir.join("landscape.png");
    let img = ImageBuffer::from_fn(520, 206, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128_u8])
    });
    img.save(&path).unwrap();
    path
}

fn sample_text(dir: &Path) -> PathBuf {
    let path = dir.join("notes.txt");
    std::fs::write(&path, "alpha\nbeta <b>\ngamma\n").unwrap();
    path
}

mod cli_tests {
    use super::*;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and cache
    fn docpreview(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("docpreview");
        cmd.env_remove("DOCPREVIEW_CONFIG")
            .arg("--config")
            .arg(home.path().join("config.toml"))
            .arg("--cache-dir")
            .arg(home.path().join("cache"));
        cmd
    }

    fn stdout_path(output: &std::process::Output) -> PathBuf {
        PathBuf::from(String::from_utf8_lossy(&output.stdout).trim())
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        docpreview(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cached preview generation"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        docpreview(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("docpreview"));
    }

    #[test]
    fn jpeg_prints_cached_path() {
        let home = TempDir::new().unwrap();
        let src = sample_png(home.path());

        let output = docpreview(&home)
            .args(["jpeg", "--width", "512", "--height", "256"])
            .arg(&src)
            .output()
            .unwrap();
        assert!(output.status.success());

        let path = stdout_path(&output);
        assert!(path.starts_with(home.path().join("cache")));
        assert!(path.to_string_lossy().ends_with(".jpeg"));
        assert_eq!(image::image_dimensions(&path).unwrap(), (512, 256));
    }

    #[test]
    fn jpeg_original_size() {
        let home = TempDir::new().unwrap();
        let src = sample_png(home.path());

        let output = docpreview(&home)
            .args(["jpeg", "--original-size"])
            .arg(&src)
            .output()
            .unwrap();
        assert!(output.status.success());

        assert_eq!(image::image_dimensions(stdout_path(&output)).unwrap(), (520, 206));
    }

    #[test]
    fn json_preview_of_image() {
        let home = TempDir::new().unwrap();
        let src = sample_png(home.path());

        let output = docpreview(&home).arg("json").arg(&src).output().unwrap();
        assert!(output.status.success());

        let content = std::fs::read_to_string(stdout_path(&output)).unwrap();
        let data: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(data["width"], 520);
        assert_eq!(data["height"], 206);
        assert_eq!(data["mimetype"], "image/png");
    }

    #[test]
    fn html_preview_of_text() {
        let home = TempDir::new().unwrap();
        let src = sample_text(home.path());

        let output = docpreview(&home).arg("html").arg(&src).output().unwrap();
        assert!(output.status.success());

        let html = std::fs::read_to_string(stdout_path(&output)).unwrap();
        assert!(html.contains("beta &lt;b&gt;"));
    }

    #[test]
    fn pdf_of_image_is_unavailable() {
        let home = TempDir::new().unwrap();
        let src = sample_png(home.path());

        docpreview(&home)
            .arg("pdf")
            .arg(&src)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unavailable preview type"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn unsupported_mimetype_fails() {
        let home = TempDir::new().unwrap();
        let src = home.path().join("bundle.zip");
        std::fs::write(&src, [0x50, 0x4b, 0x03, 0x04, 0x00, 0x00]).unwrap();

        docpreview(&home)
            .arg("jpeg")
            .arg(&src)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported mimetype"));
    }

    #[test]
    fn missing_file_fails() {
        let home = TempDir::new().unwrap();

        docpreview(&home)
            .arg("text")
            .arg(home.path().join("absent.txt"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn size_and_pages_of_image() {
        let home = TempDir::new().unwrap();
        let src = sample_png(home.path());

        docpreview(&home)
            .arg("size")
            .arg(&src)
            .assert()
            .success()
            .stdout("520x206\n");

        docpreview(&home)
            .arg("pages")
            .arg(&src)
            .assert()
            .success()
            .stdout("1\n");
    }

    #[test]
    fn mimetype_reports_detection() {
        let home = TempDir::new().unwrap();
        let src = sample_text(home.path());

        docpreview(&home)
            .arg("mimetype")
            .arg(&src)
            .assert()
            .success()
            .stdout("text/plain\n");
    }

    #[test]
    fn cache_info_counts_artifacts() {
        let home = TempDir::new().unwrap();
        let src = sample_text(home.path());

        docpreview(&home).arg("text").arg(&src).assert().success();
        docpreview(&home).arg("html").arg(&src).assert().success();

        let output = docpreview(&home)
            .args(["cache", "info", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let data: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(data["artifacts"], 2);
        assert_eq!(data["by_extension"]["txt"], 1);
        assert_eq!(data["by_extension"]["html"], 1);
    }

    #[test]
    fn cache_info_table_when_empty() {
        let home = TempDir::new().unwrap();

        docpreview(&home)
            .args(["cache", "info"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached previews"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        docpreview(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_then_show() {
        let home = TempDir::new().unwrap();

        docpreview(&home)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));
        assert!(home.path().join("config.toml").exists());

        docpreview(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[tools]"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "[jpeg]\ndefault_height = \"tall\"\n")
            .unwrap();

        docpreview(&home)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn zero_default_height_is_rejected() {
        let home = TempDir::new().unwrap();
        let src = sample_png(home.path());
        std::fs::write(home.path().join("config.toml"), "[jpeg]\ndefault_height = 0\n").unwrap();

        docpreview(&home)
            .arg("jpeg")
            .arg(&src)
            .assert()
            .failure()
            .stderr(predicate::str::contains("jpeg.default_height"));
        assert!(!home.path().join("cache").exists());
    }

    #[test]
    fn yaml_gets_a_text_preview() {
        let home = TempDir::new().unwrap();
        let src = home.path().join("deploy.yaml");
        std::fs::write(&src, "replicas: 3\n").unwrap();

        let output = docpreview(&home).arg("text").arg(&src).output().unwrap();
        assert!(output.status.success());
        assert_eq!(
            std::fs::read_to_string(stdout_path(&output)).unwrap(),
            "replicas: 3\n"
        );
    }
}

mod library_tests {
    use super::*;
    use docpreview::{JpegOptions, PreviewError, PreviewKind, PreviewManager, PreviewOptions};
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> PreviewManager {
        PreviewManager::new(dir.path().join("cache"), true)
    }

    #[test]
    fn jpeg_of_raster_image_has_requested_size() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path());
        let options = JpegOptions {
            width: Some(512),
            height: 256,
            ..JpegOptions::default()
        };

        let path = manager(&dir).get_jpeg_preview(&src, &options).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(image::image_dimensions(&path).unwrap(), (512, 256));
    }

    #[test]
    fn default_jpeg_is_square() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path());

        let path = manager(&dir)
            .get_jpeg_preview(&src, &JpegOptions::default())
            .unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (256, 256));
    }

    #[test]
    fn original_size_ignores_dimensions() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path());
        let options = JpegOptions {
            width: Some(64),
            height: 64,
            with_original_size: true,
            ..JpegOptions::default()
        };

        let path = manager(&dir).get_jpeg_preview(&src, &options).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (520, 206));
    }

    #[test]
    fn cached_artifact_is_reused() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path());
        let manager = manager(&dir);

        let first = manager.get_jpeg_preview(&src, &JpegOptions::default()).unwrap();
        let modified = std::fs::metadata(&first).unwrap().modified().unwrap();
        let second = manager.get_jpeg_preview(&src, &JpegOptions::default()).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::metadata(&second).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn image_has_no_pdf_preview() {
        let dir = TempDir::new().unwrap();
        let src = sample_png(dir.path());

        let err = manager(&dir)
            .get_pdf_preview(&src, &PreviewOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            PreviewError::UnavailablePreviewType {
                kind: PreviewKind::Pdf,
                ..
            }
        ));
    }

    #[test]
    fn text_previews_share_a_key() {
        let dir = TempDir::new().unwrap();
        let src = sample_text(dir.path());
        let manager = manager(&dir);

        let text = manager.get_text_preview(&src, &PreviewOptions::default()).unwrap();
        let json = manager.get_json_preview(&src, &PreviewOptions::default()).unwrap();

        assert_eq!(text.file_stem(), json.file_stem());
        assert_eq!(
            std::fs::read_to_string(&text).unwrap(),
            "alpha\nbeta <b>\ngamma\n"
        );
    }

    #[test]
    fn capability_queries() {
        let dir = TempDir::new().unwrap();
        let png = sample_png(dir.path());
        let docx = dir.path().join("letter.docx");
        std::fs::write(&docx, b"not really a document").unwrap();
        let manager = manager(&dir);

        assert!(manager.has_preview(&png, PreviewKind::Jpeg).unwrap());
        assert!(!manager.has_preview(&png, PreviewKind::Text).unwrap());
        assert!(manager.has_preview(&docx, PreviewKind::Jpeg).unwrap());
        assert!(manager.has_preview(&docx, PreviewKind::Pdf).unwrap());
        assert!(!manager.has_preview(&docx, PreviewKind::Html).unwrap());
    }
}
