//! End-to-end build of a small album tree with the real image backend.
//!
//! Synthetic JPEGs are written into a temp directory, the whole site is
//! generated, and the output files are checked on disk. A final clean must
//! return the tree to its sources.

use foldergal::album;
use foldergal::clean;
use foldergal::imaging::RustBackend;
use image::{ImageEncoder, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90])
    });
    let file = fs::File::create(path).unwrap();
    image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_jpeg(&root.join("sunrise.jpg"), 640, 480);
    write_jpeg(&root.join("Holidays/beach.jpg"), 400, 600);
    write_jpeg(&root.join("Holidays/cover.jpg"), 300, 300);
    write_jpeg(&root.join("Holidays/Crete/harbour.jpg"), 500, 300);
    fs::write(root.join("description.txt"), "sunrise.jpg: First light\n").unwrap();
    fs::write(
        root.join("config.toml"),
        "title = \"Travels\"\nthumbnail_size = [120, 120]\neffect_background = \"#ffffff\"\n",
    )
    .unwrap();
    tmp
}

#[test]
fn generate_then_clean() {
    let tmp = site();
    let root = tmp.path();
    let backend = RustBackend::new();

    let report = album::generate(root, &backend);

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.albums, 3);
    assert_eq!(report.pages, 3);
    assert_eq!(report.feeds, 3);

    for dir in [root.to_path_buf(), root.join("Holidays"), root.join("Holidays/Crete")] {
        for file in ["index.html", "highlight.jpg", "photos.rss"] {
            assert!(dir.join(file).is_file(), "missing {}", dir.join(file).display());
        }
    }

    let thumb = image::open(root.join("thumbnails/th_sunrise.jpg")).unwrap();
    assert!(thumb.width() <= 120 && thumb.height() <= 120);
    // The album effect renders cover.jpg straight into the highlight.
    assert_eq!(sorted_names(&root.join("Holidays/thumbnails")), vec!["th_beach.jpg"]);

    let index = fs::read_to_string(root.join("index.html")).unwrap();
    assert!(index.contains("<title>Travels</title>"));
    assert!(index.contains("First light"));
    assert!(index.contains(r#"src="Holidays/highlight.jpg""#));
    let crete = fs::read_to_string(root.join("Holidays/Crete/index.html")).unwrap();
    assert!(crete.contains("<title>Travels :: Crete</title>"));

    // Second run reuses every thumbnail.
    let again = album::generate(root, &backend);
    assert!(again.is_success());
    assert_eq!(again.cache.generated, 0);

    let cleaned = clean::clean(root).unwrap();
    assert_eq!(cleaned.pages, 3);
    assert_eq!(cleaned.highlights, 3);
    assert_eq!(cleaned.thumbnail_dirs, 3);
    assert_eq!(
        sorted_names(root),
        vec!["Holidays", "config.toml", "description.txt", "photos.rss", "sunrise.jpg"]
    );
    assert_eq!(
        sorted_names(&root.join("Holidays")),
        vec!["Crete", "beach.jpg", "cover.jpg", "photos.rss"]
    );
}

#[test]
fn text_pass_then_rebuild() {
    let tmp = site();
    let root = tmp.path();

    let texts = album::generate_texts(root);
    assert!(texts.is_success());
    let description = fs::read_to_string(root.join("Holidays/description.txt")).unwrap();
    assert!(description.contains("Crete\t\n"));
    assert!(description.contains("beach.jpg\t\n"));

    let report = album::rebuild(root, &RustBackend::new()).unwrap();
    assert!(report.is_success());
    let root_description = fs::read_to_string(root.join("description.txt")).unwrap();
    assert!(root_description.starts_with("sunrise.jpg: First light\n"));
}
