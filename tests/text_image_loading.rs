use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use schema_loader::error::LoadErrorKind;
use schema_loader::ingestion::TextLoader;
use schema_loader::types::Value;

fn tmp_path(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("schema-loader-{name}-{nanos}.{ext}"))
}

#[test]
fn text_file_is_one_row() {
    let path = Path::new("tests/fixtures/notes.txt");
    let rows = TextLoader::new().load(path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows[0].path, path);
    assert_eq!(rows.rows[0].value, "hello\nworld\n");

    let table = rows.to_table(true).unwrap();
    assert_eq!(table.column_names(), vec!["value", "path"]);
    assert_eq!(table.rows[0][0], Value::Utf8("hello\nworld\n".to_string()));
}

#[test]
fn text_path_checks() {
    let missing = TextLoader::new().load("tests/fixtures/nope.txt").unwrap_err();
    assert_eq!(missing.kind(), LoadErrorKind::PathNotFound);

    let dir = TextLoader::new().load("tests/fixtures").unwrap_err();
    assert_eq!(dir.kind(), LoadErrorKind::PathInvalid);
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let path = tmp_path("latin1", "txt");
    std::fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();
    let err = TextLoader::new().load(&path).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::Decode);
    let _ = std::fs::remove_file(&path);
}

#[cfg(feature = "image")]
mod images {
    use std::fs;

    use image::{ImageFormat, Rgb, RgbImage};

    use schema_loader::error::LoadErrorKind;
    use schema_loader::ingestion::{DirectoryLoader, ImageLoader};

    use super::tmp_path;

    fn write_png(path: &std::path::Path, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 10, 10]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn png_decodes_with_dimensions_and_format() {
        let path = tmp_path("red", "png");
        write_png(&path, 3, 2);

        let rows = ImageLoader::new().load(&path).unwrap();
        assert_eq!(rows.len(), 1);
        let img = &rows.rows[0].value;
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.format, Some(ImageFormat::Png));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn format_is_guessed_from_content() {
        let path = tmp_path("mislabeled", "jpg");
        write_png(&path, 1, 1);

        let rows = ImageLoader::new().load(&path).unwrap();
        assert_eq!(rows.rows[0].value.format, Some(ImageFormat::Png));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let path = tmp_path("garbage", "png");
        fs::write(&path, b"definitely not an image").unwrap();

        let err = ImageLoader::new().load(&path).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Decode);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn image_directory_selects_default_extensions() {
        let dir = tmp_path("images", "d");
        fs::create_dir_all(&dir).unwrap();
        write_png(&dir.join("a.png"), 1, 1);
        write_png(&dir.join("b.JPEG"), 2, 2);
        fs::write(dir.join("c.txt"), "skip").unwrap();

        let rows = DirectoryLoader::new(ImageLoader::new()).load(&dir).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows[1].value.width(), 2);

        let _ = fs::remove_dir_all(&dir);
    }
}
