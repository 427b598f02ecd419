use std::fs;

use serde_json::json;
use takeout_prep::{
    aggregate_metadata, process_export, AggregateConfig, AppError, ExportConfig,
};

#[test]
fn processes_an_export_tree_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path();
    let album = export.join("Takeout/Photos from 2021");
    fs::create_dir_all(&album).unwrap();

    image::RgbImage::from_pixel(300, 200, image::Rgb([120, 80, 200]))
        .save(album.join("IMG_1.JPG"))
        .unwrap();

    let sidecar = json!({
        "url": "https://photos.example.com/photo/AF1QipAbc123",
        "title": "IMG_1.JPG",
        "description": "beach day",
        "creationTime": { "formatted": "Jan 2, 2021, 3:04:05 PM UTC" },
        "photoTakenTime": { "formatted": "Jan 1, 2021, 11:22:33 AM UTC" },
        "geoData": { "latitude": 45.5, "longitude": -122.6, "altitude": 30.0 }
    });
    let sidecar_bytes = serde_json::to_vec_pretty(&sidecar).unwrap();
    fs::write(album.join("IMG_1.JPG.json"), &sidecar_bytes).unwrap();

    // An album sidecar and an unrelated file; neither may abort the run.
    fs::write(
        album.join("metadata.json"),
        serde_json::to_vec(&json!({ "albumData": { "title": "Holiday" } })).unwrap(),
    )
    .unwrap();
    fs::write(album.join("notes.txt"), b"ignore me").unwrap();

    let stats = process_export(export, &ExportConfig::default()).unwrap();
    assert_eq!(stats.total_files, 4);
    assert_eq!(stats.images, 1);
    assert_eq!(stats.metadata_files, 2);
    assert_eq!(stats.failed, 0);

    // 300x200 at target width 256 scales to floor(200 * 256 / 300) = 170.
    let out_image = export.join("preprocessed/images/IMG_1.jpeg");
    assert_eq!(image::image_dimensions(&out_image).unwrap(), (256, 170));

    let copied = export.join("preprocessed/metadata/IMG_1.JPG.json");
    assert_eq!(fs::read(&copied).unwrap(), sidecar_bytes);

    let records = aggregate_metadata(
        &export.join("preprocessed/metadata"),
        &AggregateConfig::default(),
    )
    .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "AF1QipAbc123");
    assert_eq!(records[0].file_type, "JPG");
    assert_eq!(records[0].people, None);

    // One-shot semantics: a second run over the same root refuses to start.
    match process_export(export, &ExportConfig::default()) {
        Err(AppError::OutputDirExists(path)) => {
            assert_eq!(path, export.join("preprocessed"));
        }
        other => panic!("expected OutputDirExists, got {:?}", other),
    }
}

#[test]
fn undecodable_images_are_counted_and_do_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path();
    fs::write(export.join("broken.jpg"), b"not an image at all").unwrap();

    let stats = process_export(export, &ExportConfig::default()).unwrap();
    assert_eq!(stats.total_files, 1);
    assert_eq!(stats.images, 0);
    assert_eq!(stats.failed, 1);
}

#[test]
fn same_named_images_collapse_to_one_output() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path();
    fs::create_dir(export.join("a")).unwrap();
    fs::create_dir(export.join("b")).unwrap();
    image::RgbImage::from_pixel(300, 200, image::Rgb([200, 0, 0]))
        .save(export.join("a/dup.jpg"))
        .unwrap();
    image::RgbImage::from_pixel(120, 90, image::Rgb([0, 200, 0]))
        .save(export.join("b/dup.jpg"))
        .unwrap();

    let stats = process_export(export, &ExportConfig::default()).unwrap();
    // Both sources are processed; the flat layout collapses them into one
    // entry, later wins.
    assert_eq!(stats.images, 2);
    assert_eq!(stats.failed, 0);

    let entries: Vec<_> = fs::read_dir(export.join("preprocessed/images"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("dup.jpeg")]);
}

#[test]
fn custom_target_width_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path();
    image::RgbImage::from_pixel(400, 300, image::Rgb([10, 20, 30]))
        .save(export.join("wide.png"))
        .unwrap();

    let config = ExportConfig { target_width: 100 };
    let stats = process_export(export, &config).unwrap();
    assert_eq!(stats.images, 1);

    let out_image = export.join("preprocessed/images/wide.jpeg");
    assert_eq!(image::image_dimensions(&out_image).unwrap(), (100, 75));
}
