use std::sync::{Arc, Mutex};
use std::thread;

use adf2tiff::errors::{CplErrType, GdalError};
use adf2tiff::{config, convert, Compression, Dataset, DatasetOptions, GdalOpenFlags};
use tempfile::TempDir;

type Messages = Arc<Mutex<Vec<(CplErrType, String)>>>;

#[test]
fn test_error_handler() {
    // The handler is process wide, so the scenarios run one after another.
    open_failure_is_forwarded();
    rejected_grid_is_forwarded();
    handlers_replaced_concurrently();
}

fn record_messages() -> Messages {
    let messages: Messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    config::set_error_handler(move |class, _number, msg| {
        sink.lock().unwrap().push((class, msg.to_string()));
    });
    messages
}

fn open_failure_is_forwarded() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing.tif");

    let messages = record_messages();
    let options = DatasetOptions {
        open_flags: GdalOpenFlags::raster_read_only(),
        ..DatasetOptions::default()
    };
    let err = Dataset::open_ex(&missing, options).unwrap_err();
    config::remove_error_handler();

    let GdalError::NullPointer { method_name, msg } = &err else {
        panic!("expected a NULL pointer error, got {err:?}");
    };
    assert_eq!(*method_name, "GDALOpenEx");

    let messages = messages.lock().unwrap();
    assert!(messages
        .iter()
        .any(|(class, text)| *class == CplErrType::Failure && text == msg));
}

fn rejected_grid_is_forwarded() {
    let tmp = TempDir::new().unwrap();
    let grid = tmp.path().join("elevation");
    std::fs::create_dir(&grid).unwrap();
    std::fs::write(grid.join("hdr.adf"), b"").unwrap();

    let messages = record_messages();
    let result = convert(&grid, &tmp.path().join("out.tif"), Compression::Lzw);
    config::remove_error_handler();

    assert!(result.is_err());
    assert!(!messages.lock().unwrap().is_empty());
}

fn handlers_replaced_concurrently() {
    let setters: Vec<_> = (0..2)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..100 {
                    config::set_error_handler(|_class, _number, _msg| {});
                }
            })
        })
        .collect();

    let opener = thread::spawn(|| {
        let tmp = TempDir::new().unwrap();
        for _ in 0..100 {
            assert!(Dataset::open(tmp.path().join("missing.tif")).is_err());
        }
    });

    for handle in setters {
        handle.join().unwrap();
    }
    opener.join().unwrap();
    config::remove_error_handler();
}
