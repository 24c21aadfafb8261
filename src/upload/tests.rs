//! Tests for uploaded files and the upload tree normalizer.

#[cfg(test)]
mod tests {
    use std::fs;

    use indexmap::IndexMap;
    use serde_json::{json, Value};

    use crate::stream::Stream;
    use crate::upload::{normalize_files, DenialReason, Error, ErrorCode, FileInput, FileTree, UploadedFile};

    fn normalize(files: Value) -> Result<IndexMap<String, FileTree>, Error> {
        let files: IndexMap<String, FileInput> = serde_json::from_value(files).unwrap();
        normalize_files(files)
    }

    fn filename(tree: &FileTree, path: &[&str]) -> Option<String> {
        tree.find(path)?.as_file()?.client_filename().map(str::to_string)
    }

    #[test]
    fn test_error_code_range() {
        for code in 0..=8 {
            assert_eq!(ErrorCode::try_from(code).unwrap().as_u8() as i64, code);
        }
        assert!(matches!(ErrorCode::try_from(-1), Err(Error::InvalidErrorCode(-1))));
        assert!(matches!(ErrorCode::try_from(9), Err(Error::InvalidErrorCode(9))));
        assert!(ErrorCode::OK.is_ok());
        assert!(!ErrorCode::NO_FILE.is_ok());
    }

    #[test]
    fn test_single_file_descriptor() {
        let files = normalize(json!({
            "avatar": {"tmp_name": "/tmp/upload1", "name": "me.png", "type": "image/png", "error": 0, "size": 123}
        }))
        .unwrap();

        let file = files["avatar"].as_file().unwrap();
        assert_eq!(file.client_filename(), Some("me.png"));
        assert_eq!(file.client_media_type(), Some("image/png"));
        assert_eq!(file.size(), Some(123));
        assert_eq!(file.error(), ErrorCode::OK);
    }

    #[test]
    fn test_parallel_arrays_become_indexed_leaves() {
        let expected = |files: &IndexMap<String, FileTree>| {
            let tree = &files["files"];
            assert_eq!(tree.file_count(), 2);
            assert_eq!(filename(tree, &["0"]).as_deref(), Some("a.txt"));
            assert_eq!(filename(tree, &["1"]).as_deref(), Some("b.txt"));
            assert_eq!(tree.find(&["1"]).unwrap().as_file().unwrap().size(), Some(2));
        };

        expected(
            &normalize(json!({"files": {
                "name": ["a.txt", "b.txt"],
                "type": ["text/plain", "text/plain"],
                "tmp_name": ["p1", "p2"],
                "error": [0, 0],
                "size": [1, 2]
            }}))
            .unwrap(),
        );
        expected(
            &normalize(json!({"files": {
                "size": [1, 2],
                "error": [0, 0],
                "tmp_name": ["p1", "p2"],
                "type": ["text/plain", "text/plain"],
                "name": ["a.txt", "b.txt"]
            }}))
            .unwrap(),
        );
    }

    #[test]
    fn test_nested_multi_file_fields() {
        let files = normalize(json!({
            "docs": {
                "tmp_name": {"cv": ["t1", "t2"], "photo": "t3"},
                "name": {"cv": ["one.pdf", "two.pdf"], "photo": "me.jpg"},
                "type": {"cv": ["application/pdf", "application/pdf"], "photo": "image/jpeg"},
                "error": {"cv": [0, 4], "photo": 0},
                "size": {"cv": [10, null], "photo": 30}
            },
            "single": {"tmp_name": "t4", "name": "x", "type": "text/plain", "error": 0, "size": 1}
        }))
        .unwrap();

        let docs = &files["docs"];
        assert_eq!(docs.file_count(), 3);
        assert_eq!(filename(docs, &["cv", "1"]).as_deref(), Some("two.pdf"));
        assert_eq!(filename(docs, &["photo"]).as_deref(), Some("me.jpg"));

        let failed = docs.find(&["cv", "1"]).unwrap().as_file().unwrap();
        assert_eq!(failed.error(), ErrorCode::NO_FILE);
        assert!(matches!(
            failed.stream(),
            Err(Error::FileAccessDenied(DenialReason::UploadError(ErrorCode::NO_FILE)))
        ));
        assert!(files["single"].as_file().is_some());
    }

    #[test]
    fn test_fields_grouped_without_descriptor_are_nodes() {
        let files = normalize(json!({
            "form": {
                "a": {"tmp_name": "t1", "error": 0},
                "b": [{"tmp_name": "t2", "error": 0, "full_path": "dir/b"}]
            }
        }))
        .unwrap();
        assert_eq!(files["form"].file_count(), 2);
        let b = files["form"].find(&["b", "0"]).unwrap().as_file().unwrap();
        assert_eq!(b.client_filename(), None);
        assert_eq!(b.client_media_type(), None);
    }

    #[test]
    fn test_constructed_files_pass_through() {
        let file = std::sync::Arc::new(UploadedFile::from_path("/tmp/x", Some(1), ErrorCode::OK, None, None));
        let mut group = IndexMap::new();
        group.insert("inner".to_string(), FileInput::from(file.clone()));
        let mut input = IndexMap::new();
        input.insert("direct".to_string(), FileInput::from(file.clone()));
        input.insert("grouped".to_string(), FileInput::Group(group));

        let files = normalize_files(input).unwrap();
        assert!(std::sync::Arc::ptr_eq(files["direct"].as_file().unwrap(), &file));
        assert_eq!(files["direct"], files["grouped"].get("inner").cloned().unwrap());
    }

    #[test]
    fn test_invalid_structures() {
        for files in [
            json!({"field": "not a file"}),
            json!({"field": [1, 2]}),
            json!({"field": {"tmp_name": ["t1", "t2"], "error": 0}}),
            json!({"field": {"tmp_name": "t1"}}),
            json!({"field": {"tmp_name": "t1", "error": "zero"}}),
            json!({"field": {"tmp_name": 5, "error": 0}}),
        ] {
            assert!(matches!(normalize(files.clone()), Err(Error::InvalidUploadStructure(_))), "{files}");
        }
        assert!(matches!(
            normalize(json!({"field": {"tmp_name": "t1", "error": 12}})),
            Err(Error::InvalidErrorCode(12))
        ));
    }

    #[test]
    fn test_move_temporary_file() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload.tmp");
        fs::write(&source, "uploaded").unwrap();
        let target = dir.path().join("saved.txt");

        let file = UploadedFile::from_path(&source, None, ErrorCode::OK, Some("saved.txt".into()), None);
        assert_eq!(file.size(), Some(8));
        assert_eq!(file.stream().unwrap().to_string(), "uploaded");

        file.move_to(&target).unwrap();
        assert!(file.is_moved());
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "uploaded");
        assert!(matches!(
            file.move_to(dir.path().join("again.txt")),
            Err(Error::FileAccessDenied(DenialReason::AlreadyMoved))
        ));
        assert!(matches!(file.stream(), Err(Error::FileAccessDenied(DenialReason::AlreadyMoved))));
    }

    #[test]
    fn test_move_stream_removes_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("body.tmp");
        fs::write(&source, "x".repeat(10_000)).unwrap();

        let stream = Stream::open(&source, "r").unwrap();
        let file = UploadedFile::new(stream.clone(), None, ErrorCode::OK, None, None).unwrap();
        assert_eq!(file.size(), Some(10_000));

        let target = dir.path().join("copy.bin");
        file.move_to(&target).unwrap();
        assert_eq!(fs::read(&target).unwrap().len(), 10_000);
        assert!(!source.exists());
        assert!(stream.is_detached());
    }

    #[test]
    fn test_move_stream_with_missing_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload.tmp");
        fs::write(&source, "uploaded").unwrap();
        let stream = Stream::open(&source, "r").unwrap();
        fs::remove_file(&source).unwrap();
        let target = dir.path().join("saved.txt");

        let file = UploadedFile::new(stream, None, ErrorCode::OK, None, None).unwrap();
        file.move_to(&target).unwrap();
        assert!(file.is_moved());
        assert_eq!(fs::read_to_string(&target).unwrap(), "uploaded");
        assert!(matches!(
            file.move_to(dir.path().join("again.txt")),
            Err(Error::FileAccessDenied(DenialReason::AlreadyMoved))
        ));
    }

    #[test]
    fn test_move_memory_stream() {
        let dir = tempfile::tempdir().unwrap();
        let file = UploadedFile::new(Stream::from_body_string("in memory"), None, ErrorCode::OK, None, None).unwrap();
        let target = dir.path().join("memory.txt");
        file.move_to(&target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "in memory");
    }

    #[test]
    fn test_invalid_move_target() {
        let dir = tempfile::tempdir().unwrap();
        let file = UploadedFile::new(Stream::from_body_string("data"), None, ErrorCode::OK, None, None).unwrap();
        for target in [dir.path().join("missing").join("file.txt"), dir.path().to_path_buf()] {
            assert!(matches!(file.move_to(&target), Err(Error::InvalidTargetPath(_))));
        }
        assert!(!file.is_moved());
    }

    #[test]
    fn test_unreadable_stream_is_rejected() {
        let stream = Stream::new(crate::stream::Memory::with_contents("", "w".parse().unwrap()));
        assert!(matches!(
            UploadedFile::new(stream, None, ErrorCode::OK, None, None),
            Err(Error::UnreadableStream)
        ));
    }
}
