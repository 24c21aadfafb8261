//! Tests for byte streams.

#[cfg(test)]
mod tests {
    use std::io::{self, Read, Seek, SeekFrom, Write};

    use crate::stream::{Capability, Error, Memory, Metadata, Mode, Resource, Stream};

    fn stream_with(contents: &str, mode: &str) -> Stream {
        Stream::new(Memory::with_contents(contents, mode.parse().unwrap()))
    }

    /// Pipe-like resource that cannot seek.
    struct Pipe(io::Cursor<Vec<u8>>);

    impl Read for Pipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Write for Pipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for Pipe {
        fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "pipe"))
        }
    }

    impl Resource for Pipe {
        fn metadata(&self) -> Metadata {
            Metadata {
                mode: "r+".parse().unwrap(),
                seekable: false,
                uri: None,
            }
        }

        fn size(&self) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "pipe"))
        }
    }

    #[test]
    fn test_mode_parsing() {
        for mode in ["r", "r+", "rb", "r+b", "rb+", "w", "wt", "a+", "x", "c+b"] {
            assert!(mode.parse::<Mode>().is_ok(), "{mode}");
        }
        for mode in ["", "q", "rr", "r++", "+r", "rbt", "w+b+"] {
            assert!(matches!(mode.parse::<Mode>(), Err(Error::InvalidMode(_))), "{mode}");
        }
    }

    #[test]
    fn test_mode_capabilities() {
        let caps = |mode: &str| {
            let mode: Mode = mode.parse().unwrap();
            (mode.readable(), mode.writable())
        };
        assert_eq!(caps("r"), (true, false));
        assert_eq!(caps("rb+"), (true, true));
        assert_eq!(caps("w"), (false, true));
        assert_eq!(caps("a+"), (true, true));
        assert_eq!(caps("x"), (false, true));
        assert_eq!(caps("c"), (false, true));
    }

    #[test]
    fn test_read_to_end_sets_eof() {
        let stream = Stream::from_body_string("Hello World!");
        stream.seek(SeekFrom::Start(11)).unwrap();
        assert_eq!(stream.read(1).unwrap(), b"!");
        assert!(!stream.eof());
        assert!(stream.read(1).unwrap().is_empty());
        assert!(stream.eof());

        stream.rewind().unwrap();
        assert!(!stream.eof());
        assert_eq!(stream.read(5).unwrap(), b"Hello");
    }

    #[test]
    fn test_read_length_larger_than_contents() {
        let stream = Stream::from_body_string("abc");
        assert_eq!(stream.read(usize::MAX).unwrap(), b"abc");
        assert!(stream.eof());

        stream.rewind().unwrap();
        assert_eq!(stream.read(u32::MAX as usize).unwrap(), b"abc");
        assert!(stream.eof());
    }

    #[test]
    fn test_body_string_is_read_write_at_start() {
        let stream = Stream::from_body_string("body");
        assert!(stream.is_readable());
        assert!(stream.is_writable());
        assert_eq!(stream.tell().unwrap(), 0);
        stream.seek(SeekFrom::End(0)).unwrap();
        stream.write(b"!").unwrap();
        assert_eq!(stream.to_string(), "body!");
    }

    #[test]
    fn test_seek_tell_and_size() {
        let stream = Stream::from_body_string("0123456789");
        assert_eq!(stream.size(), Some(10));
        stream.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(stream.tell().unwrap(), 4);
        stream.seek(SeekFrom::Current(2)).unwrap();
        assert_eq!(stream.tell().unwrap(), 6);
        stream.seek(SeekFrom::End(-1)).unwrap();
        assert_eq!(stream.contents().unwrap(), b"9");
    }

    #[test]
    fn test_write_then_contents() {
        let stream = Stream::memory();
        assert_eq!(stream.write(b"some ").unwrap(), 5);
        assert_eq!(stream.write(b"text").unwrap(), 4);
        stream.rewind().unwrap();
        assert_eq!(stream.contents().unwrap(), b"some text");
        assert_eq!(stream.to_string(), "some text");
    }

    #[test]
    fn test_read_only_stream_rejects_write() {
        let stream = stream_with("data", "r");
        assert!(stream.is_readable());
        assert!(!stream.is_writable());
        assert!(matches!(stream.write(b"x"), Err(Error::Unavailable(Capability::Writable))));
        assert_eq!(stream.contents().unwrap(), b"data");
    }

    #[test]
    fn test_write_only_stream_rejects_read() {
        let stream = stream_with("", "w");
        assert!(!stream.is_readable());
        assert!(matches!(stream.read(1), Err(Error::Unavailable(Capability::Readable))));
        assert!(matches!(stream.contents(), Err(Error::Unavailable(Capability::Readable))));
        // Rendering never fails
        assert_eq!(stream.to_string(), "");
    }

    #[test]
    fn test_non_seekable_stream() {
        let stream = Stream::new(Pipe(io::Cursor::new(b"piped".to_vec())));
        assert!(!stream.is_seekable());
        assert!(matches!(stream.rewind(), Err(Error::Unavailable(Capability::Seekable))));
        assert_eq!(stream.size(), None);
        assert_eq!(stream.contents().unwrap(), b"piped");
        assert_eq!(stream.to_string(), "");
    }

    #[test]
    fn test_detach_returns_resource_once() {
        let stream = Stream::from_body_string("payload");
        let mut resource = stream.detach().unwrap();
        assert!(stream.detach().is_none());

        let mut text = String::new();
        resource.read_to_string(&mut text).unwrap();
        assert_eq!(text, "payload");
    }

    #[test]
    fn test_detached_stream_is_unusable() {
        let stream = Stream::from_body_string("payload");
        stream.close();

        assert!(stream.is_detached());
        assert!(stream.eof());
        assert_eq!(stream.size(), None);
        assert!(stream.metadata().is_none());
        assert!(!stream.is_readable());
        assert!(!stream.is_writable());
        assert!(!stream.is_seekable());
        assert!(matches!(stream.read(1), Err(Error::Detached)));
        assert!(matches!(stream.write(b"x"), Err(Error::Detached)));
        assert!(matches!(stream.seek(SeekFrom::Start(0)), Err(Error::Detached)));
        assert!(matches!(stream.tell(), Err(Error::Detached)));
        assert!(matches!(stream.contents(), Err(Error::Detached)));
        assert_eq!(stream.to_string(), "");
    }

    #[test]
    fn test_clones_share_state() {
        let stream = Stream::memory();
        let copy = stream.clone();
        copy.write(b"shared").unwrap();
        assert_eq!(stream.tell().unwrap(), 6);
        assert_eq!(stream, copy);
        assert_ne!(stream, Stream::memory());

        stream.close();
        assert!(copy.is_detached());
    }

    #[test]
    fn test_file_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.txt");

        let stream = Stream::open(&path, "w+").unwrap();
        stream.write(b"file contents").unwrap();
        let meta = stream.metadata().unwrap();
        assert_eq!(meta.uri.as_deref(), Some(path.as_path()));
        assert_eq!(meta.mode.as_str(), "w+");
        assert_eq!(stream.size(), Some(13));
        stream.close();

        let stream = Stream::open(&path, "r").unwrap();
        assert!(!stream.is_writable());
        assert_eq!(stream.to_string(), "file contents");
    }

    #[test]
    fn test_open_failures() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Stream::open(dir.path().join("missing.txt"), "r"),
            Err(Error::IoFailure(_))
        ));
        assert!(matches!(
            Stream::open(dir.path().join("file.txt"), "z"),
            Err(Error::InvalidMode(_))
        ));
    }
}
