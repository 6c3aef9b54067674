#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;

    use cryptr_core::{
        archive::ArchiveError,
        crypto::{ChainingMode, CryptoError},
        keyfile::KeyFileError,
        types::{OpError, Outcome},
    };

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "gone")
    }

    #[test]
    fn crypto_errors_map_to_taxonomy() {
        let e: OpError = CryptoError::UnsupportedAlgorithm("no rng".into()).into();
        assert_eq!(e.outcome(), Outcome::UnsupportedEnvironment);

        let e: OpError = CryptoError::InvalidKeySpec("bad".into()).into();
        assert_eq!(e.outcome(), Outcome::InvalidInput);

        let e: OpError = CryptoError::PaddingOrAuth { mode: ChainingMode::Cbc, len: 32 }.into();
        assert_eq!(e.outcome(), Outcome::CryptoFailure);
        assert!(e.source().is_some());
    }

    #[test]
    fn key_file_errors_split_io_and_structure() {
        let e: OpError = KeyFileError::Io { path: PathBuf::from("k"), source: io_err() }.into();
        assert!(matches!(e, OpError::KeyFile(_)));
        assert_eq!(e.outcome(), Outcome::KeyFileFailure);

        let e: OpError = KeyFileError::BadLength { have: 3, need: 64 }.into();
        assert!(matches!(e, OpError::Deserialization(_)));
        assert_eq!(e.outcome(), Outcome::KeyFileFailure);
    }

    #[test]
    fn archive_errors_keep_index() {
        let e: OpError = ArchiveError::Entry { index: 4, path: PathBuf::from("f"), source: io_err() }.into();
        assert_eq!(e.archive_index(), Some(4));
        assert_eq!(e.outcome(), Outcome::SourceReadFailure);

        let e: OpError = ArchiveError::Creation { path: PathBuf::from("a.zip"), source: io_err() }.into();
        assert_eq!(e.archive_index(), None);
        assert_eq!(e.outcome(), Outcome::ArchiveCreationFailure);
    }

    #[test]
    fn display_includes_context() {
        let e = OpError::SourceRead { path: PathBuf::from("/data/in.txt"), source: io_err() };
        let msg = e.to_string();
        assert!(msg.contains("/data/in.txt"));
        assert!(msg.contains("gone"));
        assert_eq!(Outcome::KeyFileFailure.to_string(), "key file failure");
    }
}
