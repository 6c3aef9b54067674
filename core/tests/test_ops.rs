#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use proptest::prelude::*;
    use cryptr_core::{
        archive::unpack,
        config::{CryptrConfig, KdfConfig},
        crypto::{CipherMode, CryptoError},
        keyfile::KEY_FILE_LEN_V1,
        ops::{
            cipher_with_password, decrypt_with_key, encrypt_with_key, Cryptr, DecryptKey,
            DecryptRequest, EncryptRequest, KeyMode, NoProgress, ProgressSink,
        },
        telemetry::Stage,
        types::{OpError, Outcome},
    };

    fn fast_cryptr() -> Cryptr {
        Cryptr::new(CryptrConfig {
            kdf: KdfConfig { iterations: 1_000, ..KdfConfig::default() },
            ..CryptrConfig::default()
        })
        .unwrap()
    }

    fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, data).unwrap();
        p
    }

    fn key_path(p: &Path) -> PathBuf {
        PathBuf::from(format!("{}.KEY", p.display()))
    }

    /// Records progress and stops after `stop_after` completed items.
    struct Recorder {
        seen: Vec<(usize, usize)>,
        stop_after: Option<usize>,
    }

    impl ProgressSink for Recorder {
        fn on_progress(&mut self, done: usize, total: usize) {
            self.seen.push((done, total));
        }

        fn should_continue(&mut self) -> bool {
            self.stop_after.map_or(true, |n| self.seen.len() < n)
        }
    }

    // ---- Single-file entry points ----

    #[test]
    fn hello12345_generated_key_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "hello.txt", b"hello12345");
        let key = key_path(&file);

        let snap = encrypt_with_key(&file, &file, &key).unwrap();
        let ct = fs::read(&file).unwrap();
        assert_eq!(ct.len(), 16);
        assert_ne!(&ct[..10], b"hello12345");
        assert_eq!(fs::metadata(&key).unwrap().len(), KEY_FILE_LEN_V1 as u64);
        assert_eq!(snap.counters.files_encrypted, 1);
        assert_eq!(snap.counters.key_files_written, 1);
        assert!(snap.has_all_stages(&[Stage::Read, Stage::Encrypt, Stage::KeyFile, Stage::Write]));

        decrypt_with_key(&file, &file, &key).unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"hello12345");
    }

    #[test]
    fn separate_output_leaves_input_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "in.bin", b"payload");
        let enc = dir.path().join("in.bin.enc");
        let out = dir.path().join("in.bin.dec");
        let key = dir.path().join("k.KEY");

        encrypt_with_key(&input, &enc, &key).unwrap();
        assert_eq!(fs::read(&input).unwrap(), b"payload");
        decrypt_with_key(&enc, &out, &key).unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"payload");
    }

    #[test]
    fn wrong_password_is_crypto_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "secret.txt", b"hello12345");
        let cryptr = Cryptr::default();

        cryptr.cipher_with_password(&file, &file, "correct", CipherMode::Encrypt).unwrap();
        let ct = fs::read(&file).unwrap();

        let err = cryptr.cipher_with_password(&file, &file, "wrong", CipherMode::Decrypt).unwrap_err();
        assert_eq!(err.outcome(), Outcome::CryptoFailure);
        assert!(matches!(err, OpError::Crypto(CryptoError::PaddingOrAuth { .. })));
        assert_eq!(fs::read(&file).unwrap(), ct, "failed decryption must not write output");

        cryptr.cipher_with_password(&file, &file, "correct", CipherMode::Decrypt).unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"hello12345");
    }

    #[test]
    fn empty_password_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "f", b"data");
        let err = cipher_with_password(fast_cryptr().kdf(), &file, &file, "", CipherMode::Encrypt).unwrap_err();
        assert_eq!(err.outcome(), Outcome::InvalidInput);
        assert_eq!(fs::read(&file).unwrap(), b"data");
    }

    #[test]
    fn missing_input_is_source_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = encrypt_with_key(&missing, &missing, key_path(&missing)).unwrap_err();
        assert_eq!(err.outcome(), Outcome::SourceReadFailure);
        assert!(!key_path(&missing).exists());
    }

    #[test]
    fn unwritable_output_is_destination_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "in", b"data");
        let output = dir.path().join("out_dir");
        fs::create_dir(&output).unwrap();
        let err = encrypt_with_key(&input, &output, dir.path().join("k.KEY")).unwrap_err();
        assert_eq!(err.outcome(), Outcome::DestinationWriteFailure);
    }

    #[test]
    fn key_file_write_failure_keeps_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "doc", b"must survive");
        let err = encrypt_with_key(&file, &file, dir.path().join("no/dir/doc.KEY")).unwrap_err();
        assert_eq!(err.outcome(), Outcome::KeyFileFailure);
        assert!(matches!(err, OpError::KeyFile(_)));
        assert_eq!(fs::read(&file).unwrap(), b"must survive");
    }

    #[test]
    fn corrupt_key_file_is_deserialization_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "doc", b"content");
        let key = key_path(&file);
        encrypt_with_key(&file, &file, &key).unwrap();

        let mut record = fs::read(&key).unwrap();
        record[0] = b'X';
        fs::write(&key, &record).unwrap();

        let err = decrypt_with_key(&file, &file, &key).unwrap_err();
        assert!(matches!(err, OpError::Deserialization(_)));
        assert_eq!(err.outcome(), Outcome::KeyFileFailure);
    }

    // ---- Batch: per-file ----

    #[test]
    fn batch_generated_keys_roundtrip_with_progress() {
        let dir = tempfile::tempdir().unwrap();
        let originals: Vec<(PathBuf, Vec<u8>)> = (0..3)
            .map(|i| {
                let data = format!("file number {}", i).repeat(i + 1).into_bytes();
                (write_file(dir.path(), &format!("f{}.txt", i), &data), data)
            })
            .collect();
        let paths: Vec<PathBuf> = originals.iter().map(|(p, _)| p.clone()).collect();
        let cryptr = fast_cryptr();

        let mut seen = Vec::new();
        let mut sink = |done: usize, total: usize| seen.push((done, total));
        let report = cryptr.encrypt_files(&EncryptRequest::new(paths.clone(), KeyMode::GeneratedKey), &mut sink);
        assert!(report.is_success(), "{:?}", report.error);
        assert_eq!(report.completed, 3);
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(report.telemetry.counters.files_encrypted, 3);
        assert_eq!(report.telemetry.counters.key_files_written, 3);
        for (p, data) in &originals {
            assert!(key_path(p).exists());
            assert_ne!(&fs::read(p).unwrap(), data);
        }

        let report = cryptr.decrypt_files(&DecryptRequest::new(paths, DecryptKey::KeyFile(None)), &mut NoProgress);
        assert_eq!(report.outcome, Outcome::Success);
        assert_eq!(report.telemetry.counters.key_files_read, 3);
        for (p, data) in &originals {
            assert_eq!(&fs::read(p).unwrap(), data);
        }
    }

    #[test]
    fn batch_stops_at_first_failure_and_keeps_earlier_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_file(dir.path(), "first", b"first");
        let missing = dir.path().join("missing");
        let third = write_file(dir.path(), "third", b"third");
        let cryptr = fast_cryptr();

        let mut rec = Recorder { seen: Vec::new(), stop_after: None };
        let req = EncryptRequest::new(vec![first.clone(), missing, third.clone()], KeyMode::GeneratedKey);
        let report = cryptr.encrypt_files(&req, &mut rec);

        assert_eq!(report.outcome, Outcome::SourceReadFailure);
        assert_eq!(report.failed_index, Some(1));
        assert_eq!(report.completed, 1);
        assert_eq!(rec.seen, vec![(1, 3)]);
        assert!(matches!(report.error, Some(OpError::SourceRead { .. })));

        assert_ne!(fs::read(&first).unwrap(), b"first");
        assert!(key_path(&first).exists());
        assert_eq!(fs::read(&third).unwrap(), b"third");
        assert!(!key_path(&third).exists());
    }

    #[test]
    fn batch_cancellation_between_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"aaaa");
        let b = write_file(dir.path(), "b", b"bbbb");
        let cryptr = fast_cryptr();

        let mut rec = Recorder { seen: Vec::new(), stop_after: Some(1) };
        let req = EncryptRequest::new(vec![a.clone(), b.clone()], KeyMode::Password("pw".into()));
        let report = cryptr.encrypt_files(&req, &mut rec);

        assert_eq!(report.outcome, Outcome::Cancelled);
        assert_eq!(report.completed, 1);
        assert_eq!(report.failed_index, None);
        assert_ne!(fs::read(&a).unwrap(), b"aaaa");
        assert_eq!(fs::read(&b).unwrap(), b"bbbb");
    }

    #[test]
    fn batch_password_mode_is_deterministic_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"same content");
        let b = write_file(dir.path(), "b", b"same content");
        let cryptr = fast_cryptr();

        let req = EncryptRequest::new(vec![a.clone(), b.clone()], KeyMode::Password("pw".into()));
        assert!(cryptr.encrypt_files(&req, &mut NoProgress).is_success());
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
        assert!(!key_path(&a).exists());

        let req = DecryptRequest::new(vec![a.clone(), b], DecryptKey::Password("pw".into()));
        let report = cryptr.decrypt_files(&req, &mut NoProgress);
        assert!(report.is_success());
        assert_eq!(report.telemetry.counters.files_decrypted, 2);
        assert_eq!(fs::read(&a).unwrap(), b"same content");
    }

    #[test]
    fn batch_empty_password_rejected_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"data");
        let report = fast_cryptr().encrypt_files(
            &EncryptRequest::new(vec![a.clone()], KeyMode::Password(String::new())),
            &mut NoProgress,
        );
        assert_eq!(report.outcome, Outcome::InvalidInput);
        assert_eq!(report.failed_index, None);
        assert_eq!(fs::read(&a).unwrap(), b"data");
    }

    #[test]
    fn batch_rejects_same_file_listed_twice() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"hello12345");
        let cryptr = fast_cryptr();

        let report = cryptr.encrypt_files(
            &EncryptRequest::new(vec![a.clone(), a.clone()], KeyMode::GeneratedKey),
            &mut NoProgress,
        );
        assert_eq!(report.outcome, Outcome::InvalidInput);
        assert_eq!(report.completed, 0);
        assert!(matches!(report.error, Some(OpError::InvalidInput(_))));
        assert_eq!(fs::read(&a).unwrap(), b"hello12345");
        assert!(!key_path(&a).exists());

        let report = cryptr.encrypt_files(
            &EncryptRequest::new(vec![a.clone(), a.clone()], KeyMode::Password("pw".into())),
            &mut NoProgress,
        );
        assert_eq!(report.outcome, Outcome::InvalidInput);
        assert_eq!(fs::read(&a).unwrap(), b"hello12345");
    }

    #[test]
    fn batch_rejects_same_file_under_another_spelling() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let a = write_file(dir.path(), "a", b"hello12345");
        let detour = dir.path().join("sub").join("..").join("a");

        let report = fast_cryptr().encrypt_files(
            &EncryptRequest::new(vec![a.clone(), detour], KeyMode::GeneratedKey),
            &mut NoProgress,
        );
        assert_eq!(report.outcome, Outcome::InvalidInput);
        assert_eq!(fs::read(&a).unwrap(), b"hello12345");
        assert!(!key_path(&a).exists());
    }

    #[test]
    fn batch_decrypt_rejects_duplicates_and_keeps_key_usable() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"hello12345");
        let cryptr = fast_cryptr();
        assert!(cryptr.encrypt_files(&EncryptRequest::new(vec![a.clone()], KeyMode::GeneratedKey), &mut NoProgress).is_success());
        let ct = fs::read(&a).unwrap();

        let report = cryptr.decrypt_files(
            &DecryptRequest::new(vec![a.clone(), a.clone()], DecryptKey::KeyFile(None)),
            &mut NoProgress,
        );
        assert_eq!(report.outcome, Outcome::InvalidInput);
        assert_eq!(fs::read(&a).unwrap(), ct);

        let report = cryptr.decrypt_files(&DecryptRequest::new(vec![a.clone()], DecryptKey::KeyFile(None)), &mut NoProgress);
        assert!(report.is_success());
        assert_eq!(fs::read(&a).unwrap(), b"hello12345");
    }

    #[test]
    fn batch_decrypt_missing_shared_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"data");
        let req = DecryptRequest::new(vec![a], DecryptKey::KeyFile(Some(dir.path().join("none.KEY"))));
        let report = fast_cryptr().decrypt_files(&req, &mut NoProgress);
        assert_eq!(report.outcome, Outcome::KeyFileFailure);
        assert_eq!(report.failed_index, None);
    }

    #[test]
    fn batch_decrypt_missing_per_file_key_reports_index() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"aaa");
        let b = write_file(dir.path(), "b", b"bbb");
        let cryptr = fast_cryptr();
        assert!(cryptr.encrypt_files(&EncryptRequest::new(vec![a.clone(), b.clone()], KeyMode::GeneratedKey), &mut NoProgress).is_success());
        fs::remove_file(key_path(&b)).unwrap();

        let report = cryptr.decrypt_files(&DecryptRequest::new(vec![a.clone(), b], DecryptKey::KeyFile(None)), &mut NoProgress);
        assert_eq!(report.outcome, Outcome::KeyFileFailure);
        assert_eq!(report.failed_index, Some(1));
        assert_eq!(fs::read(&a).unwrap(), b"aaa");
    }

    // ---- Batch: compress then encrypt ----

    #[test]
    fn compress_mode_encrypts_archive_only() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write_file(dir.path(), "one.txt", b"one one one"),
            write_file(dir.path(), "two.txt", b"two two two"),
        ];
        let archive = dir.path().join("bundle.zip");
        let cryptr = fast_cryptr();

        let mut rec = Recorder { seen: Vec::new(), stop_after: None };
        let req = EncryptRequest::new(files.clone(), KeyMode::GeneratedKey).with_archive(&archive);
        let report = cryptr.encrypt_files(&req, &mut rec);
        assert!(report.is_success(), "{:?}", report.error);
        assert_eq!(rec.seen, vec![(1, 2), (2, 2)]);
        assert_eq!(report.telemetry.counters.files_archived, 2);
        assert!(report.telemetry.has_all_stages(&[Stage::Archive, Stage::Encrypt]));

        assert_eq!(fs::read(&files[0]).unwrap(), b"one one one");
        assert!(!key_path(&files[0]).exists());
        assert!(unpack(&archive).is_err(), "archive is encrypted");

        let req = DecryptRequest::new(vec![archive.clone()], DecryptKey::KeyFile(Some(key_path(&archive))));
        assert!(cryptr.decrypt_files(&req, &mut NoProgress).is_success());
        let entries = unpack(&archive).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "two.txt");
        assert_eq!(entries[1].data, b"two two two");
    }

    #[test]
    fn compress_mode_with_password() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write_file(dir.path(), "x", b"xyz")];
        let archive = dir.path().join("pw.zip");
        let cryptr = fast_cryptr();

        let req = EncryptRequest::new(files, KeyMode::Password("hunter2".into())).with_archive(&archive);
        assert!(cryptr.encrypt_files(&req, &mut NoProgress).is_success());
        assert!(!key_path(&archive).exists());

        cryptr.cipher_with_password(&archive, &archive, "hunter2", CipherMode::Decrypt).unwrap();
        assert_eq!(unpack(&archive).unwrap()[0].data, b"xyz");
    }

    #[test]
    fn compress_mode_reports_failing_source_index() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write_file(dir.path(), "ok", b"ok"),
            dir.path().join("gone"),
        ];
        let archive = dir.path().join("bad.zip");
        let mut rec = Recorder { seen: Vec::new(), stop_after: None };
        let req = EncryptRequest::new(files, KeyMode::GeneratedKey).with_archive(&archive);
        let report = fast_cryptr().encrypt_files(&req, &mut rec);

        assert_eq!(report.outcome, Outcome::SourceReadFailure);
        assert_eq!(report.failed_index, Some(1));
        assert!(matches!(report.error, Some(OpError::ArchiveEntry { index: 1, .. })));
        assert!(rec.seen.is_empty());
        // Partial archive is closed with the earlier entry and left unencrypted.
        assert_eq!(unpack(&archive).unwrap().len(), 1);
    }

    #[test]
    fn compress_mode_uncreatable_archive() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write_file(dir.path(), "a", b"a")];
        let req = EncryptRequest::new(files, KeyMode::GeneratedKey)
            .with_archive(dir.path().join("missing/dir/out.zip"));
        let report = fast_cryptr().encrypt_files(&req, &mut NoProgress);
        assert_eq!(report.outcome, Outcome::ArchiveCreationFailure);
        assert_eq!(report.failed_index, None);
    }

    #[test]
    fn compress_mode_rejects_archive_listed_as_input() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.zip", b"a");
        let req = EncryptRequest::new(vec![a.clone()], KeyMode::GeneratedKey).with_archive(&a);
        assert_eq!(fast_cryptr().encrypt_files(&req, &mut NoProgress).outcome, Outcome::InvalidInput);
    }

    #[test]
    fn custom_key_file_suffix_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"a");
        let cryptr = Cryptr::new(CryptrConfig { key_file_suffix: ".key.bin".into(), ..CryptrConfig::default() }).unwrap();
        assert!(cryptr.encrypt_files(&EncryptRequest::new(vec![a.clone()], KeyMode::GeneratedKey), &mut NoProgress).is_success());
        assert!(dir.path().join("a.key.bin").exists());
        assert!(cryptr.decrypt_files(&DecryptRequest::new(vec![a.clone()], DecryptKey::KeyFile(None)), &mut NoProgress).is_success());
        assert_eq!(fs::read(&a).unwrap(), b"a");
    }

    #[test]
    fn request_debug_hides_password() {
        let req = EncryptRequest::new(vec![], KeyMode::Password("topsecret".into()));
        assert!(!format!("{:?}", req).contains("topsecret"));
        let req = DecryptRequest::new(vec![], DecryptKey::Password("topsecret".into()));
        assert!(!format!("{:?}", req).contains("topsecret"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_key_mode_file_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let dir = tempfile::tempdir().unwrap();
            let file = write_file(dir.path(), "blob", &data);
            let key = key_path(&file);
            encrypt_with_key(&file, &file, &key).unwrap();
            decrypt_with_key(&file, &file, &key).unwrap();
            prop_assert_eq!(fs::read(&file).unwrap(), data);
        }

        #[test]
        fn prop_password_mode_file_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            password in "[a-zA-Z0-9]{1,16}",
        ) {
            let dir = tempfile::tempdir().unwrap();
            let file = write_file(dir.path(), "blob", &data);
            let cryptr = fast_cryptr();
            cryptr.cipher_with_password(&file, &file, &password, CipherMode::Encrypt).unwrap();
            cryptr.cipher_with_password(&file, &file, &password, CipherMode::Decrypt).unwrap();
            prop_assert_eq!(fs::read(&file).unwrap(), data);
        }
    }
}
