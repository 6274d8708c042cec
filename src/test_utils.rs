#[cfg(test)]
pub mod helpers {
    use crate::claims::ClaimsBuilder;
    use crate::producer::TokenKind;
    use crate::random::RandomSource;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Once};
    use uuid::Uuid;

    static INIT: Once = Once::new();

    /// Install a test tracing subscriber once for the whole test binary
    pub fn init_tracing() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .try_init()
                .ok();
        });
    }

    /// Path of a checked-in key fixture under `testdata/`
    pub fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
    }

    pub fn read_fixture(name: &str) -> Vec<u8> {
        fs::read(fixture(name)).unwrap_or_else(|e| panic!("fixture {name}: {e}"))
    }

    /// Claims builder over a fresh default-seeded random source
    pub fn claims_builder() -> ClaimsBuilder {
        init_tracing();
        ClaimsBuilder::new(Arc::new(RandomSource::default()))
    }

    /// Scratch directory removed on drop
    pub struct TempDir(PathBuf);

    impl TempDir {
        pub fn new() -> Self {
            let path = std::env::temp_dir().join(format!("jwtgen-test-{}", Uuid::now_v7()));
            fs::create_dir_all(&path).expect("Failed to create temp dir");
            TempDir(path)
        }

        pub fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    /// Secrets directory laid out the way the CLI expects it
    pub fn secrets_dir() -> TempDir {
        let dir = TempDir::new();
        let sources = [
            (TokenKind::Hs256, "hs256-secret.txt"),
            (TokenKind::Rs256, "rsa-private.pem"),
            (TokenKind::Es256, "ec-private-sec1.pem"),
            (TokenKind::Jwe, "rsa-public.pem"),
        ];
        for (kind, name) in sources {
            fs::copy(fixture(name), dir.path().join(kind.key_file()))
                .expect("Failed to copy fixture");
        }
        dir
    }
}
