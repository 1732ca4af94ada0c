//! Shared fixtures for plugin integration tests

use brokkr_plugin::ProbeLocations;
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REGION: &str = "us-east-1";
pub const DUST_ARN_V42: &str = "arn:aws:lambda:us-east-1:123456789012:layer:dust:42";

/// Mount a `GET /{region}/extension.arn` endpoint returning the given body
pub async fn mock_extension_arn(server: &MockServer, region: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{region}/extension.arn")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount a failing `GET /{region}/extension.arn` endpoint
pub async fn mock_failing_extension_arn(server: &MockServer, region: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{region}/extension.arn")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// A service directory on disk with a packaged build archive
pub struct ServiceFixture {
    _dir: TempDir,
    pub service_dir: Utf8PathBuf,
    pub service_name: String,
}

impl ServiceFixture {
    /// Create `{dir}/.serverless/{name}.zip` so the archive probe passes
    pub fn packaged(name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let service_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let packaging_dir = service_dir.join(".serverless");
        fs::create_dir_all(&packaging_dir).unwrap();
        fs::write(packaging_dir.join(format!("{name}.zip")), b"PK fake archive").unwrap();
        Self {
            _dir: dir,
            service_dir,
            service_name: name.to_string(),
        }
    }

    /// Create the fixture without the archive on disk
    pub fn unpackaged(name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let service_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(service_dir.join(".serverless")).unwrap();
        Self {
            _dir: dir,
            service_dir,
            service_name: name.to_string(),
        }
    }

    pub fn locations(&self) -> ProbeLocations {
        ProbeLocations {
            service_dir: Some(self.service_dir.clone()),
            package_path: None,
            service_name: Some(self.service_name.clone()),
        }
    }

    /// Write the generated packaging template next to the archive
    pub fn write_template(&self, content: &str) {
        fs::write(
            self.service_dir
                .join(".serverless")
                .join("cloudformation-template-update-stack.json"),
            content,
        )
        .unwrap();
    }
}
