//! Shared fixtures for submission pipeline tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::StatusCode;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use poggit_release::artifact::{ARTIFACT_MIME_TYPE, ARTIFACT_TYPE};
use poggit_release::prelude::*;
use poggit_release::source_control::{RepoFile, RepoInfo, SourceControlError};
use poggit_release::submit::{Article, CategoriesInput, LicenseInput, SpoonInput};

pub const REPO_ID: i64 = 10;
pub const PROJECT_ID: i64 = 20;
pub const BUILD_ID: i64 = 30;
pub const REPO_NAME: &str = "poggit/demo";
pub const PROJECT_PATH: &str = "plugin/";
pub const SHA: &str = "0123456789abcdef";
pub const TOKEN: &str = "gho_test";

/// In-process stand-in for GitHub
#[derive(Debug, Default)]
pub struct MockSourceControl {
    pub admin: bool,
    pub files: HashMap<String, Vec<u8>>,
    pub licenses_down: bool,
    /// Every markdown context seen, in order
    pub rendered: Mutex<Vec<String>>,
}

impl MockSourceControl {
    pub fn admin() -> Self {
        Self {
            admin: true,
            ..Default::default()
        }
    }

    pub fn with_file(mut self, path: &str, content: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), content);
        self
    }
}

#[async_trait::async_trait]
impl SourceControl for MockSourceControl {
    async fn repository(&self, repo_id: i64, _token: &str) -> Result<RepoInfo, SourceControlError> {
        if repo_id != REPO_ID {
            return Err(SourceControlError::HttpStatus(
                StatusCode::NOT_FOUND,
                "Not Found".into(),
            ));
        }
        Ok(RepoInfo {
            id: repo_id,
            full_name: REPO_NAME.into(),
            admin: self.admin,
        })
    }

    async fn file_at(
        &self,
        _repo_full_name: &str,
        path: &str,
        _sha: &str,
        _token: &str,
    ) -> Result<RepoFile, SourceControlError> {
        let content = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceControlError::NotFound(path.to_string()))?;
        Ok(RepoFile {
            path: path.to_string(),
            download_url: Some(format!(
                "https://raw.githubusercontent.com/{REPO_NAME}/{SHA}/{path}"
            )),
            content,
        })
    }

    async fn license_keys(&self, _token: &str) -> Result<Vec<String>, SourceControlError> {
        if self.licenses_down {
            return Err(SourceControlError::HttpStatus(
                StatusCode::BAD_GATEWAY,
                "upstream unavailable".into(),
            ));
        }
        Ok(vec!["mit".into(), "apache-2.0".into(), "gpl-3.0".into()])
    }

    async fn render_markdown(
        &self,
        text: &str,
        context: &str,
        _token: &str,
    ) -> Result<String, SourceControlError> {
        self.rendered.lock().push(context.to_string());
        Ok(format!("<p>{text}</p>"))
    }
}

pub struct TestEnv {
    pub pipeline: ReleasePipeline,
    pub store: Arc<ResourceStore>,
    pub db: Database,
    pub scm: Arc<MockSourceControl>,
    pub build_resource: i64,
    _temp_dir: TempDir,
}

/// Seed a repository, project and build whose artifact is a small plugin archive
pub async fn setup(scm: MockSourceControl) -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::in_memory().await.unwrap();
    seed(scm, db, temp_dir).await
}

/// Same as [`setup`], but backed by a WAL database file with a real
/// connection pool, the way the daemon runs
pub async fn setup_on_disk(scm: MockSourceControl) -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let url = url::Url::parse(&format!(
        "sqlite://{}",
        temp_dir.path().join("db.sqlite").display()
    ))
    .unwrap();
    let db = Database::connect(&url).await.unwrap();
    seed(scm, db, temp_dir).await
}

async fn seed(scm: MockSourceControl, db: Database, temp_dir: TempDir) -> TestEnv {
    let store = Arc::new(ResourceStore::new(db.clone(), temp_dir.path().join("resources")));

    let artifact = store
        .create(ARTIFACT_TYPE, ARTIFACT_MIME_TYPE, &[])
        .await
        .unwrap();
    write_plugin(&artifact.path, "name: Demo\nversion: 0.0.1\nmain: demo\\Main\napi: [3.0.0]\n");

    sqlx::query("INSERT INTO repos (repo_id, owner, name) VALUES (?1, 'poggit', 'demo')")
        .bind(REPO_ID)
        .execute(&*db)
        .await
        .unwrap();
    sqlx::query("INSERT INTO projects (project_id, repo_id, name, path) VALUES (?1, ?2, 'Demo', ?3)")
        .bind(PROJECT_ID)
        .bind(REPO_ID)
        .bind(PROJECT_PATH)
        .execute(&*db)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO builds (build_id, project_id, resource_id, sha, internal) VALUES (?1, ?2, ?3, ?4, 1)",
    )
    .bind(BUILD_ID)
    .bind(PROJECT_ID)
    .bind(artifact.id)
    .bind(SHA)
    .execute(&*db)
    .await
    .unwrap();

    let scm = Arc::new(scm);
    let pipeline = ReleasePipeline::new(
        db.clone(),
        store.clone(),
        scm.clone(),
        ApiVersionTable::default(),
    );

    TestEnv {
        pipeline,
        store,
        db,
        scm,
        build_resource: artifact.id,
        _temp_dir: temp_dir,
    }
}

pub fn write_plugin(path: &Path, manifest: &str) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("plugin.yml", options).unwrap();
    zip.write_all(manifest.as_bytes()).unwrap();
    zip.start_file("src/demo/Main.php", options).unwrap();
    zip.write_all(b"<?php namespace demo; class Main {}").unwrap();
    zip.finish().unwrap();
}

/// A submission that passes every check on a project's first release
pub fn valid_submission(version: &str) -> Submission {
    Submission {
        build_id: Some(BUILD_ID),
        name: Some("DemoPlugin".into()),
        short_desc: Some("Does demo things".into()),
        version: Some(version.into()),
        desc: Some(Article::markdown("# Demo\n\nA plugin that demonstrates things.")),
        change_log: None,
        license: Some(LicenseInput {
            kind: Some("MIT".into()),
            val: None,
        }),
        pre_release: false,
        categories: Some(CategoriesInput {
            major: Some(7),
            minor: Some(vec![10]),
        }),
        keywords: Some(vec!["demo".into(), "example".into()]),
        spoons: Some(vec![SpoonInput {
            api: Some(vec!["3.0.0-ALPHA4".into(), "2.0.0".into()]),
        }]),
        deps: vec![],
        perms: Some(vec![1]),
        reqr: vec![],
        as_draft: false,
        icon_name: None,
    }
}

/// Minimal PNG: signature plus an IHDR chunk declaring the dimensions
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

pub async fn count(db: &Database, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&**db)
        .await
        .unwrap();
    row.0
}
