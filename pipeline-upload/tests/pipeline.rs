//! End-to-end runs against the recording object store

use figment::Jail;
use pipeline_upload::config::{failing_fields, ConfigError, ConfigLoader, CredentialSource};
use pipeline_upload::pipeline::{self, RunOptions, DEFAULT_PAYLOAD};
use pipeline_upload::testing::RecordingObjectStore;
use pipeline_upload::PipelineError;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = "\
S3_CONFIG__REGION=eu-west-1
S3_CONFIG__BUCKET_NAME=reports
S3_CONFIG__PATH_PREFIX=backups
S3_CONFIG__ACCESS_KEY_ID=
S3_CONFIG__SECRET_ACCESS_KEY=
";

fn write_config(jail: &Jail, content: &str) -> figment::error::Result<()> {
    std::fs::create_dir_all(jail.directory().join("config")).map_err(|e| e.to_string())?;
    jail.create_file(Path::new("config").join("app.env"), content)?;
    Ok(())
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

#[test]
fn test_loaded_config_runs_to_completion() {
    Jail::expect_with(|jail| {
        write_config(jail, CONFIG)?;
        let config = ConfigLoader::new()
            .with_search_paths(["config"])
            .load()
            .map_err(|e| e.to_string())?;

        assert_eq!(config.s3_config.credential_source(), CredentialSource::Ambient);

        let dir = TempDir::new().unwrap();
        let store = RecordingObjectStore::new();
        let options = RunOptions::default().with_local_dir(dir.path());

        let report = block_on(pipeline::run(&config, &store, &options)).map_err(|e| e.to_string())?;

        assert_eq!(report.remote_key, "/backups/out.txt");
        assert_eq!(report.location, "s3://reports/backups/out.txt");
        assert_eq!(store.last_put().unwrap().body, DEFAULT_PAYLOAD);
        assert!(!options.local_path().exists());
        Ok(())
    });
}

#[test]
fn test_environment_prefix_redirects_upload() {
    Jail::expect_with(|jail| {
        write_config(jail, CONFIG)?;
        jail.set_env("S3_CONFIG__PATH_PREFIX", "nightly");
        jail.set_env("S3_CONFIG__BUCKET_NAME", "archive");

        let config = ConfigLoader::new()
            .with_search_paths(["config"])
            .load()
            .map_err(|e| e.to_string())?;

        let dir = TempDir::new().unwrap();
        let store = RecordingObjectStore::new();
        let options = RunOptions::default().with_local_dir(dir.path());
        block_on(pipeline::run(&config, &store, &options)).map_err(|e| e.to_string())?;

        let put = store.last_put().unwrap();
        assert_eq!(put.bucket, "archive");
        assert_eq!(put.key, "/nightly/out.txt");
        Ok(())
    });
}

#[test]
fn test_missing_prefix_aborts_before_upload() {
    Jail::expect_with(|jail| {
        write_config(
            jail,
            "S3_CONFIG__REGION=eu-west-1\nS3_CONFIG__BUCKET_NAME=reports\n",
        )?;

        let err = ConfigLoader::new()
            .with_search_paths(["config"])
            .load()
            .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(failing_fields(&errors), vec!["s3_config.path_prefix".to_string()]);
            }
            other => panic!("expected validation error, got {other}"),
        }
        Ok(())
    });
}

#[tokio::test]
async fn test_repeated_runs_hit_the_same_key() {
    let config = sample_config();
    let dir = TempDir::new().unwrap();
    let store = RecordingObjectStore::new();
    let options = RunOptions::default()
        .with_local_dir(dir.path())
        .with_file_name("report.csv")
        .with_payload("a,b\n1,2\n");

    let first = pipeline::run(&config, &store, &options).await.unwrap();
    let second = pipeline::run(&config, &store, &options).await.unwrap();

    assert_eq!(first.remote_key, second.remote_key);
    let keys: Vec<_> = store.puts().into_iter().map(|put| put.key).collect();
    assert_eq!(keys, vec!["/backups/report.csv", "/backups/report.csv"]);
}

#[tokio::test]
async fn test_failed_upload_leaves_local_file() {
    let config = sample_config();
    let dir = TempDir::new().unwrap();
    let store = RecordingObjectStore::failing("AccessDenied: Access Denied");
    let options = RunOptions::default().with_local_dir(dir.path());

    let err = pipeline::run(&config, &store, &options).await.unwrap_err();

    assert!(matches!(err, PipelineError::Upload { ref key, .. } if key == "/backups/out.txt"));
    assert!(!err.upload_succeeded());
    assert_eq!(std::fs::read(options.local_path()).unwrap(), DEFAULT_PAYLOAD);
}

fn sample_config() -> pipeline_upload::config::AppConfig {
    let mut config = pipeline_upload::config::AppConfig::default();
    config.s3_config.region = "eu-west-1".to_string();
    config.s3_config.bucket_name = "reports".to_string();
    config.s3_config.path_prefix = "backups".to_string();
    config
}
