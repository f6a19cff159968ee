use std::env;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream as AwsByteStream, Client};
use bytes::Bytes;
use tracing::debug;

use crate::{public_object_url, MediaError, MediaResult, ObjectStore, UploadOptions};

/// Connection settings for an S3-compatible storage endpoint
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: String,
    /// Base for public URLs, e.g. `https://<project>.supabase.co/storage/v1`
    pub public_url: String,
}

impl S3Config {
    /// Read `CIVITI_S3_*` and `CIVITI_STORAGE_PUBLIC_URL` from the environment
    pub fn from_env() -> MediaResult<Self> {
        fn get_env(key: &str) -> MediaResult<String> {
            env::var(key).map_err(|_| MediaError::invalid(format!("{} environment variable required", key)))
        }

        Ok(Self {
            region: get_env("CIVITI_S3_REGION")?,
            access_key_id: get_env("CIVITI_S3_ACCESS_KEY_ID")?,
            secret_access_key: get_env("CIVITI_S3_SECRET_ACCESS_KEY")?,
            endpoint_url: get_env("CIVITI_S3_ENDPOINT_URL")?,
            public_url: get_env("CIVITI_STORAGE_PUBLIC_URL")?,
        })
    }
}

/// Object store for any S3-compatible endpoint
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    public_url: String,
}

impl S3CompatibleStore {
    pub async fn new(config: S3Config) -> Self {
        let public_url = config.public_url.clone();
        let client = Self::create_client(config).await;
        Self { client, public_url }
    }

    pub async fn from_env() -> MediaResult<Self> {
        Ok(Self::new(S3Config::from_env()?).await)
    }

    async fn create_client(config: S3Config) -> Client {
        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "civiti",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url)
            .load()
            .await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true)
                .build(),
        )
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> MediaError {
        MediaError::backend(err)
    }
}

#[async_trait]
impl ObjectStore for S3CompatibleStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> MediaResult<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(path)
            .content_type(&options.content_type)
            .body(AwsByteStream::from(body));

        if let Some(cache_control) = &options.cache_control {
            request = request.cache_control(cache_control);
        }
        if !options.upsert {
            request = request.if_none_match("*");
        }

        match request.send().await {
            Ok(_) => {
                debug!(bucket, path, "object stored");
                Ok(())
            }
            Err(err) => {
                let status = err.raw_response().map(|r| r.status().as_u16());
                if status == Some(412) {
                    return Err(MediaError::AlreadyExists {
                        path: path.to_string(),
                    });
                }
                Err(Self::map_aws_error(err))
            }
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.public_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> MediaResult<()> {
        for path in paths {
            self.client
                .delete_object()
                .bucket(bucket)
                .key(path)
                .send()
                .await
                .map_err(Self::map_aws_error)?;
        }
        Ok(())
    }
}
