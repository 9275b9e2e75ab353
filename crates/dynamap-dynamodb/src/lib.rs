//! DynamoDB implementation of the dynamap [`Store`] trait.

mod op;
mod value;

pub(crate) use value::{from_sdk_item, to_sdk_item, to_sdk_value};

use aws_sdk_dynamodb::Client;
use url::Url;

use dynamap_core::{
    async_trait, Error, Item, Page, QueryRequest, Result, ScanRequest, Store, TableSchema,
};

/// A store backed by the AWS SDK DynamoDB client.
///
/// The store issues exactly one SDK request per operation and surfaces SDK
/// errors verbatim; retry and backpressure policy belongs to the SDK client
/// configuration beneath it.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    /// Handle to the AWS SDK client
    client: Client,
}

impl DynamoStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects to an endpoint named by a `dynamodb://host[:port]` URL,
    /// as used for local DynamoDB instances.
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(Error::store)?;

        if url.scheme() != "dynamodb" {
            return Err(Error::store(anyhow::anyhow!(
                "connection URL does not have a `dynamodb` scheme; url={url}"
            )));
        }

        use aws_config::BehaviorVersion;
        use aws_sdk_dynamodb::config::Credentials;

        let mut aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region("us-east-1")
            .credentials_provider(Credentials::for_tests());

        if let Some(host) = url.host() {
            let mut endpoint_url = format!("http://{host}");

            if let Some(port) = url.port() {
                endpoint_url.push_str(&format!(":{port}"));
            }

            aws_config = aws_config.endpoint_url(&endpoint_url);
        }

        let sdk_config = aws_config.load().await;

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }

    /// Connects using the ambient AWS environment configuration.
    pub async fn from_env() -> Result<Self> {
        use aws_config::BehaviorVersion;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Store for DynamoStore {
    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        self.exec_create_table(schema).await
    }

    async fn delete_table(&self, table: &str) -> Result<()> {
        self.exec_delete_table(table).await
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        self.exec_put_item(table, item).await
    }

    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>> {
        self.exec_get_item(table, key).await
    }

    async fn delete_item(&self, table: &str, key: Item) -> Result<()> {
        self.exec_delete_item(table, key).await
    }

    async fn query(&self, table: &str, request: QueryRequest) -> Result<Page> {
        self.exec_query(table, request).await
    }

    async fn scan(&self, table: &str, request: ScanRequest) -> Result<Page> {
        self.exec_scan(table, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_rejects_other_url_schemes() {
        let err = DynamoStore::connect("http://localhost:8000")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[tokio::test]
    async fn connect_rejects_unparsable_urls() {
        assert!(DynamoStore::connect("not a url").await.is_err());
    }
}
