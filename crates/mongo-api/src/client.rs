//! Asynchronous facade over `mongodb::Client`
//!
//! Every operation resolves a collection handle from the configured database,
//! forwards its arguments to the matching driver call and unwraps the driver's
//! result into a plain value. Nothing is cached, retried or validated locally;
//! driver errors reach the caller unchanged inside [`MongoApiError::MongoDB`].
//!
//! [`MongoApiError::MongoDB`]: mongo_api_common::MongoApiError::MongoDB

use bson::{Bson, Document};
use futures::TryStreamExt;
use mongo_api_common::Result;
use mongodb::{
    options::{ClientOptions, ReturnDocument, UpdateModifications},
    Client, Collection, Database,
};
use tracing::{debug, info, instrument};

use crate::config::ConnectConfig;
use crate::params;

/// Async CRUD facade bound to one database
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MongoApi {
    client: Client,
    db_name: String,
}

impl MongoApi {
    /// Connect with the default write-concern hint (`retryWrites=true&w=majority`).
    ///
    /// `service` must be `"mongodb"` or `"mongodb+srv"`; anything else fails with
    /// `InvalidConfiguration` before any network activity. No health check is
    /// performed: connection problems surface on first use.
    pub async fn connect(
        address: &str,
        db_name: &str,
        username: &str,
        password: &str,
        service: &str,
    ) -> Result<Self> {
        let config = ConnectConfig::new(address, db_name, username, password, service)?;
        Self::with_config(config).await
    }

    /// Connect using an explicit configuration
    #[instrument(skip(config), fields(service = %config.service, address = %config.address, db = %config.db_name))]
    pub async fn with_config(config: ConnectConfig) -> Result<Self> {
        let uri = config.connection_uri();
        let mut client_options = ClientOptions::parse(uri.as_str()).await?;
        config.pool.apply(&mut client_options);

        let client = Client::with_options(client_options)?;
        debug!("MongoDB client created");

        Ok(Self {
            client,
            db_name: config.db_name,
        })
    }

    /// Close the connection and release pooled resources
    pub async fn close(self) {
        info!(db = %self.db_name, "Closing MongoDB client");
        self.client.shutdown().await;
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Get a reference to the client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> Database {
        self.client.database(&self.db_name)
    }

    /// Resolve a collection handle for operations this facade does not cover.
    ///
    /// The collection does not need to exist; the server creates it on first write.
    pub fn collection(&self, collection: &str) -> Collection<Document> {
        self.database().collection(collection)
    }

    /// Return at most one document matching `filter`
    pub async fn find_one(
        &self,
        collection: &str,
        filter: Option<Document>,
        projection: Option<Document>,
        sort: Option<Document>,
    ) -> Result<Option<Document>> {
        debug!(collection, "find_one");
        let col = self.collection(collection);

        let doc = col
            .find_one(params::filter_or_all(filter))
            .with_options(params::find_one_options(projection, sort))
            .await?;

        Ok(doc)
    }

    /// Return every matching document, fully buffered.
    ///
    /// `skip == 0` skips nothing and `limit == 0` means no limit.
    pub async fn find(
        &self,
        collection: &str,
        filter: Option<Document>,
        projection: Option<Document>,
        sort: Option<Document>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Document>> {
        debug!(collection, skip, limit, "find");
        let col = self.collection(collection);

        let cursor = col
            .find(params::filter_or_all(filter))
            .with_options(params::find_options(projection, sort, skip, limit))
            .await?;

        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    /// Insert one document (an empty one if `None`) and return its `_id`
    pub async fn insert_one(&self, collection: &str, document: Option<Document>) -> Result<Bson> {
        debug!(collection, "insert_one");
        let col = self.collection(collection);

        let result = col.insert_one(document.unwrap_or_default()).await?;
        Ok(result.inserted_id)
    }

    /// Insert a batch and return the ids in input order.
    ///
    /// An absent or empty batch returns immediately without contacting the server.
    pub async fn insert(
        &self,
        collection: &str,
        documents: Option<Vec<Document>>,
    ) -> Result<Vec<Bson>> {
        let documents = match documents {
            Some(docs) if !docs.is_empty() => docs,
            _ => {
                debug!(collection, "insert called with no documents, skipping");
                return Ok(Vec::new());
            }
        };

        debug!(collection, count = documents.len(), "insert");
        let col = self.collection(collection);

        let result = col.insert_many(documents).await?;
        Ok(params::ordered_ids(result.inserted_ids))
    }

    /// Update at most one document and return the modified count.
    ///
    /// `update` is either an operator document or an aggregation pipeline
    /// (`Vec<Document>`); the server decides whether it is acceptable.
    pub async fn update_one(
        &self,
        collection: &str,
        filter: Option<Document>,
        update: impl Into<UpdateModifications>,
        upsert: bool,
    ) -> Result<u64> {
        debug!(collection, upsert, "update_one");
        let col = self.collection(collection);

        let result = col
            .update_one(params::filter_or_all(filter), update)
            .with_options(params::update_options(upsert))
            .await?;

        Ok(result.modified_count)
    }

    /// Update every matching document and return the modified count
    pub async fn update(
        &self,
        collection: &str,
        filter: Option<Document>,
        update: impl Into<UpdateModifications>,
        upsert: bool,
    ) -> Result<u64> {
        debug!(collection, upsert, "update");
        let col = self.collection(collection);

        let result = col
            .update_many(params::filter_or_all(filter), update)
            .with_options(params::update_options(upsert))
            .await?;

        Ok(result.modified_count)
    }

    pub async fn delete_one(&self, collection: &str, filter: Option<Document>) -> Result<u64> {
        debug!(collection, "delete_one");
        let col = self.collection(collection);

        let result = col.delete_one(params::filter_or_all(filter)).await?;
        Ok(result.deleted_count)
    }

    /// Delete every matching document.
    ///
    /// With no filter this empties the collection.
    pub async fn delete(&self, collection: &str, filter: Option<Document>) -> Result<u64> {
        debug!(collection, "delete");
        let col = self.collection(collection);

        let result = col.delete_many(params::filter_or_all(filter)).await?;
        Ok(result.deleted_count)
    }

    /// Count matching documents server-side
    pub async fn count(&self, collection: &str, filter: Option<Document>) -> Result<u64> {
        debug!(collection, "count");
        let col = self.collection(collection);

        let count = col.count_documents(params::filter_or_all(filter)).await?;
        Ok(count)
    }

    /// Run an aggregation pipeline and buffer the results
    pub async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        debug!(collection, stages = pipeline.len(), "aggregate");
        let col = self.collection(collection);

        let cursor = col.aggregate(pipeline).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    /// Atomically find one document, update it and return it.
    ///
    /// `return_document` picks the pre- or post-update state. Returns `None`
    /// when nothing matched.
    pub async fn find_one_and_update(
        &self,
        collection: &str,
        update: impl Into<UpdateModifications>,
        filter: Option<Document>,
        projection: Option<Document>,
        sort: Option<Document>,
        return_document: ReturnDocument,
    ) -> Result<Option<Document>> {
        debug!(collection, "find_one_and_update");
        let col = self.collection(collection);

        let doc = col
            .find_one_and_update(params::filter_or_all(filter), update)
            .with_options(params::find_one_and_update_options(projection, sort, return_document))
            .await?;

        Ok(doc)
    }
}
