//! Blocking facade over `mongodb::sync::Client`
//!
//! Mirrors [`crate::MongoApi`] call for call; each method blocks the calling
//! thread until the driver's round trip completes. Thread-safety across
//! concurrent callers comes from the driver's connection pool.

use bson::{Bson, Document};
use mongo_api_common::Result;
use mongodb::{
    options::{ClientOptions, ReturnDocument, UpdateModifications},
    sync::{Client, Collection, Database},
};
use tracing::{debug, info, instrument};

use crate::config::ConnectConfig;
use crate::params;

/// Blocking CRUD facade bound to one database
#[derive(Debug, Clone)]
pub struct MongoApi {
    client: Client,
    db_name: String,
}

impl MongoApi {
    /// Connect with the default write-concern hint (`retryWrites=true&w=majority`).
    ///
    /// Rejects any `service` other than `"mongodb"` or `"mongodb+srv"` before
    /// touching the network.
    pub fn connect(
        address: &str,
        db_name: &str,
        username: &str,
        password: &str,
        service: &str,
    ) -> Result<Self> {
        let config = ConnectConfig::new(address, db_name, username, password, service)?;
        Self::with_config(config)
    }

    #[instrument(skip(config), fields(service = %config.service, address = %config.address, db = %config.db_name))]
    pub fn with_config(config: ConnectConfig) -> Result<Self> {
        let uri = config.connection_uri();
        let mut client_options = ClientOptions::parse(uri.as_str()).run()?;
        config.pool.apply(&mut client_options);

        let client = Client::with_options(client_options)?;
        debug!("MongoDB sync client created");

        Ok(Self {
            client,
            db_name: config.db_name,
        })
    }

    /// Close the connection and release pooled resources
    pub fn close(self) {
        info!(db = %self.db_name, "Closing MongoDB sync client");
        self.client.shutdown().run();
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> Database {
        self.client.database(&self.db_name)
    }

    /// Resolve a raw collection handle; never cached
    pub fn collection(&self, collection: &str) -> Collection<Document> {
        self.database().collection(collection)
    }

    pub fn find_one(
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
            .run()?;

        Ok(doc)
    }

    /// Return every matching document, fully buffered (`0` = no skip / no limit)
    pub fn find(
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
            .run()?;

        let docs = cursor.collect::<std::result::Result<Vec<Document>, _>>()?;
        Ok(docs)
    }

    pub fn insert_one(&self, collection: &str, document: Option<Document>) -> Result<Bson> {
        debug!(collection, "insert_one");
        let col = self.collection(collection);

        let result = col.insert_one(document.unwrap_or_default()).run()?;
        Ok(result.inserted_id)
    }

    /// Insert a batch; an absent or empty batch never reaches the server
    pub fn insert(&self, collection: &str, documents: Option<Vec<Document>>) -> Result<Vec<Bson>> {
        let documents = match documents {
            Some(docs) if !docs.is_empty() => docs,
            _ => {
                debug!(collection, "insert called with no documents, skipping");
                return Ok(Vec::new());
            }
        };

        debug!(collection, count = documents.len(), "insert");
        let col = self.collection(collection);

        let result = col.insert_many(documents).run()?;
        Ok(params::ordered_ids(result.inserted_ids))
    }

    pub fn update_one(
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
            .run()?;

        Ok(result.modified_count)
    }

    pub fn update(
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
            .run()?;

        Ok(result.modified_count)
    }

    pub fn delete_one(&self, collection: &str, filter: Option<Document>) -> Result<u64> {
        debug!(collection, "delete_one");
        let col = self.collection(collection);

        let result = col.delete_one(params::filter_or_all(filter)).run()?;
        Ok(result.deleted_count)
    }

    /// Delete every matching document; no filter empties the collection
    pub fn delete(&self, collection: &str, filter: Option<Document>) -> Result<u64> {
        debug!(collection, "delete");
        let col = self.collection(collection);

        let result = col.delete_many(params::filter_or_all(filter)).run()?;
        Ok(result.deleted_count)
    }

    pub fn count(&self, collection: &str, filter: Option<Document>) -> Result<u64> {
        debug!(collection, "count");
        let col = self.collection(collection);

        let count = col.count_documents(params::filter_or_all(filter)).run()?;
        Ok(count)
    }

    pub fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        debug!(collection, stages = pipeline.len(), "aggregate");
        let col = self.collection(collection);

        let cursor = col.aggregate(pipeline).run()?;
        let docs = cursor.collect::<std::result::Result<Vec<Document>, _>>()?;
        Ok(docs)
    }

    pub fn find_one_and_update(
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
            .run()?;

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongo_api_common::MongoApiError;

    fn local_api() -> MongoApi {
        let config = ConnectConfig::new("127.0.0.1:1", "app", "u", "p", "mongodb").unwrap();
        MongoApi::with_config(config).unwrap()
    }

    #[test]
    fn test_connect_rejects_unknown_scheme() {
        let result = MongoApi::connect("localhost", "app", "u", "p", "mongodb+tls");
        assert!(matches!(result, Err(MongoApiError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_collection_resolution() {
        let api = local_api();
        assert_eq!(api.db_name(), "app");
        assert_eq!(api.collection("nums").name(), "nums");
        assert_eq!(api.database().name(), "app");
    }

    #[test]
    fn test_insert_without_documents_short_circuits() {
        let api = local_api();
        assert!(api.insert("nums", None).unwrap().is_empty());
        assert!(api.insert("nums", Some(vec![])).unwrap().is_empty());
    }
}
