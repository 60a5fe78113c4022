//! Database related things: configuration and connecting to the store.

use std::sync::Arc;

use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    prelude::*,
    store::{Collection, MemoryCollection, MongoCollection, Store},
};


#[derive(Debug, confique::Config)]
pub(crate) struct DbConfig {
    /// Which store to use.
    ///
    /// - "mongodb": the MongoDB deployment at `uri`.
    /// - "memory": everything is kept in process memory and lost when the
    ///   process exits. Only useful for trying things out.
    #[config(default = "mongodb")]
    pub(crate) kind: StoreKind,

    /// MongoDB connection string. May contain credentials.
    #[config(default = "mongodb://127.0.0.1:27017", env = "FILMOGRAPHY_DB_URI")]
    uri: SecretString,

    /// The name of the database to use.
    #[config(default = "rdt", env = "FILMOGRAPHY_DB_NAME")]
    pub(crate) database: String,

    /// Name of the collection holding movies.
    #[config(default = "movies")]
    pub(crate) movies_collection: String,

    /// Name of the collection holding people.
    #[config(default = "people")]
    pub(crate) people_collection: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StoreKind {
    MongoDb,
    Memory,
}

/// Creates the store described by `config`. For MongoDB, the connection is
/// tested and missing collections are created before returning.
pub(crate) async fn connect(config: &DbConfig) -> Result<Store> {
    let (movies, people): (Arc<dyn Collection>, Arc<dyn Collection>) = match config.kind {
        StoreKind::Memory => {
            warn!("Using in-memory store: all data is lost when this process exits");
            (
                Arc::new(MemoryCollection::new(&config.movies_collection)),
                Arc::new(MemoryCollection::new(&config.people_collection)),
            )
        }
        StoreKind::MongoDb => {
            let db = open_database(config).await?;
            ensure_collections(&db, config).await?;
            (
                Arc::new(MongoCollection::new(db.collection(&config.movies_collection))),
                Arc::new(MongoCollection::new(db.collection(&config.people_collection))),
            )
        }
    };

    Ok(Store::new(movies, people))
}

pub(crate) async fn open_database(config: &DbConfig) -> Result<Database> {
    let options = ClientOptions::parse(config.uri.expose_secret())
        .await
        .context("invalid MongoDB connection string `db.uri`")?;
    let hosts = options.hosts.iter().map(ToString::to_string).collect::<Vec<_>>();
    debug!("Connecting to MongoDB at {} (database '{}')", hosts.join(", "), config.database);

    let client = Client::with_options(options).context("failed to create MongoDB client")?;
    let db = client.database(&config.database);

    // Test the connection. Creating the client does not talk to the server.
    db.run_command(doc! { "ping": 1 })
        .await
        .context("failed to reach MongoDB (database not running?)")?;
    info!("Connected to MongoDB database '{}'", config.database);

    Ok(db)
}

/// Creates the configured collections if they do not exist yet. Returns the
/// names of the created ones.
pub(crate) async fn ensure_collections(db: &Database, config: &DbConfig) -> Result<Vec<String>> {
    let existing = db.list_collection_names()
        .await
        .context("failed to list collections")?;
    let wanted = [config.movies_collection.as_str(), config.people_collection.as_str()];

    let missing = missing_collections(&existing, &wanted);
    for name in &missing {
        db.create_collection(name)
            .await
            .with_context(|| format!("failed to create collection '{name}'"))?;
        info!("Created collection '{name}' in database '{}'", db.name());
    }
    if missing.is_empty() {
        debug!("All collections exist");
    }

    Ok(missing)
}

fn missing_collections(existing: &[String], wanted: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for &name in wanted {
        if !existing.iter().any(|e| e == name) && !out.iter().any(|o| o == name) {
            out.push(name.to_owned());
        }
    }
    out
}
