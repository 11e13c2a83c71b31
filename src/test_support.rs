//! Fully in-memory wiring for service and route tests, plus a Postgres
//! container for repository tests.

use std::sync::Arc;

use sqlx::{Executor, PgPool};
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use crate::{
	adapters::{
		object_storage::MemoryObjectStorage,
		repositories::MemoryRepository,
		users::StaticUserDirectory,
	},
	bootstrap::{AppState, Bootstrap},
	config::Config,
	dependencies::Dependency,
	database::connection_pool,
	domain::{comment::entity::Comment, id::ObjectId, post::entity::Post},
	services::background::TokioTaskRunner,
};

pub const ALICE: &str = "507f1f77bcf86cd799439011";
pub const BOB: &str = "507f1f77bcf86cd799439012";
pub const CHARLIE: &str = "507f1f77bcf86cd799439013";

pub struct TestContext {
	pub config: Config,
	pub posts: Arc<MemoryRepository<Post>>,
	pub comments: Arc<MemoryRepository<Comment>>,
	pub users: Arc<StaticUserDirectory>,
	pub storage: Arc<MemoryObjectStorage>,
	pub tasks: Arc<TokioTaskRunner>,
}

impl TestContext {
	pub fn new() -> Self {
		Self {
			config: Config {
				public_bucket_url: "https://cdn.example.com/".into(),
				..Config::default()
			},
			posts: Arc::new(MemoryRepository::new()),
			comments: Arc::new(MemoryRepository::new()),
			users: Arc::new(StaticUserDirectory::seeded()),
			storage: Arc::new(MemoryObjectStorage::new()),
			tasks: Arc::new(TokioTaskRunner::new()),
		}
	}

	pub fn dependency(&self) -> Dependency {
		Dependency {
			posts: self.posts.clone(),
			comments: self.comments.clone(),
			users: self.users.clone(),
			storage: self.storage.clone(),
			tasks: self.tasks.clone(),
		}
	}

	/// Every call wires new services over the same stores.
	pub fn app_state(&self) -> AppState {
		Bootstrap::wire(&self.config, self.dependency())
	}
}

/// One container per test run. The container lives in a static and is never
/// dropped; the testcontainers reaper removes it when the run ends.
struct SharedPostgres {
	url: String,
	_container: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
	async fn get() -> &'static Self {
		SHARED_POSTGRES
			.get_or_init(|| async {
				let container = Postgres::default().with_tag("16").start().await.expect("failed to start Postgres container");
				let host = container.get_host().await.unwrap();
				let port = container.get_host_port_ipv4(5432).await.unwrap();
				Self {
					url: format!("postgresql://postgres:postgres@{host}:{port}"),
					_container: container,
				}
			})
			.await
	}
}

/// A freshly migrated database of its own, so tests listing posts never see
/// each other's rows.
pub async fn postgres_pool() -> PgPool {
	let shared = SharedPostgres::get().await;
	let database = format!("feed_{}", ObjectId::new().to_hex());

	let admin = PgPool::connect(&format!("{}/postgres", shared.url)).await.unwrap();
	admin.execute(format!(r#"CREATE DATABASE "{database}""#).as_str()).await.unwrap();
	admin.close().await;

	connection_pool(&format!("{}/{database}", shared.url), 4).await.unwrap()
}
