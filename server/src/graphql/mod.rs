mod inputs;
mod mutation;
mod query;
mod types;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, ID, Object, Schema, SimpleObject};
use platform_api::{ApiError, ApiResult};
use products_hr::HrResult;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::instrument;

use crate::config::AppConfig;

pub use mutation::HrMutation;
pub use query::HrQuery;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .data(config)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> ApiResult<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> ApiResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    async fn hr(&self) -> HrQuery {
        HrQuery
    }
}

#[Object]
impl MutationRoot {
    async fn hr(&self) -> HrMutation {
        HrMutation
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}

/// Lift a service result into a GraphQL result carrying the error code.
pub(crate) trait IntoGql<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T> IntoGql<T> for HrResult<T> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|err| ApiError::from(err).extend())
    }
}

pub(crate) fn database(ctx: &Context<'_>) -> async_graphql::Result<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .cloned()
        .map_err(|_| ApiError::internal(anyhow::anyhow!("missing database connection")).extend())
}

/// Actor recorded on transitions when the caller names none.
pub(crate) fn actor(ctx: &Context<'_>, given: Option<String>) -> Option<String> {
    given
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            ctx.data::<Arc<AppConfig>>()
                .ok()
                .map(|config| config.default_actor.clone())
        })
}

pub(crate) fn parse_id(field: &str, id: &ID) -> async_graphql::Result<i32> {
    id.as_str()
        .trim()
        .parse::<i32>()
        .map_err(|_| ApiError::invalid_input(field, "invalid id").extend())
}
