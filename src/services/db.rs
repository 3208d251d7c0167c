use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::{PgPool, QueryBuilder};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;
use crate::core::filters::{like_pattern, FilterCriteria};
use crate::models::{
    CarRecord, CarSummary, CategoricalField, CategoryCount, EncodedOption, EncoderMap,
    ModelOption, NumericCount, UserAccount, UpdateUserRequest,
};

/// Errors that can occur when interacting with the database
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

const CAR_COLUMNS: &str = "id, make, model, year, price, mileage, body_type, cylinders, \
                           transmission, fuel_type, color, location, date, description";

const SUMMARY_COLUMNS: &str = "id, make, model, year, price, mileage, body_type, cylinders, \
                               transmission, fuel_type, color, location";

/// Read-mostly store over the encoded vehicle dataset plus the thin
/// user-account table.
///
/// Every query goes through bound parameters; filter values are never
/// interpolated into SQL text. The pool hands each request its own scoped
/// connection and reclaims it on every exit path.
pub struct CarStore {
    pool: PgPool,
}

impl CarStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, DbError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, DbError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    /// Count rows matching the filter criteria.
    ///
    /// Applies the exact same predicates as `list_cars` so the page and the
    /// total stay consistent.
    pub async fn count_cars(&self, filters: &FilterCriteria) -> Result<i64, DbError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM car_info");
        push_filters(&mut builder, filters);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Fetch one page of filtered records, newest id first.
    pub async fn list_cars(
        &self,
        filters: &FilterCriteria,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CarRecord>, DbError> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM car_info", CAR_COLUMNS));
        push_filters(&mut builder, filters);
        builder.push(" ORDER BY id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let cars = builder
            .build_query_as::<CarRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(cars)
    }

    pub async fn car_by_id(&self, id: i32) -> Result<Option<CarRecord>, DbError> {
        let car = sqlx::query_as::<_, CarRecord>(&format!(
            "SELECT {} FROM car_info WHERE id = $1",
            CAR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(car)
    }

    /// Exact make+model match, ordered year descending then price ascending.
    pub async fn similar_exact(
        &self,
        make: &str,
        model: &str,
    ) -> Result<Vec<CarSummary>, DbError> {
        let cars = sqlx::query_as::<_, CarSummary>(&format!(
            "SELECT {} FROM car_info WHERE make = $1 AND model = $2 \
             ORDER BY year DESC, price ASC",
            SUMMARY_COLUMNS
        ))
        .bind(make)
        .bind(model)
        .fetch_all(&self.pool)
        .await?;
        Ok(cars)
    }

    /// Substring fallback for inconsistently formatted model names.
    pub async fn similar_fuzzy(
        &self,
        make: &str,
        model: &str,
    ) -> Result<Vec<CarSummary>, DbError> {
        let cars = sqlx::query_as::<_, CarSummary>(&format!(
            "SELECT {} FROM car_info WHERE make ILIKE $1 AND model ILIKE $2 \
             ORDER BY year DESC, price ASC",
            SUMMARY_COLUMNS
        ))
        .bind(like_pattern(make))
        .bind(like_pattern(model))
        .fetch_all(&self.pool)
        .await?;
        Ok(cars)
    }

    /// Distinct (label, code) pairs for one categorical field, ascending by
    /// label. Column names come from the closed field enum, never from input.
    pub async fn distinct_options(
        &self,
        field: CategoricalField,
    ) -> Result<Vec<EncodedOption>, DbError> {
        let options = sqlx::query_as::<_, EncodedOption>(&format!(
            "SELECT DISTINCT {col} AS label, {enc} AS code FROM car_info \
             WHERE {col} IS NOT NULL ORDER BY label ASC",
            col = field.column(),
            enc = field.encoded_column(),
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(options)
    }

    /// Distinct make-qualified model options, ordered by make then model.
    pub async fn model_options(&self) -> Result<Vec<ModelOption>, DbError> {
        let options = sqlx::query_as::<_, ModelOption>(
            "SELECT DISTINCT make, model, model_encoded AS code FROM car_info \
             ORDER BY make ASC, model ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(options)
    }

    /// Distinct (model, code) pairs for one make, ascending by model.
    pub async fn models_for_make(&self, make: &str) -> Result<Vec<EncodedOption>, DbError> {
        let options = sqlx::query_as::<_, EncodedOption>(
            "SELECT DISTINCT model AS label, model_encoded AS code FROM car_info \
             WHERE make = $1 ORDER BY label ASC",
        )
        .bind(make)
        .fetch_all(&self.pool)
        .await?;
        Ok(options)
    }

    /// Load the immutable label-encoding snapshot served by the prediction
    /// options endpoint.
    pub async fn load_encoder_map(&self) -> Result<EncoderMap, DbError> {
        let mut options = HashMap::new();
        for field in CategoricalField::ALL {
            options.insert(field, self.distinct_options(field).await?);
        }
        let models = self.model_options().await?;

        tracing::info!(
            "Loaded encoder map ({} categorical fields, {} models)",
            options.len(),
            models.len()
        );

        Ok(EncoderMap::new(options, models))
    }

    /// Row counts per label for one categorical column, most frequent first.
    pub async fn category_counts(
        &self,
        field: CategoricalField,
        limit: Option<i64>,
    ) -> Result<Vec<CategoryCount>, DbError> {
        let mut sql = format!(
            "SELECT {col} AS label, COUNT(*) AS count FROM car_info \
             WHERE {col} IS NOT NULL GROUP BY 1 ORDER BY count DESC",
            col = field.column(),
        );
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }

        let counts = sqlx::query_as::<_, CategoryCount>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(counts)
    }

    /// Transaction counts per `YYYY-MM` month prefix, chronological.
    pub async fn month_counts(&self) -> Result<Vec<CategoryCount>, DbError> {
        let counts = sqlx::query_as::<_, CategoryCount>(
            "SELECT SUBSTRING(date, 1, 7) AS label, COUNT(*) AS count FROM car_info \
             GROUP BY 1 ORDER BY 1 ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Vehicle counts per production year, chronological.
    pub async fn year_counts(&self) -> Result<Vec<NumericCount>, DbError> {
        let counts = sqlx::query_as::<_, NumericCount>(
            "SELECT year AS value, COUNT(*) AS count FROM car_info \
             GROUP BY year ORDER BY year ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Vehicle counts per cylinder count, ascending; NULLs excluded.
    pub async fn cylinder_counts(&self) -> Result<Vec<NumericCount>, DbError> {
        let counts = sqlx::query_as::<_, NumericCount>(
            "SELECT cylinders AS value, COUNT(*) AS count FROM car_info \
             WHERE cylinders IS NOT NULL GROUP BY cylinders ORDER BY cylinders ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    pub async fn mileage_price_pairs(&self) -> Result<Vec<(i64, i64)>, DbError> {
        let pairs = sqlx::query_as::<_, (i64, i64)>("SELECT mileage, price FROM car_info")
            .fetch_all(&self.pool)
            .await?;
        Ok(pairs)
    }

    pub async fn year_price_pairs(&self) -> Result<Vec<(i32, i64)>, DbError> {
        let pairs = sqlx::query_as::<_, (i32, i64)>("SELECT year, price FROM car_info")
            .fetch_all(&self.pool)
            .await?;
        Ok(pairs)
    }

    pub async fn prices(&self) -> Result<Vec<i64>, DbError> {
        let prices = sqlx::query_scalar::<_, i64>("SELECT price FROM car_info")
            .fetch_all(&self.pool)
            .await?;
        Ok(prices)
    }

    pub async fn mileages(&self) -> Result<Vec<i64>, DbError> {
        let mileages = sqlx::query_scalar::<_, i64>("SELECT mileage FROM car_info")
            .fetch_all(&self.pool)
            .await?;
        Ok(mileages)
    }

    // --- user accounts (thin plumbing, not part of the analytics core) ---

    pub async fn count_users(&self, name: Option<&str>) -> Result<i64, DbError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM user_info");
        if let Some(name) = name {
            builder.push(" WHERE name ILIKE ");
            builder.push_bind(like_pattern(name));
        }

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_users(
        &self,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserAccount>, DbError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, name, role FROM user_info");
        if let Some(name) = name {
            builder.push(" WHERE name ILIKE ");
            builder.push_bind(like_pattern(name));
        }
        builder.push(" ORDER BY id ASC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let users = builder
            .build_query_as::<UserAccount>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn user_by_id(&self, id: i32) -> Result<Option<UserAccount>, DbError> {
        let user =
            sqlx::query_as::<_, UserAccount>("SELECT id, name, role FROM user_info WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    pub async fn user_name_exists(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbError> {
        let existing = match exclude_id {
            Some(id) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT id FROM user_info WHERE name = $1 AND id != $2",
                )
                .bind(name)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i32>("SELECT id FROM user_info WHERE name = $1")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(existing.is_some())
    }

    pub async fn create_user(
        &self,
        name: &str,
        password: &str,
        role: &str,
    ) -> Result<UserAccount, DbError> {
        let user = sqlx::query_as::<_, UserAccount>(
            "INSERT INTO user_info (name, password, role) VALUES ($1, $2, $3) \
             RETURNING id, name, role",
        )
        .bind(name)
        .bind(password)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Update the supplied fields only; caller guarantees at least one is set.
    pub async fn update_user(
        &self,
        id: i32,
        update: &UpdateUserRequest,
    ) -> Result<UserAccount, DbError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE user_info SET ");
        let mut fields = builder.separated(", ");
        if let Some(name) = &update.name {
            fields.push("name = ");
            fields.push_bind_unseparated(name.clone());
        }
        if let Some(password) = &update.password {
            fields.push("password = ");
            fields.push_bind_unseparated(password.clone());
        }
        if let Some(role) = &update.role {
            fields.push("role = ");
            fields.push_bind_unseparated(role.clone());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING id, name, role");

        let user = builder
            .build_query_as::<UserAccount>()
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM user_info WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Plaintext credential lookup; password hashing is out of scope here.
    pub async fn find_by_credentials(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, DbError> {
        let user = sqlx::query_as::<_, UserAccount>(
            "SELECT id, name, role FROM user_info WHERE name = $1 AND password = $2",
        )
        .bind(name)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// Append the WHERE clause for the supplied criteria.
///
/// Both the listing query and the count query go through here, so the two
/// always apply identical predicates.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &FilterCriteria) {
    if filters.is_empty() {
        return;
    }

    builder.push(" WHERE ");
    let mut conditions = builder.separated(" AND ");

    if let Some(make) = &filters.make {
        conditions.push("make ILIKE ");
        conditions.push_bind_unseparated(like_pattern(make));
    }
    if let Some(model) = &filters.model {
        conditions.push("model ILIKE ");
        conditions.push_bind_unseparated(like_pattern(model));
    }
    if let Some(year_min) = filters.year_min {
        conditions.push("year >= ");
        conditions.push_bind_unseparated(year_min);
    }
    if let Some(year_max) = filters.year_max {
        conditions.push("year <= ");
        conditions.push_bind_unseparated(year_max);
    }
    if let Some(price_min) = filters.price_min {
        conditions.push("price >= ");
        conditions.push_bind_unseparated(price_min);
    }
    if let Some(price_max) = filters.price_max {
        conditions.push("price <= ");
        conditions.push_bind_unseparated(price_max);
    }
    if let Some(mileage_min) = filters.mileage_min {
        conditions.push("mileage >= ");
        conditions.push_bind_unseparated(mileage_min);
    }
    if let Some(mileage_max) = filters.mileage_max {
        conditions.push("mileage <= ");
        conditions.push_bind_unseparated(mileage_max);
    }
    if let Some(body_type) = &filters.body_type {
        conditions.push("body_type ILIKE ");
        conditions.push_bind_unseparated(like_pattern(body_type));
    }
    if let Some(fuel_type) = &filters.fuel_type {
        conditions.push("fuel_type ILIKE ");
        conditions.push_bind_unseparated(like_pattern(fuel_type));
    }
    if let Some(transmission) = &filters.transmission {
        conditions.push("transmission ILIKE ");
        conditions.push_bind_unseparated(like_pattern(transmission));
    }
    if let Some(color) = &filters.color {
        conditions.push("color ILIKE ");
        conditions.push_bind_unseparated(like_pattern(color));
    }
    if let Some(location) = &filters.location {
        conditions.push("location ILIKE ");
        conditions.push_bind_unseparated(like_pattern(location));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sql_composition() {
        let filters = FilterCriteria {
            make: Some("Toyota".to_string()),
            year_min: Some(2015),
            ..Default::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM car_info");
        push_filters(&mut builder, &filters);
        let sql = builder.sql();

        assert!(sql.contains("WHERE"));
        assert!(sql.contains("make ILIKE"));
        assert!(sql.contains("AND year >="));
        // Values are bound parameters, never inlined.
        assert!(!sql.contains("Toyota"));
        assert!(!sql.contains("2015"));
    }

    #[test]
    fn test_empty_filters_add_no_clause() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM car_info");
        push_filters(&mut builder, &FilterCriteria::default());
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM car_info");
    }
}
