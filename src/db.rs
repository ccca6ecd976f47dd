use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres, Row};
use std::time::Duration;

use crate::{
    api::CuratedStore,
    entities::{Location, Place, RECOMMENDATION_LIMIT, SEARCH_RADIUS_METERS},
    error::{database_error, Error},
};

/// `earthdistance`'s `<@>` operator measures in statute miles; curated radii have
/// always been converted with 1.6 km to the mile.
pub fn radius_in_miles(meters: f64) -> f64 {
    meters / 1000.0 / 1.6
}

pub struct PgStore {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32, timeout: Duration) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect(db_uri)
            .await?;

        pool.execute("CREATE EXTENSION IF NOT EXISTS cube").await?;
        pool.execute("CREATE EXTENSION IF NOT EXISTS earthdistance")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS places (googleid VARCHAR PRIMARY KEY, name VARCHAR NOT NULL, location POINT NOT NULL)")
            .await?;

        Ok(Self { pool, timeout })
    }

    async fn query_nearby(&self, location: &Location) -> Result<Vec<Place>, Error> {
        let query = "
            SELECT
                googleid,
                name,
                location <@> point($1, $2) AS distance
            FROM
                places
            WHERE
                location <@> point($1, $2) < $3
            ORDER BY
                distance ASC
            LIMIT $4
        ";

        let mut conn = self.pool.acquire().await?;
        let mut rows = conn.fetch(
            sqlx::query(query)
                .bind(location.longitude())
                .bind(location.latitude())
                .bind(radius_in_miles(f64::from(SEARCH_RADIUS_METERS)))
                .bind(RECOMMENDATION_LIMIT as i64),
        );

        let mut places = vec![];

        while let Some(row) = rows.try_next().await? {
            if places.len() == RECOMMENDATION_LIMIT {
                break;
            }

            let id: String = row.try_get("googleid")?;
            let name: String = row.try_get("name")?;

            places.push(Place::stub(id, name));
        }

        Ok(places)
    }
}

#[async_trait]
impl CuratedStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn lookup(&self, location: &Location) -> Result<Vec<Place>, Error> {
        let places = tokio::time::timeout(self.timeout, self.query_nearby(location))
            .await
            .map_err(database_error)??;

        tracing::debug!("found {} curated places", places.len());

        Ok(places)
    }
}

#[test]
fn search_radius_matches_half_a_kilometre() {
    assert_eq!(radius_in_miles(f64::from(SEARCH_RADIUS_METERS)), 0.3125);
}

#[test]
#[ignore = "needs a postgres instance with the earthdistance extension"]
fn lookup_against_live_database() {
    use tokio_test::block_on;

    let url = std::env::var("DATABASE_URL").unwrap();
    let store = block_on(PgStore::new(&url, 5, Duration::from_secs(5))).unwrap();
    let location = Location::new(37.483872693672, -122.14900441942).unwrap();

    let places = block_on(store.lookup(&location)).unwrap();

    assert!(places.len() <= RECOMMENDATION_LIMIT);
}
