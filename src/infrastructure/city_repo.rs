use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::customer::{City, CityId};
use crate::domain::errors::DomainError;
use crate::domain::ports::CityRepository;
use crate::schema::cities;

use super::models::CityRow;

pub struct DieselCityRepository {
    pool: DbPool,
}

impl DieselCityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        City {
            id: row.id,
            name: row.name,
            state: row.state,
        }
    }
}

impl CityRepository for DieselCityRepository {
    fn find_by_id(&self, id: CityId) -> Result<Option<City>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = cities::table
            .find(id)
            .select(CityRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(City::from))
    }
}
