use std::collections::BTreeSet;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::domain::access::{CustomerId, Profile};
use crate::domain::customer::{
    Address, City, Customer, CustomerKind, CustomerSort, CustomerSortField, CustomerSummary,
    CustomerUpdate, NewCustomer,
};
use crate::domain::errors::DomainError;
use crate::domain::page::{Page, PageRequest, SortDirection};
use crate::domain::ports::CustomerRepository;
use crate::schema::{addresses, cities, customer_profiles, customers, phones};

use super::models::{
    AddressRow, CityRow, CustomerChangeset, CustomerProfileRow, CustomerRow, NewAddressRow,
    NewCustomerRow, PhoneRow,
};

fn email_taken(e: DieselError) -> DomainError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::DataIntegrity("email already registered".to_string())
        }
        other => other.into(),
    }
}

fn has_orders(e: DieselError) -> DomainError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DomainError::DataIntegrity("cannot delete a customer that has orders".to_string())
        }
        other => other.into(),
    }
}

/// Load profiles, addresses (with their city) and phones for one customer row.
fn load_aggregate(conn: &mut PgConnection, row: CustomerRow) -> Result<Customer, DomainError> {
    let profiles = customer_profiles::table
        .filter(customer_profiles::customer_id.eq(row.id))
        .select(customer_profiles::profile)
        .load::<i32>(conn)?
        .into_iter()
        .map(Profile::from_code)
        .collect::<Result<BTreeSet<_>, _>>()?;

    let address_list = addresses::table
        .inner_join(cities::table)
        .filter(addresses::customer_id.eq(row.id))
        .order(addresses::id.asc())
        .select((AddressRow::as_select(), CityRow::as_select()))
        .load::<(AddressRow, CityRow)>(conn)?
        .into_iter()
        .map(|(a, c)| Address {
            id: a.id,
            street: a.street,
            number: a.number,
            complement: a.complement,
            district: a.district,
            zip_code: a.zip_code,
            city: City::from(c),
        })
        .collect();

    let phone_set = phones::table
        .filter(phones::customer_id.eq(row.id))
        .select(phones::number)
        .load::<String>(conn)?
        .into_iter()
        .collect();

    Ok(Customer {
        id: row.id,
        name: row.name,
        email: row.email,
        document: row.document,
        kind: CustomerKind::from_code(row.kind)?,
        profiles,
        addresses: address_list,
        phones: phone_set,
    })
}

fn summary((id, name, email): (i32, String, String)) -> CustomerSummary {
    CustomerSummary { id, name, email }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CustomerRepository for DieselCustomerRepository {
    fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. The customer row; the database assigns the id.
            let id: i32 = diesel::insert_into(customers::table)
                .values(&NewCustomerRow {
                    name: &customer.name,
                    email: &customer.email,
                    document: &customer.document,
                    kind: customer.kind.code(),
                    password_hash: &customer.password_hash,
                })
                .returning(customers::id)
                .get_result(conn)
                .map_err(email_taken)?;

            // 2. Profiles, addresses and phones of the aggregate.
            let profile_rows: Vec<CustomerProfileRow> = customer
                .profiles
                .iter()
                .map(|p| CustomerProfileRow {
                    customer_id: id,
                    profile: p.code(),
                })
                .collect();
            if !profile_rows.is_empty() {
                diesel::insert_into(customer_profiles::table)
                    .values(&profile_rows)
                    .execute(conn)?;
            }

            let address_rows: Vec<NewAddressRow> = customer
                .addresses
                .iter()
                .map(|a| NewAddressRow {
                    street: &a.street,
                    number: &a.number,
                    complement: a.complement.as_deref(),
                    district: &a.district,
                    zip_code: &a.zip_code,
                    customer_id: id,
                    city_id: a.city_id,
                })
                .collect();
            if !address_rows.is_empty() {
                diesel::insert_into(addresses::table)
                    .values(&address_rows)
                    .execute(conn)?;
            }

            let phone_rows: Vec<PhoneRow> = customer
                .phones
                .iter()
                .map(|n| PhoneRow {
                    customer_id: id,
                    number: n,
                })
                .collect();
            if !phone_rows.is_empty() {
                diesel::insert_into(phones::table)
                    .values(&phone_rows)
                    .execute(conn)?;
            }

            let row = customers::table
                .find(id)
                .select(CustomerRow::as_select())
                .first(conn)?;
            load_aggregate(conn, row)
        })
    }

    fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .find(id)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|r| load_aggregate(&mut conn, r)).transpose()
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .filter(customers::email.eq(email))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|r| load_aggregate(&mut conn, r)).transpose()
    }

    fn update(&self, id: CustomerId, changes: &CustomerUpdate) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(customers::table.find(id))
            .set(&CustomerChangeset {
                name: &changes.name,
                email: &changes.email,
            })
            .execute(&mut conn)
            .map_err(email_taken)?;

        if updated == 0 {
            return Err(DomainError::not_found("Customer", id));
        }
        Ok(())
    }

    fn delete(&self, id: CustomerId) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Addresses, phones and profiles go with the row (ON DELETE CASCADE);
        // orders do not, so a customer with orders fails here.
        let deleted = diesel::delete(customers::table.find(id))
            .execute(&mut conn)
            .map_err(has_orders)?;

        if deleted == 0 {
            return Err(DomainError::not_found("Customer", id));
        }
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<CustomerSummary>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = customers::table
            .select((customers::id, customers::name, customers::email))
            .order((customers::name.asc(), customers::id.asc()))
            .load::<(i32, String, String)>(&mut conn)?;

        Ok(rows.into_iter().map(summary).collect())
    }

    fn find_page(
        &self,
        request: PageRequest,
        sort: CustomerSort,
    ) -> Result<Page<CustomerSummary>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = customers::table.count().get_result(conn)?;

            let query = customers::table
                .select((customers::id, customers::name, customers::email))
                .into_boxed();
            let query = match (sort.field, sort.direction) {
                (CustomerSortField::Name, SortDirection::Asc) => query.order(customers::name.asc()),
                (CustomerSortField::Name, SortDirection::Desc) => query.order(customers::name.desc()),
                (CustomerSortField::Email, SortDirection::Asc) => query.order(customers::email.asc()),
                (CustomerSortField::Email, SortDirection::Desc) => {
                    query.order(customers::email.desc())
                }
                (CustomerSortField::Id, SortDirection::Asc) => query.order(customers::id.asc()),
                (CustomerSortField::Id, SortDirection::Desc) => query.order(customers::id.desc()),
            };

            let rows = query
                .then_order_by(customers::id.asc())
                .limit(request.size)
                .offset(request.offset())
                .load::<(i32, String, String)>(conn)?;

            Ok(Page::new(
                rows.into_iter().map(summary).collect(),
                total,
                request,
            ))
        })
    }
}
