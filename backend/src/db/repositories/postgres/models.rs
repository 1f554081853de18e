use diesel::prelude::*;

use super::schema::facts;
use crate::api::{Fact, FactId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = facts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FactRow {
    pub id: i64,
    pub fact: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = facts)]
pub struct NewFactRow {
    pub fact: String,
}

impl From<FactRow> for Fact {
    fn from(row: FactRow) -> Self {
        Fact {
            id: FactId(row.id),
            fact: row.fact,
        }
    }
}
