use sqlx::{postgres::PgArguments, query::QueryAs, FromRow, Postgres};
use uuid::Uuid;

use super::manager::DatabaseError;

/// Typed bind parameter; Postgres won't compare uuid columns against text
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    Int(i64),
}

impl From<Uuid> for SqlParam {
    fn from(v: Uuid) -> Self {
        SqlParam::Uuid(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
struct Condition {
    column: String,
    value: SqlParam,
}

#[derive(Debug, Clone)]
struct OrderInfo {
    column: String,
    sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Parameterized SELECT over a single table with equality pushdown,
/// ordering and limit
#[derive(Debug, Clone)]
pub struct SqlQuery {
    table_name: String,
    select_columns: Vec<String>,
    conditions: Vec<Condition>,
    order: Vec<OrderInfo>,
    limit: Option<i64>,
}

impl SqlQuery {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        validate_identifier(&table_name)?;
        Ok(Self {
            table_name,
            select_columns: vec![],
            conditions: vec![],
            order: vec![],
            limit: None,
        })
    }

    pub fn select(mut self, columns: &[&str]) -> Result<Self, DatabaseError> {
        for column in columns {
            validate_identifier(column)?;
        }
        self.select_columns = columns.iter().map(|c| c.to_string()).collect();
        Ok(self)
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<SqlParam>) -> Result<Self, DatabaseError> {
        validate_identifier(column)?;
        self.conditions.push(Condition { column: column.to_string(), value: value.into() });
        Ok(self)
    }

    pub fn order_by(mut self, column: &str, sort: SortDirection) -> Result<Self, DatabaseError> {
        validate_identifier(column)?;
        self.order.push(OrderInfo { column: column.to_string(), sort });
        Ok(self)
    }

    /// "created_at desc, rating asc"
    pub fn order_str(mut self, order: &str) -> Result<Self, DatabaseError> {
        for part in order.split(',') {
            let mut it = part.split_whitespace();
            let Some(column) = it.next() else { continue };
            let sort = match it.next() {
                Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                None => SortDirection::Asc,
                Some(other) => {
                    return Err(DatabaseError::QueryError(format!("Invalid sort direction: {}", other)))
                }
            };
            self = self.order_by(column, sort)?;
        }
        Ok(self)
    }

    pub fn limit(mut self, limit: i64) -> Result<Self, DatabaseError> {
        if limit < 0 {
            return Err(DatabaseError::QueryError("Limit must be non-negative".to_string()));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut params = Vec::new();

        let select_clause = if self.select_columns.is_empty() {
            "*".to_string()
        } else {
            self.select_columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
        };

        let mut where_parts = Vec::new();
        for Condition { column, value } in &self.conditions {
            params.push(value.clone());
            where_parts.push(format!("{} = ${}", quote(column), params.len()));
        }

        let order_clause = if self.order.is_empty() {
            String::new()
        } else {
            let parts: Vec<String> = self
                .order
                .iter()
                .map(|o| format!("{} {}", quote(&o.column), o.sort.to_sql()))
                .collect();
            format!("ORDER BY {}", parts.join(", "))
        };

        let query = [
            format!("SELECT {}", select_clause),
            format!("FROM {}", quote(&self.table_name)),
            if where_parts.is_empty() { String::new() } else { format!("WHERE {}", where_parts.join(" AND ")) },
            order_clause,
            self.limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    pub async fn fetch_all<T>(&self, pool: &sqlx::PgPool) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let sql = self.to_sql();
        let q = bind_params(sqlx::query_as::<_, T>(&sql.query), &sql.params);
        Ok(q.fetch_all(pool).await?)
    }

    pub async fn fetch_optional<T>(&self, pool: &sqlx::PgPool) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let sql = self.to_sql();
        let q = bind_params(sqlx::query_as::<_, T>(&sql.query), &sql.params);
        Ok(q.fetch_optional(pool).await?)
    }
}

pub fn bind_params<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for p in params {
        q = match p {
            SqlParam::Uuid(v) => q.bind(*v),
            SqlParam::Text(v) => q.bind(v.as_str()),
            SqlParam::Int(v) => q.bind(*v),
        };
    }
    q
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DatabaseError::QueryError(format!("Invalid identifier: {}", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filtered_ordered_query() {
        let instructor = Uuid::new_v4();
        let sql = SqlQuery::new("reviews")
            .unwrap()
            .where_eq("instructor_id", instructor)
            .unwrap()
            .order_str("created_at desc")
            .unwrap()
            .limit(10)
            .unwrap()
            .to_sql();

        assert_eq!(
            sql.query,
            "SELECT * FROM \"reviews\" WHERE \"instructor_id\" = $1 ORDER BY \"created_at\" DESC LIMIT 10"
        );
        assert_eq!(sql.params, vec![SqlParam::Uuid(instructor)]);
    }

    #[test]
    fn numbers_params_across_conditions() {
        let sql = SqlQuery::new("reviews")
            .unwrap()
            .select(&["instructor_id", "rating"])
            .unwrap()
            .where_eq("instructor_id", Uuid::nil())
            .unwrap()
            .where_eq("reviewer_id", Uuid::new_v4())
            .unwrap()
            .to_sql();

        assert_eq!(
            sql.query,
            "SELECT \"instructor_id\", \"rating\" FROM \"reviews\" WHERE \"instructor_id\" = $1 AND \"reviewer_id\" = $2"
        );
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn rejects_injection_in_identifiers() {
        assert!(SqlQuery::new("reviews; DROP TABLE reviews").is_err());
        assert!(SqlQuery::new("reviews").unwrap().where_eq("id\" OR 1=1", "x").is_err());
        assert!(SqlQuery::new("reviews").unwrap().order_str("created_at sideways").is_err());
        assert!(SqlQuery::new("1reviews").is_err());
    }
}
