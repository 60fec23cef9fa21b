//! Full statement text composition.
//!
//! Pure composition over pre-built clause bodies; escaping is the
//! business of [`crate::literal`] and the clause builders. All builders
//! trim the final text so downstream logging and comparison are stable.

/// Build a SELECT statement.
///
/// An empty projection selects `*`. Empty where/sort bodies omit their
/// clauses; `None` omits OFFSET/LIMIT.
pub fn build_select(
    table: &str,
    projection: &str,
    where_body: &str,
    sort_body: &str,
    offset: Option<u64>,
    limit: Option<u64>,
) -> String {
    let mut sql = String::from("SELECT ");
    let projection = projection.trim();
    sql.push_str(if projection.is_empty() { "*" } else { projection });
    sql.push_str(" FROM ");
    sql.push_str(table);
    push_where(&mut sql, where_body);
    let sort_body = sort_body.trim();
    if !sort_body.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(sort_body);
    }
    if let Some(n) = offset {
        sql.push_str(" OFFSET ");
        sql.push_str(&n.to_string());
    }
    if let Some(n) = limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&n.to_string());
    }
    sql.trim().to_string()
}

/// Build an INSERT statement from order-aligned column and value lists.
pub fn build_insert(table: &str, columns: &str, values: &str) -> String {
    format!("INSERT INTO {table} ({columns}) VALUES ({values})")
        .trim()
        .to_string()
}

/// Build an UPDATE statement.
pub fn build_update(table: &str, set_body: &str, where_body: &str) -> String {
    let mut sql = format!("UPDATE {table} SET {}", set_body.trim());
    push_where(&mut sql, where_body);
    sql.trim().to_string()
}

/// Build a DELETE statement.
///
/// `DELETE ... LIMIT` is engine-dependent; the clause is emitted when a
/// limit is given and it is the caller's business whether the target
/// engine accepts it.
pub fn build_delete(table: &str, where_body: &str, limit: Option<u64>) -> String {
    let mut sql = format!("DELETE FROM {table}");
    push_where(&mut sql, where_body);
    if let Some(n) = limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&n.to_string());
    }
    sql.trim().to_string()
}

fn push_where(sql: &mut String, where_body: &str) {
    let where_body = where_body.trim();
    if !where_body.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_body);
    }
}
