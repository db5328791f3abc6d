//! Composable descriptions of single SQL statements.
//!
//! A [`QueryBuilder`] is pure data: it accumulates the shape of one statement
//! through chained configuration and renders it with [`QueryBuilder::build`].
//! Execution belongs to the store. Every caller-supplied value travels as a
//! bound parameter; nothing is concatenated into the statement text, so the
//! rendered SQL is injection-safe by construction.

use rusqlite::types::Value;

/// The kind of statement being described.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

/// Join flavor for select statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `LEFT JOIN` — parent rows survive with NULL child columns
    Left,
    /// `INNER JOIN`
    Inner,
}

impl JoinKind {
    fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Inner => "INNER JOIN",
        }
    }
}

/// Sort direction for `ORDER BY` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
struct Join {
    kind: JoinKind,
    table: String,
    from: String,
    to: String,
}

#[derive(Debug, Clone)]
struct Predicate {
    clause: String,
    params: Vec<Value>,
}

/// A rendered statement: SQL text plus its positional parameters.
#[derive(Debug, Clone)]
pub struct Query {
    /// Statement text with `?` placeholders
    pub sql: String,
    /// Values bound to the placeholders, in order
    pub params: Vec<Value>,
}

/// Immutable builder for one SQL statement.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    operation: Operation,
    table: String,
    fields: Vec<String>,
    assignments: Vec<(String, Value)>,
    predicates: Vec<Predicate>,
    joins: Vec<Join>,
    order: Option<(String, SortOrder)>,
}

impl QueryBuilder {
    fn new(operation: Operation, table: &str) -> Self {
        Self {
            operation,
            table: table.to_string(),
            fields: Vec::new(),
            assignments: Vec::new(),
            predicates: Vec::new(),
            joins: Vec::new(),
            order: None,
        }
    }

    /// Describes a `SELECT fields FROM table`.
    pub fn select(table: &str, fields: &[&str]) -> Self {
        let mut builder = Self::new(Operation::Select, table);
        builder.fields = fields.iter().map(|f| (*f).to_string()).collect();
        builder
    }

    /// Describes an `INSERT INTO table`; add columns with [`Self::value`].
    pub fn insert(table: &str) -> Self {
        Self::new(Operation::Insert, table)
    }

    /// Describes an `UPDATE table`; add assignments with [`Self::value`].
    pub fn update(table: &str) -> Self {
        Self::new(Operation::Update, table)
    }

    /// Describes a `DELETE FROM table`.
    pub fn delete(table: &str) -> Self {
        Self::new(Operation::Delete, table)
    }

    /// Adds one column/value pair to an insert or update.
    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.assignments.push((column.to_string(), value.into()));
        self
    }

    /// Adds a filter predicate with positional `?` placeholders. Multiple
    /// predicates are combined with `AND`.
    pub fn filter(mut self, clause: &str, params: Vec<Value>) -> Self {
        self.predicates.push(Predicate {
            clause: clause.to_string(),
            params,
        });
        self
    }

    /// Adds a `column IN (…)` predicate with one placeholder per value.
    ///
    /// An empty value list renders as a predicate matching nothing, keeping
    /// "filter by no identifiers" well-defined.
    pub fn filter_in(mut self, column: &str, values: Vec<Value>) -> Self {
        if values.is_empty() {
            self.predicates.push(Predicate {
                clause: "0 = 1".to_string(),
                params: Vec::new(),
            });
            return self;
        }

        let placeholders = vec!["?"; values.len()].join(", ");
        self.predicates.push(Predicate {
            clause: format!("{column} IN ({placeholders})"),
            params: values,
        });
        self
    }

    /// Adds a join clause to a select.
    pub fn join(mut self, kind: JoinKind, table: &str, from: &str, to: &str) -> Self {
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    /// Sets the `ORDER BY` expression.
    pub fn order_by(mut self, expression: &str, order: SortOrder) -> Self {
        self.order = Some((expression.to_string(), order));
        self
    }

    /// Renders the statement.
    pub fn build(self) -> Query {
        match self.operation {
            Operation::Select => self.build_select(),
            Operation::Insert => self.build_insert(),
            Operation::Update => self.build_update(),
            Operation::Delete => self.build_delete(),
        }
    }

    fn build_select(self) -> Query {
        let mut sql = format!("SELECT {} FROM {}", self.fields.join(", "), self.table);

        for join in &self.joins {
            sql.push_str(&format!(
                " {} {} ON {} = {}",
                join.kind.as_sql(),
                join.table,
                join.from,
                join.to
            ));
        }

        let mut params = Vec::new();
        Self::append_where(&mut sql, &mut params, self.predicates);

        if let Some((expression, order)) = &self.order {
            sql.push_str(&format!(" ORDER BY {expression} {}", order.as_sql()));
        }

        Query { sql, params }
    }

    fn build_insert(self) -> Query {
        let columns: Vec<&str> = self.assignments.iter().map(|(c, _)| c.as_str()).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        );
        let params = self.assignments.into_iter().map(|(_, v)| v).collect();

        Query { sql, params }
    }

    fn build_update(self) -> Query {
        let assignments: Vec<String> = self
            .assignments
            .iter()
            .map(|(c, _)| format!("{c} = ?"))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        let mut params: Vec<Value> = self.assignments.into_iter().map(|(_, v)| v).collect();
        Self::append_where(&mut sql, &mut params, self.predicates);

        Query { sql, params }
    }

    fn build_delete(self) -> Query {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        Self::append_where(&mut sql, &mut params, self.predicates);

        Query { sql, params }
    }

    fn append_where(sql: &mut String, params: &mut Vec<Value>, predicates: Vec<Predicate>) {
        if predicates.is_empty() {
            return;
        }

        let clauses: Vec<String> = predicates.iter().map(|p| p.clause.clone()).collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        for predicate in predicates {
            params.extend(predicate.params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_with_filter_and_order() {
        let query = QueryBuilder::select("events", &["id"])
            .filter("start_time >= DATE('now')", Vec::new())
            .order_by("id", SortOrder::Ascending)
            .build();

        assert_eq!(
            query.sql,
            "SELECT id FROM events WHERE start_time >= DATE('now') ORDER BY id ASC"
        );
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_select_with_joins() {
        let query = QueryBuilder::select("events", &["events.id", "rsvps.rsvp_id"])
            .join(JoinKind::Left, "rsvps", "events.id", "rsvps.event_id")
            .order_by("events.id", SortOrder::Ascending)
            .build();

        assert_eq!(
            query.sql,
            "SELECT events.id, rsvps.rsvp_id FROM events \
             LEFT JOIN rsvps ON events.id = rsvps.event_id ORDER BY events.id ASC"
        );
    }

    #[test]
    fn test_filter_in_expands_placeholders() {
        let query = QueryBuilder::select("events", &["id"])
            .filter_in("id", vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)])
            .build();

        assert_eq!(query.sql, "SELECT id FROM events WHERE id IN (?, ?, ?)");
        assert_eq!(query.params.len(), 3);
    }

    #[test]
    fn test_filter_in_empty_matches_nothing() {
        let query = QueryBuilder::select("events", &["id"])
            .filter_in("id", Vec::new())
            .build();

        assert_eq!(query.sql, "SELECT id FROM events WHERE 0 = 1");
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_insert_renders_columns_and_placeholders() {
        let query = QueryBuilder::insert("rsvps")
            .value("user_id", "u1".to_string())
            .value("event_id", 9i64)
            .value("accepted", -1i64)
            .value("comment", String::new())
            .build();

        assert_eq!(
            query.sql,
            "INSERT INTO rsvps (user_id, event_id, accepted, comment) VALUES (?, ?, ?, ?)"
        );
        assert_eq!(query.params.len(), 4);
    }

    #[test]
    fn test_update_orders_params_before_predicate() {
        let query = QueryBuilder::update("events")
            .value("name", "Picnic".to_string())
            .filter("id = ?", vec![Value::from(3i64)])
            .build();

        assert_eq!(query.sql, "UPDATE events SET name = ? WHERE id = ?");
        assert_eq!(query.params.len(), 2);
        assert_eq!(query.params[0], Value::Text("Picnic".to_string()));
        assert_eq!(query.params[1], Value::Integer(3));
    }

    #[test]
    fn test_delete_with_filter() {
        let query = QueryBuilder::delete("event_activities")
            .filter("event_id = ?", vec![Value::from(4i64)])
            .build();

        assert_eq!(
            query.sql,
            "DELETE FROM event_activities WHERE event_id = ?"
        );
    }

    #[test]
    fn test_values_never_appear_in_sql_text() {
        // Injection attempt stays inert inside a bound parameter.
        let hostile = "'; DROP TABLE events; --".to_string();
        let query = QueryBuilder::select("events", &["id"])
            .filter("name = ?", vec![Value::from(hostile.clone())])
            .build();

        assert!(!query.sql.contains("DROP TABLE"));
        assert_eq!(query.params[0], Value::Text(hostile));
    }

    #[test]
    fn test_multiple_predicates_joined_with_and() {
        let query = QueryBuilder::update("rsvps")
            .value("accepted", 1i64)
            .filter("event_id = ?", vec![Value::from(1i64)])
            .filter("rsvp_id = ?", vec![Value::from(2i64)])
            .build();

        assert_eq!(
            query.sql,
            "UPDATE rsvps SET accepted = ? WHERE event_id = ? AND rsvp_id = ?"
        );
    }
}
