//! User table model.

/// A row of the `users` table as returned to API callers.
///
/// Serializes as a `[id, name]` JSON tuple rather than an object; the
/// users endpoint returns rows verbatim in this positional form.
pub type UserRow = (i32, String);

/// Name inserted on every call to the users endpoint.
pub const SEED_USER_NAME: &str = "Ahmed";

/// Idempotent declaration of the `users` table.
///
/// Never altered after creation; re-running against an existing table
/// is a no-op.
pub const USERS_TABLE_DDL: &str =
    "CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, name TEXT)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_row_serializes_as_tuple() {
        let rows: Vec<UserRow> = vec![(1, SEED_USER_NAME.to_string()), (2, "Bea".to_string())];
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(json, r#"[[1,"Ahmed"],[2,"Bea"]]"#);
    }
}
