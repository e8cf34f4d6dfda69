pub mod deploy;
pub mod keys;
pub mod list;
pub mod register;

/// True when `err` is a violation of the named unique constraint.
pub(crate) fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.constraint())
        == Some(constraint)
}
