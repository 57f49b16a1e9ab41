use crate::application_port::ForumError;
use sqlx::mysql::{MySqlDatabaseError, MySqlRow};
use sqlx::{Decode, MySql, Row, Type};

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

/// Wraps `value` for a `LIKE` substring match, escaping the wildcards it contains.
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, ForumError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(name)
        .map_err(|e| ForumError::store(format!("decode {name}: {e}")))
}
