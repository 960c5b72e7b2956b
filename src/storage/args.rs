//! Positional bind arguments for ad-hoc test queries.

use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryScalar;
use std::fmt;
use uuid::Uuid;

/// PostgreSQL type a NULL argument is sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullKind {
    Bool,
    Int,
    Float,
    Text,
    Json,
    Uuid,
}

/// A value bound to a `$n` placeholder.
///
/// A NULL keeps the type of the value it stands in for, so `None::<i64>`
/// compares against a `BIGINT` column without a cast.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Null(NullKind),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(Value),
    Uuid(Uuid),
}

impl SqlArg {
    /// Bind this argument as the next placeholder of `query`.
    pub(crate) fn bind_to<'q, O>(
        &'q self,
        query: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        match self {
            SqlArg::Null(NullKind::Bool) => query.bind(None::<bool>),
            SqlArg::Null(NullKind::Int) => query.bind(None::<i64>),
            SqlArg::Null(NullKind::Float) => query.bind(None::<f64>),
            SqlArg::Null(NullKind::Text) => query.bind(None::<String>),
            SqlArg::Null(NullKind::Json) => query.bind(None::<Value>),
            SqlArg::Null(NullKind::Uuid) => query.bind(None::<Uuid>),
            SqlArg::Bool(v) => query.bind(*v),
            SqlArg::Int(v) => query.bind(*v),
            SqlArg::Float(v) => query.bind(*v),
            SqlArg::Text(v) => query.bind(v.as_str()),
            SqlArg::Json(v) => query.bind(v),
            SqlArg::Uuid(v) => query.bind(*v),
        }
    }
}

impl fmt::Display for SqlArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlArg::Null(_) => write!(f, "NULL"),
            SqlArg::Bool(v) => write!(f, "{}", v),
            SqlArg::Int(v) => write!(f, "{}", v),
            SqlArg::Float(v) => write!(f, "{}", v),
            SqlArg::Text(v) => write!(f, "{:?}", v),
            SqlArg::Json(v) => write!(f, "{}", v),
            SqlArg::Uuid(v) => write!(f, "{}", v),
        }
    }
}

/// Render an argument list as `[a, b, c]` for error contexts.
pub(crate) fn describe_args(args: &[SqlArg]) -> String {
    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// Rust types accepted as arguments, with the NULL kind their `None` binds as.
pub trait SqlType: Into<SqlArg> {
    const NULL_KIND: NullKind;
}

macro_rules! sql_type {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(impl SqlType for $ty {
            const NULL_KIND: NullKind = NullKind::$kind;
        })+
    };
}

sql_type! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    f64 => Float,
    &str => Text,
    String => Text,
    Value => Json,
    Uuid => Uuid,
}

impl From<bool> for SqlArg {
    fn from(v: bool) -> Self {
        SqlArg::Bool(v)
    }
}

impl From<i32> for SqlArg {
    fn from(v: i32) -> Self {
        SqlArg::Int(i64::from(v))
    }
}

impl From<i64> for SqlArg {
    fn from(v: i64) -> Self {
        SqlArg::Int(v)
    }
}

impl From<f64> for SqlArg {
    fn from(v: f64) -> Self {
        SqlArg::Float(v)
    }
}

impl From<&str> for SqlArg {
    fn from(v: &str) -> Self {
        SqlArg::Text(v.to_string())
    }
}

impl From<String> for SqlArg {
    fn from(v: String) -> Self {
        SqlArg::Text(v)
    }
}

impl From<Value> for SqlArg {
    fn from(v: Value) -> Self {
        SqlArg::Json(v)
    }
}

impl From<Uuid> for SqlArg {
    fn from(v: Uuid) -> Self {
        SqlArg::Uuid(v)
    }
}

impl<T: SqlType> From<Option<T>> for SqlArg {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlArg::Null(T::NULL_KIND), Into::into)
    }
}

/// Build a `Vec<SqlArg>` from heterogeneous values.
///
/// ```rust,ignore
/// let rows = select_json(&pool, "SELECT * FROM users WHERE id = $1", &sql_args![42]).await?;
/// ```
#[macro_export]
macro_rules! sql_args {
    () => {
        Vec::<$crate::storage::SqlArg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::storage::SqlArg::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversions() {
        assert_eq!(SqlArg::from(7), SqlArg::Int(7));
        assert_eq!(SqlArg::from("alice"), SqlArg::Text("alice".to_string()));
        assert_eq!(SqlArg::from(None::<i64>), SqlArg::Null(NullKind::Int));
        assert_eq!(SqlArg::from(None::<&str>), SqlArg::Null(NullKind::Text));
        assert_eq!(SqlArg::from(None::<Uuid>), SqlArg::Null(NullKind::Uuid));
        assert_eq!(SqlArg::from(None::<Value>), SqlArg::Null(NullKind::Json));
        assert_eq!(SqlArg::from(Some(true)), SqlArg::Bool(true));
        assert_eq!(SqlArg::from(json!({"a": 1})), SqlArg::Json(json!({"a": 1})));
    }

    #[test]
    fn test_sql_args_macro() {
        let args = sql_args![1, "two", 3.5, None::<String>];
        assert_eq!(
            args,
            vec![
                SqlArg::Int(1),
                SqlArg::Text("two".to_string()),
                SqlArg::Float(3.5),
                SqlArg::Null(NullKind::Text)
            ]
        );
        assert!(sql_args![].is_empty());
    }

    #[test]
    fn test_describe_args() {
        let args = sql_args![1, "a\"b", None::<i64>, json!([1, 2])];
        assert_eq!(describe_args(&args), r#"[1, "a\"b", NULL, [1,2]]"#);
        assert_eq!(describe_args(&[]), "[]");
        assert_eq!(describe_args(&[SqlArg::Null(NullKind::Bool)]), "[NULL]");
    }
}
