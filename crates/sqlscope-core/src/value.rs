//! Bind values.
//!
//! A [`Value`] pairs a runtime [`Datum`] with the [`SqlType`] it is bound
//! as. The two are kept apart because one datum can require different
//! binding behavior: an enum may be bound by ordinal or by name, and an
//! `i32` and an `i64` holding the same number are different bind values.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

/// The SQL type a value is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// BOOLEAN.
    Boolean,
    /// SMALLINT (`i8`, `i16`, `u8`).
    SmallInt,
    /// INTEGER (`i32`, `u16`).
    Integer,
    /// BIGINT (`i64`, `u32`).
    BigInt,
    /// REAL (`f32`).
    Real,
    /// DOUBLE PRECISION (`f64`).
    Double,
    /// Character data.
    Text,
    /// Binary data.
    Bytes,
    /// TIMESTAMP without time zone.
    Timestamp,
    /// DATE.
    Date,
    /// An enum bound by its name.
    EnumName,
    /// An enum bound by its ordinal.
    EnumOrdinal,
}

impl SqlType {
    /// Returns a short name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::SmallInt => "smallint",
            Self::Integer => "integer",
            Self::BigInt => "bigint",
            Self::Real => "real",
            Self::Double => "double",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::EnumName => "enum name",
            Self::EnumOrdinal => "enum ordinal",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The runtime representation of a bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Any integer width.
    Int(i64),
    /// Any float width.
    Float(f64),
    /// Text.
    Text(String),
    /// Binary blob.
    Bytes(Vec<u8>),
    /// Timestamp without time zone.
    Timestamp(NaiveDateTime),
    /// Calendar date.
    Date(NaiveDate),
}

impl Datum {
    /// Returns whether this datum is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp payload, if any.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// A datum together with the type it is bound as.
///
/// Equality is structural over both parts, so `Value::of(5_i32)` and
/// `Value::of(5_i64)` are different values.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    datum: Datum,
    ty: SqlType,
}

impl Value {
    /// Creates a value with an explicit binding type.
    #[must_use]
    pub const fn new(datum: Datum, ty: SqlType) -> Self {
        Self { datum, ty }
    }

    /// Creates a value whose binding type is the static type of `value`.
    ///
    /// `Option<T>` binds as `T`'s type, so `None` still yields a typed null.
    pub fn of<T: ToValue>(value: T) -> Self {
        value.to_value()
    }

    /// Creates a typed NULL.
    ///
    /// The type cannot be recovered from a null datum, so callers binding a
    /// nullable property without a Rust value at hand must name it here.
    #[must_use]
    pub const fn null(ty: SqlType) -> Self {
        Self {
            datum: Datum::Null,
            ty,
        }
    }

    /// Binds an enum by its name.
    pub fn enum_name<E: SqlEnum>(value: &E) -> Self {
        Self::new(Datum::Text(value.name().to_owned()), SqlType::EnumName)
    }

    /// Binds an enum by its ordinal.
    pub fn enum_ordinal<E: SqlEnum>(value: &E) -> Self {
        Self::new(Datum::Int(i64::from(value.ordinal())), SqlType::EnumOrdinal)
    }

    /// Returns the runtime datum.
    #[must_use]
    pub const fn datum(&self) -> &Datum {
        &self.datum
    }

    /// Returns the binding type.
    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        self.ty
    }

    /// Returns whether the datum is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.datum.is_null()
    }

    /// Splits the value into its datum and binding type.
    #[must_use]
    pub fn into_parts(self) -> (Datum, SqlType) {
        (self.datum, self.ty)
    }

    /// Returns the escaped SQL literal for this value.
    ///
    /// Only used to render statement logs; statements always bind values.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match &self.datum {
            Datum::Null => String::from("NULL"),
            Datum::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Datum::Int(n) => format!("{n}"),
            Datum::Float(f) => format!("{f}"),
            Datum::Text(s) => {
                // Escape single quotes by doubling them
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Datum::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Datum::Timestamp(ts) => {
                if ts.nanosecond() == 0 {
                    format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S"))
                } else {
                    format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.6f"))
                }
            }
            Datum::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

/// Enums that can be bound either by name or by ordinal.
pub trait SqlEnum {
    /// The variant name.
    fn name(&self) -> &'static str;

    /// The zero-based declaration index.
    fn ordinal(&self) -> i32;
}

/// Types with a fixed binding type.
pub trait SqlTyped {
    /// The type values of `Self` are bound as.
    const SQL_TYPE: SqlType;
}

/// Trait for types that can be converted to bind values.
pub trait ToValue {
    /// Converts into a [`Value`].
    fn to_value(self) -> Value;
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

impl ToValue for &Value {
    fn to_value(self) -> Value {
        self.clone()
    }
}

impl<T: ToValue + SqlTyped> ToValue for Option<T> {
    fn to_value(self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::null(T::SQL_TYPE),
        }
    }
}

macro_rules! impl_to_value {
    ($ty:ty, $sql:ident, |$v:ident| $datum:expr) => {
        impl SqlTyped for $ty {
            const SQL_TYPE: SqlType = SqlType::$sql;
        }

        impl ToValue for $ty {
            fn to_value(self) -> Value {
                let $v = self;
                Value::new($datum, SqlType::$sql)
            }
        }
    };
}

impl_to_value!(bool, Boolean, |v| Datum::Bool(v));
impl_to_value!(i8, SmallInt, |v| Datum::Int(i64::from(v)));
impl_to_value!(i16, SmallInt, |v| Datum::Int(i64::from(v)));
impl_to_value!(u8, SmallInt, |v| Datum::Int(i64::from(v)));
impl_to_value!(i32, Integer, |v| Datum::Int(i64::from(v)));
impl_to_value!(u16, Integer, |v| Datum::Int(i64::from(v)));
impl_to_value!(i64, BigInt, |v| Datum::Int(v));
impl_to_value!(u32, BigInt, |v| Datum::Int(i64::from(v)));
impl_to_value!(f32, Real, |v| Datum::Float(f64::from(v)));
impl_to_value!(f64, Double, |v| Datum::Float(v));
impl_to_value!(String, Text, |v| Datum::Text(v));
impl_to_value!(&str, Text, |v| Datum::Text(String::from(v)));
impl_to_value!(Vec<u8>, Bytes, |v| Datum::Bytes(v));
impl_to_value!(&[u8], Bytes, |v| Datum::Bytes(v.to_vec()));
impl_to_value!(NaiveDateTime, Timestamp, |v| Datum::Timestamp(v));
impl_to_value!(DateTime<Utc>, Timestamp, |v| Datum::Timestamp(v.naive_utc()));
impl_to_value!(NaiveDate, Date, |v| Datum::Date(v));
