#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use sqlscope_orm::listener::HookResult;
use sqlscope_orm::metamodel::{
    EntityDescriptor, EntityMetamodel, PropertyDescriptor, SequenceGeneratorSpec, TableMarker,
};
use sqlscope_orm::{
    AssignError, BoxError, Entity, EntityListener, Executor, QueryConfig, Session, SqlType,
    Statement, StatementLogger, Value,
};

// ===================================================================
// Entities
// ===================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

pub fn address_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("Address")
        .property(PropertyDescriptor::new("street"))
        .property(PropertyDescriptor::new("city").column("CITY"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Employee {
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
    pub address: Address,
    pub created: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
    pub version: Option<i64>,
}

impl Entity for Employee {
    fn descriptor() -> EntityDescriptor {
        EntityDescriptor::new("Employee")
            .table(TableMarker::new("EMPLOYEE"))
            .property(
                PropertyDescriptor::new("id")
                    .id()
                    .sequence(SequenceGeneratorSpec::new("EMPLOYEE_SEQ").increment_by(10)),
            )
            .property(PropertyDescriptor::new("name").column("EMPLOYEE_NAME"))
            .property(PropertyDescriptor::new("age"))
            .embedded("address", address_descriptor())
            .property(PropertyDescriptor::new("created").created_at())
            .property(PropertyDescriptor::new("updated").updated_at())
            .property(PropertyDescriptor::new("version").version())
    }

    fn value_of(&self, property_path: &str) -> Option<Value> {
        match property_path {
            "id" => Some(Value::of(self.id)),
            "name" => Some(Value::of(self.name.as_str())),
            "age" => Some(Value::of(self.age)),
            "address.street" => Some(Value::of(self.address.street.as_str())),
            "address.city" => Some(Value::of(self.address.city.as_str())),
            "created" => Some(Value::of(self.created)),
            "updated" => Some(Value::of(self.updated)),
            "version" => Some(Value::of(self.version)),
            _ => None,
        }
    }

    fn assign(&mut self, property_path: &str, value: Value) -> Result<(), AssignError> {
        match property_path {
            "id" => self.id = value.datum().as_i64(),
            "created" => self.created = value.datum().as_timestamp(),
            "updated" => self.updated = value.datum().as_timestamp(),
            "version" => self.version = integer(property_path, &value)?,
            _ => {
                return Err(AssignError::Unsupported {
                    property: property_path.to_owned(),
                })
            }
        }
        Ok(())
    }
}

/// Reads an optional integer, rejecting values of any other type.
fn integer(property: &str, value: &Value) -> Result<Option<i64>, AssignError> {
    if value.is_null() {
        return Ok(None);
    }
    value
        .datum()
        .as_i64()
        .map(Some)
        .ok_or_else(|| AssignError::TypeMismatch {
            property: property.to_owned(),
            expected: SqlType::BigInt,
            found: value.sql_type(),
        })
}

pub fn employee(id: i64, name: &str) -> Employee {
    Employee {
        id: Some(id),
        name: name.to_owned(),
        age: 41,
        address: Address {
            street: "1 Main St".into(),
            city: "Springfield".into(),
        },
        created: None,
        updated: None,
        version: Some(1),
    }
}

/// An entity with a two-column key and no version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub order_id: i64,
    pub line_no: i32,
    pub product: String,
    pub quantity: i32,
}

impl Entity for OrderLine {
    fn descriptor() -> EntityDescriptor {
        EntityDescriptor::new("OrderLine")
            .table(TableMarker::new("order_line").schema("sales"))
            .property(PropertyDescriptor::new("orderId").id().column("order_id"))
            .property(PropertyDescriptor::new("lineNo").id().column("line_no"))
            .property(PropertyDescriptor::new("product"))
            .property(PropertyDescriptor::new("quantity"))
    }

    fn value_of(&self, property_path: &str) -> Option<Value> {
        match property_path {
            "orderId" => Some(Value::of(self.order_id)),
            "lineNo" => Some(Value::of(self.line_no)),
            "product" => Some(Value::of(self.product.as_str())),
            "quantity" => Some(Value::of(self.quantity)),
            _ => None,
        }
    }
}

pub fn order_line() -> OrderLine {
    OrderLine {
        order_id: 7,
        line_no: 2,
        product: "bolt".into(),
        quantity: 12,
    }
}

/// A versioned entity that never accepts generated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    pub id: i64,
    pub body: String,
    pub version: i64,
}

impl Entity for Memo {
    fn descriptor() -> EntityDescriptor {
        EntityDescriptor::new("Memo")
            .property(PropertyDescriptor::new("id").id())
            .property(PropertyDescriptor::new("body"))
            .property(PropertyDescriptor::new("version").version())
    }

    fn value_of(&self, property_path: &str) -> Option<Value> {
        match property_path {
            "id" => Some(Value::of(self.id)),
            "body" => Some(Value::of(self.body.as_str())),
            "version" => Some(Value::of(self.version)),
            _ => None,
        }
    }
}

/// An entity whose key is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
}

impl Entity for Ticket {
    fn descriptor() -> EntityDescriptor {
        EntityDescriptor::new("Ticket")
            .table(TableMarker::new("ticket").quoted())
            .property(PropertyDescriptor::new("id").id().identity())
            .property(PropertyDescriptor::new("title"))
    }

    fn value_of(&self, property_path: &str) -> Option<Value> {
        match property_path {
            "id" => Some(Value::of(self.id)),
            "title" => Some(Value::of(self.title.as_str())),
            _ => None,
        }
    }
}

pub fn metamodel<E: Entity>() -> Arc<EntityMetamodel> {
    E::metamodel().unwrap_or_else(|e| panic!("invalid metamodel: {e}"))
}

pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap()
}

// ===================================================================
// Collaborators
// ===================================================================

/// Records every statement and answers with canned results.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub executed: Vec<Statement>,
    pub sequence_queries: Vec<Statement>,
    pub affected_rows: u64,
    pub next_sequence: i64,
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn affecting(rows: u64) -> Self {
        Self {
            affected_rows: rows,
            next_sequence: 100,
            ..Self::default()
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.executed.iter().map(Statement::text).collect()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, statement: &Statement) -> Result<u64, BoxError> {
        if let Some(message) = &self.fail_with {
            return Err(message.clone().into());
        }
        self.executed.push(statement.clone());
        Ok(self.affected_rows)
    }

    fn next_sequence_value(&mut self, statement: &Statement) -> Result<i64, BoxError> {
        self.sequence_queries.push(statement.clone());
        let value = self.next_sequence;
        self.next_sequence += 10;
        Ok(value)
    }
}

/// Collects log renderings in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    pub statements: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl StatementLogger for RecordingLogger {
    fn log_message(&self, message: &dyn Fn() -> String) {
        self.statements.lock().unwrap().push(message());
    }

    fn log_statement(&self, statement: &Statement) {
        if let Some(log) = statement.log() {
            self.statements.lock().unwrap().push(log.to_owned());
        }
    }
}

/// Records which hooks ran, optionally failing one of them.
#[derive(Debug, Clone, Default)]
pub struct TraceListener {
    pub events: Arc<Mutex<Vec<&'static str>>>,
    pub fail_on: Option<&'static str>,
}

impl TraceListener {
    pub fn failing(hook: &'static str) -> Self {
        Self {
            fail_on: Some(hook),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    fn record<E>(&self, hook: &'static str, entity: E) -> HookResult<E> {
        self.events.lock().unwrap().push(hook);
        if self.fail_on == Some(hook) {
            return Err(format!("{hook} rejected the entity").into());
        }
        Ok(entity)
    }
}

impl<E> EntityListener<E> for TraceListener {
    fn pre_insert(&self, entity: E, _: &EntityMetamodel) -> HookResult<E> {
        self.record("pre_insert", entity)
    }

    fn post_insert(&self, entity: E, _: &EntityMetamodel) -> HookResult<E> {
        self.record("post_insert", entity)
    }

    fn pre_update(&self, entity: E, _: &EntityMetamodel) -> HookResult<E> {
        self.record("pre_update", entity)
    }

    fn post_update(&self, entity: E, _: &EntityMetamodel) -> HookResult<E> {
        self.record("post_update", entity)
    }

    fn pre_delete(&self, entity: E, _: &EntityMetamodel) -> HookResult<E> {
        self.record("pre_delete", entity)
    }

    fn post_delete(&self, entity: E, _: &EntityMetamodel) -> HookResult<E> {
        self.record("post_delete", entity)
    }
}

pub fn session() -> Session {
    Session::new(QueryConfig::default())
}

pub fn logged_session() -> (Session, RecordingLogger) {
    let logger = RecordingLogger::default();
    let session = session().with_logger(Arc::new(logger.clone()));
    (session, logger)
}
