//! Attribute accessor step definitions.
//!
//! `ItemTable` is a minimal in-memory persistence layer: records are plain
//! column maps and their accessors are derived from the column names.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cucumber::{given, then, when, World};
use dont::{Attributes, Deprecated, Deprecations, Dont, HandlerRegistry, MarkError};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct Item {
    id: Option<usize>,
    columns: HashMap<String, Value>,
}

impl Attributes for Item {
    type Value = Value;

    fn attribute_names() -> &'static [&'static str] {
        &["id", "name", "usable"]
    }

    fn read_attribute(&self, name: &str) -> Value {
        self.columns.get(name).cloned().unwrap_or(Value::Null)
    }

    fn write_attribute(&mut self, name: &str, value: Value) {
        self.columns.insert(name.to_string(), value);
    }
}

#[derive(Debug, Default)]
pub struct ItemTable {
    rows: Vec<HashMap<String, Value>>,
}

impl ItemTable {
    fn save(&mut self, item: &mut Item) {
        match item.id {
            Some(id) => self.rows[id] = item.columns.clone(),
            None => {
                item.id = Some(self.rows.len());
                self.rows.push(item.columns.clone());
            }
        }
    }

    fn find(&self, id: usize) -> Option<Item> {
        self.rows.get(id).map(|columns| Item {
            id: Some(id),
            columns: columns.clone(),
        })
    }

    fn last(&self) -> Option<Item> {
        self.rows.len().checked_sub(1).and_then(|id| self.find(id))
    }
}

/// Test context for attribute accessor scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct AccessorWorld {
    registry: HandlerRegistry,
    calls: Arc<Mutex<Vec<String>>>,
    table: ItemTable,
    pending: Option<Deprecations<Item>>,
    deprecations: Option<Arc<Deprecations<Item>>>,
    item: Option<Deprecated<Item>>,
    read: Option<Value>,
    mark_error: Option<MarkError>,
}

impl AccessorWorld {
    fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            table: ItemTable::default(),
            pending: None,
            deprecations: None,
            item: None,
            read: None,
            mark_error: None,
        }
    }

    /// The marked table, frozen on first use.
    fn deprecations(&mut self) -> Arc<Deprecations<Item>> {
        if self.deprecations.is_none() {
            let pending = self.pending.take().expect("accessors not marked");
            self.deprecations = Some(Arc::new(pending));
        }
        self.deprecations.clone().unwrap()
    }

    fn wrap(&mut self, item: Item) -> Deprecated<Item> {
        Deprecated::new(item, self.deprecations())
    }

    fn item(&self) -> &Deprecated<Item> {
        self.item.as_ref().expect("no item loaded")
    }

    fn save(&mut self) {
        let mut item = self.item.take().expect("no item loaded").into_inner();
        self.table.save(&mut item);
        self.item = Some(self.wrap(item));
    }
}

fn mark(world: &mut AccessorWorld, method: &str) {
    let pending = world.pending.as_mut().expect("accessors not marked");
    world.mark_error = pending.mark(method).err();
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).expect("value should be JSON")
}

// --- Given steps ---

#[given("an items table with a method logger")]
async fn given_table(world: &mut AccessorWorld) {
    let calls = world.calls.clone();
    world.registry.register("method_logger", move |receiver, method| {
        calls
            .lock()
            .unwrap()
            .push(format!("{}#{}", receiver.type_name(), method));
        Ok(())
    });
}

#[given(expr = "the Item accessors {string}, {string} and {string} are deprecated")]
async fn given_marked(world: &mut AccessorWorld, read: String, query: String, write: String) {
    let deprecations = Dont::with_registry(&world.registry, "method_logger")
        .expect("method_logger should be registered")
        .apply::<Item>()
        .dont_use(&read)
        .and_then(|d| d.dont_use(&query))
        .and_then(|d| d.dont_use(&write))
        .expect("accessors should be markable");
    world.pending = Some(deprecations);
}

// --- When steps ---

#[when(expr = "I create an item named {string} with usable set to {word}")]
async fn when_create(world: &mut AccessorWorld, name: String, usable: String) {
    let mut item = world.wrap(Item::default());
    item.write("name", Value::String(name)).unwrap();
    item.write("usable", parse_value(&usable)).unwrap();
    world.item = Some(item);
    world.save();
}

#[when("I load the last item")]
async fn when_load_last(world: &mut AccessorWorld) {
    let item = world.table.last().expect("table is empty");
    world.item = Some(world.wrap(item));
}

#[when(expr = "I set usable to {word} and save")]
async fn when_set_and_save(world: &mut AccessorWorld, usable: String) {
    let item = world.item.as_mut().expect("no item loaded");
    item.write("usable", parse_value(&usable)).unwrap();
    world.save();
}

#[when("I reload the item")]
async fn when_reload(world: &mut AccessorWorld) {
    let id = world.item().inner().id.expect("item was never saved");
    let item = world.table.find(id).expect("item vanished");
    world.item = Some(world.wrap(item));
}

#[when("I read the name")]
async fn when_read_name(world: &mut AccessorWorld) {
    world.read = Some(world.item().read("name").unwrap());
}

#[when(expr = "I mark {string} again")]
async fn when_mark_again(world: &mut AccessorWorld, method: String) {
    mark(world, &method);
}

#[when(expr = "I mark {string}")]
async fn when_mark(world: &mut AccessorWorld, method: String) {
    mark(world, &method);
}

// --- Then steps ---

#[then(expr = "the method calls are {string}")]
async fn then_method_calls(world: &mut AccessorWorld, expected: String) {
    assert_eq!(world.calls.lock().unwrap().join(", "), expected);
}

#[then(expr = "the usable accessor reads {word}")]
async fn then_usable_reads(world: &mut AccessorWorld, expected: String) {
    assert_eq!(world.item().read("usable").unwrap(), parse_value(&expected));
}

#[then(expr = "the usable query reads {word}")]
async fn then_usable_query_reads(world: &mut AccessorWorld, expected: String) {
    assert_eq!(world.item().query("usable").unwrap(), parse_value(&expected));
}

#[then(expr = "the name is {string}")]
async fn then_name_is(world: &mut AccessorWorld, expected: String) {
    assert_eq!(world.read.take(), Some(Value::String(expected)));
}

#[then(expr = "marking fails with {string}")]
async fn then_marking_fails(world: &mut AccessorWorld, message: String) {
    let err = world.mark_error.take().expect("marking should fail");
    assert_eq!(err.to_string(), message);
}
