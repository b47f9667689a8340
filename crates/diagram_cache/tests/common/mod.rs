//! Shared fixtures: a doubly linked `Node` and a builder that diagrams it.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once, Weak};

use diagram_cache::{DiagramBuilder, DiagramCache, Diagrammable, GlobalCache, Kind};
use parking_lot::Mutex;

/// Anything a test may hand to the cache.
#[derive(Debug)]
pub enum Value {
    Node(Node),
    Float(f64),
    Symbol(&'static str),
}

/// A list node. Its kind follows from which neighbours are attached.
#[derive(Debug, Default)]
pub struct Node {
    data: Mutex<String>,
    back: Mutex<Option<Arc<Value>>>,
    front: Mutex<Option<Weak<Value>>>,
}

impl Value {
    pub fn node(data: &str) -> Arc<Self> {
        Arc::new(Value::Node(Node {
            data: Mutex::new(data.to_string()),
            ..Node::default()
        }))
    }

    fn as_node(&self) -> &Node {
        match self {
            Value::Node(node) => node,
            other => panic!("{other:?} is not a node"),
        }
    }

    pub fn attach_back(&self, other: &Arc<Value>) {
        *self.as_node().back.lock() = Some(Arc::clone(other));
    }

    pub fn attach_front(&self, other: &Arc<Value>) {
        *self.as_node().front.lock() = Some(Arc::downgrade(other));
    }

    pub fn detach_back(&self) {
        self.as_node().back.lock().take();
    }

    pub fn substitute(&self, data: &str) {
        *self.as_node().data.lock() = data.to_string();
    }

    pub fn back(&self) -> Option<Arc<Value>> {
        self.as_node().back.lock().clone()
    }
}

impl Diagrammable for Value {
    fn kind(&self) -> Option<Kind> {
        let Value::Node(node) = self else {
            return None;
        };
        let back = node.back.lock().is_some();
        let front = node.front.lock().as_ref().is_some_and(|f| f.strong_count() > 0);
        let name = match (back, front) {
            (false, false) => "lone",
            (true, false) => "tail",
            (false, true) => "head",
            (true, true) => "inner",
        };
        Some(Kind::named(name))
    }
}

/// What the fixture builder produces.
#[derive(Debug)]
pub struct Sketch {
    pub serial: usize,
    pub kind: Option<Kind>,
    pub label: String,
    /// The back neighbour's diagram, fetched from [`DIAGRAMS`].
    pub back: Option<Arc<Sketch>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    #[error("back neighbour could not be diagrammed: {0}")]
    Back(String),
}

/// Diagrams nodes and floats; symbols are rejected.
#[derive(Debug, Default)]
pub struct SketchBuilder {
    serial: AtomicUsize,
}

impl SketchBuilder {
    pub fn built(&self) -> usize {
        self.serial.load(Ordering::SeqCst)
    }
}

impl DiagramBuilder for SketchBuilder {
    type Subject = Value;
    type Diagram = Sketch;
    type Error = SketchError;

    fn is_diagrammable(&self, subject: &Value) -> bool {
        !matches!(subject, Value::Symbol(_))
    }

    fn build(&self, subject: &Value) -> Result<Sketch, SketchError> {
        let serial = self.serial.fetch_add(1, Ordering::SeqCst);
        let (label, back) = match subject {
            Value::Node(node) => {
                let back = match subject.back() {
                    Some(back) => Some(
                        DIAGRAMS
                            .instance()
                            .diagram(&back)
                            .map_err(|e| SketchError::Back(e.to_string()))?,
                    ),
                    None => None,
                };
                (node.data.lock().clone(), back)
            }
            Value::Float(value) => (value.to_string(), None),
            Value::Symbol(_) => unreachable!("symbols are rejected before building"),
        };
        Ok(Sketch {
            serial,
            kind: subject.kind(),
            label,
            back,
        })
    }
}

fn make_cache() -> DiagramCache<SketchBuilder> {
    DiagramCache::new(SketchBuilder::default())
}

/// The process-wide cache the fixture builder resolves neighbours through.
pub static DIAGRAMS: GlobalCache<SketchBuilder> = GlobalCache::new(make_cache);

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
