//! Deterministic instance generator
//!
//! Produces "Order Completed" events shaped after
//! [`crate::fixture::REALISTIC_SCHEMA`] and records, while building each one,
//! whether it satisfies the schema. No validation engine is consulted: the
//! ground truth falls out of the construction itself.
//!
//! Each instance is populated field by field. After each required section an
//! independent coin flip may stop construction early, leaving the document
//! incomplete and therefore invalid. Inside the product loop a flip may leave a
//! product without `quantity`/`price`, and another may give it a string
//! `price`; either spoils the whole instance because every array item must
//! satisfy the item schema.
//!
//! The random stream is a [`ChaCha8Rng`] seeded explicitly per generator, so a
//! given `(seed, count)` always yields byte-identical output, and a shorter
//! corpus is always a prefix of a longer one with the same seed.

use crate::config::DEFAULT_MAX_PRODUCTS;
use crate::corpus::{Corpus, Instance};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value};

const EVENT: &str = "Order Completed";
const USER_ID: &str = "foobar";
const PRODUCT_FIELD: &str = "xxx";
const QUANTITY: u64 = 5;
#[allow(clippy::approx_constant)]
const PRICE: f64 = 3.14;
const BAD_PRICE: &str = "xxx";
const COUPON: &str = "asdf";
const TOTAL: u64 = 42;

/// One step of a document path
#[derive(Debug, Clone, Copy)]
enum Seg<'a> {
    Key(&'a str),
    Index(usize),
}

/// Set `value` at `path`, creating intermediate objects and arrays as needed.
///
/// A segment that meets a value of the wrong container type replaces it.
/// Array slots past the current end are filled with `null`; object keys keep
/// insertion order.
fn set_path(target: &mut Value, path: &[Seg<'_>], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *target = value;
        return;
    };

    let slot = match *head {
        Seg::Key(key) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            match target {
                Value::Object(map) => map.entry(key).or_insert(Value::Null),
                _ => return,
            }
        }
        Seg::Index(index) => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            match target {
                Value::Array(items) => {
                    if items.len() <= index {
                        items.resize(index + 1, Value::Null);
                    }
                    &mut items[index]
                }
                _ => return,
            }
        }
    };

    set_path(slot, rest, value);
}

fn product_path<'a>(index: usize, field: &'a str) -> [Seg<'a>; 4] {
    [
        Seg::Key("properties"),
        Seg::Key("products"),
        Seg::Index(index),
        Seg::Key(field),
    ]
}

/// Seeded producer of instances with known validity
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    rng: ChaCha8Rng,
    max_products: u32,
}

impl InstanceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_products: DEFAULT_MAX_PRODUCTS,
        }
    }

    /// Bound the product loop to `0..max_products` (clamped to at least 1).
    ///
    /// Small bounds raise the share of valid instances: with the default of
    /// 1000 nearly every instance carries at least one broken product.
    pub fn with_max_products(mut self, max_products: u32) -> Self {
        self.max_products = max_products.max(1);
        self
    }

    fn flip(&mut self) -> bool {
        self.rng.r#gen::<f32>() < 0.5
    }

    /// Build the next instance of the stream
    pub fn next_instance(&mut self) -> Instance {
        let mut doc = Value::Object(Map::new());

        set_path(&mut doc, &[Seg::Key("event")], Value::from(EVENT));
        if self.flip() {
            return Instance::new(doc, false);
        }

        set_path(&mut doc, &[Seg::Key("userId")], Value::from(USER_ID));
        if self.flip() {
            return Instance::new(doc, false);
        }

        let loops = (self.rng.next_u32() % self.max_products) as usize;
        // No products means the required `products` array is never created.
        let mut loop_ok = loops > 0;

        for j in 0..loops {
            set_path(&mut doc, &product_path(j, "id"), Value::from(PRODUCT_FIELD));
            set_path(&mut doc, &product_path(j, "variant"), Value::from(PRODUCT_FIELD));
            if self.flip() {
                loop_ok = false;
                continue;
            }

            set_path(&mut doc, &product_path(j, "quantity"), Value::from(QUANTITY));

            if self.flip() {
                set_path(&mut doc, &product_path(j, "price"), Value::from(BAD_PRICE));
                loop_ok = false;
            } else {
                set_path(&mut doc, &product_path(j, "price"), Value::from(PRICE));
            }
        }

        if self.flip() {
            return Instance::new(doc, false);
        }

        set_path(
            &mut doc,
            &[Seg::Key("properties"), Seg::Key("coupon")],
            Value::from(COUPON),
        );
        set_path(
            &mut doc,
            &[Seg::Key("properties"), Seg::Key("total")],
            Value::from(TOTAL),
        );

        Instance::new(doc, loop_ok)
    }

    /// Draw the next `count` instances into a corpus
    pub fn corpus(&mut self, count: usize) -> Corpus {
        Corpus::from_instances((0..count).map(|_| self.next_instance()).collect())
    }
}

impl Iterator for InstanceGenerator {
    type Item = Instance;

    fn next(&mut self) -> Option<Instance> {
        Some(self.next_instance())
    }
}

/// Generate `count` instances from a fresh generator seeded with `seed`
pub fn generate_corpus(seed: u64, count: usize) -> Corpus {
    InstanceGenerator::new(seed).corpus(count)
}

impl Corpus {
    /// Same as [`generate_corpus`]
    pub fn generate(seed: u64, count: usize) -> Self {
        generate_corpus(seed, count)
    }
}
