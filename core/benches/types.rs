use rand::prelude::*;
use std::collections::HashMap;
use wire_shape::*;

/// Produces random wire hashes in the layout of the implementing shape.
pub trait Generate {
    fn generate<R>(rng: &mut R) -> WireMap
    where
        R: Rng;
}

const NAMES: [&str; 4] = ["web", "worker", "db", "cache"];
const STATES: [&str; 4] = ["pending", "running", "stopping", "terminated"];
const METHODS: [&str; 3] = ["GET", "POST", "DELETE"];

fn choose<R>(rng: &mut R, items: &[&str]) -> String
where
    R: Rng,
{
    items.choose(rng).unwrap().to_string()
}

#[derive(WireShape)]
#[wire(tag = "Tag")]
#[allow(dead_code)]
pub struct Tag {
    #[wire(rename = "Key")]
    key: String,
    #[wire(rename = "Value")]
    value: String,
}

impl Generate for Tag {
    fn generate<R>(rng: &mut R) -> WireMap
    where
        R: Rng,
    {
        WireMap::new()
            .property("Key", choose(rng, &["Name", "env", "team"]))
            .property("Value", choose(rng, &NAMES))
    }
}

#[derive(WireShape)]
#[wire(tag = "Instance")]
#[allow(dead_code)]
pub struct Instance {
    #[wire(rename = "instanceId")]
    id: String,
    #[wire(rename = "amiLaunchIndex")]
    launch_index: u32,
    #[wire(symbol, location = "instanceState", rename = "name")]
    state: String,
    #[wire(rename = "ebsOptimized")]
    ebs_optimized: bool,
    #[wire(rename = "tagSet")]
    tags: Vec<Tag>,
    groups: HashMap<String, Symbol>,
}

impl Generate for Instance {
    fn generate<R>(rng: &mut R) -> WireMap
    where
        R: Rng,
    {
        let tags = (0..rng.random_range(0..6))
            .map(|_| Wire::Map(Tag::generate(rng)))
            .collect::<Vec<_>>();
        let groups = (0..rng.random_range(1..4))
            .map(|index| (format!("sg-{}", index), choose(rng, &["open", "closed"])))
            .collect::<WireMap>();
        WireMap::new()
            .property("instanceId", format!("i-{:08x}", rng.random::<u32>()))
            .property("amiLaunchIndex", rng.random_range(0u32..16))
            .property(
                "instanceState",
                WireMap::new().property("name", choose(rng, &STATES)),
            )
            .property("ebsOptimized", rng.random::<bool>().then_some(true))
            .property("tagSet", tags)
            .property("groups", groups)
    }
}

#[derive(WireShape)]
#[wire(tag = "Reservation")]
#[allow(dead_code)]
pub struct Reservation {
    #[wire(rename = "reservationId")]
    id: String,
    #[wire(rename = "instancesSet")]
    instances: Vec<Instance>,
}

impl Generate for Reservation {
    fn generate<R>(rng: &mut R) -> WireMap
    where
        R: Rng,
    {
        let instances = (0..32)
            .map(|_| Wire::Map(Instance::generate(rng)))
            .collect::<Vec<_>>();
        WireMap::new()
            .property("reservationId", format!("r-{:08x}", rng.random::<u32>()))
            .property("instancesSet", instances)
    }
}

#[derive(WireShape)]
#[wire(tag = "Operation")]
#[allow(dead_code)]
pub struct Operation {
    name: String,
    #[wire(rename = "httpMethod")]
    http_method: String,
    #[wire(rename = "requestUri")]
    request_uri: String,
}

impl Generate for Operation {
    fn generate<R>(rng: &mut R) -> WireMap
    where
        R: Rng,
    {
        WireMap::new()
            .property("name", choose(rng, &NAMES))
            .property("httpMethod", choose(rng, &METHODS))
            .property("requestUri", "/")
    }
}

#[derive(WireShape)]
#[wire(tag = "Api")]
#[allow(dead_code)]
pub struct Api {
    #[wire(lazy = "Operation")]
    operations: HashMap<String, Operation>,
}

impl Generate for Api {
    fn generate<R>(rng: &mut R) -> WireMap
    where
        R: Rng,
    {
        let operations = (0..256)
            .map(|index| (format!("Operation{}", index), Wire::Map(Operation::generate(rng))))
            .collect::<WireMap>();
        WireMap::new().property("operations", operations)
    }
}

pub fn types() -> TypeRegistry {
    TypeRegistry::from_shapes([
        Tag::shape(),
        Instance::shape(),
        Reservation::shape(),
        Operation::shape(),
        Api::shape(),
    ])
}
