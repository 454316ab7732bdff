mod cloud;
pub use cloud::{Cloud, CloudTemplate};

mod constants;
pub use constants::{CONTROLLER_NAME, CONTROLLER_URL_SEGMENT};

mod job;
pub use job::{Job, ParameterDef};

mod kv;
pub use kv::KeyValue;

mod label_config;
pub use label_config::LabelConfig;

mod node;
pub use node::{Node, NodeMode};

mod properties;
pub use properties::parse_properties;

mod snapshot;
pub use snapshot::{FarmSnapshot, Integrations};

mod trigger;
pub use trigger::{TriggerConfig, TriggerParameter};

pub(crate) mod url;
