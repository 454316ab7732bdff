mod domain;
pub use domain::{CONTROLLER_NAME, CONTROLLER_URL_SEGMENT};
pub use domain::{
    Cloud, CloudTemplate, FarmSnapshot, Integrations, Job, KeyValue, LabelConfig, Node, NodeMode,
    ParameterDef, TriggerConfig, TriggerParameter, parse_properties,
};

mod error;
pub use error::{ModelError, ModelResult};

mod label;
pub use label::{Label, LabelAtom, LabelExpr, parse_atoms};
