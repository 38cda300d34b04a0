use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `trainingInput` mapping of a training job.
///
/// The service schema has many more fields than the ones this crate sets
/// (`scaleTier`, `masterType`, etc.), so the mapping is kept as a plain JSON
/// object. Callers may pre-seed it with any service-schema keys and those
/// keys pass through untouched unless explicitly overridden.
pub type TrainingInput = Map<String, Value>;

/// A training job as the service expects it: a single `trainingInput` key
/// holding the job's input parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "trainingInput")]
    pub training_input: TrainingInput,
}

/// The optional fields of a training job that this layer knows how to place
/// into the `trainingInput` mapping.
///
/// A field is copied into the mapping only when it is non-empty; empty
/// strings and empty lists are treated the same as unset. No validation is
/// performed here (region names, URI formats, version strings) since the
/// service rejects malformed jobs itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainFields {
    /// The module to run after installing the packages.
    pub python_module: Option<String>,
    /// Storage locations of the packages with the training program and its
    /// dependencies.
    pub package_uris: Vec<String>,
    /// The compute region to run the training job in.
    pub region: Option<String>,
    /// Command line arguments to pass to the program.
    pub args: Vec<String>,
    /// A storage path in which to store training outputs.
    pub job_dir: Option<String>,
    /// The language runtime version used in training.
    pub python_version: Option<String>,
    /// The service runtime version to use for training.
    pub runtime_version: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn insert_string(input: &mut TrainingInput, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        input.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn insert_strings(input: &mut TrainingInput, key: &str, values: &[String]) {
    if !values.is_empty() {
        let list = values.iter().cloned().map(Value::String).collect();
        input.insert(key.to_string(), Value::Array(list));
    }
}

/// Assemble a training job from an optional pre-seeded `trainingInput`
/// mapping and a set of optional fields.
///
/// Starts from `seed` (or an empty mapping), then copies each non-empty
/// field onto its service-schema key, overwriting any pre-seeded value under
/// the same key. Fields that are unset or empty leave the seed untouched, so
/// a caller-supplied mapping keeps its values for anything not explicitly
/// overridden.
pub fn build_job(fields: &TrainFields, seed: Option<TrainingInput>) -> Job {
    let mut input = seed.unwrap_or_default();
    insert_string(&mut input, "pythonModule", non_empty(&fields.python_module));
    insert_strings(&mut input, "packageUris", &fields.package_uris);
    insert_string(&mut input, "region", non_empty(&fields.region));
    insert_strings(&mut input, "args", &fields.args);
    insert_string(&mut input, "jobDir", non_empty(&fields.job_dir));
    insert_string(&mut input, "pythonVersion", non_empty(&fields.python_version));
    insert_string(
        &mut input,
        "runtimeVersion",
        non_empty(&fields.runtime_version),
    );
    Job {
        training_input: input,
    }
}
