use std::time::Duration;

use mljob_spec::{Job, TrainFields, TrainingInput, build_job};

/// The default interval between job status checks.
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(30);

/// The collaborator that actually creates a job against the managed service.
///
/// Implementations own authentication, submission, polling (with
/// `wait_interval` between status checks), and error reporting. This crate
/// only assembles the job and hands it over; whatever an implementation
/// returns or fails with is passed back to the caller untranslated.
pub trait CreateJob {
    /// What a successfully created (and possibly completed) job looks like.
    type Output;
    /// The implementation's own failure type.
    type Error;

    fn create_job(
        &self,
        project_id: &str,
        job: &Job,
        job_id_prefix: Option<&str>,
        wait_interval: Duration,
    ) -> Result<Self::Output, Self::Error>;
}

/// Everything needed to assemble and submit one training job.
#[derive(Debug, Clone)]
pub struct TrainRequest {
    /// The ID of the parent project of the job.
    pub project_id: String,
    /// The optional fields to place into the `trainingInput` mapping.
    pub fields: TrainFields,
    /// A pre-seeded `trainingInput` mapping; fields above overwrite it
    /// key by key.
    pub training_input: Option<TrainingInput>,
    /// The prefix of the generated job id.
    pub job_id_prefix: Option<String>,
    /// Wait interval between calls to get job status.
    pub wait_interval: Duration,
}

impl TrainRequest {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            fields: TrainFields::default(),
            training_input: None,
            job_id_prefix: None,
            wait_interval: DEFAULT_WAIT_INTERVAL,
        }
    }
}

/// Assemble the training job described by `request` and submit it.
///
/// The job object is built with `mljob_spec::build_job` and forwarded to the
/// collaborator together with the project id, job id prefix, and wait
/// interval. The collaborator's result is returned verbatim, success or
/// failure.
pub fn train<C: CreateJob>(client: &C, request: &TrainRequest) -> Result<C::Output, C::Error> {
    let job = build_job(&request.fields, request.training_input.clone());
    log::debug!(
        project_id = request.project_id.as_str();
        "submitting training job"
    );
    client.create_job(
        &request.project_id,
        &job,
        request.job_id_prefix.as_deref(),
        request.wait_interval,
    )
}
