use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Error};
use clap::Args;
use mljob_config::Config;
use mljob_spec::{Job, TrainFields, TrainingInput};
use mljob_submit::{CreateJob, TrainRequest};

#[derive(Debug, Clone, Args)]
pub struct TrainArgs {
    /// The path to the config file (default is '$PWD/mljob.toml').
    #[arg(
        short = 'f',
        long = "config-file",
        value_name = "PATH",
        required = false
    )]
    pub config_file: Option<PathBuf>,
    /// The ID of the parent project of the job.
    #[arg(long = "project-id", value_name = "ID")]
    pub project_id: Option<String>,
    /// The module to run after installing the packages.
    #[arg(long = "python-module", value_name = "MODULE")]
    pub python_module: Option<String>,
    /// Storage URI of a package with the training program and its
    /// dependencies (repeatable).
    #[arg(long = "package-uri", value_name = "URI")]
    pub package_uris: Vec<String>,
    /// The compute region to run the training job in.
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,
    /// A storage path in which to store training outputs.
    #[arg(long = "job-dir", value_name = "URI")]
    pub job_dir: Option<String>,
    /// The language runtime version used in training, e.g. '3.5'.
    #[arg(long = "python-version", value_name = "VERSION")]
    pub python_version: Option<String>,
    /// The service runtime version to use for training, e.g. '1.10'.
    #[arg(long = "runtime-version", value_name = "VERSION")]
    pub runtime_version: Option<String>,
    /// A JSON file holding a pre-seeded trainingInput object; explicit flags
    /// overwrite its keys.
    #[arg(long = "training-input", value_name = "PATH")]
    pub training_input: Option<PathBuf>,
    /// The prefix of the generated job id.
    #[arg(long = "job-id-prefix", value_name = "PREFIX")]
    pub job_id_prefix: Option<String>,
    /// Seconds to wait between job status checks.
    #[arg(long = "wait-interval", value_name = "SECONDS")]
    pub wait_interval: Option<u64>,
    /// Command line arguments to pass to the training program (given after
    /// a '--' separator).
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// A collaborator that renders the assembled job instead of submitting it.
///
/// Submission backends live outside this tool and implement `CreateJob`
/// themselves; the CLI's concern is assembling the request, so its default
/// collaborator emits the job object for inspection or for piping into
/// whatever performs the actual submission.
struct RenderJob;

impl CreateJob for RenderJob {
    type Output = String;
    type Error = serde_json::Error;

    fn create_job(
        &self,
        project_id: &str,
        job: &Job,
        job_id_prefix: Option<&str>,
        wait_interval: Duration,
    ) -> Result<String, serde_json::Error> {
        log::info!(
            project_id = project_id,
            job_id_prefix = job_id_prefix.unwrap_or(""),
            wait_interval_secs = wait_interval.as_secs();
            "assembled training job"
        );
        serde_json::to_string_pretty(job)
    }
}

/// Read a pre-seeded trainingInput mapping from a JSON file.
fn read_training_input(path: &Path) -> Result<TrainingInput, Error> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read training input file '{}'", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).context("training input file is not valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("training input file must contain a JSON object"),
    }
}

/// Combine command-line flags with config-file defaults into a request.
///
/// Explicit flags always win; the config only fills in values that weren't
/// given on the command line.
fn build_request(args: &TrainArgs, config: &Config) -> Result<TrainRequest, Error> {
    let project_id = args
        .project_id
        .clone()
        .or_else(|| config.project_id.clone())
        .context("no project id given (use --project-id or set project-id in mljob.toml)")?;
    let training_input = match &args.training_input {
        Some(path) => Some(read_training_input(path)?),
        None => None,
    };
    let mut request = TrainRequest::new(project_id);
    request.fields = TrainFields {
        python_module: args.python_module.clone(),
        package_uris: args.package_uris.clone(),
        region: args.region.clone().or_else(|| config.region.clone()),
        args: args.args.clone(),
        job_dir: args.job_dir.clone(),
        python_version: args
            .python_version
            .clone()
            .or_else(|| config.python_version.clone()),
        runtime_version: args
            .runtime_version
            .clone()
            .or_else(|| config.runtime_version.clone()),
    };
    request.training_input = training_input;
    request.job_id_prefix = args.job_id_prefix.clone();
    request.wait_interval =
        Duration::from_secs(args.wait_interval.unwrap_or(config.wait_interval));
    Ok(request)
}

/// Assemble a training job from flags, config defaults, and an optional
/// pre-seeded trainingInput file, then emit it.
pub fn train(args: &TrainArgs) -> Result<(), Error> {
    let config =
        Config::load_or_default(args.config_file.as_ref()).context("failed to load config file")?;
    let request = build_request(args, &config)?;
    let rendered =
        mljob_submit::train(&RenderJob, &request).context("failed to render training job")?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use indoc::indoc;

    use super::*;
    use crate::cmd::{Cli, Cmd};

    fn bare_args() -> TrainArgs {
        let cli = Cli::try_parse_from(["mljob", "train"]).unwrap();
        let Cmd::Train(args) = cli.cmd;
        args
    }

    #[test]
    fn flags_override_config_defaults() {
        let mut args = bare_args();
        args.project_id = Some("from-flag".to_string());
        args.region = Some("us-east1".to_string());
        let config = Config {
            project_id: Some("from-config".to_string()),
            region: Some("us-central1".to_string()),
            ..Default::default()
        };
        let request = build_request(&args, &config).unwrap();
        assert_eq!(request.project_id, "from-flag");
        assert_eq!(request.fields.region.as_deref(), Some("us-east1"));
    }

    #[test]
    fn config_fills_in_unset_flags() {
        let mut args = bare_args();
        args.project_id = Some("proj1".to_string());
        let config = Config {
            region: Some("us-central1".to_string()),
            runtime_version: Some("1.10".to_string()),
            wait_interval: 10,
            ..Default::default()
        };
        let request = build_request(&args, &config).unwrap();
        assert_eq!(request.fields.region.as_deref(), Some("us-central1"));
        assert_eq!(request.fields.runtime_version.as_deref(), Some("1.10"));
        assert_eq!(request.wait_interval, Duration::from_secs(10));
    }

    #[test]
    fn missing_project_id_is_an_error() {
        let args = bare_args();
        let config = Config::default();
        assert!(build_request(&args, &config).is_err());
    }

    #[test]
    fn parses_repeatable_and_trailing_arguments() {
        let cli = Cli::try_parse_from([
            "mljob",
            "train",
            "--project-id",
            "proj1",
            "--python-module",
            "trainer.task",
            "--package-uri",
            "gs://b/pkg.tar.gz",
            "--package-uri",
            "gs://b/dep.tar.gz",
            "--region",
            "us-central1",
            "--",
            "--epochs",
            "10",
        ])
        .unwrap();
        let Cmd::Train(args) = cli.cmd;
        assert_eq!(
            args.package_uris,
            vec!["gs://b/pkg.tar.gz".to_string(), "gs://b/dep.tar.gz".to_string()]
        );
        assert_eq!(args.args, vec!["--epochs".to_string(), "10".to_string()]);
        let request = build_request(&args, &Config::default()).unwrap();
        assert_eq!(request.project_id, "proj1");
        assert_eq!(request.wait_interval, Duration::from_secs(30));
    }

    #[test]
    fn reads_a_training_input_seed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let seed_path = dir.path().join("input.json");
        let seed = indoc! {r#"
            { "scaleTier": "BASIC_GPU" }
        "#};
        std::fs::write(&seed_path, seed).unwrap();

        let mut args = bare_args();
        args.project_id = Some("proj1".to_string());
        args.training_input = Some(seed_path);
        let request = build_request(&args, &Config::default()).unwrap();
        let input = request.training_input.unwrap();
        assert_eq!(
            input.get("scaleTier"),
            Some(&serde_json::json!("BASIC_GPU"))
        );
    }

    #[test]
    fn rejects_a_non_object_seed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let seed_path = dir.path().join("input.json");
        std::fs::write(&seed_path, "[1, 2, 3]").unwrap();

        let mut args = bare_args();
        args.project_id = Some("proj1".to_string());
        args.training_input = Some(seed_path);
        assert!(build_request(&args, &Config::default()).is_err());
    }
}
