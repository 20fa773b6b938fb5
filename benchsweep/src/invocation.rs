//! Derives how the load generator is invoked for one experiment.

use crate::sweep::Experiment;

/// The invocation of the external load generator for one experiment: its
/// positional arguments and the names of the run's artifacts.
///
/// Deriving this is pure; the same experiment always yields the same
/// argument list and the same names. That determinism, together with the
/// uniqueness of the experiment identity triple, is what keeps artifact
/// names collision-free across the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    output_name: String,
    server_log_name: String,
}

impl Invocation {
    /// Builds the invocation for the given experiment. No process is
    /// started here.
    pub fn new(experiment: &Experiment) -> Self {
        // The load generator's fixed positional contract:
        // threads rps duration update load_size request_size
        let args = vec![
            experiment.threads.to_string(),
            experiment.target_rps.to_string(),
            experiment.duration.as_secs().to_string(),
            experiment.update_percent.to_string(),
            experiment.load_size.to_string(),
            experiment.request_size.to_string(),
        ];

        let tag = format!(
            "{}_{}_r{}",
            experiment.target_rps, experiment.update_percent, experiment.repetition
        );

        Self {
            args,
            output_name: format!("out_{tag}"),
            server_log_name: format!("server_log_{tag}"),
        }
    }

    /// Positional arguments for the load generator, in its fixed order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// File name receiving the load generator's combined stdout and stderr.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// File name the server's log is archived under after the run.
    pub fn server_log_name(&self) -> &str {
        &self.server_log_name
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn experiment() -> Experiment {
        Experiment {
            threads: 4,
            target_rps: 40,
            duration: Duration::from_secs(30),
            update_percent: 100,
            load_size: 100,
            request_size: 100,
            repetition: 2,
        }
    }

    #[test]
    fn arguments_follow_the_positional_contract() {
        let invocation = Invocation::new(&experiment());
        let args: Vec<&str> = invocation.args().iter().map(String::as_str).collect();
        assert_eq!(args, ["4", "40", "30", "100", "100", "100"]);
    }

    #[test]
    fn names_encode_the_identity_triple() {
        let invocation = Invocation::new(&experiment());
        assert_eq!(invocation.output_name(), "out_40_100_r2");
        assert_eq!(invocation.server_log_name(), "server_log_40_100_r2");
    }

    #[test]
    fn building_is_deterministic() {
        let experiment = experiment();
        assert_eq!(Invocation::new(&experiment), Invocation::new(&experiment));
    }

    #[test]
    fn distinct_triples_get_distinct_names() {
        let a = experiment();
        let mut b = experiment();
        b.repetition = 3;

        assert_ne!(
            Invocation::new(&a).output_name(),
            Invocation::new(&b).output_name()
        );
        assert_ne!(
            Invocation::new(&a).server_log_name(),
            Invocation::new(&b).server_log_name()
        );
    }
}
