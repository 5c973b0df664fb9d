use anyhow::{anyhow, Context};
use celf_core::{GraphIndex, GraphStats, NodeId, F};
use celf_sampler::SpreadStats;
use celf_select::{BudgetKey, RunResult, SelectorConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

pub mod cli;
pub use cli::*;

/// Everything needed to reproduce a run and read back its outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub command: String,
    pub input: String,
    pub graph: GraphStats,
    pub config: SelectorConfig,
    /// "lazy_greedy", "naive_greedy" or "cost_effective_forward"
    pub algorithm: String,
    pub result: Option<RunResult>,
    /// Winning key of a cost-effective run.
    pub budget_key: Option<BudgetKey>,
    pub seeds: Vec<NodeId>,
    pub estimate: Option<SpreadStats>,
    pub elapsed_secs: F,
    pub commit_hash: Option<String>,
    pub rust_version: String,
}

impl RunManifest {
    pub fn new(
        command: &str,
        input: &Path,
        graph: &GraphIndex,
        config: SelectorConfig,
        algorithm: &str,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: command.to_string(),
            input: input.display().to_string(),
            graph: graph.stats(),
            config,
            algorithm: algorithm.to_string(),
            result: None,
            budget_key: None,
            seeds: Vec::new(),
            estimate: None,
            elapsed_secs: 0.0,
            commit_hash: get_git_commit(),
            rust_version: get_rust_version(),
        }
    }

    pub fn with_result(mut self, result: RunResult) -> Self {
        self.seeds = result.seeds.clone();
        self.result = Some(result);
        self
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let manifest = serde_json::from_str(&json)?;
        Ok(manifest)
    }
}

/// Parse an undirected edge list: one `u v` pair per line, separated by
/// whitespace or a comma. Extra columns are ignored. Blank lines and lines
/// starting with `#` or `%` are skipped.
pub fn parse_edge_list(text: &str) -> anyhow::Result<Vec<(i64, i64)>> {
    let mut edges = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }
        let mut fields = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty());
        let (Some(u), Some(v)) = (fields.next(), fields.next()) else {
            return Err(anyhow!("line {}: expected two node ids, got {:?}", lineno + 1, line));
        };
        let parse = |field: &str| {
            field
                .parse::<i64>()
                .with_context(|| format!("line {}: invalid node id {:?}", lineno + 1, field))
        };
        edges.push((parse(u)?, parse(v)?));
    }
    Ok(edges)
}

/// Read and index an edge-list file. With `num_nodes` set, ids must lie in
/// `[0, num_nodes)` and nodes without edges are kept.
pub fn load_graph(path: impl AsRef<Path>, num_nodes: Option<usize>) -> anyhow::Result<GraphIndex> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read edge list {}", path.display()))?;
    let edges = parse_edge_list(&text)?;
    let graph = match num_nodes {
        Some(n) => GraphIndex::build_with_nodes(n, &edges),
        None => GraphIndex::build(&edges),
    }
    .with_context(|| format!("failed to index {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "loaded graph"
    );
    Ok(graph)
}

fn get_git_commit() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn get_rust_version() -> String {
    std::process::Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_mixed_separators() {
        let text = "# karate club excerpt\n0 1\n0\t2\n\n% matrix-market style comment\n1,2\n3 4 0.25\n";
        let edges = parse_edge_list(text).unwrap();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2), (3, 4)]);
    }

    #[test]
    fn test_parse_reports_line() {
        let err = parse_edge_list("0 1\n2 x\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = parse_edge_list("0 1\n7\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_load_graph_and_nodes_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 1\n1 2").unwrap();

        let g = load_graph(file.path(), None).unwrap();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);

        let padded = load_graph(file.path(), Some(5)).unwrap();
        assert_eq!(padded.num_nodes(), 5);
        assert_eq!(padded.stats().isolated, 2);

        assert!(load_graph(file.path(), Some(2)).is_err());
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_graph(file.path(), None).is_err());
    }

    #[test]
    fn test_manifest_round_trip() {
        let g = GraphIndex::build(&[(0, 1)]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        let manifest = RunManifest::new(
            "select",
            Path::new("graph.txt"),
            &g,
            SelectorConfig::cardinality(1),
            "lazy_greedy",
        );
        manifest.save_to_file(&path).unwrap();

        let back = RunManifest::load_from_file(&path).unwrap();
        assert_eq!(back.run_id, manifest.run_id);
        assert_eq!(back.graph.num_nodes, 2);
        assert_eq!(back.config, manifest.config);
        assert!(back.result.is_none());
    }
}
